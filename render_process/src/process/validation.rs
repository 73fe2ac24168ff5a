/// Validation of the buffer and pass tables
///
/// Pure: reads the tables, the format mapper and the context capabilities,
/// never touches the GPU. Produces the effective scale of every buffer and
/// pass.

use std::collections::BTreeMap;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::rp_bail;
use crate::graphics_device::{Capabilities, FormatMapper};
use crate::spec::{BufferId, BufferSpec, DataFormat, PassId, PassSpec};

/// Buffers of one pass must match to this tolerance to share a framebuffer
const SCALE_TOLERANCE: f32 = 1.0e-4;

const SOURCE: &str = "rp::Validation";

/// Effective scales computed by `validate`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scales {
    pub buffers: FxHashMap<BufferId, f32>,
    pub passes: FxHashMap<PassId, f32>,
}

/// Sample count of the framebuffer of `pass`
///
/// The sample count of its buffer-backed targets, 1 when it has none.
pub fn pass_samples(pass: &PassSpec, buffers: &BTreeMap<BufferId, BufferSpec>) -> u32 {
    pass.targets
        .iter()
        .filter_map(|t| t.buffer.and_then(|id| buffers.get(&id)))
        .map(|b| b.multisamples)
        .max()
        .unwrap_or(1)
}

/// Check the tables and compute effective scales
///
/// Fails on the first violation with `Error::InvalidSpecification`.
pub fn validate<M: FormatMapper + ?Sized>(
    buffers: &BTreeMap<BufferId, BufferSpec>,
    passes: &BTreeMap<PassId, PassSpec>,
    mapper: &M,
    capabilities: &Capabilities,
    default_scale: f32,
) -> Result<Scales> {
    let mut scales = Scales::default();

    for (&id, buffer) in buffers {
        if !(buffer.scale.is_finite() && buffer.scale > 0.0) {
            rp_bail!(SOURCE, InvalidSpecification =>
                "buffer {} has a non-positive scale {}", id, buffer.scale);
        }
        if mapper.internal_format(buffer.kind, buffer.format).is_none() {
            rp_bail!(SOURCE, InvalidSpecification =>
                "buffer {}: no native format for {:?}/{:?}", id, buffer.kind, buffer.format);
        }
        if buffer.layers > capabilities.max_array_texture_layers {
            rp_bail!(SOURCE, InvalidSpecification =>
                "buffer {}: {} layers exceed the limit of {}",
                id, buffer.layers, capabilities.max_array_texture_layers);
        }
        if buffer.multisamples > capabilities.max_samples {
            rp_bail!(SOURCE, InvalidSpecification =>
                "buffer {}: {} samples exceed the limit of {}",
                id, buffer.multisamples, capabilities.max_samples);
        }
        if buffer.layers > 1 && buffer.is_multisampled() && !capabilities.layered_multisample {
            rp_bail!(SOURCE, InvalidSpecification =>
                "buffer {}: layered multisample textures are not supported", id);
        }
        scales.buffers.insert(id, buffer.scale);
    }

    for (&pass_id, pass) in passes {
        let mut color_targets = 0;
        let mut pass_scale: Option<f32> = None;
        let mut any_layered = false;
        let mut any_renderbuffer = false;
        let mut samples: Option<u32> = None;

        for target in &pass.targets {
            let Some(buffer_id) = target.buffer else {
                any_renderbuffer = true;
                let kind = target.attachment.renderbuffer_kind();
                if kind.and_then(|k| mapper.internal_format(k, DataFormat::Default)).is_none() {
                    rp_bail!(SOURCE, InvalidSpecification =>
                        "pass {}: no renderbuffer format for {:?}", pass_id, target.attachment);
                }
                continue;
            };
            let Some(buffer) = buffers.get(&buffer_id) else {
                rp_bail!(SOURCE, InvalidSpecification =>
                    "pass {}: target buffer {} is not specified", pass_id, buffer_id);
            };

            if let crate::spec::Attachment::Color(index) = target.attachment {
                color_targets += 1;
                if index >= capabilities.max_color_attachments {
                    rp_bail!(SOURCE, InvalidSpecification =>
                        "pass {}: color attachment {} exceeds the limit of {}",
                        pass_id, index, capabilities.max_color_attachments);
                }
            }
            if !target.attachment.accepts(buffer.kind) {
                rp_bail!(SOURCE, InvalidSpecification =>
                    "pass {}: buffer {} ({:?}) cannot be a {:?} target",
                    pass_id, buffer_id, buffer.kind, target.attachment);
            }

            match pass_scale {
                None => pass_scale = Some(buffer.scale),
                Some(scale) if (scale - buffer.scale).abs() > SCALE_TOLERANCE => {
                    rp_bail!(SOURCE, InvalidSpecification =>
                        "pass {}: buffer {} scale {} differs from the pass scale {}",
                        pass_id, buffer_id, buffer.scale, scale);
                }
                Some(_) => {}
            }

            match samples {
                None => samples = Some(buffer.multisamples),
                Some(count) if count != buffer.multisamples => {
                    rp_bail!(SOURCE, InvalidSpecification =>
                        "pass {}: buffer {} has {} samples, other targets have {}",
                        pass_id, buffer_id, buffer.multisamples, count);
                }
                Some(_) => {}
            }

            any_layered |= buffer.is_layered();
        }

        if any_layered {
            if any_renderbuffer {
                rp_bail!(SOURCE, InvalidSpecification =>
                    "pass {}: layered targets cannot be combined with a renderbuffer", pass_id);
            }
            let mixed = pass.targets
                .iter()
                .filter_map(|t| t.buffer.and_then(|id| buffers.get(&id)))
                .any(|b| !b.is_layered());
            if mixed {
                rp_bail!(SOURCE, InvalidSpecification =>
                    "pass {}: layered and non-layered targets are mixed", pass_id);
            }
        }

        if color_targets > capabilities.max_draw_buffers {
            rp_bail!(SOURCE, InvalidSpecification =>
                "pass {}: {} color targets exceed the limit of {} draw buffers",
                pass_id, color_targets, capabilities.max_draw_buffers);
        }

        for source in &pass.sources {
            if !buffers.contains_key(&source.buffer) {
                rp_bail!(SOURCE, InvalidSpecification =>
                    "pass {}: source buffer {} is not specified", pass_id, source.buffer);
            }
        }

        scales.passes.insert(pass_id, pass_scale.unwrap_or(default_scale));
    }

    Ok(scales)
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
