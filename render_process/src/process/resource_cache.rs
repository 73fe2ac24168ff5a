/// Texture / framebuffer cache
///
/// Owns the GPU objects created for buffers and passes, keyed by id, and
/// reconciles them against freshly computed descriptors: identical objects
/// are kept, resizable textures are re-specified in place, everything else
/// is dropped (which deletes it, external textures excepted) and recreated.

use std::collections::BTreeMap;
use glam::UVec2;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::{rp_bail, rp_debug, rp_error, rp_trace};
use crate::graphics_device::{
    AttachmentSource, FormatMapper, Framebuffer, FramebufferAttachment, FramebufferDesc,
    GraphicsDevice, Texture, TextureDesc, TextureMatch, compare_textures,
};
use crate::spec::{BufferId, BufferSpec, DataFormat, PassId, PassSpec};

const SOURCE: &str = "rp::ResourceCache";

/// Pixel size of a buffer or pass: `viewport * scale`, rounded, at least 1x1
pub fn scaled_size(viewport: UVec2, scale: f32) -> UVec2 {
    (viewport.as_vec2() * scale).round().as_uvec2().max(UVec2::ONE)
}

/// GPU objects of the render process
pub struct ResourceCache {
    // Declared first so framebuffers drop before the textures they reference
    framebuffers: FxHashMap<PassId, Box<dyn Framebuffer>>,
    textures: FxHashMap<BufferId, Box<dyn Texture>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self {
            framebuffers: FxHashMap::default(),
            textures: FxHashMap::default(),
        }
    }

    pub fn texture(&self, id: BufferId) -> Option<&dyn Texture> {
        self.textures.get(&id).map(|t| &**t)
    }

    pub fn framebuffer(&self, id: PassId) -> Option<&dyn Framebuffer> {
        self.framebuffers.get(&id).map(|f| &**f)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Drop textures whose buffer left the table
    ///
    /// Returns the number of removed textures.
    pub fn delete_unnecessary_textures(&mut self, buffers: &BTreeMap<BufferId, BufferSpec>) -> usize {
        let before = self.textures.len();
        self.textures.retain(|id, _| buffers.contains_key(id));
        before - self.textures.len()
    }

    /// Drop framebuffers whose pass left the table or has no targets anymore
    ///
    /// Returns the number of removed framebuffers.
    pub fn delete_unnecessary_framebuffers(&mut self, passes: &BTreeMap<PassId, PassSpec>) -> usize {
        let before = self.framebuffers.len();
        self.framebuffers
            .retain(|id, _| passes.get(id).is_some_and(|pass| !pass.targets_default()));
        before - self.framebuffers.len()
    }

    /// Drop the framebuffer of pass `id`, if any
    ///
    /// Needed when an attached texture was recreated: the new texture may
    /// carry the deleted one's name, so the descriptor alone cannot tell.
    pub fn remove_framebuffer(&mut self, id: PassId) -> bool {
        self.framebuffers.remove(&id).is_some()
    }

    /// Make the texture of buffer `id` match `desc`
    pub fn update_texture(
        &mut self,
        device: &mut dyn GraphicsDevice,
        id: BufferId,
        desc: TextureDesc,
        label: &str,
    ) -> Result<TextureMatch> {
        let decision = match self.textures.get(&id) {
            Some(existing) => compare_textures(existing.desc(), &desc),
            None => TextureMatch::MustRecreate,
        };

        match decision {
            TextureMatch::Identical => {}
            TextureMatch::ReusableWithResize => {
                if let Some(texture) = self.textures.get_mut(&id) {
                    rp_trace!(SOURCE, "resize texture of buffer {} to {}x{}", id, desc.size.x, desc.size.y);
                    texture.resize(desc.size)?;
                }
            }
            TextureMatch::MustRecreate => {
                // Drop the stale object before allocating its replacement
                self.textures.remove(&id);
                let texture = if desc.is_external() {
                    device.import_texture(&desc)?
                } else {
                    device.create_texture(&desc, label)?
                };
                rp_debug!(SOURCE, "buffer {} -> texture {} ({:?} {}x{})",
                    id, texture.name(), desc.kind(), desc.size.x, desc.size.y);
                self.textures.insert(id, texture);
            }
        }
        Ok(decision)
    }

    /// Attachment list of `pass` from the cached textures
    pub fn framebuffer_desc<M: FormatMapper + ?Sized>(
        &self,
        pass: &PassSpec,
        size: UVec2,
        samples: u32,
        mapper: &M,
    ) -> Result<FramebufferDesc> {
        let mut attachments = Vec::with_capacity(pass.targets.len());
        for target in &pass.targets {
            let source = match target.buffer {
                Some(buffer) => {
                    let Some(texture) = self.texture(buffer) else {
                        rp_error!(SOURCE, "no texture for target buffer {}", buffer);
                        return Err(Error::UnknownBuffer(buffer));
                    };
                    AttachmentSource::Texture {
                        name: texture.name(),
                        kind: texture.desc().kind(),
                        cubemap_face: texture.desc().cubemap_face(),
                    }
                }
                None => {
                    let format = target.attachment
                        .renderbuffer_kind()
                        .and_then(|kind| mapper.internal_format(kind, DataFormat::Default));
                    let Some(format) = format else {
                        rp_bail!(SOURCE, InvalidSpecification =>
                            "no renderbuffer format for {:?}", target.attachment);
                    };
                    AttachmentSource::Renderbuffer { format }
                }
            };
            attachments.push(FramebufferAttachment { attachment: target.attachment, source });
        }
        Ok(FramebufferDesc { size, samples, attachments })
    }

    /// Make the framebuffer of pass `id` match `desc`
    ///
    /// A complete framebuffer with an equal descriptor is kept, an incomplete
    /// one is rebuilt. Returns the completeness of the resulting framebuffer.
    pub fn update_framebuffer(
        &mut self,
        device: &mut dyn GraphicsDevice,
        id: PassId,
        desc: FramebufferDesc,
        label: &str,
    ) -> Result<bool> {
        if self.framebuffers.get(&id).is_some_and(|fb| fb.desc() == &desc && fb.is_complete()) {
            return Ok(true);
        }

        self.framebuffers.remove(&id);
        let framebuffer = device.create_framebuffer(&desc, label)?;
        let complete = framebuffer.is_complete();
        rp_debug!(SOURCE, "pass {} -> framebuffer {} ({}x{}, {} attachments)",
            id, framebuffer.name(), desc.size.x, desc.size.y, desc.attachments.len());
        self.framebuffers.insert(id, framebuffer);
        Ok(complete)
    }

    /// Drop every GPU object
    pub fn clear(&mut self) {
        // Framebuffers first, they reference the textures
        self.framebuffers.clear();
        self.textures.clear();
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "resource_cache_tests.rs"]
mod tests;
