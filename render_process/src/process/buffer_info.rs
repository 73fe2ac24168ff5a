/// Per-pass bind/clear plan (buffer info cache entry)
///
/// Derived from a pass specification and the GPU objects of the cache.
/// Evaluated lazily on first use of a pass, dropped whenever the tables or
/// the GPU objects change.

use glam::{UVec2, Vec4};
use crate::graphics_device::ClearMask;
use crate::spec::{Attachment, PassSpec, PassId};
use super::ResourceCache;

/// Texture bound to a unit before a pass runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceBinding {
    /// `TEXTURE0 + binding`
    pub unit: u32,
    /// Texture target (`TEXTURE_2D`, `TEXTURE_2D_ARRAY`, ...)
    pub target: u32,
    /// GPU texture name
    pub texture: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferInfo {
    /// The pass renders to its default framebuffer
    pub target_is_default: bool,
    pub viewport_size: UVec2,
    /// Framebuffer bound for the pass
    pub framebuffer: u32,
    /// Mask of the single `glClear` call
    pub clear_mask: ClearMask,
    /// Clear color of the single `glClear` call, current color when `None`
    pub clear_color: Option<Vec4>,
    /// Separate color clears as (draw buffer index, color)
    pub clear_targets: Vec<(u32, Vec4)>,
    /// `COLOR_ATTACHMENT0 + n` in target order
    pub draw_buffers: Vec<u32>,
    pub sources: Vec<SourceBinding>,
    /// Only attachment 0 is currently selected as draw buffer
    pub only_first_color: bool,
}

impl BufferInfo {
    pub fn evaluate(pass_id: PassId, pass: &PassSpec, cache: &ResourceCache, viewport: UVec2) -> Self {
        let framebuffer = cache.framebuffer(pass_id);
        let target_is_default = framebuffer.is_none();

        let (viewport_size, framebuffer) = match framebuffer {
            Some(fb) => (fb.size(), fb.name()),
            None => (viewport, pass.default_framebuffer),
        };

        let mut clear_mask = if target_is_default && pass.clear_default {
            ClearMask::COLOR | ClearMask::DEPTH
        } else {
            ClearMask::empty()
        };

        let mut draw_buffers = Vec::new();
        let mut color_clears: Vec<(u32, Vec4)> = Vec::new();
        let mut every_color_cleared = true;
        for target in &pass.targets {
            match target.attachment {
                Attachment::DepthStencil if target.clear => {
                    clear_mask |= ClearMask::DEPTH | ClearMask::STENCIL;
                }
                Attachment::Depth if target.clear => clear_mask |= ClearMask::DEPTH,
                Attachment::Stencil if target.clear => clear_mask |= ClearMask::STENCIL,
                Attachment::Color(index) => {
                    let draw_buffer = draw_buffers.len() as u32;
                    draw_buffers.push(glow::COLOR_ATTACHMENT0 + index);
                    if target.clear {
                        color_clears.push((draw_buffer, target.clear_color));
                    } else {
                        every_color_cleared = false;
                    }
                }
                _ => {}
            }
        }

        // One glClear covers all color targets only when they share a clear color
        let shared_color = color_clears
            .first()
            .map(|&(_, color)| color)
            .filter(|first| every_color_cleared && color_clears.iter().all(|(_, c)| c == first));
        let (clear_color, clear_targets) = match shared_color {
            Some(color) => {
                clear_mask |= ClearMask::COLOR;
                (Some(color), Vec::new())
            }
            None => (None, color_clears),
        };

        let sources = pass.sources
            .iter()
            .filter_map(|source| {
                let texture = cache.texture(source.buffer)?;
                Some(SourceBinding {
                    unit: glow::TEXTURE0 + source.binding,
                    target: texture.desc().kind().gl_target(),
                    texture: texture.name(),
                })
            })
            .collect();

        Self {
            target_is_default,
            viewport_size,
            framebuffer,
            clear_mask,
            clear_color,
            clear_targets,
            draw_buffers,
            sources,
            only_first_color: false,
        }
    }
}

#[cfg(test)]
#[path = "buffer_info_tests.rs"]
mod tests;
