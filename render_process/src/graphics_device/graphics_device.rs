/// GraphicsDevice trait - the seam between the manager and the graphics API
///
/// The manager decides what to create, reuse, bind and clear; a device
/// implementation issues the matching API calls. All calls assume the
/// device's context is current on the calling thread.

use bitflags::bitflags;
use glam::{UVec2, Vec4};
use crate::error::Result;
use crate::spec::{Blending, DepthTest};
use super::{
    FormatMapper, Texture, TextureDesc, Framebuffer, FramebufferDesc,
};

bitflags! {
    /// Buffers cleared by one `clear` call (`glClear` mask bits)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClearMask: u32 {
        const COLOR = glow::COLOR_BUFFER_BIT;
        const DEPTH = glow::DEPTH_BUFFER_BIT;
        const STENCIL = glow::STENCIL_BUFFER_BIT;
    }
}

/// Graphics device trait
///
/// Resource creation returns owning handles: dropping a texture or a
/// framebuffer deletes the GPU object (external textures excepted).
pub trait GraphicsDevice: FormatMapper {
    // ===== RESOURCES =====

    /// Allocate a texture matching `desc`
    fn create_texture(&mut self, desc: &TextureDesc, label: &str) -> Result<Box<dyn Texture>>;

    /// Wrap the caller-owned texture named by `desc.external`
    ///
    /// The returned handle never deletes the texture.
    fn import_texture(&mut self, desc: &TextureDesc) -> Result<Box<dyn Texture>>;

    /// Create a framebuffer, attach every target and check completeness
    ///
    /// Leaves the default framebuffer bound.
    fn create_framebuffer(&mut self, desc: &FramebufferDesc, label: &str) -> Result<Box<dyn Framebuffer>>;

    // ===== STATE =====

    fn set_depth_test(&mut self, depth: DepthTest) -> Result<()>;

    fn set_blending(&mut self, blending: Blending) -> Result<()>;

    /// Viewport at the origin with the given size
    fn set_viewport(&mut self, size: UVec2) -> Result<()>;

    /// Bind `framebuffer` (0 = default) to `target`
    /// (`FRAMEBUFFER`, `READ_FRAMEBUFFER` or `DRAW_FRAMEBUFFER`)
    fn bind_framebuffer(&mut self, target: u32, framebuffer: u32) -> Result<()>;

    /// Select draw buffers of the bound framebuffer, an empty list selects none
    fn set_draw_buffers(&mut self, buffers: &[u32]) -> Result<()>;

    /// Clear one color attachment (`glClearBufferfv(GL_COLOR, index, color)`)
    fn clear_color_attachment(&mut self, index: u32, color: Vec4) -> Result<()>;

    /// Clear the buffers in `mask`, setting the clear color first when given
    fn clear(&mut self, mask: ClearMask, color: Option<Vec4>) -> Result<()>;

    /// Bind `texture` (0 = unbind) to `target` on texture unit `unit` (`TEXTURE0 + n`)
    ///
    /// Leaves `TEXTURE0` active.
    fn bind_texture(&mut self, unit: u32, target: u32, texture: u32) -> Result<()>;
}
