/*!
# Render Process - OpenGL Backend

OpenGL implementation of the render process `GraphicsDevice`, built on
[glow](https://docs.rs/glow).

The backend maps buffer descriptions to OpenGL formats, allocates textures
and framebuffers as owning handles (deleted on drop, external textures
excepted), queries the context limits once and applies the per-pass GL
state. Native OpenGL contexts only.
*/

mod debug;
mod glow_format;
mod glow_texture;
mod glow_framebuffer;
mod glow_device;

use std::rc::Rc;
use render_process::rp::{Config, RenderProcessManager};

pub use glow_device::{GlowConfig, GlowDevice, query_capabilities};
pub use glow_texture::GlowTexture;
pub use glow_framebuffer::GlowFramebuffer;
pub use glow_format::{anisotropy_level, blend_factors, depth_state, internal_format};
pub use debug::{error_name, framebuffer_status_name};

/// Create a render process manager on an OpenGL context
///
/// The context must be current on the calling thread for the lifetime of
/// the manager.
///
/// # Example
///
/// ```no_run
/// use std::rc::Rc;
/// use render_process::rp::{Config, RenderProcess, BufferSpec, DataFormat, PassSpec, Target};
/// use render_process::glam::UVec2;
/// use render_process_glow::GlowConfig;
///
/// # fn run(gl: glow::Context) -> render_process::rp::Result<()> {
/// let mut process = render_process_glow::create_render_process(
///     Rc::new(gl),
///     GlowConfig::default(),
///     Config::default(),
/// );
/// process.specify_buffer(0, BufferSpec::color(4, DataFormat::F16))?;
/// process.specify_pass(0, PassSpec::new().with_target(Target::color(0, 0).cleared()))?;
/// process.create(UVec2::new(1280, 720))?;
/// # Ok(())
/// # }
/// ```
pub fn create_render_process(
    gl: Rc<glow::Context>,
    glow_config: GlowConfig,
    config: Config,
) -> RenderProcessManager {
    let capabilities = query_capabilities(&gl);
    let device = GlowDevice::new(gl, glow_config, &capabilities);
    RenderProcessManager::new(Box::new(device), capabilities, config)
}
