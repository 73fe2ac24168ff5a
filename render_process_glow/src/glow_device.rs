/// GlowDevice - OpenGL implementation of the GraphicsDevice trait
///
/// Wraps a `glow::Context` that the caller keeps current on this thread.
/// Creates owning texture and framebuffer handles for the render process
/// manager and applies the per-pass GL state.

use std::rc::Rc;
use glam::{UVec2, Vec4};
use glow::HasContext;
use rustc_hash::FxHashSet;
use render_process::rp::{
    Blending, BufferKind, Capabilities, ClearMask, DataFormat, DepthTest, FormatMapper,
    Framebuffer, FramebufferDesc, GraphicsDevice, InternalFormat, Result, Texture, TextureDesc,
};
use render_process::{rp_bail, rp_debug, rp_info};
use crate::debug;
use crate::glow_format;
use crate::glow_framebuffer::{GlowFramebuffer, native_framebuffer};
use crate::glow_texture::{GlowTexture, native_texture, specify_storage};

const SOURCE: &str = "rp::glow";

/// `GL_MAX_TEXTURE_MAX_ANISOTROPY` (core 4.6 and EXT/ARB_texture_filter_anisotropic)
const MAX_TEXTURE_MAX_ANISOTROPY: u32 = 0x84FF;

/// OpenGL backend configuration
#[derive(Debug, Clone)]
pub struct GlowConfig {
    /// Drain and log `glGetError` after each group of GL calls
    pub check_errors: bool,
    /// Name created objects with `glObjectLabel` (needs `GL_KHR_debug`)
    pub object_labels: bool,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            check_errors: cfg!(debug_assertions),
            object_labels: cfg!(debug_assertions),
        }
    }
}

/// Query the limits and extensions of the current context
///
/// Called once per context; the result is handed to `RenderProcessManager::new`.
pub fn query_capabilities(gl: &glow::Context) -> Capabilities {
    let extensions: FxHashSet<String> = gl.supported_extensions().iter().cloned().collect();
    let anisotropic = extensions.contains("GL_EXT_texture_filter_anisotropic")
        || extensions.contains("GL_ARB_texture_filter_anisotropic");

    let limit = |parameter: u32| unsafe { gl.get_parameter_i32(parameter) }.max(1) as u32;
    let capabilities = Capabilities {
        max_color_attachments: limit(glow::MAX_COLOR_ATTACHMENTS),
        max_draw_buffers: limit(glow::MAX_DRAW_BUFFERS),
        max_samples: limit(glow::MAX_SAMPLES),
        max_array_texture_layers: limit(glow::MAX_ARRAY_TEXTURE_LAYERS),
        max_texture_size: limit(glow::MAX_TEXTURE_SIZE),
        max_anisotropy: if anisotropic {
            unsafe { gl.get_parameter_f32(MAX_TEXTURE_MAX_ANISOTROPY) }.max(1.0)
        } else {
            1.0
        },
        layered_multisample: false,
        extensions,
    };

    rp_info!(SOURCE, "context limits: {} color attachments, {} draw buffers, {} samples, {} layers, {}px textures",
        capabilities.max_color_attachments,
        capabilities.max_draw_buffers,
        capabilities.max_samples,
        capabilities.max_array_texture_layers,
        capabilities.max_texture_size);
    capabilities
}

/// OpenGL graphics device
pub struct GlowDevice {
    gl: Rc<glow::Context>,
    config: GlowConfig,
    khr_debug: bool,
    max_anisotropy: f32,
}

impl GlowDevice {
    /// `capabilities` must come from `query_capabilities` on the same context
    pub fn new(gl: Rc<glow::Context>, config: GlowConfig, capabilities: &Capabilities) -> Self {
        let khr_debug = capabilities.has_extension("GL_KHR_debug");
        let max_anisotropy = capabilities.max_anisotropy;
        rp_debug!(SOURCE, "glow device: error checks {}, object labels {} (KHR_debug {}), anisotropy {}",
            config.check_errors, config.object_labels, khr_debug, max_anisotropy);
        Self { gl, config, khr_debug, max_anisotropy }
    }

    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    pub fn config(&self) -> &GlowConfig {
        &self.config
    }

    fn check_errors(&self) -> bool {
        self.config.check_errors || cfg!(feature = "gl-error-checks")
    }

    fn labels(&self) -> bool {
        self.config.object_labels && self.khr_debug
    }

    fn check(&self, operation: &str) -> Result<()> {
        debug::check_errors(&self.gl, self.check_errors(), operation)
    }
}

impl FormatMapper for GlowDevice {
    fn internal_format(&self, kind: BufferKind, format: DataFormat) -> Option<InternalFormat> {
        glow_format::internal_format(kind, format)
    }
}

impl GraphicsDevice for GlowDevice {
    fn create_texture(&mut self, desc: &TextureDesc, label: &str) -> Result<Box<dyn Texture>> {
        let texture = match unsafe { self.gl.create_texture() } {
            Ok(texture) => texture,
            Err(message) => rp_bail!(SOURCE, "glCreateTexture failed for {}: {}", label, message),
        };
        // Wrapped before allocation so a failure deletes the name
        let wrapped = GlowTexture::owned(
            Rc::clone(&self.gl), texture, *desc, self.max_anisotropy, self.check_errors(),
        );
        specify_storage(&self.gl, texture, desc, self.max_anisotropy, self.check_errors())?;
        debug::label_object(&self.gl, self.labels(), glow::TEXTURE, texture.0.get(), label);
        Ok(Box::new(wrapped))
    }

    fn import_texture(&mut self, desc: &TextureDesc) -> Result<Box<dyn Texture>> {
        let Some(external) = desc.external else {
            rp_bail!(SOURCE, InvalidSpecification => "import of a texture without external handle");
        };
        if native_texture(external.name).is_none() {
            rp_bail!(SOURCE, InvalidSpecification => "external texture name 0 is not a texture");
        }
        Ok(Box::new(GlowTexture::external(Rc::clone(&self.gl), external.name, *desc)))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc, label: &str) -> Result<Box<dyn Framebuffer>> {
        let framebuffer = GlowFramebuffer::create(Rc::clone(&self.gl), desc, self.check_errors())?;
        debug::label_object(&self.gl, self.labels(), glow::FRAMEBUFFER, framebuffer.name(), label);
        Ok(Box::new(framebuffer))
    }

    fn set_depth_test(&mut self, depth: DepthTest) -> Result<()> {
        unsafe {
            match glow_format::depth_state(depth) {
                Some((function, write)) => {
                    self.gl.enable(glow::DEPTH_TEST);
                    self.gl.depth_func(function);
                    self.gl.depth_mask(write);
                }
                None => self.gl.disable(glow::DEPTH_TEST),
            }
        }
        self.check("depth test")
    }

    fn set_blending(&mut self, blending: Blending) -> Result<()> {
        unsafe {
            match glow_format::blend_factors(blending) {
                Some((source, destination)) => {
                    self.gl.enable(glow::BLEND);
                    self.gl.blend_func(source, destination);
                }
                None => self.gl.disable(glow::BLEND),
            }
        }
        self.check("blending")
    }

    fn set_viewport(&mut self, size: UVec2) -> Result<()> {
        unsafe {
            self.gl.viewport(0, 0, size.x as i32, size.y as i32);
        }
        self.check("viewport")
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: u32) -> Result<()> {
        unsafe {
            self.gl.bind_framebuffer(target, native_framebuffer(framebuffer));
        }
        self.check("bind framebuffer")
    }

    fn set_draw_buffers(&mut self, buffers: &[u32]) -> Result<()> {
        unsafe {
            self.gl.draw_buffers(buffers);
        }
        self.check("draw buffers")
    }

    fn clear_color_attachment(&mut self, index: u32, color: Vec4) -> Result<()> {
        unsafe {
            self.gl.clear_buffer_f32_slice(glow::COLOR, index, &color.to_array());
        }
        self.check("clear color attachment")
    }

    fn clear(&mut self, mask: ClearMask, color: Option<Vec4>) -> Result<()> {
        unsafe {
            if let Some(color) = color {
                self.gl.clear_color(color.x, color.y, color.z, color.w);
            }
            self.gl.clear(mask.bits());
        }
        self.check("clear")
    }

    fn bind_texture(&mut self, unit: u32, target: u32, texture: u32) -> Result<()> {
        unsafe {
            self.gl.active_texture(unit);
            self.gl.bind_texture(target, native_texture(texture));
            self.gl.active_texture(glow::TEXTURE0);
        }
        self.check("bind texture")
    }
}
