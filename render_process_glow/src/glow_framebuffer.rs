/// Framebuffer - OpenGL implementation of the Framebuffer trait
///
/// Groups the target attachments of one pass. Owns the renderbuffers created
/// for bufferless depth/stencil targets; the framebuffer and its
/// renderbuffers are deleted when dropped.

use std::num::NonZeroU32;
use std::rc::Rc;
use glow::HasContext;
use render_process::rp::{
    AttachmentSource, Framebuffer, FramebufferDesc, Result, TextureKind,
};
use render_process::{rp_bail, rp_warn};
use crate::debug;
use crate::glow_texture::native_texture;

const SOURCE: &str = "rp::glow::Framebuffer";

pub(crate) fn native_framebuffer(name: u32) -> Option<glow::NativeFramebuffer> {
    NonZeroU32::new(name).map(glow::NativeFramebuffer)
}

/// OpenGL framebuffer of one pass
pub struct GlowFramebuffer {
    gl: Rc<glow::Context>,
    framebuffer: glow::NativeFramebuffer,
    renderbuffers: Vec<glow::NativeRenderbuffer>,
    desc: FramebufferDesc,
    complete: bool,
}

impl GlowFramebuffer {
    /// Create the framebuffer, attach every target and check completeness
    ///
    /// Leaves the default framebuffer bound.
    pub(crate) fn create(gl: Rc<glow::Context>, desc: &FramebufferDesc, check_errors: bool) -> Result<Self> {
        let framebuffer = match unsafe { gl.create_framebuffer() } {
            Ok(framebuffer) => framebuffer,
            Err(message) => rp_bail!(SOURCE, "glCreateFramebuffer failed: {}", message),
        };
        // Owned from here on: early returns delete what was created so far
        let mut result = Self {
            gl,
            framebuffer,
            renderbuffers: Vec::new(),
            desc: desc.clone(),
            complete: false,
        };
        let attached = result.attach_all(check_errors);
        unsafe {
            result.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
        attached?;
        Ok(result)
    }

    fn attach_all(&mut self, check_errors: bool) -> Result<()> {
        let gl = Rc::clone(&self.gl);
        let (width, height) = (self.desc.size.x as i32, self.desc.size.y as i32);
        let samples = self.desc.samples as i32;

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
        }

        for attachment in &self.desc.attachments {
            let point = attachment.attachment.gl_attachment();
            match attachment.source {
                AttachmentSource::Texture { name, kind, cubemap_face } => {
                    let texture = native_texture(name);
                    unsafe {
                        match (kind, cubemap_face) {
                            (_, Some(face)) => gl.framebuffer_texture_2d(
                                glow::FRAMEBUFFER, point, glow::TEXTURE_CUBE_MAP_POSITIVE_X + face, texture, 0,
                            ),
                            (TextureKind::Plain2D | TextureKind::Multisampled, None) => gl.framebuffer_texture_2d(
                                glow::FRAMEBUFFER, point, kind.gl_target(), texture, 0,
                            ),
                            // Layered attachment, selected per primitive by gl_Layer
                            _ => gl.framebuffer_texture(glow::FRAMEBUFFER, point, texture, 0),
                        }
                    }
                }
                AttachmentSource::Renderbuffer { format } => {
                    let renderbuffer = match unsafe { gl.create_renderbuffer() } {
                        Ok(renderbuffer) => renderbuffer,
                        Err(message) => rp_bail!(SOURCE, "glCreateRenderbuffer failed: {}", message),
                    };
                    self.renderbuffers.push(renderbuffer);
                    unsafe {
                        gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
                        if samples > 1 {
                            gl.renderbuffer_storage_multisample(glow::RENDERBUFFER, samples, format.internal, width, height);
                        } else {
                            gl.renderbuffer_storage(glow::RENDERBUFFER, format.internal, width, height);
                        }
                        gl.bind_renderbuffer(glow::RENDERBUFFER, None);
                        gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, point, glow::RENDERBUFFER, Some(renderbuffer));
                    }
                }
            }
        }

        unsafe {
            if let Some(unused) = self.desc.unused_depth_stencil() {
                gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, unused, glow::RENDERBUFFER, None);
            }
            if !self.desc.attachments.iter().any(|a| a.attachment.is_color()) {
                gl.draw_buffer(glow::NONE);
                gl.read_buffer(glow::NONE);
            }
        }
        debug::check_errors(&gl, check_errors, "framebuffer attachments")?;

        let status = unsafe { gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        self.complete = status == glow::FRAMEBUFFER_COMPLETE;
        if !self.complete {
            rp_warn!(SOURCE, "framebuffer {} is incomplete: {}",
                self.framebuffer.0.get(), debug::framebuffer_status_name(status));
        }
        Ok(())
    }
}

impl Framebuffer for GlowFramebuffer {
    fn name(&self) -> u32 {
        self.framebuffer.0.get()
    }

    fn desc(&self) -> &FramebufferDesc {
        &self.desc
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

impl Drop for GlowFramebuffer {
    fn drop(&mut self) {
        unsafe {
            for renderbuffer in self.renderbuffers.drain(..) {
                self.gl.delete_renderbuffer(renderbuffer);
            }
            self.gl.delete_framebuffer(self.framebuffer);
        }
    }
}
