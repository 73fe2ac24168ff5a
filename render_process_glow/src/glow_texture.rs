/// Texture - OpenGL implementation of the Texture trait
///
/// Owns a GL texture name and deletes it when dropped. An imported external
/// texture is only referenced and never deleted.

use std::num::NonZeroU32;
use std::rc::Rc;
use glam::UVec2;
use glow::{HasContext, PixelUnpackData};
use render_process::rp::{Result, Texture, TextureDesc, TextureKind};
use render_process::{rp_bail, rp_trace};
use crate::debug;
use crate::glow_format::{anisotropy_level, texture_filter};

const SOURCE: &str = "rp::glow::Texture";

/// `GL_TEXTURE_MAX_ANISOTROPY` (core 4.6 and EXT/ARB_texture_filter_anisotropic)
const TEXTURE_MAX_ANISOTROPY: u32 = 0x84FE;

pub(crate) fn native_texture(name: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

/// Allocate storage for `desc` on `texture` and set its sampler state
///
/// One path for every texture kind. Leaves no texture bound on the target.
/// `max_anisotropy` is the context limit, 1.0 when unsupported.
pub(crate) fn specify_storage(
    gl: &glow::Context,
    texture: glow::NativeTexture,
    desc: &TextureDesc,
    max_anisotropy: f32,
    check_errors: bool,
) -> Result<()> {
    let kind = desc.kind();
    let target = kind.gl_target();
    let (width, height) = (desc.size.x as i32, desc.size.y as i32);
    let format = desc.format;
    let internal = format.internal as i32;

    if kind == TextureKind::LayeredMultisampled {
        rp_bail!(SOURCE, "2D multisample array textures cannot be allocated by this backend");
    }

    unsafe {
        gl.bind_texture(target, Some(texture));
        match kind {
            TextureKind::Plain2D => gl.tex_image_2d(
                target, 0, internal, width, height, 0,
                format.format, format.data_type, PixelUnpackData::Slice(None),
            ),
            TextureKind::Layered => gl.tex_image_3d(
                target, 0, internal, width, height, desc.layers as i32, 0,
                format.format, format.data_type, PixelUnpackData::Slice(None),
            ),
            TextureKind::Multisampled => {
                gl.tex_image_2d_multisample(target, desc.samples as i32, internal, width, height, true)
            }
            TextureKind::CubeMap => {
                for face in 0..6 {
                    gl.tex_image_2d(
                        glow::TEXTURE_CUBE_MAP_POSITIVE_X + face, 0, internal, width, height, 0,
                        format.format, format.data_type, PixelUnpackData::Slice(None),
                    );
                }
            }
            TextureKind::LayeredMultisampled => {}
        }

        if kind.has_sampler_state() {
            let filter = texture_filter(desc.linear) as i32;
            gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, filter);
            gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, filter);
            gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            if kind != TextureKind::Plain2D {
                gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_R, glow::CLAMP_TO_EDGE as i32);
            }
            if let Some(level) = anisotropy_level(desc.linear, max_anisotropy) {
                gl.tex_parameter_f32(target, TEXTURE_MAX_ANISOTROPY, level);
            }
        }
        gl.bind_texture(target, None);
    }

    debug::check_errors(gl, check_errors, "texture storage")
}

/// OpenGL texture backing one buffer
pub struct GlowTexture {
    gl: Rc<glow::Context>,
    name: u32,
    desc: TextureDesc,
    max_anisotropy: f32,
    check_errors: bool,
}

impl GlowTexture {
    /// Wrap a texture this backend created
    pub(crate) fn owned(
        gl: Rc<glow::Context>,
        texture: glow::NativeTexture,
        desc: TextureDesc,
        max_anisotropy: f32,
        check_errors: bool,
    ) -> Self {
        Self { gl, name: texture.0.get(), desc, max_anisotropy, check_errors }
    }

    /// Reference a caller-owned texture
    pub(crate) fn external(gl: Rc<glow::Context>, name: u32, desc: TextureDesc) -> Self {
        Self { gl, name, desc, max_anisotropy: 1.0, check_errors: false }
    }
}

impl Texture for GlowTexture {
    fn name(&self) -> u32 {
        self.name
    }

    fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    fn resize(&mut self, size: UVec2) -> Result<()> {
        if self.desc.is_external() {
            rp_bail!(SOURCE, InvalidState => "external texture {} cannot be resized", self.name);
        }
        let Some(texture) = native_texture(self.name) else {
            rp_bail!(SOURCE, "texture name 0 cannot be resized");
        };

        let mut desc = self.desc;
        desc.size = size;
        specify_storage(&self.gl, texture, &desc, self.max_anisotropy, self.check_errors)?;
        rp_trace!(SOURCE, "texture {} resized to {}x{}", self.name, size.x, size.y);
        self.desc = desc;
        Ok(())
    }
}

impl Drop for GlowTexture {
    fn drop(&mut self) {
        if self.desc.is_external() {
            return;
        }
        if let Some(texture) = native_texture(self.name) {
            unsafe {
                self.gl.delete_texture(texture);
            }
        }
    }
}
