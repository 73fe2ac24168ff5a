/// OpenGL format and render state tables
///
/// Pure mappings from the logical buffer, depth and blend descriptions to
/// OpenGL enumerators. No GL calls.

use render_process::rp::{Blending, BufferKind, DataFormat, DepthTest, InternalFormat};

/// Sized internal format, pixel format and data type of a buffer
///
/// Returns `None` when the kind/format combination has no OpenGL format.
pub fn internal_format(kind: BufferKind, format: DataFormat) -> Option<InternalFormat> {
    use DataFormat::*;

    let internal = match kind {
        BufferKind::Color1 | BufferKind::Color2 | BufferKind::Color3 | BufferKind::Color4 => {
            // Indexed by channel count - 1
            let row: [u32; 4] = match format {
                Default | Uint8 => [glow::R8, glow::RG8, glow::RGB8, glow::RGBA8],
                Snorm8 => [glow::R8_SNORM, glow::RG8_SNORM, glow::RGB8_SNORM, glow::RGBA8_SNORM],
                Snorm16 => [glow::R16_SNORM, glow::RG16_SNORM, glow::RGB16_SNORM, glow::RGBA16_SNORM],
                F16 => [glow::R16F, glow::RG16F, glow::RGB16F, glow::RGBA16F],
                F32 => [glow::R32F, glow::RG32F, glow::RGB32F, glow::RGBA32F],
                _ => return None,
            };
            row[kind.channels() as usize - 1]
        }
        BufferKind::Depth => match format {
            Default | Depth24 => glow::DEPTH_COMPONENT24,
            Depth16 => glow::DEPTH_COMPONENT16,
            Depth32 => glow::DEPTH_COMPONENT32,
            Depth32F => glow::DEPTH_COMPONENT32F,
            _ => return None,
        },
        BufferKind::Stencil => match format {
            Default | Stencil8 => glow::STENCIL_INDEX8,
            _ => return None,
        },
        BufferKind::DepthStencil => match format {
            Default | Depth24 | DepthStencil24_8 => glow::DEPTH24_STENCIL8,
            Depth32F | DepthStencil32F_8 => glow::DEPTH32F_STENCIL8,
            _ => return None,
        },
    };

    let pixel_format = match kind {
        BufferKind::Color1 => glow::RED,
        BufferKind::Color2 => glow::RG,
        BufferKind::Color3 => glow::RGB,
        BufferKind::Color4 => glow::RGBA,
        BufferKind::Depth => glow::DEPTH_COMPONENT,
        BufferKind::Stencil => glow::STENCIL_INDEX,
        BufferKind::DepthStencil => glow::DEPTH_STENCIL,
    };

    let data_type = match kind {
        BufferKind::Depth => glow::FLOAT,
        BufferKind::Stencil => glow::UNSIGNED_BYTE,
        BufferKind::DepthStencil if internal == glow::DEPTH24_STENCIL8 => glow::UNSIGNED_INT_24_8,
        BufferKind::DepthStencil => glow::FLOAT_32_UNSIGNED_INT_24_8_REV,
        _ if matches!(format, Default | Uint8) => glow::UNSIGNED_BYTE,
        _ => glow::FLOAT,
    };

    Some(InternalFormat::new(internal, pixel_format, data_type))
}

/// Depth function and depth write mask, `None` when depth testing is off
pub fn depth_state(depth: DepthTest) -> Option<(u32, bool)> {
    match depth {
        DepthTest::Off => None,
        DepthTest::Always => Some((glow::ALWAYS, true)),
        DepthTest::Less => Some((glow::LESS, true)),
        DepthTest::LessOrEqual => Some((glow::LEQUAL, true)),
        DepthTest::LessReadOnly => Some((glow::LESS, false)),
        DepthTest::LessOrEqualReadOnly => Some((glow::LEQUAL, false)),
    }
}

/// Source and destination blend factors, `None` when blending is off
pub fn blend_factors(blending: Blending) -> Option<(u32, u32)> {
    match blending {
        Blending::Off => None,
        Blending::Overwrite => Some((glow::ONE, glow::ZERO)),
        Blending::Mix => Some((glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA)),
        Blending::MixPremultipliedAlpha => Some((glow::ONE, glow::ONE_MINUS_SRC_ALPHA)),
        Blending::Add => Some((glow::ONE, glow::ONE)),
    }
}

/// Min/mag filter of a buffer texture
pub fn texture_filter(linear: bool) -> u32 {
    if linear { glow::LINEAR } else { glow::NEAREST }
}

/// Anisotropy level of a buffer texture, `None` to leave the GL default
///
/// Only linear-filtered textures are sampled at an angle with any benefit.
pub fn anisotropy_level(linear: bool, max_anisotropy: f32) -> Option<f32> {
    (linear && max_anisotropy > 1.0).then_some(max_anisotropy)
}

#[cfg(test)]
#[path = "glow_format_tests.rs"]
mod tests;
