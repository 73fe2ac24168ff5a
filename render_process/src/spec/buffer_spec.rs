/// Buffer specification - one logical render target
///
/// A buffer is a color, depth, stencil or depth-stencil image whose size
/// follows the viewport through a scale factor. The texture backing it is
/// created by the manager, or supplied by the caller (external texture).

use bitflags::bitflags;
use crate::error::Result;
use crate::rp_bail;

/// Logical buffer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferKind {
    /// Single channel color (R)
    Color1,
    /// Two channel color (RG)
    Color2,
    /// Three channel color (RGB)
    Color3,
    /// Four channel color (RGBA)
    #[default]
    Color4,
    /// Depth only
    Depth,
    /// Stencil only
    Stencil,
    /// Combined depth and stencil
    DepthStencil,
}

impl BufferKind {
    /// Returns true for the color kinds
    pub fn is_color(self) -> bool {
        matches!(
            self,
            BufferKind::Color1 | BufferKind::Color2 | BufferKind::Color3 | BufferKind::Color4
        )
    }

    /// Number of color channels (0 for depth/stencil kinds)
    pub fn channels(self) -> u32 {
        match self {
            BufferKind::Color1 => 1,
            BufferKind::Color2 => 2,
            BufferKind::Color3 => 3,
            BufferKind::Color4 => 4,
            _ => 0,
        }
    }
}

/// Per-channel storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum DataFormat {
    /// Natural format of the buffer kind
    #[default]
    Default,
    Uint8,
    Snorm8,
    Snorm16,
    F16,
    F32,
    Depth16,
    Depth24,
    Depth32,
    Depth32F,
    Stencil8,
    DepthStencil24_8,
    DepthStencil32F_8,
}

impl DataFormat {
    /// Returns true if this format can back a buffer of the given kind
    pub fn is_compatible_with(self, kind: BufferKind) -> bool {
        use DataFormat::*;
        match self {
            Default => true,
            Uint8 | Snorm8 | Snorm16 | F16 | F32 => kind.is_color(),
            Depth16 | Depth32 => kind == BufferKind::Depth,
            // Selects the depth part of a packed depth-stencil format
            Depth24 | Depth32F => matches!(kind, BufferKind::Depth | BufferKind::DepthStencil),
            Stencil8 => kind == BufferKind::Stencil,
            DepthStencil24_8 | DepthStencil32F_8 => kind == BufferKind::DepthStencil,
        }
    }
}

bitflags! {
    /// Buffer option flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferFlags: u32 {
        /// Linear min/mag filtering (nearest otherwise)
        const LINEAR = 1 << 0;
        /// Cube map texture (six faces)
        const CUBEMAP = 1 << 1;
    }
}

/// Texture owned by the caller, bound by the manager but never deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalTexture {
    /// GPU texture name
    pub name: u32,
    /// Cube map face index (0..6) when a single face is attached
    pub cubemap_face: Option<u32>,
}

/// Specification of one render buffer
#[derive(Debug, Clone, Copy)]
pub struct BufferSpec {
    pub kind: BufferKind,
    pub format: DataFormat,
    /// Number of array layers (1 = plain 2D texture)
    pub layers: u32,
    /// Samples per pixel (1 = not multisampled)
    pub multisamples: u32,
    /// Size relative to the viewport
    pub scale: f32,
    pub flags: BufferFlags,
    /// Caller-supplied texture
    pub external: Option<ExternalTexture>,
}

impl Default for BufferSpec {
    fn default() -> Self {
        Self {
            kind: BufferKind::Color4,
            format: DataFormat::Default,
            layers: 1,
            multisamples: 1,
            scale: 1.0,
            flags: BufferFlags::empty(),
            external: None,
        }
    }
}

impl BufferSpec {
    /// Color buffer with `channels` channels (clamped to 1..=4)
    pub fn color(channels: u32, format: DataFormat) -> Self {
        let kind = match channels {
            0 | 1 => BufferKind::Color1,
            2 => BufferKind::Color2,
            3 => BufferKind::Color3,
            _ => BufferKind::Color4,
        };
        Self { kind, format, ..Default::default() }
    }

    /// Depth buffer
    pub fn depth(format: DataFormat) -> Self {
        Self { kind: BufferKind::Depth, format, ..Default::default() }
    }

    /// Stencil buffer
    pub fn stencil() -> Self {
        Self { kind: BufferKind::Stencil, ..Default::default() }
    }

    /// Combined depth-stencil buffer
    pub fn depth_stencil(format: DataFormat) -> Self {
        Self { kind: BufferKind::DepthStencil, format, ..Default::default() }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_multisamples(mut self, samples: u32) -> Self {
        self.multisamples = samples;
        self
    }

    pub fn linear(mut self) -> Self {
        self.flags |= BufferFlags::LINEAR;
        self
    }

    pub fn cubemap(mut self) -> Self {
        self.flags |= BufferFlags::CUBEMAP;
        self
    }

    /// Use a caller-owned texture instead of allocating one
    pub fn with_external(mut self, texture: ExternalTexture) -> Self {
        self.external = Some(texture);
        self
    }

    pub fn is_linear(&self) -> bool {
        self.flags.contains(BufferFlags::LINEAR)
    }

    pub fn is_cubemap(&self) -> bool {
        self.flags.contains(BufferFlags::CUBEMAP)
    }

    pub fn is_multisampled(&self) -> bool {
        self.multisamples > 1
    }

    /// True if attaching this buffer attaches more than one layer
    ///
    /// A whole cube map is a layered attachment, a single cube map face is not.
    pub fn is_layered(&self) -> bool {
        if self.is_cubemap() {
            return self.external.and_then(|e| e.cubemap_face).is_none();
        }
        self.layers > 1
    }

    /// Structural checks done when the buffer is inserted in the table
    pub fn check(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            rp_bail!("rp::BufferSpec", InvalidSpecification =>
                "scale must be positive and finite (got {})", self.scale);
        }
        if self.layers == 0 {
            rp_bail!("rp::BufferSpec", InvalidSpecification => "layer count must be at least 1");
        }
        if self.multisamples == 0 {
            rp_bail!("rp::BufferSpec", InvalidSpecification => "multisample count must be at least 1");
        }
        if !self.format.is_compatible_with(self.kind) {
            rp_bail!("rp::BufferSpec", InvalidSpecification =>
                "format {:?} cannot back a {:?} buffer", self.format, self.kind);
        }
        if self.is_cubemap() && (self.layers > 1 || self.is_multisampled()) {
            rp_bail!("rp::BufferSpec", InvalidSpecification =>
                "a cube map buffer can be neither layered nor multisampled");
        }
        if let Some(face) = self.external.and_then(|e| e.cubemap_face) {
            if !self.is_cubemap() || face >= 6 {
                rp_bail!("rp::BufferSpec", InvalidSpecification =>
                    "cube map face {} needs a cube map buffer and an index below 6", face);
            }
        }
        Ok(())
    }
}

/// Equality independent of the GPU handle of an external texture
impl PartialEq for BufferSpec {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.format == other.format
            && self.layers == other.layers
            && self.multisamples == other.multisamples
            && self.scale == other.scale
            && self.flags == other.flags
            && self.external.is_some() == other.external.is_some()
    }
}

#[cfg(test)]
#[path = "buffer_spec_tests.rs"]
mod tests;
