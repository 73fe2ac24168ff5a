/// Texture trait, texture descriptor and the reuse decision

use glam::UVec2;
use crate::error::Result;
use crate::spec::{BufferSpec, ExternalTexture};
use super::InternalFormat;

/// Storage layout of a texture
///
/// Derived from the description, consumed by a single allocation function
/// in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Plain2D,
    Layered,
    Multisampled,
    LayeredMultisampled,
    CubeMap,
}

impl TextureKind {
    /// OpenGL texture target used to bind and allocate this kind
    pub fn gl_target(self) -> u32 {
        match self {
            TextureKind::Plain2D => glow::TEXTURE_2D,
            TextureKind::Layered => glow::TEXTURE_2D_ARRAY,
            TextureKind::Multisampled => glow::TEXTURE_2D_MULTISAMPLE,
            TextureKind::LayeredMultisampled => glow::TEXTURE_2D_MULTISAMPLE_ARRAY,
            TextureKind::CubeMap => glow::TEXTURE_CUBE_MAP,
        }
    }

    /// True if storage is immutable once allocated
    pub fn is_immutable(self) -> bool {
        self == TextureKind::LayeredMultisampled
    }

    /// True if the kind takes sampler parameters (filter, wrap)
    pub fn has_sampler_state(self) -> bool {
        !matches!(self, TextureKind::Multisampled | TextureKind::LayeredMultisampled)
    }
}

/// Descriptor of the GPU texture backing one buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDesc {
    /// Size in pixels
    pub size: UVec2,
    pub format: InternalFormat,
    /// Number of array layers (1 = not layered)
    pub layers: u32,
    /// Samples per pixel (1 = not multisampled)
    pub samples: u32,
    /// Linear filtering (nearest otherwise)
    pub linear: bool,
    pub cubemap: bool,
    /// Caller-owned texture, never deleted
    pub external: Option<ExternalTexture>,
}

impl TextureDesc {
    pub fn from_spec(spec: &BufferSpec, format: InternalFormat, size: UVec2) -> Self {
        Self {
            size,
            format,
            layers: spec.layers,
            samples: spec.multisamples,
            linear: spec.is_linear(),
            cubemap: spec.is_cubemap(),
            external: spec.external,
        }
    }

    pub fn kind(&self) -> TextureKind {
        match (self.cubemap, self.layers > 1, self.samples > 1) {
            (true, _, _) => TextureKind::CubeMap,
            (false, true, true) => TextureKind::LayeredMultisampled,
            (false, true, false) => TextureKind::Layered,
            (false, false, true) => TextureKind::Multisampled,
            (false, false, false) => TextureKind::Plain2D,
        }
    }

    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }

    /// Cube map face attached instead of the whole texture
    pub fn cubemap_face(&self) -> Option<u32> {
        self.external.and_then(|e| e.cubemap_face)
    }

    fn same_layout(&self, other: &TextureDesc) -> bool {
        self.format == other.format
            && self.layers == other.layers
            && self.samples == other.samples
            && self.linear == other.linear
            && self.cubemap == other.cubemap
    }
}

/// Outcome of comparing a cached texture with the one a buffer now needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMatch {
    /// Keep the texture as is
    Identical,
    /// Same layout, only the storage size differs
    ReusableWithResize,
    /// Delete (unless external) and allocate a new texture
    MustRecreate,
}

/// Decide whether `old` can serve as `new`
///
/// External textures are interchangeable only when they describe the same
/// caller-owned handle; they are never resized by the manager.
pub fn compare_textures(old: &TextureDesc, new: &TextureDesc) -> TextureMatch {
    if old.is_external() || new.is_external() {
        return if old == new {
            TextureMatch::Identical
        } else {
            TextureMatch::MustRecreate
        };
    }
    if !old.same_layout(new) {
        return TextureMatch::MustRecreate;
    }
    if old.size == new.size {
        TextureMatch::Identical
    } else if new.kind().is_immutable() {
        TextureMatch::MustRecreate
    } else {
        TextureMatch::ReusableWithResize
    }
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types. The GPU texture is deleted
/// when dropped, unless it is external.
pub trait Texture {
    /// GPU texture name
    fn name(&self) -> u32;

    fn desc(&self) -> &TextureDesc;

    /// Re-specify the storage with a new size, keeping the texture name
    fn resize(&mut self, size: UVec2) -> Result<()>;

    fn is_external(&self) -> bool {
        self.desc().is_external()
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
