/// Native texture format description and the logical-to-native mapping seam

use crate::spec::{BufferKind, DataFormat};

/// OpenGL internal format triple used for texture and renderbuffer storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InternalFormat {
    /// Sized internal format (e.g. `RGBA8`)
    pub internal: u32,
    /// Pixel transfer format (e.g. `RGBA`)
    pub format: u32,
    /// Pixel transfer data type (e.g. `UNSIGNED_BYTE`)
    pub data_type: u32,
}

impl InternalFormat {
    pub const fn new(internal: u32, format: u32, data_type: u32) -> Self {
        Self { internal, format, data_type }
    }
}

/// Maps a logical buffer kind and data format to a native internal format
///
/// Returns `None` when the combination has no native equivalent.
pub trait FormatMapper {
    fn internal_format(&self, kind: BufferKind, format: DataFormat) -> Option<InternalFormat>;
}
