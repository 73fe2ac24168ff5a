/// Context capabilities, queried once per graphics context
///
/// Built by the backend right after context creation and handed to the
/// manager's constructor. The manager only reads it.

use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub struct Capabilities {
    /// `GL_MAX_COLOR_ATTACHMENTS`
    pub max_color_attachments: u32,
    /// `GL_MAX_DRAW_BUFFERS`
    pub max_draw_buffers: u32,
    /// `GL_MAX_SAMPLES`
    pub max_samples: u32,
    /// `GL_MAX_ARRAY_TEXTURE_LAYERS`
    pub max_array_texture_layers: u32,
    /// `GL_MAX_TEXTURE_SIZE`
    pub max_texture_size: u32,
    /// `GL_MAX_TEXTURE_MAX_ANISOTROPY` (1.0 when unsupported)
    pub max_anisotropy: f32,
    /// Whether 2D multisample array storage can be allocated
    pub layered_multisample: bool,
    /// Extension strings reported by the context
    pub extensions: FxHashSet<String>,
}

impl Default for Capabilities {
    /// Limits of a typical OpenGL 3.3 desktop context
    fn default() -> Self {
        Self {
            max_color_attachments: 8,
            max_draw_buffers: 8,
            max_samples: 4,
            max_array_texture_layers: 256,
            max_texture_size: 8192,
            max_anisotropy: 1.0,
            layered_multisample: true,
            extensions: FxHashSet::default(),
        }
    }
}

impl Capabilities {
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }
}
