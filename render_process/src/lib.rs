/*!
# Render Process

Render pass and framebuffer management for OpenGL renderers.

Callers describe render targets (buffers) and rendering passes declaratively.
The render process validates the description, creates the textures and
framebuffers that implement it for a viewport size, reuses or resizes them
when the description or the size changes, and binds and clears them pass by
pass while drawing.

## Architecture

- **BufferSpec / PassSpec**: Declarative buffer and pass descriptions
- **RenderProcess**: The public protocol (specify, validate, create, prepare, release)
- **RenderProcessManager**: The implementation, owning every GPU object it creates
- **GraphicsDevice**: The seam to the GL backend (see `render_process_glow`)

Backend implementations provide concrete texture and framebuffer types that
implement the `Texture` and `Framebuffer` traits.
*/

// Internal modules
mod error;
pub mod log;
pub mod spec;
pub mod graphics_device;
pub mod process;

// Main rp namespace module
pub mod rp {
    // Error types
    pub use crate::error::{Error, Result};

    // Buffer and pass descriptions
    pub use crate::spec::{
        Attachment, Blending, BufferFlags, BufferId, BufferKind, BufferSpec, DataFormat,
        DepthTest, ExternalTexture, PassId, PassSpec, Source, Target,
    };

    // Backend seam
    pub use crate::graphics_device::{
        AttachmentSource, Capabilities, ClearMask, FormatMapper, Framebuffer,
        FramebufferAttachment, FramebufferDesc, GraphicsDevice, InternalFormat, Texture,
        TextureDesc, TextureKind, TextureMatch, compare_textures,
    };

    // Orchestrator
    pub use crate::process::{
        BufferInfo, Config, CreateStats, PrepareFlags, ProcessState, RenderProcess,
        RenderProcessManager, Scales, SourceBinding, scaled_size,
    };

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }
}

// Re-export math library at crate root
pub use glam;
