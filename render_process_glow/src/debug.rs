/// OpenGL diagnostics - glGetError draining and debug object labels
///
/// Error checks run after each group of GL calls when enabled through
/// `GlowConfig::check_errors` or the `gl-error-checks` feature. Every pending
/// error is drained and logged; the first one becomes the returned error.

use glow::HasContext;
use render_process::rp::{Error, Result};
use render_process::{rp_error, rp_trace};

const SOURCE: &str = "rp::glow";

/// Symbolic name of a `glGetError` code
pub fn error_name(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "unknown GL error",
    }
}

/// Symbolic name of a `glCheckFramebufferStatus` result
pub fn framebuffer_status_name(status: u32) -> &'static str {
    match status {
        glow::FRAMEBUFFER_COMPLETE => "GL_FRAMEBUFFER_COMPLETE",
        glow::FRAMEBUFFER_UNDEFINED => "GL_FRAMEBUFFER_UNDEFINED",
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT",
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => "GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT",
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER",
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER",
        glow::FRAMEBUFFER_UNSUPPORTED => "GL_FRAMEBUFFER_UNSUPPORTED",
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE",
        glow::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => "GL_FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS",
        _ => "unknown framebuffer status",
    }
}

/// Error value for a drained GL error code
pub fn error_from_code(code: u32, operation: &str) -> Error {
    if code == glow::OUT_OF_MEMORY {
        Error::OutOfMemory
    } else {
        Error::BackendError(format!("{} after {}", error_name(code), operation))
    }
}

/// Drain `glGetError` after `operation`
///
/// Does nothing unless `enabled`.
pub fn check_errors(gl: &glow::Context, enabled: bool, operation: &str) -> Result<()> {
    if !enabled {
        return Ok(());
    }

    let mut first = None;
    // Bounded: a lost context may report errors forever
    for _ in 0..32 {
        let code = unsafe { gl.get_error() };
        if code == glow::NO_ERROR {
            break;
        }
        rp_error!(SOURCE, "{} (0x{:04X}) after {}", error_name(code), code, operation);
        first.get_or_insert(code);
    }

    match first {
        Some(code) => Err(error_from_code(code, operation)),
        None => Ok(()),
    }
}

/// Attach a debug label to a GL object
///
/// Silently skipped when labels are disabled or `GL_KHR_debug` is missing.
pub fn label_object(gl: &glow::Context, enabled: bool, identifier: u32, name: u32, label: &str) {
    if !enabled || label.is_empty() {
        return;
    }
    rp_trace!(SOURCE, "label 0x{:04X} {} \"{}\"", identifier, name, label);
    unsafe {
        gl.object_label(identifier, name, Some(label));
    }
}
