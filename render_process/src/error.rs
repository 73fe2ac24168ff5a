//! Error types for the render process manager
//!
//! Errors fall into three groups: specification errors (malformed buffer or
//! pass descriptions), resource errors (GPU allocation, framebuffer
//! completeness) and usage errors (calling per-pass operations in the wrong
//! state or with unknown ids).

use std::fmt;
use crate::spec::{BufferId, PassId};

/// Result type for render process operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render process errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Malformed or inconsistent buffer/pass specification
    InvalidSpecification(String),

    /// A framebuffer did not report completeness
    IncompleteFramebuffer(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Backend-specific error (OpenGL error code, object creation failure, ...)
    BackendError(String),

    /// Operation not allowed in the current manager state
    InvalidState(String),

    /// Reference to a pass id that is not specified
    UnknownPass(PassId),

    /// Reference to a buffer id that is not specified or not created
    UnknownBuffer(BufferId),
}

impl Error {
    /// Returns true for errors caused by the buffer/pass description
    pub fn is_specification_error(&self) -> bool {
        matches!(self, Error::InvalidSpecification(_))
    }

    /// Returns true for errors reported by the GPU side
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Error::IncompleteFramebuffer(_) | Error::OutOfMemory | Error::BackendError(_)
        )
    }

    /// Returns true for programmer errors (wrong state, unknown ids)
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidState(_) | Error::UnknownPass(_) | Error::UnknownBuffer(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSpecification(msg) => write!(f, "Invalid specification: {}", msg),
            Error::IncompleteFramebuffer(msg) => write!(f, "Incomplete framebuffer: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::UnknownPass(id) => write!(f, "Unknown pass: {}", id),
            Error::UnknownBuffer(id) => write!(f, "Unknown buffer: {}", id),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
