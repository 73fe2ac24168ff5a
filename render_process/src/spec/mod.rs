/// Declarative render buffer and render pass descriptions

pub mod buffer_spec;
pub mod pass_spec;

pub use buffer_spec::*;
pub use pass_spec::*;

/// Identifier of a buffer in the buffer table
pub type BufferId = u32;

/// Identifier of a pass in the pass table
pub type PassId = u32;
