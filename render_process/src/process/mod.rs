/// Render process module - validation, GPU object cache and the orchestrator

pub mod config;
pub mod validation;
pub mod resource_cache;
pub mod buffer_info;
pub mod render_process;
pub mod render_process_manager;

pub use config::*;
pub use validation::{Scales, validate, pass_samples};
pub use resource_cache::{ResourceCache, scaled_size};
pub use buffer_info::*;
pub use render_process::*;
pub use render_process_manager::*;
