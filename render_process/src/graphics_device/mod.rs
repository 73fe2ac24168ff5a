/// Graphics device module - GPU resource traits and the device seam

pub mod graphics_device;
pub mod format;
pub mod capabilities;
pub mod texture;
pub mod frame_buffer;

pub use graphics_device::*;
pub use format::*;
pub use capabilities::*;
pub use texture::*;
pub use frame_buffer::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
