/// Mock graphics device for unit tests (no GPU required)
///
/// Every call is recorded as a command string in a shared `MockState`, so a
/// test can keep a handle on the state after boxing the device into the
/// manager and count creations and deletions.

use std::sync::{Arc, Mutex};
use glam::{UVec2, Vec4};
use crate::error::Result;
use crate::rp_bail;
use crate::spec::{BufferKind, DataFormat, DepthTest, Blending};
use crate::graphics_device::{
    GraphicsDevice, FormatMapper, InternalFormat, ClearMask,
    Texture, TextureDesc, Framebuffer, FramebufferDesc,
};

// ============================================================================
// Mock state
// ============================================================================

#[derive(Debug, Default)]
pub struct MockState {
    /// Recorded calls, in order
    pub commands: Vec<String>,
    /// Framebuffers created from now on report incompleteness
    pub incomplete_framebuffers: bool,
    /// Formats the mapper refuses
    pub unsupported_formats: Vec<DataFormat>,
    /// Texture allocations fail
    pub fail_texture_creation: bool,
    /// Hand out the lowest deleted name first, as GL drivers do
    pub reuse_names: bool,
    next_name: u32,
    free_names: Vec<u32>,
}

impl MockState {
    fn allocate_name(&mut self) -> u32 {
        if self.reuse_names && !self.free_names.is_empty() {
            self.free_names.sort_unstable();
            return self.free_names.remove(0);
        }
        self.next_name += 1;
        self.next_name
    }

    /// Number of recorded commands starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Recorded commands starting with `prefix`
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.commands
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

pub type SharedMockState = Arc<Mutex<MockState>>;

fn record(state: &SharedMockState, command: String) {
    state.lock().unwrap().commands.push(command);
}

fn record_delete(state: &SharedMockState, name: u32, command: String) {
    let mut state = state.lock().unwrap();
    state.free_names.push(name);
    state.commands.push(command);
}

// ============================================================================
// Mock Texture
// ============================================================================

pub struct MockTexture {
    pub name: u32,
    pub desc: TextureDesc,
    pub label: String,
    state: SharedMockState,
}

impl Texture for MockTexture {
    fn name(&self) -> u32 {
        self.name
    }

    fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    fn resize(&mut self, size: UVec2) -> Result<()> {
        self.desc.size = size;
        record(&self.state, format!("resize_texture {} {}x{}", self.name, size.x, size.y));
        Ok(())
    }
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        if self.desc.is_external() {
            record(&self.state, format!("release_external {}", self.name));
        } else {
            record_delete(&self.state, self.name, format!("delete_texture {}", self.name));
        }
    }
}

// ============================================================================
// Mock Framebuffer
// ============================================================================

pub struct MockFramebuffer {
    pub name: u32,
    pub desc: FramebufferDesc,
    pub complete: bool,
    state: SharedMockState,
}

impl Framebuffer for MockFramebuffer {
    fn name(&self) -> u32 {
        self.name
    }

    fn desc(&self) -> &FramebufferDesc {
        &self.desc
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

impl Drop for MockFramebuffer {
    fn drop(&mut self) {
        record_delete(&self.state, self.name, format!("delete_framebuffer {}", self.name));
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    state: SharedMockState,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(MockState::default())) }
    }

    /// Shared handle on the recorded state
    pub fn state(&self) -> SharedMockState {
        self.state.clone()
    }
}

impl FormatMapper for MockGraphicsDevice {
    fn internal_format(&self, kind: BufferKind, format: DataFormat) -> Option<InternalFormat> {
        if self.state.lock().unwrap().unsupported_formats.contains(&format) {
            return None;
        }
        if !format.is_compatible_with(kind) {
            return None;
        }
        let format = match (kind, format) {
            (BufferKind::Depth, _) => InternalFormat::new(glow::DEPTH_COMPONENT24, glow::DEPTH_COMPONENT, glow::UNSIGNED_INT),
            (BufferKind::Stencil, _) => InternalFormat::new(glow::STENCIL_INDEX8, glow::STENCIL_INDEX, glow::UNSIGNED_BYTE),
            (BufferKind::DepthStencil, _) => InternalFormat::new(glow::DEPTH24_STENCIL8, glow::DEPTH_STENCIL, glow::UNSIGNED_INT_24_8),
            (_, DataFormat::F16) => InternalFormat::new(glow::RGBA16F, glow::RGBA, glow::HALF_FLOAT),
            (_, DataFormat::F32) => InternalFormat::new(glow::RGBA32F, glow::RGBA, glow::FLOAT),
            _ => InternalFormat::new(glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE),
        };
        Some(format)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self, desc: &TextureDesc, label: &str) -> Result<Box<dyn Texture>> {
        let name = {
            let mut state = self.state.lock().unwrap();
            if state.fail_texture_creation {
                drop(state);
                rp_bail!("rp::mock", "texture allocation failed for {}", label);
            }
            state.allocate_name()
        };
        record(&self.state, format!(
            "create_texture {} {:?} {}x{}", name, desc.kind(), desc.size.x, desc.size.y
        ));
        Ok(Box::new(MockTexture {
            name,
            desc: *desc,
            label: label.to_string(),
            state: self.state.clone(),
        }))
    }

    fn import_texture(&mut self, desc: &TextureDesc) -> Result<Box<dyn Texture>> {
        let Some(external) = desc.external else {
            rp_bail!("rp::mock", InvalidSpecification => "import without external texture");
        };
        record(&self.state, format!("import_texture {}", external.name));
        Ok(Box::new(MockTexture {
            name: external.name,
            desc: *desc,
            label: String::new(),
            state: self.state.clone(),
        }))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc, _label: &str) -> Result<Box<dyn Framebuffer>> {
        let (name, complete) = {
            let mut state = self.state.lock().unwrap();
            (state.allocate_name(), !state.incomplete_framebuffers)
        };
        record(&self.state, format!(
            "create_framebuffer {} {}x{} attachments={}",
            name, desc.size.x, desc.size.y, desc.attachments.len()
        ));
        Ok(Box::new(MockFramebuffer {
            name,
            desc: desc.clone(),
            complete,
            state: self.state.clone(),
        }))
    }

    fn set_depth_test(&mut self, depth: DepthTest) -> Result<()> {
        record(&self.state, format!("depth_test {:?}", depth));
        Ok(())
    }

    fn set_blending(&mut self, blending: Blending) -> Result<()> {
        record(&self.state, format!("blending {:?}", blending));
        Ok(())
    }

    fn set_viewport(&mut self, size: UVec2) -> Result<()> {
        record(&self.state, format!("viewport {}x{}", size.x, size.y));
        Ok(())
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: u32) -> Result<()> {
        record(&self.state, format!("bind_framebuffer {} {}", target, framebuffer));
        Ok(())
    }

    fn set_draw_buffers(&mut self, buffers: &[u32]) -> Result<()> {
        record(&self.state, format!("draw_buffers {:?}", buffers));
        Ok(())
    }

    fn clear_color_attachment(&mut self, index: u32, color: Vec4) -> Result<()> {
        record(&self.state, format!("clear_color_attachment {} {:?}", index, color.to_array()));
        Ok(())
    }

    fn clear(&mut self, mask: ClearMask, color: Option<Vec4>) -> Result<()> {
        record(&self.state, format!(
            "clear {} {:?}", mask.bits(), color.map(|c| c.to_array())
        ));
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, target: u32, texture: u32) -> Result<()> {
        record(&self.state, format!("bind_texture {} {} {}", unit, target, texture));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
