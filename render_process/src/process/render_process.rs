/// RenderProcess trait - the public protocol of the render process manager
///
/// Callers describe buffers and passes, then `create` the GPU objects for a
/// viewport size and drive each frame with `prepare`/`bind`/`release`.
///
/// # Example
///
/// ```no_run
/// use render_process::rp::{RenderProcess, BufferSpec, PassSpec, Target, Source, DataFormat};
/// use render_process::glam::UVec2;
///
/// fn setup(process: &mut dyn RenderProcess) -> render_process::rp::Result<()> {
///     process.specify_buffer(0, BufferSpec::color(4, DataFormat::Default))?;
///     process.specify_pass(0, PassSpec::new().with_target(Target::color(0, 0).cleared()))?;
///     process.specify_pass(1, PassSpec::new().with_source(Source::new(0, 0)))?;
///     process.create(UVec2::new(1280, 720))?;
///
///     process.prepare_all(0)?;
///     // draw scene ...
///     process.release()?;
///     Ok(())
/// }
/// ```

use std::collections::BTreeMap;
use bitflags::bitflags;
use glam::UVec2;
use crate::error::Result;
use crate::spec::{BufferId, BufferSpec, PassId, PassSpec};

bitflags! {
    /// Steps performed by `RenderProcess::prepare`, in this order
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrepareFlags: u32 {
        /// Apply the pass depth test
        const DEPTH = 1 << 0;
        /// Apply the pass blend mode
        const BLEND = 1 << 1;
        /// Set the viewport to the pass size
        const VIEWPORT = 1 << 2;
        /// Bind the pass framebuffer
        const BIND = 1 << 3;
        /// Select the draw buffers
        const TARGETS = 1 << 4;
        /// Clear the targets
        const CLEAR = 1 << 5;
        /// Bind the source textures
        const SOURCE = 1 << 6;

        /// Depth and blend state only
        const MODE = Self::DEPTH.bits() | Self::BLEND.bits();
        /// Everything except clearing
        const NO_CLEAR = Self::DEPTH.bits() | Self::BLEND.bits() | Self::VIEWPORT.bits()
            | Self::BIND.bits() | Self::TARGETS.bits() | Self::SOURCE.bits();
        /// Set up the targets and clear them, no blending and no sources
        const CLEAR_TARGETS = Self::DEPTH.bits() | Self::VIEWPORT.bits() | Self::BIND.bits()
            | Self::TARGETS.bits() | Self::CLEAR.bits();
    }
}

/// Lifecycle state of a render process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Nothing specified yet
    Uninitialized,
    /// Tables changed since the last validation
    Specified,
    /// Tables validated, GPU objects not (re)created
    Validated,
    /// GPU objects created for the current size
    Created { complete: bool },
}

pub trait RenderProcess {
    // ===== SPECIFICATION =====

    /// Insert or replace a buffer specification
    fn specify_buffer(&mut self, id: BufferId, spec: BufferSpec) -> Result<()>;

    /// Replace the whole buffer table
    ///
    /// Clears the table, then inserts every entry. Entries inserted before a
    /// failing one are kept: on error the table holds a partial result.
    fn specify_buffers(&mut self, buffers: &BTreeMap<BufferId, BufferSpec>) -> Result<()> {
        self.clear_buffers();
        let mut first_error = None;
        for (&id, &spec) in buffers {
            if let Err(err) = self.specify_buffer(id, spec) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn clear_buffer(&mut self, id: BufferId);

    fn clear_buffers(&mut self);

    fn buffers(&self) -> &BTreeMap<BufferId, BufferSpec>;

    /// Insert or replace a pass specification
    fn specify_pass(&mut self, id: PassId, spec: PassSpec) -> Result<()>;

    /// Replace the whole pass table
    ///
    /// Same partial-application rule as `specify_buffers`.
    fn specify_passes(&mut self, passes: &BTreeMap<PassId, PassSpec>) -> Result<()> {
        self.clear_passes();
        let mut first_error = None;
        for (&id, spec) in passes {
            if let Err(err) = self.specify_pass(id, spec.clone()) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn clear_pass(&mut self, id: PassId);

    fn clear_passes(&mut self);

    fn passes(&self) -> &BTreeMap<PassId, PassSpec>;

    // ===== LIFECYCLE =====

    fn state(&self) -> ProcessState;

    /// Tables validated (and possibly created)
    fn is_valid(&self) -> bool {
        matches!(self.state(), ProcessState::Validated | ProcessState::Created { .. })
    }

    /// GPU objects created and every framebuffer complete
    fn is_complete(&self) -> bool {
        self.state() == ProcessState::Created { complete: true }
    }

    /// Viewport size of the last `create`
    fn current_size(&self) -> UVec2;

    /// True if the GPU objects were created for `size`
    fn validate_size(&self, size: UVec2) -> bool {
        self.current_size() == size
    }

    /// Force renewal of the GPU objects on the next `create`
    fn invalidate(&mut self);

    /// Check the tables and compute effective scales
    fn validate(&mut self) -> Result<()>;

    /// Create or reconcile the GPU objects for a viewport size
    fn create(&mut self, size: UVec2) -> Result<()>;

    /// Drop every owned GPU object and cache, keep the tables
    fn destroy(&mut self);

    // ===== PER PASS =====

    /// Make `pass` current and perform the steps in `flags`
    fn prepare(&mut self, pass: PassId, flags: PrepareFlags) -> Result<()>;

    fn prepare_all(&mut self, pass: PassId) -> Result<()> {
        self.prepare(pass, PrepareFlags::all())
    }

    fn prepare_mode(&mut self, pass: PassId) -> Result<()> {
        self.prepare(pass, PrepareFlags::MODE)
    }

    fn prepare_no_clear(&mut self, pass: PassId) -> Result<()> {
        self.prepare(pass, PrepareFlags::NO_CLEAR)
    }

    fn prepare_clear(&mut self, pass: PassId) -> Result<()> {
        self.prepare(pass, PrepareFlags::CLEAR_TARGETS)
    }

    /// Bind the framebuffer of `pass` for reading, drawing or both
    fn bind(&mut self, pass: PassId, read: bool, draw: bool) -> Result<()>;

    /// Select either all draw buffers of the current pass or attachment 0 only
    fn set_draw_buffers(&mut self, first_color_only: bool) -> Result<()>;

    /// Unbind the sources of `pass`, restore the viewport and the default framebuffer
    fn release_pass(&mut self, pass: PassId) -> Result<()>;

    /// Release the current pass
    fn release(&mut self) -> Result<()>;

    /// Framebuffer name of `pass` (its default framebuffer if it has no targets)
    fn pass_object(&mut self, pass: PassId) -> Result<u32>;

    /// Texture name of `buffer`
    fn buffer_object(&self, buffer: BufferId) -> Result<u32>;
}
