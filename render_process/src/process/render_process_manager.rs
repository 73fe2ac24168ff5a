/// Render process manager - the orchestrator behind `RenderProcess`
///
/// Holds the buffer and pass tables, validates them, reconciles the GPU
/// objects on `create` and plays the per-pass bind/clear plans.

use std::collections::BTreeMap;
use glam::UVec2;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::{rp_bail, rp_debug, rp_err, rp_error, rp_info, rp_trace, rp_warn};
use crate::graphics_device::{Capabilities, GraphicsDevice, TextureDesc, TextureMatch};
use crate::spec::{BufferId, BufferSpec, PassId, PassSpec};
use super::{
    BufferInfo, Config, PrepareFlags, ProcessState, RenderProcess, ResourceCache, Scales,
    pass_samples, scaled_size, validate,
};

const SOURCE: &str = "rp::RenderProcess";

fn unknown_pass(id: PassId) -> Error {
    rp_error!(SOURCE, "pass {} is not specified", id);
    Error::UnknownPass(id)
}

fn unknown_buffer(id: BufferId) -> Error {
    rp_error!(SOURCE, "buffer {} has no texture", id);
    Error::UnknownBuffer(id)
}

/// Counters of one `create` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateStats {
    pub textures_created: usize,
    pub textures_resized: usize,
    pub textures_kept: usize,
    pub textures_deleted: usize,
    pub framebuffers_created: usize,
    pub framebuffers_kept: usize,
    pub framebuffers_deleted: usize,
}

/// Render process manager
///
/// Exclusively owns every GPU object it creates. Dropping the manager
/// deletes them (external textures excepted).
pub struct RenderProcessManager {
    // Declared first so GPU objects are dropped while the device is alive
    cache: ResourceCache,
    device: Box<dyn GraphicsDevice>,
    capabilities: Capabilities,
    config: Config,
    buffers: BTreeMap<BufferId, BufferSpec>,
    passes: BTreeMap<PassId, PassSpec>,
    state: ProcessState,
    scales: Scales,
    size: UVec2,
    info: FxHashMap<PassId, BufferInfo>,
    current_pass: Option<PassId>,
    last_stats: CreateStats,
}

impl RenderProcessManager {
    pub fn new(device: Box<dyn GraphicsDevice>, capabilities: Capabilities, config: Config) -> Self {
        rp_debug!(SOURCE, "{}: max {} color attachments, {} draw buffers, {} samples",
            config.label,
            capabilities.max_color_attachments,
            capabilities.max_draw_buffers,
            capabilities.max_samples);
        Self {
            cache: ResourceCache::new(),
            device,
            capabilities,
            config,
            buffers: BTreeMap::new(),
            passes: BTreeMap::new(),
            state: ProcessState::Uninitialized,
            scales: Scales::default(),
            size: UVec2::ZERO,
            info: FxHashMap::default(),
            current_pass: None,
            last_stats: CreateStats::default(),
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Effective scales of the last successful validation
    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    /// Counters of the last `create` that reached the GPU
    pub fn last_create_stats(&self) -> CreateStats {
        self.last_stats
    }

    pub fn texture_count(&self) -> usize {
        self.cache.texture_count()
    }

    pub fn framebuffer_count(&self) -> usize {
        self.cache.framebuffer_count()
    }

    /// Pass made current by the last `prepare` or `bind`
    pub fn current_pass(&self) -> Option<PassId> {
        self.current_pass
    }

    /// Cached bind/clear plan of `pass`, if evaluated since the last invalidation
    pub fn buffer_info(&self, pass: PassId) -> Option<&BufferInfo> {
        self.info.get(&pass)
    }

    fn ensure_ready(&self, operation: &str) -> Result<()> {
        if !self.is_complete() {
            rp_bail!(SOURCE, InvalidState =>
                "{}: {} needs a created and complete render process (state {:?})",
                self.config.label, operation, self.state);
        }
        Ok(())
    }

    /// Evaluate the buffer info of `pass` unless cached
    fn ensure_info(&mut self, pass: PassId) -> Result<()> {
        let spec = self.passes.get(&pass).ok_or_else(|| unknown_pass(pass))?;
        if !self.info.contains_key(&pass) {
            let info = BufferInfo::evaluate(pass, spec, &self.cache, self.size);
            rp_trace!(SOURCE, "pass {} info: fb {} default {} mask {:?} draw {:?}",
                pass, info.framebuffer, info.target_is_default, info.clear_mask, info.draw_buffers);
            self.info.insert(pass, info);
        }
        Ok(())
    }

    fn reconcile(&mut self, size: UVec2) -> Result<bool> {
        let mut stats = CreateStats {
            framebuffers_deleted: self.cache.delete_unnecessary_framebuffers(&self.passes),
            textures_deleted: self.cache.delete_unnecessary_textures(&self.buffers),
            ..Default::default()
        };

        let mut recreated = FxHashSet::default();
        for (&id, spec) in &self.buffers {
            let scale = self.scales.buffers.get(&id).copied().unwrap_or(spec.scale);
            let Some(format) = self.device.internal_format(spec.kind, spec.format) else {
                rp_bail!(SOURCE, InvalidSpecification =>
                    "buffer {}: no native format for {:?}/{:?}", id, spec.kind, spec.format);
            };
            let texture_size = scaled_size(size, scale);
            if texture_size.max_element() > self.capabilities.max_texture_size {
                rp_bail!(SOURCE, InvalidSpecification =>
                    "buffer {}: {}x{} exceeds the maximum texture size {}",
                    id, texture_size.x, texture_size.y, self.capabilities.max_texture_size);
            }
            let desc = TextureDesc::from_spec(spec, format, texture_size);
            let label = format!("{} buffer {}", self.config.label, id);
            match self.cache.update_texture(self.device.as_mut(), id, desc, &label)? {
                TextureMatch::Identical => stats.textures_kept += 1,
                TextureMatch::ReusableWithResize => stats.textures_resized += 1,
                TextureMatch::MustRecreate => {
                    stats.textures_created += 1;
                    recreated.insert(id);
                }
            }
        }

        let mut incomplete = Vec::new();
        for (&id, pass) in &self.passes {
            if pass.targets_default() {
                continue;
            }
            let scale = self.scales.passes.get(&id).copied().unwrap_or(self.config.default_scale);
            let samples = pass_samples(pass, &self.buffers);
            let desc = self.cache.framebuffer_desc(pass, scaled_size(size, scale), samples, self.device.as_ref())?;
            // Attachments of recreated textures point at deleted storage
            if pass.targets.iter().any(|t| t.buffer.is_some_and(|b| recreated.contains(&b))) {
                self.cache.remove_framebuffer(id);
            }
            let unchanged = self.cache.framebuffer(id).is_some_and(|fb| fb.desc() == &desc && fb.is_complete());
            let label = format!("{} pass {}", self.config.label, id);
            if !self.cache.update_framebuffer(self.device.as_mut(), id, desc, &label)? {
                incomplete.push(id);
            }
            if unchanged {
                stats.framebuffers_kept += 1;
            } else {
                stats.framebuffers_created += 1;
            }
        }

        self.last_stats = stats;
        rp_debug!(SOURCE, "{}: create {}x{} {:?}", self.config.label, size.x, size.y, stats);

        if !incomplete.is_empty() {
            rp_warn!(SOURCE, "{}: incomplete framebuffers for passes {:?}", self.config.label, incomplete);
        }
        Ok(incomplete.is_empty())
    }
}

impl RenderProcess for RenderProcessManager {
    fn specify_buffer(&mut self, id: BufferId, spec: BufferSpec) -> Result<()> {
        spec.check()?;
        self.buffers.insert(id, spec);
        self.invalidate();
        Ok(())
    }

    fn clear_buffer(&mut self, id: BufferId) {
        self.buffers.remove(&id);
        self.invalidate();
    }

    fn clear_buffers(&mut self) {
        self.buffers.clear();
        self.invalidate();
    }

    fn buffers(&self) -> &BTreeMap<BufferId, BufferSpec> {
        &self.buffers
    }

    fn specify_pass(&mut self, id: PassId, spec: PassSpec) -> Result<()> {
        spec.check()?;
        self.passes.insert(id, spec);
        self.invalidate();
        Ok(())
    }

    fn clear_pass(&mut self, id: PassId) {
        self.passes.remove(&id);
        self.invalidate();
    }

    fn clear_passes(&mut self) {
        self.passes.clear();
        self.invalidate();
    }

    fn passes(&self) -> &BTreeMap<PassId, PassSpec> {
        &self.passes
    }

    fn state(&self) -> ProcessState {
        self.state
    }

    fn current_size(&self) -> UVec2 {
        self.size
    }

    fn invalidate(&mut self) {
        self.state = ProcessState::Specified;
        self.info.clear();
    }

    fn validate(&mut self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        self.scales = validate(
            &self.buffers,
            &self.passes,
            self.device.as_ref(),
            &self.capabilities,
            self.config.default_scale,
        )?;
        self.state = ProcessState::Validated;
        rp_debug!(SOURCE, "{}: validated {} buffers, {} passes",
            self.config.label, self.buffers.len(), self.passes.len());
        Ok(())
    }

    fn create(&mut self, size: UVec2) -> Result<()> {
        if !self.is_valid() {
            self.validate()?;
        }
        if self.is_complete() && self.size == size {
            return Ok(());
        }

        self.size = size;
        self.info.clear();
        self.state = ProcessState::Created { complete: false };

        let complete = self.reconcile(size)?;
        self.state = ProcessState::Created { complete };
        if !complete {
            return Err(rp_err!(SOURCE, IncompleteFramebuffer =>
                "{}: not every framebuffer is complete at {}x{}", self.config.label, size.x, size.y));
        }
        rp_info!(SOURCE, "{}: created {} textures, {} framebuffers for {}x{}",
            self.config.label, self.cache.texture_count(), self.cache.framebuffer_count(), size.x, size.y);
        Ok(())
    }

    fn destroy(&mut self) {
        self.cache.clear();
        self.info.clear();
        self.scales = Scales::default();
        self.size = UVec2::ZERO;
        self.current_pass = None;
        if self.state != ProcessState::Uninitialized {
            self.state = ProcessState::Specified;
        }
    }

    fn prepare(&mut self, pass: PassId, flags: PrepareFlags) -> Result<()> {
        self.ensure_ready("prepare")?;
        self.ensure_info(pass)?;
        let spec = self.passes.get(&pass).ok_or_else(|| unknown_pass(pass))?;
        let info = self.info.get_mut(&pass).ok_or_else(|| unknown_pass(pass))?;
        let device = self.device.as_mut();
        self.current_pass = Some(pass);

        if flags.contains(PrepareFlags::DEPTH) {
            device.set_depth_test(spec.depth)?;
        }
        if flags.contains(PrepareFlags::BLEND) {
            device.set_blending(spec.blend)?;
        }
        if flags.contains(PrepareFlags::VIEWPORT) {
            device.set_viewport(info.viewport_size)?;
        }
        if flags.contains(PrepareFlags::BIND) {
            device.bind_framebuffer(glow::FRAMEBUFFER, info.framebuffer)?;
        }
        if flags.contains(PrepareFlags::TARGETS) && !info.target_is_default {
            info.only_first_color = false;
            device.set_draw_buffers(&info.draw_buffers)?;
        }
        if flags.contains(PrepareFlags::CLEAR) {
            for &(draw_buffer, color) in &info.clear_targets {
                device.clear_color_attachment(draw_buffer, color)?;
            }
            if !info.clear_mask.is_empty() {
                device.clear(info.clear_mask, info.clear_color)?;
            }
        }
        if flags.contains(PrepareFlags::SOURCE) {
            for source in &info.sources {
                device.bind_texture(source.unit, source.target, source.texture)?;
            }
        }
        Ok(())
    }

    fn bind(&mut self, pass: PassId, read: bool, draw: bool) -> Result<()> {
        self.ensure_ready("bind")?;
        self.ensure_info(pass)?;
        let framebuffer = self.info.get(&pass).map(|info| info.framebuffer).ok_or_else(|| unknown_pass(pass))?;
        self.current_pass = Some(pass);

        let target = match (read, draw) {
            (true, false) => glow::READ_FRAMEBUFFER,
            (false, true) => glow::DRAW_FRAMEBUFFER,
            _ => glow::FRAMEBUFFER,
        };
        self.device.bind_framebuffer(target, framebuffer)
    }

    fn set_draw_buffers(&mut self, first_color_only: bool) -> Result<()> {
        self.ensure_ready("set_draw_buffers")?;
        let Some(pass) = self.current_pass else {
            rp_bail!(SOURCE, InvalidState => "set_draw_buffers: no current pass");
        };
        self.ensure_info(pass)?;
        let info = self.info.get_mut(&pass).ok_or_else(|| unknown_pass(pass))?;
        if info.draw_buffers.is_empty()
            || info.target_is_default
            || info.only_first_color == first_color_only
        {
            return Ok(());
        }

        info.only_first_color = first_color_only;
        if first_color_only {
            self.device.set_draw_buffers(&[glow::COLOR_ATTACHMENT0])
        } else {
            self.device.set_draw_buffers(&info.draw_buffers)
        }
    }

    fn release_pass(&mut self, pass: PassId) -> Result<()> {
        self.ensure_ready("release_pass")?;
        self.ensure_info(pass)?;

        if let Some(info) = self.info.get(&pass) {
            for source in &info.sources {
                self.device.bind_texture(source.unit, source.target, 0)?;
            }
        }
        self.device.set_viewport(self.size)?;
        self.device.bind_framebuffer(glow::FRAMEBUFFER, 0)
    }

    fn release(&mut self) -> Result<()> {
        let Some(pass) = self.current_pass else {
            rp_bail!(SOURCE, InvalidState => "release: no pass is bound");
        };
        let result = self.release_pass(pass);
        self.current_pass = None;
        result
    }

    fn pass_object(&mut self, pass: PassId) -> Result<u32> {
        self.ensure_ready("pass_object")?;
        self.ensure_info(pass)?;
        self.info.get(&pass).map(|info| info.framebuffer).ok_or_else(|| unknown_pass(pass))
    }

    fn buffer_object(&self, buffer: BufferId) -> Result<u32> {
        self.ensure_ready("buffer_object")?;
        self.cache.texture(buffer).map(|t| t.name()).ok_or_else(|| unknown_buffer(buffer))
    }
}

#[cfg(test)]
#[path = "render_process_manager_tests.rs"]
mod tests;
