/// Render process manager configuration

/// Configuration passed to `RenderProcessManager::new`
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of log messages and GPU object labels
    pub label: String,
    /// Scale of a pass that has no buffer-backed targets
    pub default_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label: "render process".to_string(),
            default_scale: 1.0,
        }
    }
}
