//! Weaver configuration.

/// Options for one weaving run.
#[derive(Clone, Debug, Default)]
pub struct WeaverConfig {
    /// Generated serializers and caller stubs log a line when entered.
    pub inject_debug_logs: bool,
    /// Overrides the container's main module name.
    pub main_module: Option<String>,
    /// Modules, besides the main, runtime, engine and standard-library ones,
    /// whose types may back a synchronized field.
    pub extra_allowed_modules: Vec<String>,
}

impl WeaverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_logs(mut self, enabled: bool) -> Self {
        self.inject_debug_logs = enabled;
        self
    }

    pub fn with_main_module(mut self, module: impl Into<String>) -> Self {
        self.main_module = Some(module.into());
        self
    }

    pub fn with_allowed_module(mut self, module: impl Into<String>) -> Self {
        self.extra_allowed_modules.push(module.into());
        self
    }
}
