//! Runtime mode configuration for Sluice.

/// Runtime mode for Sluice services.
///
/// Controls whether acquisitions run the real external engine or a
/// simulated one that fabricates playable files for offline use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Production mode - invokes the real acquisition engine
    Production,
    /// Demo mode - fabricates media locally, no network or engine needed
    Demo,
}

impl RuntimeMode {
    /// Check if running in demo mode.
    pub fn is_demo(self) -> bool {
        matches!(self, Self::Demo)
    }

    /// Check if running in production mode.
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Demo => write!(f, "demo"),
        }
    }
}
