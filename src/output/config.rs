//! Output configuration types

/// Configuration for console output.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Color the warning and error prefixes
    pub use_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_color: true }
    }
}
