//! Parser configuration types.

use serde::Deserialize;
use thiserror::Error;

/// Parser configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Configuration validation failure.
    #[error("Invalid parser config: {0}")]
    InvalidConfig(String),
}

/// Parser limits.
///
/// Missing fields take their default when loaded through serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum construct nesting before `NestingTooDeep` is reported.
    ///
    /// Every level costs several stack frames; the default keeps the
    /// deepest accepted input within a 2 MiB thread stack.
    pub max_depth: usize,
    /// Maximum number of diagnostics stored in the sink.
    pub max_diagnostics: usize,
}

impl ParserConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_depth must be > 0".to_string(),
            ));
        }
        if self.max_diagnostics == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_diagnostics must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_diagnostics: 100,
        }
    }
}
