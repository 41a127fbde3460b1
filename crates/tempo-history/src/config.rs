#![forbid(unsafe_code)]

//! Configuration for [`HistoryManager`](crate::HistoryManager).
//!
//! # Loading
//!
//! With the `history-config` feature the config can be read from TOML or
//! JSON. Missing keys keep their defaults.
//!
//! ```toml
//! # tempo-history.toml
//! max_stack_size = 100
//! ```
//!
//! ```rust,ignore
//! let config = HistoryConfig::from_toml_file("tempo-history.toml")?;
//! let config = HistoryConfig::from_json_str(r#"{"max_stack_size": 20}"#)?;
//! ```

#[cfg(feature = "history-config")]
use std::path::Path;

#[cfg(feature = "history-config")]
use serde::{Deserialize, Serialize};

/// Default bound on the undo stack.
pub const DEFAULT_MAX_STACK_SIZE: usize = 50;

/// Configuration for the history manager.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "history-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "history-config", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of commands kept for undo. The oldest command is
    /// evicted once this is exceeded.
    pub max_stack_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with a custom stack bound.
    #[must_use]
    pub fn new(max_stack_size: usize) -> Self {
        Self { max_stack_size }
    }

    /// Create unlimited configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_stack_size: usize::MAX,
        }
    }

    /// Validate parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_stack_size == 0 {
            errors.push("max_stack_size must be at least 1 (0 disables undo)".to_string());
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "history-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, HistoryConfigError> {
        toml::from_str(s).map_err(HistoryConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "history-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, HistoryConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HistoryConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "history-config")]
    pub fn from_json_str(s: &str) -> Result<Self, HistoryConfigError> {
        serde_json::from_str(s).map_err(HistoryConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "history-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, HistoryConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HistoryConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a history configuration.
#[cfg(feature = "history-config")]
#[derive(Debug)]
pub enum HistoryConfigError {
    /// File I/O error.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
}

#[cfg(feature = "history-config")]
impl std::fmt::Display for HistoryConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "history config I/O error: {e}"),
            Self::Toml(e) => write!(f, "history config TOML error: {e}"),
            Self::Json(e) => write!(f, "history config JSON error: {e}"),
        }
    }
}

#[cfg(feature = "history-config")]
impl std::error::Error for HistoryConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}
