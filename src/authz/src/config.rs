//! Engine configuration loading and validation

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Permission engine configuration
///
/// ```toml
/// enable_metrics = true
/// parallel_batch_threshold = 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Collect decision counts and latencies
    #[serde(default = "default_true")]
    pub enable_metrics: bool,

    /// Batches with at least this many items are evaluated on the rayon pool
    #[serde(default = "default_parallel_batch_threshold")]
    pub parallel_batch_threshold: usize,
}

fn default_true() -> bool { true }
fn default_parallel_batch_threshold() -> usize { 256 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_metrics: default_true(),
            parallel_batch_threshold: default_parallel_batch_threshold(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| AuthzError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AuthzError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.parallel_batch_threshold == 0 {
            return Err(AuthzError::Config(
                "parallel_batch_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
