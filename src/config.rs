use anyhow::{Context, Result};
use serde::Deserialize;

use crate::analyzers::quality::DEFAULT_MISSING_DATA_THRESHOLD;
use crate::time::DEFAULT_ROLLOVER_THRESHOLD_MINUTES;

/// Tunable thresholds for the cleaning pipeline.
///
/// Can be stored as a JSON object on disk; omitted keys keep their defaults:
/// ```json
/// {
///   "rollover_threshold_minutes": 500.0,
///   "missing_data_threshold": 10.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Time differences larger than this are treated as crossing midnight.
    /// Also the bound above which a dwell value is reported as extreme.
    pub rollover_threshold_minutes: f64,
    /// Maximum percentage of missing stop cells a trip may have.
    pub missing_data_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rollover_threshold_minutes: DEFAULT_ROLLOVER_THRESHOLD_MINUTES,
            missing_data_threshold: DEFAULT_MISSING_DATA_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Invalid config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Replaces thresholds given on the command line.
    pub fn with_overrides(
        mut self,
        rollover_threshold_minutes: Option<f64>,
        missing_data_threshold: Option<f64>,
    ) -> Self {
        if let Some(v) = rollover_threshold_minutes {
            self.rollover_threshold_minutes = v;
        }
        if let Some(v) = missing_data_threshold {
            self.missing_data_threshold = v;
        }
        self
    }
}
