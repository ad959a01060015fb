//! Options of an analysis run.

use serde::{Deserialize, Serialize};

use crate::bdr::DEFAULT_ALPHA_STEP;
use crate::model::ConfigurationError;
use crate::time::Duration;

pub use crate::simulator::ExecutionMode;

/// Options of an analysis run. All fields have defaults, so an empty
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Simulation horizon; defaults to the hyperperiod of each core's
    /// tasks.
    pub horizon: Option<Duration>,
    /// Number of independent simulation runs per core.
    pub runs: usize,
    pub execution: ExecutionMode,
    /// Bandwidth granularity of the interface search.
    pub alpha_step: f64,
    /// Keep the execution trace of the last run of each core.
    pub record_trace: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            horizon: None,
            runs: 1,
            execution: ExecutionMode::Worst,
            alpha_step: DEFAULT_ALPHA_STEP,
            record_trace: false,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(h) = self.horizon {
            if !(h.is_finite() && h > 0.0) {
                return Err(ConfigurationError::InvalidOption {
                    option: "horizon",
                    reason: "must be positive and finite",
                });
            }
        }
        if self.runs == 0 {
            return Err(ConfigurationError::InvalidOption {
                option: "runs",
                reason: "at least one run is required",
            });
        }
        if !(self.alpha_step > 0.0 && self.alpha_step <= 1.0) {
            return Err(ConfigurationError::InvalidOption {
                option: "alpha_step",
                reason: "must lie in (0, 1]",
            });
        }
        Ok(())
    }
}
