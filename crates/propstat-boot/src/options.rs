use propstat_core::errors::{ErrorInfo, PropError};
use serde::{Deserialize, Serialize};

/// YAML/JSON configurable parameters governing a bootstrap estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapOptions {
    /// Number of resampling trials.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Fraction of each group drawn per trial, in `(0, 1]`.
    #[serde(default = "default_relative_sample_size")]
    pub relative_sample_size: f64,
    /// Master seed; trial `t` draws from substream `t` of this seed.
    #[serde(default)]
    pub seed: u64,
    /// Worker threads used for the trials (1 runs them inline).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_iterations() -> usize {
    200
}

fn default_relative_sample_size() -> f64 {
    1.0
}

fn default_concurrency() -> usize {
    1
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            relative_sample_size: default_relative_sample_size(),
            seed: 0,
            concurrency: default_concurrency(),
        }
    }
}

fn config_error(code: &str, err: impl ToString) -> PropError {
    PropError::Config(ErrorInfo::new(code, err.to_string()))
}

impl BootstrapOptions {
    /// Sets the number of trials.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the per-group draw fraction.
    pub fn with_relative_sample_size(mut self, relative_sample_size: f64) -> Self {
        self.relative_sample_size = relative_sample_size;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of worker threads.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Rejects zero iterations and draw fractions outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), PropError> {
        if self.iterations == 0 {
            return Err(PropError::validation(
                "zero_iterations",
                "bootstrap requires at least one iteration",
            ));
        }
        let fraction = self.relative_sample_size;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(PropError::Validation(
                ErrorInfo::new(
                    "relative_sample_size",
                    "relative sample size must lie in (0, 1]",
                )
                .with_context("value", fraction),
            ));
        }
        Ok(())
    }

    /// Parses and validates options from YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, PropError> {
        let options: Self =
            serde_yaml::from_str(text).map_err(|err| config_error("yaml_deserialize", err))?;
        options.validate()?;
        Ok(options)
    }

    /// Parses and validates options from JSON.
    pub fn from_json_str(text: &str) -> Result<Self, PropError> {
        let options: Self =
            serde_json::from_str(text).map_err(|err| config_error("json_deserialize", err))?;
        options.validate()?;
        Ok(options)
    }
}
