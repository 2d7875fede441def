//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the constructor input for
//! [`Simulator`](crate::Simulator). [`validate()`](SimulationConfig::validate)
//! checks what the engine needs to run without panicking; physical
//! plausibility of the network is the caller's business.

use std::error::Error;
use std::fmt;

use hopnet_core::{HoppingParams, Network, NetworkError};

use crate::step::{DampingSchedule, StepConfig};

// ── RunOptions ─────────────────────────────────────────────────────

/// Optional bookkeeping collected during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Accumulate the applied flow of every pair into
    /// [`RunReport::traffic`](crate::RunReport::traffic). Default: off.
    pub record_traffic: bool,
    /// Time-weighted mean occupation per site in
    /// [`RunReport::mean_occupation`](crate::RunReport::mean_occupation).
    /// Default: off.
    pub track_mean_occupation: bool,
}

impl RunOptions {
    /// Enable or disable traffic recording.
    pub fn record_traffic(mut self, on: bool) -> Self {
        self.record_traffic = on;
        self
    }

    /// Enable or disable mean-occupation tracking.
    pub fn track_mean_occupation(mut self, on: bool) -> Self {
        self.track_mean_occupation = on;
        self
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`SimulationConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Network or hopping parameters are malformed.
    Network(NetworkError),
    /// The damping schedule would divide by zero or never trigger.
    InvalidDamping {
        /// Which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network: {e}"),
            Self::InvalidDamping { reason } => write!(f, "invalid damping schedule: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            Self::InvalidDamping { .. } => None,
        }
    }
}

impl From<NetworkError> for ConfigError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Everything needed to construct a [`Simulator`](crate::Simulator).
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// The network to simulate.
    pub network: Network,
    /// Hopping-law parameters.
    pub params: HoppingParams,
    /// Step controller settings.
    pub step: StepConfig,
    /// Seed for the run's waiting-time generator.
    pub seed: u64,
    /// Optional bookkeeping.
    pub options: RunOptions,
}

impl SimulationConfig {
    /// Config with default step settings, seed 0 and no extra bookkeeping.
    pub fn new(network: Network, params: HoppingParams) -> Self {
        Self {
            network,
            params,
            step: StepConfig::default(),
            seed: 0,
            options: RunOptions::default(),
        }
    }

    /// Set the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the step controller settings.
    pub fn step(mut self, step: StepConfig) -> Self {
        self.step = step;
        self
    }

    /// Set the run options.
    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Check that the configuration can be run.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Network`] if `nu` or `kT` is not finite and positive;
    /// - [`ConfigError::InvalidDamping`] if any schedule constant is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        validate_damping(&self.step.damping)?;
        Ok(())
    }
}

fn validate_damping(schedule: &DampingSchedule) -> Result<(), ConfigError> {
    if schedule.initial_threshold == 0 {
        return Err(ConfigError::InvalidDamping {
            reason: "initial_threshold must be at least 1".to_string(),
        });
    }
    if schedule.threshold_growth == 0 {
        return Err(ConfigError::InvalidDamping {
            reason: "threshold_growth must be at least 1".to_string(),
        });
    }
    if schedule.factor == 0 {
        return Err(ConfigError::InvalidDamping {
            reason: "factor must be at least 1".to_string(),
        });
    }
    Ok(())
}
