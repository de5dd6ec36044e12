// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! User-settable primary parameters
//!
//! Everything a simulation needs is derived from this record (see
//! [`crate::derive`]). Defaults reproduce the canonical ring: 1000 neurons,
//! 25 time steps, a kernel of width 15% of the ring shifted by 10%.

use crate::error::{ConfigurationError, ConfigurationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How external input enters the dynamics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// External current added to the recurrent drive
    Additive,
    /// Per-neuron gain multiplying the update
    Projection,
}

impl FromStr for InputType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(InputType::Additive),
            "projection" => Ok(InputType::Projection),
            _ => Err(ConfigurationError::UnknownInputType(s.to_string())),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::Additive => write!(f, "additive"),
            InputType::Projection => write!(f, "projection"),
        }
    }
}

/// Temporal profile of the excitatory stimulus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusKind {
    /// Excitation only through the initial condition
    Transient,
    /// Standing external drive for the whole run
    Persistent,
}

impl FromStr for StimulusKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transient" => Ok(StimulusKind::Transient),
            "persistent" => Ok(StimulusKind::Persistent),
            _ => Err(ConfigurationError::UnknownStimulusKind(s.to_string())),
        }
    }
}

impl fmt::Display for StimulusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StimulusKind::Transient => write!(f, "transient"),
            StimulusKind::Persistent => write!(f, "persistent"),
        }
    }
}

/// Primary (user-settable) parameters of a ring network simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryParameters {
    /// Seed for subset sampling; decides which neurons get selective input
    pub seed: u64,
    /// Number of simulation time steps (T)
    pub time_steps: usize,
    /// Number of neurons on the ring (N)
    pub n_neurons: usize,
    /// Connectivity center shift as a fraction of N
    pub shift_percent: f64,
    /// Gaussian kernel width as a fraction of N
    pub sigma_percent: f64,
    /// Excitatory recurrent weight scale, normalized during derivation
    pub w_e: f64,
    /// Inhibitory recurrent weight scale, normalized during derivation
    pub w_i: f64,
    /// Size of the external excitatory population (additive input)
    pub n_exc_in: usize,
    /// Size of the external inhibitory population (additive input)
    pub n_inh_in: usize,
    /// Rate of the external excitatory population
    pub r_exc_in: f64,
    /// Rate of the external inhibitory population
    pub r_inh_in: f64,
    /// Fraction of neurons receiving selective inhibition
    pub p_inh: f64,
    /// Fraction of neurons receiving selective excitation
    pub p_exc: f64,
    pub input_type: InputType,
    pub stimulus_kind: StimulusKind,
    /// Compensate recurrent weights when only part of the ring is active
    pub rescale: bool,
}

impl Default for PrimaryParameters {
    fn default() -> Self {
        Self {
            seed: 0,
            time_steps: 25,
            n_neurons: 1000,
            shift_percent: 0.1,
            sigma_percent: 0.15,
            w_e: 2.75,
            w_i: 1.0,
            n_exc_in: 100,
            n_inh_in: 100,
            r_exc_in: 0.0,
            r_inh_in: 0.0,
            p_inh: 1.0,
            p_exc: 1.0,
            input_type: InputType::Additive,
            stimulus_kind: StimulusKind::Transient,
            rescale: true,
        }
    }
}

impl PrimaryParameters {
    /// Check ranges required for derivation to be well defined
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` for the first violated range.
    pub fn validate(&self) -> ConfigurationResult<()> {
        if self.n_neurons == 0 {
            return Err(invalid("N", "ring must contain at least one neuron"));
        }
        if self.time_steps == 0 {
            return Err(invalid("T", "simulation needs at least one time step"));
        }

        let fractions = [
            ("shift_percent", self.shift_percent),
            ("sigma_percent", self.sigma_percent),
            ("p_inh", self.p_inh),
            ("p_exc", self.p_exc),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("{} is outside [0, 1]", value)));
            }
        }

        let non_negative = [
            ("w_E", self.w_e),
            ("w_I", self.w_i),
            ("r_E_in", self.r_exc_in),
            ("r_I_in", self.r_inh_in),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("{} must be finite and >= 0", value)));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field,
        reason: reason.into(),
    }
}
