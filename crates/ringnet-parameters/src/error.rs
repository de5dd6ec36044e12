// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fatal configuration errors and non-fatal derivation warnings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that abort parameter derivation
///
/// No `DerivedParameters` is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("'{0}' is not a valid type of input drive to the neurons. Choose 'additive' or 'projection'.")]
    UnknownInputType(String),

    #[error("'{0}' is not a valid stimulus kind. Choose 'transient' or 'persistent'.")]
    UnknownStimulusKind(String),

    #[error("Invalid override for '{name}': expected {expected}, got {got}")]
    InvalidOverride {
        name: String,
        expected: &'static str,
        got: String,
    },

    #[error("Invalid parameter value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Kernel normalization area is {0}, weight normalization is undefined")]
    NonPositiveArea(f64),

    #[error("Initial rate distribution could not be determined")]
    InitialConditionUnset,
}

/// Result type for derivation operations
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Diagnostics recorded while deriving parameters
///
/// Warnings never interrupt derivation. They are kept in emission order on
/// `DerivedParameters::warnings` and mirrored to `tracing` at `WARN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DerivationWarning {
    /// Override name is a derived parameter or does not exist
    UnknownOverride { name: String },
    /// Selective subset size was rounded to an integer neuron count
    SubsetRounded {
        population: SubsetKind,
        requested: f64,
        rounded: usize,
    },
    /// Transient stimulus with selective inhibition rescaled the recurrent weights
    TransientRescale { weight_factor: f64 },
    /// Persistent stimulus with a partially active ring rescaled the recurrent weights
    PersistentRescale { weight_factor: f64 },
    /// Subset case analysis fell through
    InitialConditionUnset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubsetKind {
    Excitatory,
    Inhibitory,
}

impl fmt::Display for SubsetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubsetKind::Excitatory => write!(f, "excitation"),
            SubsetKind::Inhibitory => write!(f, "inhibition"),
        }
    }
}

impl fmt::Display for DerivationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOverride { name } => write!(
                f,
                "'{}' is a derived parameter or doesn't exist; override ignored",
                name
            ),
            Self::SubsetRounded {
                population,
                requested,
                rounded,
            } => write!(
                f,
                "Number of neurons receiving selective {} was rounded from {} to {}",
                population, requested, rounded
            ),
            Self::TransientRescale { weight_factor } => write!(
                f,
                "Recurrent weights rescaled by {} due to selective inhibition and transient excitatory burst input",
                weight_factor
            ),
            Self::PersistentRescale { weight_factor } => write!(
                f,
                "Recurrent weights rescaled by {} to compensate for inactive neurons",
                weight_factor
            ),
            Self::InitialConditionUnset => {
                write!(f, "Initial rate distribution is not set correctly")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_mentions_rounded_count() {
        let warning = DerivationWarning::SubsetRounded {
            population: SubsetKind::Inhibitory,
            requested: 3.3,
            rounded: 3,
        };
        let text = warning.to_string();
        assert!(text.contains("inhibition"));
        assert!(text.contains("3.3"));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::UnknownInputType("multiplicative".to_string());
        assert!(err.to_string().contains("multiplicative"));
    }
}
