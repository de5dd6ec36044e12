// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `ringnet_configuration.toml`.

use ringnet_parameters::{DerivationWarning, PrimaryParameters};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RingnetConfig {
    /// Primary network parameters (see `ringnet_parameters::PrimaryParameters`)
    pub parameters: PrimaryParameters,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
    pub experiment: ExperimentConfig,
    /// Warnings raised while applying environment and CLI parameter overrides
    #[serde(skip)]
    pub override_warnings: Vec<DerivationWarning>,
}

/// Simulator behavior
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fail on the first non-finite rate
    pub strict: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// Base directory for per-run log folders
    pub log_dir: PathBuf,
    /// Also write JSON logs to files (requires the `file-logging` feature)
    pub file_logging: bool,
    /// Number of run folders kept
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("./logs"),
            file_logging: false,
            retention_runs: 10,
        }
    }
}

/// Parameter sweep storage
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Prefix of the experiment directory name
    pub name: String,
    /// Root under which experiment directories are created
    pub data_dir: PathBuf,
    /// Evaluate sweep settings on the rayon thread pool
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "weight_matrix_exp".to_string(),
            data_dir: PathBuf::from("./data"),
            parallel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RingnetConfig = toml::from_str(
            r#"
            [parameters]
            n_neurons = 200
            input_type = "projection"

            [simulation]
            strict = true
            "#,
        )
        .unwrap();

        assert_eq!(config.parameters.n_neurons, 200);
        assert_eq!(config.parameters.time_steps, 25);
        assert_eq!(
            config.parameters.input_type,
            ringnet_parameters::InputType::Projection
        );
        assert!(config.simulation.strict);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = RingnetConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RingnetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
