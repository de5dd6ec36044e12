// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for experiment sweeps and storage

use ringnet_network::SimulationError;
use ringnet_parameters::ConfigurationError;

/// Result type alias using ExperimentError
pub type ExperimentResult<T> = Result<T, ExperimentError>;

/// Error types for running and persisting experiments
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Setting not present in the stored parameter space
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// Stored metadata is inconsistent
    #[error("Corrupt experiment metadata: {0}")]
    CorruptMetadata(String),

    /// Parameter derivation failed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Simulation failed
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}
