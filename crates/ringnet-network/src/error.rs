// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for ring network simulation

/// Errors raised while running the dynamics
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// Strict mode only: the update produced NaN or Inf
    #[error("Non-finite rate {value} for neuron {neuron} at step {step}")]
    NumericalInstability {
        step: usize,
        neuron: usize,
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
