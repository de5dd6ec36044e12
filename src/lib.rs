// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ringnet - Ring Attractor Network Simulator
//!
//! A ring of N rate neurons coupled through a translation-invariant
//! Gaussian-minus-constant kernel. Primary parameters are turned into a fully
//! specified simulation by a deterministic derivation, and the network then
//! evolves a bump of activity for T steps.
//!
//! ## Components
//!
//! - **`parameters`**: primary parameters, overrides, derivation
//! - **`network`**: kernel, dense weights, rate dynamics
//! - **`config`**: TOML configuration with environment and CLI overrides
//! - **`observability`**: logging initialization, per-crate debug flags
//! - **`experiment`**: parameter sweeps, experiment storage and loading
//!
//! ## Usage
//!
//! ```rust
//! use ringnet::prelude::*;
//!
//! let overrides = ParameterOverrides::new()
//!     .with("N", 200usize)
//!     .with("T", 20usize)
//!     .with("stim", "persistent");
//! let params = derive(&PrimaryParameters::default(), Some(&overrides))?;
//!
//! let mut net = RingNetwork::new(params);
//! let activity = net.run()?;
//! assert_eq!(activity.rates().dim(), (200, 20));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use ringnet_config as config;
pub use ringnet_experiment as experiment;
pub use ringnet_network as network;
pub use ringnet_observability as observability;
pub use ringnet_parameters as parameters;

/// Prelude module for convenient imports
pub mod prelude {
    pub use ringnet_parameters::{
        derive, ConfigurationError, DerivationWarning, DerivedParameters, InputType,
        ParameterOverrides, ParameterValue, PrimaryParameters, StimulusKind,
    };

    pub use ringnet_network::{Activity, RingNetwork, SimulationError, SimulationOptions};

    pub use ringnet_config::{load_config, validate_config, RingnetConfig};

    pub use ringnet_experiment::{
        DataManager, Experiment, ExperimentStore, ParameterGrid, ParameterSpace,
    };
}
