// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ring Network Experiments
//!
//! Cartesian sweeps over named parameters:
//! - **Space**: ordered grids merged into an odometer-ordered parameter space
//! - **Runner**: one derivation + network per setting, sequential or on rayon
//! - **Store / DataManager**: per-experiment directory of JSON artifacts and
//!   positional lookup of stored results
//!
//! ```rust
//! use ringnet_experiment::{Experiment, ParameterGrid};
//!
//! let set = ParameterGrid::new().with_value("N", 50usize).with_value("T", 5usize);
//! let iterate = ParameterGrid::new().with("p_inh", [0.5, 1.0]);
//! let mut experiment = Experiment::new(set, iterate);
//! assert_eq!(experiment.iterate().len(), 2);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod loader;
pub mod runner;
pub mod space;
pub mod stats;
pub mod store;

pub use error::{ExperimentError, ExperimentResult};
pub use loader::DataManager;
pub use runner::{Experiment, SettingFailure, SimulationRecord};
pub use space::{ParameterGrid, ParameterSpace};
pub use stats::BumpStatistics;
pub use store::{ExperimentDir, ExperimentStore};
