// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ring Network Simulation
//!
//! Discrete-time, rectified-linear rate dynamics on a ring of N neurons:
//! - **Connectivity**: Gaussian-minus-constant kernel over circular distance,
//!   expanded into a dense circulant matrix
//! - **Network**: lazily built weights, repeated deterministic runs, optional
//!   strict mode for non-finite rates
//! - **Activity**: (N x T) trajectory with simple bump statistics
//!
//! ```rust
//! use ringnet_network::RingNetwork;
//! use ringnet_parameters::PrimaryParameters;
//!
//! let params = PrimaryParameters { n_neurons: 100, time_steps: 10, ..Default::default() };
//! let mut net = RingNetwork::new(params.derive().unwrap());
//! let activity = net.run().unwrap();
//! assert_eq!(activity.rates().dim(), (100, 10));
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod activity;
pub mod connectivity;
pub mod error;
pub mod network;

pub use activity::{Activity, BumpPeak};
pub use connectivity::{build_kernel, circulant};
pub use error::{Result, SimulationError};
pub use network::{RingNetwork, SimulationOptions};
