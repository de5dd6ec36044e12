// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ring Network Parameters
//!
//! Primary parameters and the deterministic derivation that turns them into a
//! fully specified ring attractor simulation:
//! - **Primary**: ring size, kernel width/shift, input sparsity, input type
//! - **Overrides**: ordered, allow-listed `(name, value)` updates
//! - **Derivation**: weights scale, selective subsets, external drive, initial rates
//!
//! ## Usage
//!
//! ```rust
//! use ringnet_parameters::{derive, ParameterOverrides, PrimaryParameters};
//!
//! let overrides = ParameterOverrides::new().with("N", 100usize).with("p_inh", 0.5);
//! let derived = derive(&PrimaryParameters::default(), Some(&overrides)).unwrap();
//! assert_eq!(derived.n_neurons(), 100);
//! assert_eq!(derived.weight_factor, 2.0);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod derive;
pub mod error;
pub mod overrides;
pub mod primary;

pub use derive::{derive, kernel_area, ActiveNeurons, DerivedParameters, NeuronField};
pub use error::{ConfigurationError, ConfigurationResult, DerivationWarning, SubsetKind};
pub use overrides::{ParameterField, ParameterOverrides, ParameterValue};
pub use primary::{InputType, PrimaryParameters, StimulusKind};
