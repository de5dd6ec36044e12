// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ring Network Simulator
//!
//! Rectified-linear rate dynamics on the ring:
//!
//! ```text
//! r(0)   = r0
//! r(t+1) = max(P ⊙ (W · r(t) + I_E - I_I), 0)
//! ```
//!
//! Connectivity is built once, on first use, and reused by every subsequent
//! run until the parameters are replaced. `run` holds no randomness, so
//! repeated runs on the same instance produce identical activity.

use crate::activity::Activity;
use crate::connectivity::{build_kernel, circulant};
use crate::error::{Result, SimulationError};
use ndarray::{Array1, Array2};
use ringnet_parameters::DerivedParameters;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Runtime switches for the simulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Fail on the first non-finite rate instead of propagating it
    pub strict: bool,
}

/// Built weights; `None` on the network until first use
#[derive(Debug, Clone)]
struct Connectivity {
    kernel: Array1<f64>,
    matrix: Array2<f64>,
}

impl Connectivity {
    fn build(params: &DerivedParameters, builds: &mut usize) -> Self {
        let kernel = build_kernel(params);
        let matrix = circulant(&kernel);
        *builds += 1;
        debug!(
            n = kernel.len(),
            self_weight = kernel[0],
            weight_factor = params.weight_factor,
            "Built ring connectivity"
        );
        Self { kernel, matrix }
    }
}

/// Ring network owning its derived parameters, weights and last activity
#[derive(Debug, Clone)]
pub struct RingNetwork {
    params: DerivedParameters,
    options: SimulationOptions,
    connectivity: Option<Connectivity>,
    kernel_builds: usize,
    activity: Option<Activity>,
}

impl RingNetwork {
    pub fn new(params: DerivedParameters) -> Self {
        Self::with_options(params, SimulationOptions::default())
    }

    pub fn with_options(params: DerivedParameters, options: SimulationOptions) -> Self {
        Self {
            params,
            options,
            connectivity: None,
            kernel_builds: 0,
            activity: None,
        }
    }

    pub fn parameters(&self) -> &DerivedParameters {
        &self.params
    }

    pub fn options(&self) -> SimulationOptions {
        self.options
    }

    /// Replace the parameters; connectivity is rebuilt on next use
    pub fn set_parameters(&mut self, params: DerivedParameters) {
        self.params = params;
        self.connectivity = None;
        self.activity = None;
    }

    pub fn is_built(&self) -> bool {
        self.connectivity.is_some()
    }

    /// Number of times the kernel has been computed by this instance
    pub fn kernel_builds(&self) -> usize {
        self.kernel_builds
    }

    fn connectivity(&mut self) -> &Connectivity {
        let params = &self.params;
        let builds = &mut self.kernel_builds;
        self.connectivity
            .get_or_insert_with(|| Connectivity::build(params, builds))
    }

    /// Base kernel (length N)
    pub fn kernel(&mut self) -> &Array1<f64> {
        &self.connectivity().kernel
    }

    /// Dense circulant weight matrix (N x N)
    pub fn weight_matrix(&mut self) -> &Array2<f64> {
        &self.connectivity().matrix
    }

    /// Activity of the most recent run
    pub fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    pub fn into_activity(self) -> Option<Activity> {
        self.activity
    }

    /// Iterate the dynamics for T steps and return the (N x T) activity
    ///
    /// # Errors
    ///
    /// Only in strict mode: `SimulationError::NumericalInstability` on the
    /// first non-finite rate.
    pub fn run(&mut self) -> Result<&Activity> {
        let params = &self.params;
        let builds = &mut self.kernel_builds;
        let matrix = &self
            .connectivity
            .get_or_insert_with(|| Connectivity::build(params, builds))
            .matrix;

        let n = params.n_neurons();
        let steps = params.time_steps();
        let mut activity = Activity::zeros(n, steps);
        let mut rates = params.initial_rates.clone();

        for step in 0..steps {
            activity.rates_mut().column_mut(step).assign(&rates);

            let mut next = matrix.dot(&rates);
            for (neuron, value) in next.iter_mut().enumerate() {
                let drive = *value + params.drive_exc.at(neuron) - params.drive_inh.at(neuron);
                let updated = params.gain.at(neuron) * drive;

                // Checked before rectification so -inf is caught too
                if self.options.strict && !updated.is_finite() {
                    return Err(SimulationError::NumericalInstability {
                        step: step + 1,
                        neuron,
                        value: updated,
                    });
                }
                *value = if updated <= 0.0 { 0.0 } else { updated };
            }
            rates = next;
            trace!(step, total_rate = rates.sum(), "Ring update");
        }

        debug!(n, steps, "Ring simulation complete");
        Ok(&*self.activity.insert(activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringnet_parameters::PrimaryParameters;

    fn network(n: usize, steps: usize) -> RingNetwork {
        let derived = PrimaryParameters {
            n_neurons: n,
            time_steps: steps,
            ..Default::default()
        }
        .derive()
        .unwrap();
        RingNetwork::new(derived)
    }

    #[test]
    fn test_lazy_build_on_first_run() {
        let mut net = network(30, 4);
        assert!(!net.is_built());
        assert_eq!(net.kernel_builds(), 0);
        net.run().unwrap();
        assert!(net.is_built());
        assert_eq!(net.kernel_builds(), 1);
    }

    #[test]
    fn test_first_column_is_initial_condition() {
        let mut net = network(30, 4);
        let initial = net.parameters().initial_rates.clone();
        let activity = net.run().unwrap();
        assert_eq!(activity.rates_at(0).to_owned(), initial);
    }

    #[test]
    fn test_activity_shape() {
        let mut net = network(25, 7);
        let activity = net.run().unwrap();
        assert_eq!(activity.rates().dim(), (25, 7));
    }

    #[test]
    fn test_set_parameters_resets_connectivity() {
        let mut net = network(20, 3);
        net.run().unwrap();
        let other = PrimaryParameters {
            n_neurons: 12,
            time_steps: 2,
            ..Default::default()
        }
        .derive()
        .unwrap();
        net.set_parameters(other);
        assert!(!net.is_built());
        assert!(net.activity().is_none());
        net.run().unwrap();
        assert_eq!(net.kernel_builds(), 2);
        assert_eq!(net.weight_matrix().dim(), (12, 12));
    }

    #[test]
    fn test_rates_never_negative() {
        let mut net = network(40, 10);
        let activity = net.run().unwrap();
        assert!(activity.rates().iter().all(|&r| r >= 0.0));
    }
}
