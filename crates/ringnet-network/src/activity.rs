// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Activity trajectory produced by a run

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Firing rates of every neuron at every step, shape (N, T)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    rates: Array2<f64>,
}

/// Location and height of the activity bump at one time step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BumpPeak {
    pub neuron: usize,
    pub rate: f64,
}

impl Activity {
    pub(crate) fn zeros(n_neurons: usize, time_steps: usize) -> Self {
        Self {
            rates: Array2::zeros((n_neurons, time_steps)),
        }
    }

    pub(crate) fn rates_mut(&mut self) -> &mut Array2<f64> {
        &mut self.rates
    }

    /// Full (neurons x time) matrix
    pub fn rates(&self) -> &Array2<f64> {
        &self.rates
    }

    pub fn into_rates(self) -> Array2<f64> {
        self.rates
    }

    pub fn n_neurons(&self) -> usize {
        self.rates.nrows()
    }

    pub fn time_steps(&self) -> usize {
        self.rates.ncols()
    }

    /// Rates of all neurons at step `t`
    pub fn rates_at(&self, t: usize) -> ArrayView1<'_, f64> {
        self.rates.column(t)
    }

    pub fn final_rates(&self) -> ArrayView1<'_, f64> {
        self.rates.column(self.time_steps() - 1)
    }

    /// Most active neuron at step `t` (lowest index wins ties)
    pub fn bump_peak(&self, t: usize) -> BumpPeak {
        let mut peak = BumpPeak {
            neuron: 0,
            rate: f64::NEG_INFINITY,
        };
        for (neuron, &rate) in self.rates.column(t).iter().enumerate() {
            if rate > peak.rate {
                peak = BumpPeak { neuron, rate };
            }
        }
        peak
    }

    /// Summed rate of the ring at step `t`
    pub fn total_rate(&self, t: usize) -> f64 {
        self.rates.column(t).sum()
    }
}
