// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-step bump statistics extracted from an activity trajectory

use ringnet_network::{Activity, BumpPeak};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BumpStatistics {
    /// Peak neuron and rate at each step
    pub peaks: Vec<BumpPeak>,
    /// Summed ring rate at each step
    pub total_rates: Vec<f64>,
}

impl BumpStatistics {
    pub fn from_activity(activity: &Activity) -> Self {
        let steps = 0..activity.time_steps();
        Self {
            peaks: steps.clone().map(|t| activity.bump_peak(t)).collect(),
            total_rates: steps.map(|t| activity.total_rate(t)).collect(),
        }
    }

    /// Net displacement of the peak around the ring, first to last step
    ///
    /// Wrapped into `(-N/2, N/2]`.
    pub fn peak_drift(&self, n_neurons: usize) -> Option<i64> {
        let first = self.peaks.first()?.neuron as i64;
        let last = self.peaks.last()?.neuron as i64;
        let n = n_neurons as i64;
        if n == 0 {
            return None;
        }
        let mut drift = (last - first).rem_euclid(n);
        if drift > n / 2 {
            drift -= n;
        }
        Some(drift)
    }
}
