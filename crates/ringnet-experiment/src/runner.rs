// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sweep runner
//!
//! Every setting of the parameter space gets its own derivation and network.
//! A failing setting is logged and recorded; the sweep carries on.

use crate::error::{ExperimentError, ExperimentResult};
use crate::space::{ParameterGrid, ParameterSpace};
use crate::stats::BumpStatistics;
use crate::store::ExperimentStore;
use rayon::prelude::*;
use ringnet_network::{Activity, RingNetwork, SimulationOptions};
use ringnet_parameters::{derive, DerivedParameters, ParameterValue, PrimaryParameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Everything produced by one setting of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub index: usize,
    pub keys: Vec<String>,
    pub setting: Vec<ParameterValue>,
    pub parameters: DerivedParameters,
    pub activity: Activity,
}

impl SimulationRecord {
    pub fn bump_statistics(&self) -> BumpStatistics {
        BumpStatistics::from_activity(&self.activity)
    }
}

/// A setting that could not be simulated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingFailure {
    pub index: usize,
    pub setting: Vec<ParameterValue>,
    pub reason: String,
}

/// Cartesian sweep over named parameters
#[derive(Debug, Clone)]
pub struct Experiment {
    params_to_set: ParameterGrid,
    params_to_iterate: ParameterGrid,
    base: PrimaryParameters,
    options: SimulationOptions,
    space: ParameterSpace,
    records: Vec<SimulationRecord>,
    failures: Vec<SettingFailure>,
}

impl Experiment {
    pub fn new(params_to_set: ParameterGrid, params_to_iterate: ParameterGrid) -> Self {
        let space = ParameterSpace::from_grids(&params_to_set, &params_to_iterate);
        Self {
            params_to_set,
            params_to_iterate,
            base: PrimaryParameters::default(),
            options: SimulationOptions::default(),
            space,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Parameters the overrides are applied on top of (defaults otherwise)
    pub fn with_base(mut self, base: PrimaryParameters) -> Self {
        self.base = base;
        self
    }

    pub fn with_options(mut self, options: SimulationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn params_to_set(&self) -> &ParameterGrid {
        &self.params_to_set
    }

    pub fn params_to_iterate(&self) -> &ParameterGrid {
        &self.params_to_iterate
    }

    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[SettingFailure] {
        &self.failures
    }

    /// Look up the result of a setting after a sweep
    pub fn record_for(&self, setting: &[ParameterValue]) -> Option<&SimulationRecord> {
        self.records
            .iter()
            .find(|r| ParameterValue::settings_match(&r.setting, setting))
    }

    /// Simulate one setting
    pub fn run_setting(&self, index: usize) -> ExperimentResult<SimulationRecord> {
        let (setting, overrides) = match (self.space.setting(index), self.space.overrides_for(index)) {
            (Some(setting), Some(overrides)) => (setting, overrides),
            _ => return Err(ExperimentError::UnknownSetting(format!("index {}", index))),
        };

        debug!("Deriving setting {} [{}]", index, self.space.describe(setting));
        let parameters = derive(&self.base, Some(&overrides))?;

        let mut network = RingNetwork::with_options(parameters.clone(), self.options);
        let activity = network.run()?.clone();

        Ok(SimulationRecord {
            index,
            keys: self.space.keys().to_vec(),
            setting: setting.to_vec(),
            parameters,
            activity,
        })
    }

    /// Run every setting sequentially, keeping results in memory
    pub fn iterate(&mut self) -> &[SimulationRecord] {
        let outcomes: Vec<_> = (0..self.space.len())
            .map(|index| (index, self.run_logged(index)))
            .collect();
        self.collect(outcomes);
        &self.records
    }

    /// Run every setting on the rayon pool, keeping enumeration order
    pub fn iterate_parallel(&mut self) -> &[SimulationRecord] {
        let outcomes: Vec<_> = (0..self.space.len())
            .into_par_iter()
            .map(|index| (index, self.run_logged(index)))
            .collect();
        self.collect(outcomes);
        &self.records
    }

    /// Run every setting sequentially, writing each record and its bump
    /// statistics to `store` as soon as it completes
    ///
    /// Records are not kept in memory. Returns the number of stored settings.
    pub fn iterate_into(&mut self, store: &ExperimentStore) -> ExperimentResult<usize> {
        self.records.clear();
        self.failures.clear();

        let mut stored = 0;
        for index in 0..self.space.len() {
            match self.run_logged(index) {
                Ok(record) => {
                    store.save_record(&record)?;
                    store.save_bump_statistics(index, &record.bump_statistics())?;
                    stored += 1;
                }
                Err(failure) => self.failures.push(failure),
            }
        }
        info!(
            "Stored {} of {} settings in {}",
            stored,
            self.space.len(),
            store.root().display()
        );
        Ok(stored)
    }

    fn run_logged(&self, index: usize) -> Result<SimulationRecord, SettingFailure> {
        let setting = self.space.setting(index).unwrap_or_default();
        info!(
            "Current setting {}/{}: [{}]",
            index + 1,
            self.space.len(),
            self.space.describe(setting)
        );
        self.run_setting(index).map_err(|err| {
            error!("Setting {} failed: {}", index, err);
            SettingFailure {
                index,
                setting: setting.to_vec(),
                reason: err.to_string(),
            }
        })
    }

    fn collect(&mut self, outcomes: Vec<(usize, Result<SimulationRecord, SettingFailure>)>) {
        self.records.clear();
        self.failures.clear();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(record) => self.records.push(record),
                Err(failure) => self.failures.push(failure),
            }
        }
        info!(
            "Sweep finished: {} succeeded, {} failed",
            self.records.len(),
            self.failures.len()
        );
    }
}
