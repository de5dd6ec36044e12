// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read access to a stored experiment

use crate::error::{ExperimentError, ExperimentResult};
use crate::runner::SimulationRecord;
use crate::space::{ParameterGrid, ParameterSpace};
use crate::stats::BumpStatistics;
use crate::store::{
    read_json, write_json, ExperimentDir, KEYS_FILE, PARAMS_TO_ITERATE_FILE, PARAMS_TO_SET_FILE,
    PARAM_SPACE_FILE,
};
use ringnet_parameters::ParameterValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Maps settings back to stored records
#[derive(Debug, Clone)]
pub struct DataManager {
    root: PathBuf,
    space: ParameterSpace,
}

impl DataManager {
    /// Open an experiment directory and load its keys and parameter space
    pub fn open(root: impl Into<PathBuf>) -> ExperimentResult<Self> {
        let root = root.into();
        let metadata = root.join(ExperimentDir::Metadata.as_str());
        let keys: Vec<String> = read_json(&metadata.join(format!("{}.json", KEYS_FILE)))?;
        let settings: Vec<Vec<ParameterValue>> =
            read_json(&metadata.join(format!("{}.json", PARAM_SPACE_FILE)))?;

        let space = ParameterSpace::from_parts(keys, settings).ok_or_else(|| {
            ExperimentError::CorruptMetadata(format!(
                "{}: setting length differs from key count",
                root.display()
            ))
        })?;
        Ok(Self { root, space })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn keys(&self) -> &[String] {
        self.space.keys()
    }

    pub fn param_space(&self) -> &ParameterSpace {
        &self.space
    }

    pub fn params_to_set(&self) -> ExperimentResult<ParameterGrid> {
        self.load(ExperimentDir::Metadata, PARAMS_TO_SET_FILE)
    }

    pub fn params_to_iterate(&self) -> ExperimentResult<ParameterGrid> {
        self.load(ExperimentDir::Metadata, PARAMS_TO_ITERATE_FILE)
    }

    /// Load the record stored for `setting` (values in key order)
    pub fn load_data(&self, setting: &[ParameterValue]) -> ExperimentResult<SimulationRecord> {
        let index = self.index_of(setting)?;
        self.load_record(index)
    }

    pub fn load_record(&self, index: usize) -> ExperimentResult<SimulationRecord> {
        self.load(ExperimentDir::Simulation, &index.to_string())
    }

    pub fn load_bump_statistics(&self, setting: &[ParameterValue]) -> ExperimentResult<BumpStatistics> {
        let index = self.index_of(setting)?;
        self.load(ExperimentDir::BumpStatistics, &index.to_string())
    }

    /// Write an arbitrary JSON artifact under the experiment
    pub fn save<T: Serialize + ?Sized>(
        &self,
        dir: ExperimentDir,
        name: &str,
        value: &T,
    ) -> ExperimentResult<PathBuf> {
        write_json(&self.path(dir, name), value)
    }

    pub fn load<T: DeserializeOwned>(&self, dir: ExperimentDir, name: &str) -> ExperimentResult<T> {
        read_json(&self.path(dir, name))
    }

    fn path(&self, dir: ExperimentDir, name: &str) -> PathBuf {
        self.root.join(dir.as_str()).join(format!("{}.json", name))
    }

    fn index_of(&self, setting: &[ParameterValue]) -> ExperimentResult<usize> {
        self.space
            .index_of(setting)
            .ok_or_else(|| ExperimentError::UnknownSetting(format!("[{}]", self.space.describe(setting))))
    }
}
