// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! On-disk experiment layout
//!
//! ```text
//! <data_dir>/<name>_<timestamp>/
//!   ├── metadata/            params_to_set.json, params_to_iterate.json,
//!   │                        param_space.json, keys.json
//!   ├── simulation/          <index>.json (SimulationRecord)
//!   ├── eigendecomposition/
//!   └── bump_statistics/     <index>.json (BumpStatistics)
//! ```

use crate::error::ExperimentResult;
use crate::runner::{Experiment, SimulationRecord};
use crate::stats::BumpStatistics;
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub(crate) const PARAMS_TO_SET_FILE: &str = "params_to_set";
pub(crate) const PARAMS_TO_ITERATE_FILE: &str = "params_to_iterate";
pub(crate) const PARAM_SPACE_FILE: &str = "param_space";
pub(crate) const KEYS_FILE: &str = "keys";

/// Experiment subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentDir {
    Metadata,
    Simulation,
    Eigendecomposition,
    BumpStatistics,
}

impl ExperimentDir {
    pub const ALL: [ExperimentDir; 4] = [
        ExperimentDir::Metadata,
        ExperimentDir::Simulation,
        ExperimentDir::Eigendecomposition,
        ExperimentDir::BumpStatistics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentDir::Metadata => "metadata",
            ExperimentDir::Simulation => "simulation",
            ExperimentDir::Eigendecomposition => "eigendecomposition",
            ExperimentDir::BumpStatistics => "bump_statistics",
        }
    }
}

/// Writer for one experiment directory
#[derive(Debug, Clone)]
pub struct ExperimentStore {
    root: PathBuf,
}

impl ExperimentStore {
    /// Create `<data_dir>/<name>_<timestamp>/` with its subdirectories and
    /// write the sweep metadata
    pub fn create(data_dir: &Path, name: &str, experiment: &Experiment) -> ExperimentResult<Self> {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        Self::create_at(data_dir.join(format!("{}_{}", name, stamp)), experiment)
    }

    /// Same as [`ExperimentStore::create`] with an explicit experiment directory
    pub fn create_at(root: PathBuf, experiment: &Experiment) -> ExperimentResult<Self> {
        for dir in ExperimentDir::ALL {
            let path = root.join(dir.as_str());
            if !path.is_dir() {
                fs::create_dir_all(&path)?;
                debug!("Created {}", path.display());
            }
        }

        let store = Self { root };
        store.save(ExperimentDir::Metadata, PARAMS_TO_SET_FILE, experiment.params_to_set())?;
        store.save(
            ExperimentDir::Metadata,
            PARAMS_TO_ITERATE_FILE,
            experiment.params_to_iterate(),
        )?;
        store.save(
            ExperimentDir::Metadata,
            PARAM_SPACE_FILE,
            &experiment.space().settings(),
        )?;
        store.save(ExperimentDir::Metadata, KEYS_FILE, &experiment.space().keys())?;

        info!(
            "Experiment directory {} ({} settings)",
            store.root.display(),
            experiment.space().len()
        );
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, dir: ExperimentDir) -> PathBuf {
        self.root.join(dir.as_str())
    }

    pub fn save_record(&self, record: &SimulationRecord) -> ExperimentResult<PathBuf> {
        self.save(ExperimentDir::Simulation, &record.index.to_string(), record)
    }

    pub fn save_bump_statistics(
        &self,
        index: usize,
        stats: &BumpStatistics,
    ) -> ExperimentResult<PathBuf> {
        self.save(ExperimentDir::BumpStatistics, &index.to_string(), stats)
    }

    /// Write `<dir>/<name>.json`
    pub fn save<T: Serialize + ?Sized>(
        &self,
        dir: ExperimentDir,
        name: &str,
        value: &T,
    ) -> ExperimentResult<PathBuf> {
        write_json(&self.dir(dir).join(format!("{}.json", name)), value)
    }

    /// Read `<dir>/<name>.json`
    pub fn load<T: DeserializeOwned>(&self, dir: ExperimentDir, name: &str) -> ExperimentResult<T> {
        read_json(&self.dir(dir).join(format!("{}.json", name)))
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ExperimentResult<PathBuf> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json)?;
    Ok(path.to_path_buf())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> ExperimentResult<T> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
