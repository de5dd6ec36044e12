// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration -> derivation -> simulation -> storage, through the umbrella crate

use std::collections::HashMap;
use std::path::Path;

use ndarray::Array1;
use ringnet::config::apply_cli_overrides;
use ringnet::prelude::*;
use tempfile::tempdir;

fn cli(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_bundled_configuration_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("ringnet_configuration.toml");
    let config = load_config(Some(&path), None).unwrap();
    validate_config(&config).unwrap();
    assert_eq!(config, RingnetConfig::default());
}

#[test]
fn test_configured_persistent_run() {
    let mut config = RingnetConfig::default();
    apply_cli_overrides(
        &mut config,
        &cli(&[("N", "120"), ("T", "15"), ("stim", "persistent"), ("p_inh", "0.5")]),
    )
    .unwrap();
    validate_config(&config).unwrap();

    let params = config.parameters.derive().unwrap();
    // Half the ring is inhibited, so half starts active
    assert_eq!(params.weight_factor, 2.0);
    assert!(params
        .warnings
        .iter()
        .any(|w| matches!(w, DerivationWarning::PersistentRescale { .. })));

    let mut net = RingNetwork::new(params);
    let activity = net.run().unwrap();
    assert_eq!(activity.rates().dim(), (120, 15));
    assert!(activity.rates().iter().all(|&r| r >= 0.0));
}

#[test]
fn test_first_column_is_initial_bump() {
    let overrides = ParameterOverrides::new().with("N", 80usize).with("T", 4usize);
    let params = derive(&PrimaryParameters::default(), Some(&overrides)).unwrap();
    let r0: Array1<f64> = params.initial_rates.clone();

    let mut net = RingNetwork::new(params);
    let activity = net.run().unwrap();
    assert_eq!(activity.rates_at(0).to_owned(), r0);
}

#[test]
fn test_sweep_persists_and_reloads() {
    let dir = tempdir().unwrap();
    let set = ParameterGrid::new()
        .with_value("N", 40usize)
        .with_value("T", 6usize);
    let iterate = ParameterGrid::new().with("seed", [1i64, 2]);
    let mut experiment = Experiment::new(set, iterate);

    let store = ExperimentStore::create(dir.path(), "ring", &experiment).unwrap();
    assert_eq!(experiment.iterate_into(&store).unwrap(), 2);

    let manager = DataManager::open(store.root()).unwrap();
    let record = manager
        .load_data(&[
            ParameterValue::Int(2),
            ParameterValue::Int(40),
            ParameterValue::Int(6),
        ])
        .unwrap();
    assert_eq!(record.index, 1);
    assert_eq!(record.parameters.primary.seed, 2);
    assert_eq!(record.activity.rates().dim(), (40, 6));
}
