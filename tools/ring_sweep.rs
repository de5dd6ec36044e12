// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ring network runner.
//!
//! Runs a single simulation from `ringnet_configuration.toml` (plus
//! environment and `--set` overrides) and prints a bump summary, or with
//! `--sweep key=v1,v2` runs every combination and stores the results under
//! `experiment.data_dir`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ringnet::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    validate_config, RingnetConfig,
};
use ringnet::experiment::{BumpStatistics, Experiment, ExperimentStore, ParameterGrid};
use ringnet::network::{RingNetwork, SimulationOptions};
use ringnet::observability::{debug_flags_help, init_logging, CrateDebugFlags, LoggingOptions};
use ringnet::parameters::ParameterValue;
use tracing::{debug, info, warn};

/// Ring attractor simulator: single runs and parameter sweeps
#[derive(Parser, Debug)]
#[command(
    name = "ring_sweep",
    version,
    author,
    long_about = None,
    after_help = debug_flags_help()
)]
struct Args {
    /// Path to the configuration file (searched for when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parameter override, e.g. `--set p_inh=0.3` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    /// Sweep axis, e.g. `--sweep p_inh=0,0.5,1` (repeatable)
    #[arg(long = "sweep", value_name = "KEY=V1,V2,...", value_parser = parse_key_value)]
    sweeps: Vec<(String, String)>,

    /// Run sweep settings on the rayon pool
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Enable debug logging for a crate (repeatable)
    #[arg(long = "debug", value_name = "CRATE")]
    debug_crates: Vec<String>,

    /// Enable debug logging for all crates
    #[arg(long, default_value_t = false)]
    debug_all: bool,
}

impl Args {
    fn override_map(&self) -> HashMap<String, String> {
        self.overrides.iter().cloned().collect()
    }

    fn sweep_grid(&self) -> ParameterGrid {
        let mut grid = ParameterGrid::new();
        for (key, values) in &self.sweeps {
            grid.insert(key.clone(), values.split(',').map(ParameterValue::parse).collect());
        }
        grid
    }
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected <key>=<value>, got `{}`", raw)),
    }
}

fn load(args: &Args) -> Result<RingnetConfig> {
    let overrides = args.override_map();
    let config = match &args.config {
        Some(path) => load_config(Some(path), Some(&overrides))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match find_config_file() {
            Ok(path) => load_config(Some(&path), Some(&overrides))
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            Err(_) => {
                let mut config = RingnetConfig::default();
                apply_environment_overrides(&mut config)
                    .context("Invalid environment override")?;
                apply_cli_overrides(&mut config, &overrides).context("Invalid --set override")?;
                config
            }
        },
    };
    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

fn run_single(config: &RingnetConfig) -> Result<()> {
    let params = config
        .parameters
        .derive()
        .context("Parameter derivation failed")?;
    let warnings = params.warnings.len();
    let weight_factor = params.weight_factor;
    let n_neurons = params.n_neurons();

    let options = SimulationOptions {
        strict: config.simulation.strict,
    };
    let mut network = RingNetwork::with_options(params, options);
    let activity = network.run().context("Simulation failed")?;
    let stats = BumpStatistics::from_activity(activity);

    let (first, last) = match (stats.peaks.first(), stats.peaks.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => bail!("Simulation produced no time steps"),
    };

    println!("neurons:        {}", n_neurons);
    println!("time steps:     {}", activity.time_steps());
    println!("weight factor:  {}", weight_factor);
    println!("warnings:       {}", warnings + config.override_warnings.len());
    println!("initial peak:   neuron {} (rate {:.6})", first.neuron, first.rate);
    println!("final peak:     neuron {} (rate {:.6})", last.neuron, last.rate);
    if let Some(drift) = stats.peak_drift(n_neurons) {
        println!("peak drift:     {} neurons", drift);
    }
    if let Some(total) = stats.total_rates.last() {
        println!("final total:    {:.6}", total);
    }
    Ok(())
}

fn run_sweep(config: &RingnetConfig, grid: ParameterGrid) -> Result<()> {
    let mut experiment = Experiment::new(ParameterGrid::new(), grid)
        .with_base(config.parameters.clone())
        .with_options(SimulationOptions {
            strict: config.simulation.strict,
        });

    let store = ExperimentStore::create(&config.experiment.data_dir, &config.experiment.name, &experiment)
        .context("Failed to create experiment directory")?;

    let stored = if config.experiment.parallel {
        experiment.iterate_parallel();
        for record in experiment.records() {
            store.save_record(record).context("Failed to store record")?;
            store
                .save_bump_statistics(record.index, &record.bump_statistics())
                .context("Failed to store bump statistics")?;
        }
        experiment.records().len()
    } else {
        experiment.iterate_into(&store).context("Sweep failed")?
    };

    for failure in experiment.failures() {
        warn!("Setting {} failed: {}", failure.index, failure.reason);
    }
    println!(
        "Stored {} of {} settings in {}",
        stored,
        experiment.space().len(),
        store.root().display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = load(&args)?;
    if args.parallel {
        config.experiment.parallel = true;
    }

    let flags = CrateDebugFlags::from_crates(&args.debug_crates, args.debug_all).with_env();
    let options = LoggingOptions {
        level: config.logging.level.clone(),
        log_dir: config.logging.log_dir.clone(),
        file_logging: config.logging.file_logging,
        retention_runs: config.logging.retention_runs,
    };
    let guard = init_logging(&flags, &options).context("Failed to initialize logging")?;
    info!("ringnet {}", ringnet::VERSION);
    if flags.any_enabled() {
        debug!("Debug logging enabled for {:?}", flags.enabled_crates.keys());
    }
    if let Some(dir) = guard.log_dir() {
        info!("Writing logs to {}", dir.display());
    }

    // Overrides were applied before the subscriber existed
    for warning in &config.override_warnings {
        warn!("{}", warning);
    }

    let grid = args.sweep_grid();
    if grid.is_empty() {
        run_single(&config)
    } else {
        run_sweep(&config, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_repeated_sets_and_sweeps() {
        let args = Args::try_parse_from([
            "ring_sweep",
            "--set",
            "N=40",
            "--set",
            "p_inhh=0.5",
            "--sweep",
            "p_inh=0,0.5",
            "--sweep",
            "stim=transient,persistent",
            "--debug",
            "ringnet-network",
            "--parallel",
        ])
        .unwrap();

        let overrides = args.override_map();
        assert_eq!(overrides.get("N").map(String::as_str), Some("40"));
        assert_eq!(overrides.get("p_inhh").map(String::as_str), Some("0.5"));
        assert!(args.parallel);
        assert_eq!(args.debug_crates, ["ringnet-network"]);

        let grid = args.sweep_grid();
        assert_eq!(grid.len(), 2);
        assert_eq!(
            grid.get("stim").unwrap(),
            [
                ParameterValue::Text("transient".to_string()),
                ParameterValue::Text("persistent".to_string())
            ]
        );
    }

    #[test]
    fn test_malformed_pair_is_rejected() {
        assert!(Args::try_parse_from(["ring_sweep", "--set", "p_inh"]).is_err());
        assert!(Args::try_parse_from(["ring_sweep", "--sweep", "=1,2"]).is_err());
        assert!(Args::try_parse_from(["ring_sweep", "--debug-ringnet-network"]).is_err());
    }

    #[test]
    fn test_unknown_set_key_is_kept_for_replay() {
        let args = Args::try_parse_from(["ring_sweep", "--set", "p_inhh=0.5"]).unwrap();
        let mut config = RingnetConfig::default();
        apply_cli_overrides(&mut config, &args.override_map()).unwrap();
        assert_eq!(config.override_warnings.len(), 1);
        assert!(config.override_warnings[0].to_string().contains("p_inhh"));
    }
}
