// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)
//!
//! Parameter overrides from the environment and the command line go through
//! `ParameterOverrides`, so names are checked against the same allow-list as
//! sweep settings.

use crate::{ConfigError, ConfigResult, RingnetConfig};
use ringnet_parameters::{DerivationWarning, ParameterOverrides, ParameterValue};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "ringnet_configuration.toml";

/// Environment variables mapped onto primary parameters
const PARAMETER_ENV_VARS: &[(&str, &str)] = &[
    ("RINGNET_SEED", "seed"),
    ("RINGNET_T", "T"),
    ("RINGNET_N", "N"),
    ("RINGNET_SHIFT_PERCENT", "shift_percent"),
    ("RINGNET_SIGMA_PERCENT", "sigma_percent"),
    ("RINGNET_P_INH", "p_inh"),
    ("RINGNET_P_EXC", "p_exc"),
    ("RINGNET_INPUT_TYPE", "input_type"),
    ("RINGNET_STIMULUS_KIND", "stimulus_kind"),
    ("RINGNET_RESCALE", "rescale"),
];

/// Find the ring network configuration file
///
/// Search order:
/// 1. `RINGNET_CONFIG_PATH` environment variable
/// 2. Current working directory: `./ringnet_configuration.toml`
/// 3. Parent directory: `../ringnet_configuration.toml`
/// 4. Workspace root (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("RINGNET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by RINGNET_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet RINGNET_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or an
/// override carries a value of the wrong kind. Ignored override names are
/// kept in `override_warnings`.
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<RingnetConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: RingnetConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `RINGNET_SEED`, `RINGNET_T`, `RINGNET_N`, `RINGNET_SHIFT_PERCENT`,
///   `RINGNET_SIGMA_PERCENT`, `RINGNET_P_INH`, `RINGNET_P_EXC`,
///   `RINGNET_INPUT_TYPE`, `RINGNET_STIMULUS_KIND`, `RINGNET_RESCALE` -> `parameters.*`
/// - `RINGNET_STRICT` -> `simulation.strict`
/// - `RINGNET_LOG_LEVEL` -> `logging.level`
/// - `RINGNET_LOG_DIR` -> `logging.log_dir`
/// - `RINGNET_DATA_DIR` -> `experiment.data_dir`
///
/// Returns the warnings raised by parameter overrides; they are also appended
/// to `config.override_warnings`.
pub fn apply_environment_overrides(
    config: &mut RingnetConfig,
) -> ConfigResult<Vec<DerivationWarning>> {
    let mut overrides = ParameterOverrides::new();
    for (var, name) in PARAMETER_ENV_VARS {
        if let Ok(value) = env::var(var) {
            overrides.push(*name, ParameterValue::parse(&value));
        }
    }
    let warnings = apply_parameter_overrides(config, &overrides)?;

    if let Ok(value) = env::var("RINGNET_STRICT") {
        config.simulation.strict = parse_flag(&value);
    }
    if let Ok(value) = env::var("RINGNET_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("RINGNET_LOG_DIR") {
        config.logging.log_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("RINGNET_DATA_DIR") {
        config.experiment.data_dir = PathBuf::from(value);
    }

    Ok(warnings)
}

/// Apply CLI argument overrides to configuration
///
/// Section keys (`strict`, `log_level`, `log_dir`, `data_dir`,
/// `experiment_name`, `parallel`) set their sections; every other key is a
/// parameter override, e.g. `{"N": "500", "p_inh": "0.3"}`. Unknown names
/// are returned as `DerivationWarning::UnknownOverride` and appended to
/// `config.override_warnings`.
pub fn apply_cli_overrides(
    config: &mut RingnetConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<Vec<DerivationWarning>> {
    let mut keys: Vec<&String> = cli_args.keys().collect();
    keys.sort();

    let mut overrides = ParameterOverrides::new();
    for key in keys {
        let value = &cli_args[key];
        match key.as_str() {
            "strict" => config.simulation.strict = parse_flag(value),
            "log_level" => config.logging.level = value.clone(),
            "log_dir" => config.logging.log_dir = PathBuf::from(value),
            "data_dir" => config.experiment.data_dir = PathBuf::from(value),
            "experiment_name" => config.experiment.name = value.clone(),
            "parallel" => config.experiment.parallel = parse_flag(value),
            name => overrides.push(name, ParameterValue::parse(value)),
        }
    }

    apply_parameter_overrides(config, &overrides)
}

fn apply_parameter_overrides(
    config: &mut RingnetConfig,
    overrides: &ParameterOverrides,
) -> ConfigResult<Vec<DerivationWarning>> {
    let mut warnings = Vec::new();
    if overrides.is_empty() {
        return Ok(warnings);
    }
    // Only kind mismatches are fatal here
    overrides.apply(&mut config.parameters, &mut warnings)?;
    config.override_warnings.extend(warnings.iter().cloned());
    Ok(warnings)
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringnet_parameters::InputType;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("RINGNET_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("RINGNET_CONFIG_PATH");

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("RINGNET_CONFIG_PATH", "/definitely/not/here.toml");
        let result = find_config_file();
        env::remove_var("RINGNET_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let saved_n = env::var("RINGNET_N").ok();
        env::remove_var("RINGNET_N");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[parameters]").unwrap();
        writeln!(file, "n_neurons = 64").unwrap();
        writeln!(file, "p_inh = 0.5").unwrap();
        writeln!(file, "[experiment]").unwrap();
        writeln!(file, "name = \"ring_test\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.parameters.n_neurons, 64);
        assert_eq!(config.parameters.p_inh, 0.5);
        assert_eq!(config.experiment.name, "ring_test");

        if let Some(value) = saved_n {
            env::set_var("RINGNET_N", value);
        }
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[parameters\nn_neurons = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = RingnetConfig::default();

        env::set_var("RINGNET_N", "128");
        env::set_var("RINGNET_INPUT_TYPE", "projection");
        env::set_var("RINGNET_STRICT", "yes");

        let result = apply_environment_overrides(&mut config);

        env::remove_var("RINGNET_N");
        env::remove_var("RINGNET_INPUT_TYPE");
        env::remove_var("RINGNET_STRICT");

        result.unwrap();
        assert_eq!(config.parameters.n_neurons, 128);
        assert_eq!(config.parameters.input_type, InputType::Projection);
        assert!(config.simulation.strict);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = RingnetConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("p_exc".to_string(), "0.2".to_string());
        cli_args.insert("stim".to_string(), "persistent".to_string());
        cli_args.insert("data_dir".to_string(), "/tmp/ring".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.parameters.p_exc, 0.2);
        assert_eq!(
            config.parameters.stimulus_kind,
            ringnet_parameters::StimulusKind::Persistent
        );
        assert_eq!(config.experiment.data_dir, PathBuf::from("/tmp/ring"));
    }

    #[test]
    fn test_unknown_cli_override_is_reported() {
        let mut config = RingnetConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("p_inhh".to_string(), "0.5".to_string());

        let warnings = apply_cli_overrides(&mut config, &cli_args).unwrap();

        let expected = DerivationWarning::UnknownOverride {
            name: "p_inhh".to_string(),
        };
        assert_eq!(warnings, vec![expected.clone()]);
        assert_eq!(config.override_warnings, vec![expected]);
        assert_eq!(config.parameters.p_inh, 1.0);
    }

    #[test]
    fn test_load_config_keeps_override_warnings() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[parameters]\nn_neurons = 40\n").unwrap();

        let mut cli_args = HashMap::new();
        cli_args.insert("sigma".to_string(), "0.3".to_string());
        cli_args.insert("N".to_string(), "80".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        assert_eq!(config.parameters.n_neurons, 80);
        assert!(config.override_warnings.iter().any(|w| matches!(
            w,
            DerivationWarning::UnknownOverride { name } if name == "sigma"
        )));
    }

    #[test]
    fn test_cli_override_with_wrong_kind_fails() {
        let mut config = RingnetConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("N".to_string(), "lots".to_string());

        let result = apply_cli_overrides(&mut config, &cli_args);
        assert!(matches!(result, Err(ConfigError::Parameter(_))));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[parameters]").unwrap();
        writeln!(file, "n_neurons = 50").unwrap();
        writeln!(file, "seed = 1").unwrap();

        env::set_var("RINGNET_N", "60");
        env::set_var("RINGNET_SEED", "2");

        let mut cli_args = HashMap::new();
        cli_args.insert("N".to_string(), "70".to_string());

        let result = load_config(Some(&config_path), Some(&cli_args));

        env::remove_var("RINGNET_N");
        env::remove_var("RINGNET_SEED");

        // CLI wins for N, env wins for seed (no CLI override)
        let config = result.unwrap();
        assert_eq!(config.parameters.n_neurons, 70);
        assert_eq!(config.parameters.seed, 2);
    }
}
