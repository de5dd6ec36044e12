// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that values are within valid ranges before any simulation starts.
//! All problems are collected and reported together.

use crate::{ConfigError, ConfigResult, RingnetConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &RingnetConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_parameters(config, &mut errors);
    validate_required_fields(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_parameters(config: &RingnetConfig, errors: &mut Vec<ConfigValidationError>) {
    if let Err(err) = config.parameters.validate() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "parameters".to_string(),
            reason: err.to_string(),
        });
    }
    if config.parameters.sigma_percent == 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "parameters.sigma_percent".to_string(),
            reason: "must be positive for the kernel to be normalizable".to_string(),
        });
    }
}

fn validate_required_fields(config: &RingnetConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.experiment.name.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "experiment.name".to_string(),
        });
    }
    if config.experiment.data_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "experiment.data_dir".to_string(),
        });
    }
}

fn validate_logging(config: &RingnetConfig, errors: &mut Vec<ConfigValidationError>) {
    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
    if config.logging.retention_runs == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.retention_runs".to_string(),
            reason: "must keep at least one run".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RingnetConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_out_of_range_parameter() {
        let mut config = RingnetConfig::default();
        config.parameters.p_exc = -0.1;

        let result = validate_config(&config);
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("p_exc"));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_zero_sigma_rejected() {
        let mut config = RingnetConfig::default();
        config.parameters.sigma_percent = 0.0;

        let result = validate_config(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_errors_are_collected() {
        let mut config = RingnetConfig::default();
        config.experiment.name = String::new();
        config.logging.level = "loud".to_string();

        if let Err(ConfigError::ValidationError(msg)) = validate_config(&config) {
            assert!(msg.contains("experiment.name"));
            assert!(msg.contains("logging.level"));
        } else {
            panic!("expected validation error");
        }
    }
}
