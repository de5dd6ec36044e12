// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named parameter overrides
//!
//! Overrides are an ordered list of `(name, value)` pairs validated against an
//! explicit allow-list of primary parameter names. Names outside the list
//! (derived quantities, typos) are reported and skipped, never applied.

use crate::error::{ConfigurationError, ConfigurationResult, DerivationWarning};
use crate::primary::PrimaryParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A loosely typed value supplied for a named parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Parse a command-line or environment string
    ///
    /// Integers are tried first, then floats, then booleans; anything else is text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<i64>() {
            return ParameterValue::Int(v);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return ParameterValue::Float(v);
        }
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" => ParameterValue::Bool(true),
            "false" | "no" => ParameterValue::Bool(false),
            _ => ParameterValue::Text(raw.to_string()),
        }
    }

    /// Value equality with integers and floats compared numerically
    ///
    /// `Int(40)` matches `Float(40.0)`; every other pairing uses `==`.
    pub fn matches(&self, other: &ParameterValue) -> bool {
        match (self, other) {
            (ParameterValue::Int(a), ParameterValue::Float(b))
            | (ParameterValue::Float(b), ParameterValue::Int(a)) => *a as f64 == *b,
            _ => self == other,
        }
    }

    /// Element-wise [`ParameterValue::matches`] over two settings
    pub fn settings_match(a: &[ParameterValue], b: &[ParameterValue]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.matches(y))
    }

    fn kind(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Int(_) => "integer",
            ParameterValue::Float(_) => "float",
            ParameterValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(v) => write!(f, "{}", v),
            ParameterValue::Int(v) => write!(f, "{}", v),
            ParameterValue::Float(v) => write!(f, "{}", v),
            ParameterValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Int(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Int(v as i64)
    }
}

impl From<usize> for ParameterValue {
    fn from(v: usize) -> Self {
        ParameterValue::Int(v as i64)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Text(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::Text(v)
    }
}

/// Primary fields that may be overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterField {
    Seed,
    TimeSteps,
    NNeurons,
    ShiftPercent,
    SigmaPercent,
    WE,
    WI,
    NExcIn,
    NInhIn,
    RExcIn,
    RInhIn,
    PInh,
    PExc,
    InputType,
    StimulusKind,
    Rescale,
}

impl ParameterField {
    /// Resolve an override name, accepting both snake_case and the historic
    /// experiment spellings (`T`, `N`, `_w_E`, `N_E_in`, `type`, `stim`, ...)
    pub fn lookup(name: &str) -> Option<Self> {
        let field = match name {
            "seed" => Self::Seed,
            "T" | "time_steps" => Self::TimeSteps,
            "N" | "n_neurons" => Self::NNeurons,
            "shift_percent" => Self::ShiftPercent,
            "sigma_percent" => Self::SigmaPercent,
            "_w_E" | "w_E" | "w_e" => Self::WE,
            "_w_I" | "w_I" | "w_i" => Self::WI,
            "N_E_in" | "n_exc_in" => Self::NExcIn,
            "N_I_in" | "n_inh_in" => Self::NInhIn,
            "r_E_in" | "r_exc_in" => Self::RExcIn,
            "r_I_in" | "r_inh_in" => Self::RInhIn,
            "p_inh" => Self::PInh,
            "p_exc" => Self::PExc,
            "type" | "input_type" => Self::InputType,
            "stim" | "stimulus_kind" => Self::StimulusKind,
            "rescale" => Self::Rescale,
            _ => return None,
        };
        Some(field)
    }
}

/// Ordered `(name, value)` overrides applied on top of primary parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterOverrides {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, preserving order
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Build from parallel key and value lists (sweep settings)
    pub fn from_setting(keys: &[String], setting: &[ParameterValue]) -> Self {
        let entries = keys
            .iter()
            .cloned()
            .zip(setting.iter().cloned())
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Apply every override in order
    ///
    /// Unknown names are pushed onto `warnings` and skipped.
    ///
    /// # Errors
    ///
    /// A value of the wrong kind for a known name, or an unrecognized input
    /// type / stimulus kind, aborts with `ConfigurationError`.
    pub fn apply(
        &self,
        params: &mut PrimaryParameters,
        warnings: &mut Vec<DerivationWarning>,
    ) -> ConfigurationResult<()> {
        for (name, value) in &self.entries {
            match ParameterField::lookup(name) {
                Some(field) => apply_field(params, field, name, value)?,
                None => {
                    let warning = DerivationWarning::UnknownOverride { name: name.clone() };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }
        Ok(())
    }
}

fn apply_field(
    params: &mut PrimaryParameters,
    field: ParameterField,
    name: &str,
    value: &ParameterValue,
) -> ConfigurationResult<()> {
    match field {
        ParameterField::Seed => params.seed = as_count(name, value)? as u64,
        ParameterField::TimeSteps => params.time_steps = as_count(name, value)?,
        ParameterField::NNeurons => params.n_neurons = as_count(name, value)?,
        ParameterField::ShiftPercent => params.shift_percent = as_float(name, value)?,
        ParameterField::SigmaPercent => params.sigma_percent = as_float(name, value)?,
        ParameterField::WE => params.w_e = as_float(name, value)?,
        ParameterField::WI => params.w_i = as_float(name, value)?,
        ParameterField::NExcIn => params.n_exc_in = as_count(name, value)?,
        ParameterField::NInhIn => params.n_inh_in = as_count(name, value)?,
        ParameterField::RExcIn => params.r_exc_in = as_float(name, value)?,
        ParameterField::RInhIn => params.r_inh_in = as_float(name, value)?,
        ParameterField::PInh => params.p_inh = as_float(name, value)?,
        ParameterField::PExc => params.p_exc = as_float(name, value)?,
        ParameterField::InputType => params.input_type = as_text(name, value)?.parse()?,
        ParameterField::StimulusKind => params.stimulus_kind = as_text(name, value)?.parse()?,
        ParameterField::Rescale => params.rescale = as_bool(name, value)?,
    }
    Ok(())
}

fn mismatch(name: &str, expected: &'static str, value: &ParameterValue) -> ConfigurationError {
    ConfigurationError::InvalidOverride {
        name: name.to_string(),
        expected,
        got: format!("{} {}", value.kind(), value),
    }
}

fn as_float(name: &str, value: &ParameterValue) -> ConfigurationResult<f64> {
    match value {
        ParameterValue::Float(v) => Ok(*v),
        ParameterValue::Int(v) => Ok(*v as f64),
        other => Err(mismatch(name, "number", other)),
    }
}

fn as_count(name: &str, value: &ParameterValue) -> ConfigurationResult<usize> {
    match value {
        ParameterValue::Int(v) if *v >= 0 => Ok(*v as usize),
        ParameterValue::Float(v) if *v >= 0.0 && v.fract() == 0.0 => Ok(*v as usize),
        other => Err(mismatch(name, "non-negative integer", other)),
    }
}

fn as_bool(name: &str, value: &ParameterValue) -> ConfigurationResult<bool> {
    match value {
        ParameterValue::Bool(v) => Ok(*v),
        ParameterValue::Int(0) => Ok(false),
        ParameterValue::Int(1) => Ok(true),
        other => Err(mismatch(name, "bool", other)),
    }
}

fn as_text<'a>(name: &str, value: &'a ParameterValue) -> ConfigurationResult<&'a str> {
    match value {
        ParameterValue::Text(v) => Ok(v.as_str()),
        other => Err(mismatch(name, "text", other)),
    }
}
