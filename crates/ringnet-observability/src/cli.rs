// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug flags
//!
//! Binaries collect `--debug <crate>` and `--debug-all` with their own argument
//! parser and hand the names over here, together with `RINGNET_DEBUG`.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Environment variable listing crates to debug (comma-separated, or `all`)
pub const DEBUG_ENV_VAR: &str = "RINGNET_DEBUG";

/// Crates whose log level is raised to debug
///
/// # Example
/// ```rust
/// use ringnet_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_crates(["ringnet-network"], false);
/// assert!(flags.is_enabled("ringnet-network"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Flags for the named crates; `all` enables every known crate
    pub fn from_crates<I, S>(crates: I, all: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = CrateDebugFlags::default();
        for crate_name in crates {
            flags.enable(crate_name.as_ref());
        }
        if all {
            flags.enable_all();
        }
        flags
    }

    /// Also enable the crates listed in `RINGNET_DEBUG`
    pub fn with_env(mut self) -> Self {
        if let Ok(value) = env::var(DEBUG_ENV_VAR) {
            self.apply_env_value(&value);
        }
        self
    }

    /// Apply a `RINGNET_DEBUG`-style value: comma-separated names or `all`
    pub fn apply_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',') {
            self.enable(crate_name);
        }
    }

    fn enable(&mut self, crate_name: &str) {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            self.enabled_crates.insert(crate_name.to_string(), true);
        }
    }

    fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Create a tracing filter from debug flags
    ///
    /// Crate names are mapped to their tracing targets (`-` becomes `_`).
    /// Format: `"ringnet_network=debug,info"`, or just the default level if none enabled.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut crate_names: Vec<&String> = self.enabled_crates.keys().collect();
        crate_names.sort();

        let mut filters: Vec<String> = crate_names
            .into_iter()
            .map(|name| format!("{}=debug", name.replace('-', "_")))
            .collect();
        filters.push(default_level.to_string());
        filters.join(",")
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug <crate-name>           Enable debug logging for a specific crate (repeatable)

Available crates:
  {}

Environment Variable:
  {env}={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  {env}=all                             Enable debug for all crates
"#,
        KNOWN_CRATES.join(", "),
        env = DEBUG_ENV_VAR
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_crates(["ringnet-network"], false);
        assert!(flags.is_enabled("ringnet-network"));
        assert!(!flags.is_enabled("ringnet-parameters"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_crates(Vec::<String>::new(), true);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_env_value_adds_crates() {
        let mut flags = CrateDebugFlags::from_crates(["ringnet-config"], false);
        flags.apply_env_value(" ringnet-network, ,ringnet-experiment");
        assert!(flags.is_enabled("ringnet-config"));
        assert!(flags.is_enabled("ringnet-network"));
        assert!(flags.is_enabled("ringnet-experiment"));
        assert_eq!(flags.enabled_crates.len(), 3);

        let mut all = CrateDebugFlags::default();
        all.apply_env_value("all");
        assert_eq!(all.enabled_crates.len(), KNOWN_CRATES.len());
    }

    #[test]
    fn test_filter_string_uses_tracing_targets() {
        let flags = CrateDebugFlags::from_crates(["ringnet-parameters", "ringnet-network"], false);
        assert_eq!(
            flags.to_filter_string("warn"),
            "ringnet_network=debug,ringnet_parameters=debug,warn"
        );
    }

    #[test]
    fn test_filter_string_without_flags() {
        let flags = CrateDebugFlags::default();
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string("info"), "info");
    }

    #[test]
    fn test_help_lists_known_crates() {
        let help = debug_flags_help();
        assert!(help.contains("--debug <crate-name>"));
        assert!(help.contains(DEBUG_ENV_VAR));
        for crate_name in KNOWN_CRATES {
            assert!(help.contains(crate_name));
        }
    }
}
