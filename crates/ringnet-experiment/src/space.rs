// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parameter grids and their Cartesian product

use ringnet_parameters::{ParameterOverrides, ParameterValue};
use serde::{Deserialize, Serialize};

/// Ordered map from parameter name to the values it takes
///
/// Inserting an existing name replaces its values but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterGrid {
    axes: Vec<(String, Vec<ParameterValue>)>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with<V, I>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParameterValue>,
    {
        self.insert(name, values.into_iter().map(Into::into).collect());
        self
    }

    /// Single-value axis
    pub fn with_value(self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.with(name, [value.into()])
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<ParameterValue>) {
        let name = name.into();
        match self.axes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = values,
            None => self.axes.push((name, values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[ParameterValue]> {
        self.axes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ParameterValue])> {
        self.axes.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Merge `other` into `self`; `other` wins on shared names
    pub fn merge(&mut self, other: &ParameterGrid) {
        for (name, values) in &other.axes {
            self.insert(name.clone(), values.clone());
        }
    }
}

/// Every combination of a grid's values, enumerated in odometer order
/// (last axis varies fastest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    keys: Vec<String>,
    settings: Vec<Vec<ParameterValue>>,
}

impl ParameterSpace {
    /// Iterated axes come first, followed by fixed ones
    ///
    /// A name present in both keeps its iterated position but takes the fixed values.
    pub fn from_grids(params_to_set: &ParameterGrid, params_to_iterate: &ParameterGrid) -> Self {
        let mut merged = params_to_iterate.clone();
        merged.merge(params_to_set);
        Self::from_grid(&merged)
    }

    pub fn from_grid(grid: &ParameterGrid) -> Self {
        let keys = grid.iter().map(|(k, _)| k.to_string()).collect();
        let axes: Vec<&[ParameterValue]> = grid.iter().map(|(_, v)| v).collect();
        Self {
            keys,
            settings: cartesian_product(&axes),
        }
    }

    /// Rebuild from stored keys and settings
    pub fn from_parts(keys: Vec<String>, settings: Vec<Vec<ParameterValue>>) -> Option<Self> {
        if settings.iter().any(|s| s.len() != keys.len()) {
            return None;
        }
        Some(Self { keys, settings })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn settings(&self) -> &[Vec<ParameterValue>] {
        &self.settings
    }

    pub fn setting(&self, index: usize) -> Option<&[ParameterValue]> {
        self.settings.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Position of `setting` in enumeration order
    ///
    /// Integers and floats compare numerically, so `40` finds `40.0`.
    pub fn index_of(&self, setting: &[ParameterValue]) -> Option<usize> {
        self.settings
            .iter()
            .position(|s| ParameterValue::settings_match(s, setting))
    }

    /// Overrides that reproduce the setting at `index`
    pub fn overrides_for(&self, index: usize) -> Option<ParameterOverrides> {
        self.setting(index)
            .map(|setting| ParameterOverrides::from_setting(&self.keys, setting))
    }

    /// Human-readable `key=value` listing of a setting
    pub fn describe(&self, setting: &[ParameterValue]) -> String {
        self.keys
            .iter()
            .zip(setting)
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn cartesian_product(axes: &[&[ParameterValue]]) -> Vec<Vec<ParameterValue>> {
    if axes.iter().any(|values| values.is_empty()) {
        return Vec::new();
    }

    let total: usize = axes.iter().map(|values| values.len()).product();
    let mut settings = Vec::with_capacity(total);
    let mut digits = vec![0usize; axes.len()];

    for _ in 0..total {
        settings.push(
            digits
                .iter()
                .zip(axes)
                .map(|(&d, values)| values[d].clone())
                .collect(),
        );

        // Advance the odometer from the last axis
        for axis in (0..axes.len()).rev() {
            digits[axis] += 1;
            if digits[axis] < axes[axis].len() {
                break;
            }
            digits[axis] = 0;
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odometer_order() {
        let iterate = ParameterGrid::new()
            .with("p_inh", [0.0, 0.5])
            .with("rescale", [true, false]);
        let space = ParameterSpace::from_grids(&ParameterGrid::new(), &iterate);

        assert_eq!(space.keys(), ["p_inh", "rescale"]);
        assert_eq!(space.len(), 4);
        assert_eq!(
            space.setting(1).unwrap(),
            [ParameterValue::Float(0.0), ParameterValue::Bool(false)]
        );
        assert_eq!(
            space.setting(2).unwrap(),
            [ParameterValue::Float(0.5), ParameterValue::Bool(true)]
        );
    }

    #[test]
    fn test_fixed_axes_follow_iterated() {
        let set = ParameterGrid::new().with_value("N", 100usize);
        let iterate = ParameterGrid::new().with("seed", [1i64, 2, 3]);
        let space = ParameterSpace::from_grids(&set, &iterate);

        assert_eq!(space.keys(), ["seed", "N"]);
        assert_eq!(space.len(), 3);
        assert!(space
            .settings()
            .iter()
            .all(|s| s[1] == ParameterValue::Int(100)));
    }

    #[test]
    fn test_shared_name_keeps_position_takes_fixed_value() {
        let set = ParameterGrid::new().with_value("p_inh", 0.25);
        let iterate = ParameterGrid::new()
            .with("p_inh", [0.0, 0.5])
            .with("seed", [7i64]);
        let space = ParameterSpace::from_grids(&set, &iterate);

        assert_eq!(space.keys(), ["p_inh", "seed"]);
        assert_eq!(space.len(), 1);
        assert_eq!(space.setting(0).unwrap()[0], ParameterValue::Float(0.25));
    }

    #[test]
    fn test_empty_grids_yield_single_default_setting() {
        let space = ParameterSpace::from_grids(&ParameterGrid::new(), &ParameterGrid::new());
        assert_eq!(space.len(), 1);
        assert!(space.setting(0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_axis_yields_no_settings() {
        let iterate = ParameterGrid::new().with("seed", Vec::<i64>::new());
        let space = ParameterSpace::from_grids(&ParameterGrid::new(), &iterate);
        assert!(space.is_empty());
    }

    #[test]
    fn test_index_and_overrides() {
        let iterate = ParameterGrid::new().with("T", [5i64, 10]).with("N", [20i64, 40]);
        let space = ParameterSpace::from_grids(&ParameterGrid::new(), &iterate);

        let setting = [ParameterValue::Int(10), ParameterValue::Int(20)];
        assert_eq!(space.index_of(&setting), Some(2));
        assert_eq!(space.index_of(&[ParameterValue::Int(99), ParameterValue::Int(20)]), None);

        let overrides = space.overrides_for(3).unwrap();
        let entries: Vec<_> = overrides.iter().collect();
        assert_eq!(entries[0], ("T", &ParameterValue::Int(10)));
        assert_eq!(entries[1], ("N", &ParameterValue::Int(40)));
        assert!(space.overrides_for(4).is_none());

        let mixed = [ParameterValue::Float(10.0), ParameterValue::Int(40)];
        assert_eq!(space.index_of(&mixed), Some(3));
        assert_eq!(space.describe(space.setting(0).unwrap()), "T=5, N=20");
    }
}
