// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Scenario tests for parameter derivation
//!
//! These tests pin the observable contract of `derive`: determinism, exact
//! subset sizes, rescale policy and the initial bump.

use ringnet_parameters::{
    derive, ActiveNeurons, ConfigurationError, DerivationWarning, InputType, NeuronField,
    ParameterOverrides, PrimaryParameters, StimulusKind,
};

fn ring_of_ten() -> PrimaryParameters {
    PrimaryParameters {
        seed: 0,
        time_steps: 5,
        n_neurons: 10,
        shift_percent: 0.0,
        sigma_percent: 0.15,
        w_e: 2.75,
        w_i: 1.0,
        input_type: InputType::Additive,
        stimulus_kind: StimulusKind::Transient,
        p_inh: 1.0,
        p_exc: 1.0,
        ..Default::default()
    }
}

#[test]
fn test_derivation_is_deterministic() {
    let params = PrimaryParameters {
        n_neurons: 200,
        p_inh: 0.37,
        p_exc: 0.61,
        seed: 42,
        ..Default::default()
    };
    let a = params.derive().unwrap();
    let b = params.derive().unwrap();

    assert_eq!(a, b);
    for (x, y) in a.initial_rates.iter().zip(b.initial_rates.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn test_transient_global_inhibition_scenario() {
    let derived = ring_of_ten().derive().unwrap();

    assert_eq!(derived.drive_exc, NeuronField::Uniform(0.0));
    assert_eq!(derived.weight_factor, 1.0);
    assert_eq!(derived.w_e_norm, 2.75 / derived.area);
    assert_eq!(derived.w_i_norm, 1.0 / derived.area);
    assert!(derived.area > 0.0);
}

#[test]
fn test_transient_selective_inhibition_rescales() {
    let params = PrimaryParameters {
        p_inh: 0.5,
        rescale: true,
        ..ring_of_ten()
    };
    let derived = params.derive().unwrap();

    assert_eq!(derived.weight_factor, 2.0);
    assert!(derived
        .warnings
        .contains(&DerivationWarning::TransientRescale { weight_factor: 2.0 }));
}

#[test]
fn test_weight_factor_is_one_without_rescale() {
    for stimulus_kind in [StimulusKind::Transient, StimulusKind::Persistent] {
        for &p_inh in &[0.0, 0.3, 0.5, 1.0] {
            for &p_exc in &[0.0, 0.4, 1.0] {
                let params = PrimaryParameters {
                    stimulus_kind,
                    p_inh,
                    p_exc,
                    rescale: false,
                    ..ring_of_ten()
                };
                let derived = params.derive().unwrap();
                assert_eq!(derived.weight_factor, 1.0);
            }
        }
    }
}

#[test]
fn test_no_selective_input_gives_uniform_bump() {
    let params = PrimaryParameters {
        p_exc: 0.0,
        p_inh: 0.0,
        rescale: false,
        ..ring_of_ten()
    };
    let derived = params.derive().unwrap();

    assert_eq!(derived.active_neurons, ActiveNeurons::All);
    let sigma = derived.sigma;
    for i in 0..10 {
        let x = i as f64;
        let expected = (-0.5 * (x - sigma).powi(2) / sigma.powi(2)).exp();
        assert!((derived.initial_rates[i] - expected).abs() < 1e-15);
    }
}

#[test]
fn test_overrides_apply_before_derivation() {
    let overrides = ParameterOverrides::new()
        .with("N", 64usize)
        .with("sigma_percent", 0.1)
        .with("not_a_parameter", 1);
    let derived = derive(&PrimaryParameters::default(), Some(&overrides)).unwrap();

    assert_eq!(derived.n_neurons(), 64);
    assert_eq!(derived.x.len(), 64);
    assert!((derived.sigma - 6.4).abs() < 1e-12);
    assert!(derived.warnings.contains(&DerivationWarning::UnknownOverride {
        name: "not_a_parameter".to_string()
    }));
}

#[test]
fn test_zero_area_aborts_derivation() {
    let overrides = ParameterOverrides::new().with("sigma_percent", 0.0);
    let result = derive(&ring_of_ten(), Some(&overrides));
    assert!(matches!(result, Err(ConfigurationError::NonPositiveArea(_))));
}

#[test]
fn test_unknown_input_type_aborts_derivation() {
    let overrides = ParameterOverrides::new().with("type", "multiplicative");
    let result = derive(&ring_of_ten(), Some(&overrides));
    assert!(matches!(result, Err(ConfigurationError::UnknownInputType(_))));
}

#[test]
fn test_derived_parameters_serialize() {
    let derived = PrimaryParameters {
        p_inh: 0.5,
        ..ring_of_ten()
    }
    .derive()
    .unwrap();
    let json = serde_json::to_string(&derived).unwrap();
    let back: ringnet_parameters::DerivedParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(back.inh_subset, derived.inh_subset);
    assert_eq!(back.weight_factor, derived.weight_factor);
}
