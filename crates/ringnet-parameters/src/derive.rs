// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Parameter Derivation
//!
//! Turns [`PrimaryParameters`] into a fully specified simulation.
//!
//! ## Stages (order matters, each depends on the previous ones)
//! 1. Apply overrides
//! 2. Geometry: positions, kernel sigma and shift
//! 3. Kernel normalization: discretized Gaussian area, normalized weights
//! 4. Rescale, first pass (transient stimulus with selective inhibition)
//! 5. Selective subsets, sampled without replacement from a per-call RNG
//! 6. External drive (additive current or projection gain)
//! 7. Initial rate distribution
//! 8. Rescale, second pass (persistent stimulus with inactive neurons)
//!
//! Derivation is a pure function of the primary parameters: the RNG is local
//! to the call and seeded from `seed`, so concurrent derivations never share
//! random state.

use crate::error::{
    ConfigurationError, ConfigurationResult, DerivationWarning, SubsetKind,
};
use crate::overrides::ParameterOverrides;
use crate::primary::{InputType, PrimaryParameters, StimulusKind};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A per-neuron quantity that may collapse to a single broadcast value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NeuronField {
    Uniform(f64),
    PerNeuron(Array1<f64>),
}

impl NeuronField {
    #[inline]
    pub fn at(&self, neuron: usize) -> f64 {
        match self {
            NeuronField::Uniform(v) => *v,
            NeuronField::PerNeuron(values) => values[neuron],
        }
    }

    /// Expand to a dense vector of length `n`
    pub fn to_array(&self, n: usize) -> Array1<f64> {
        match self {
            NeuronField::Uniform(v) => Array1::from_elem(n, *v),
            NeuronField::PerNeuron(values) => values.clone(),
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, NeuronField::Uniform(_))
    }
}

/// Neurons allowed to carry the initial bump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActiveNeurons {
    /// Every neuron on the ring
    All,
    /// Boolean mask over the ring
    Subset(Array1<bool>),
}

impl ActiveNeurons {
    #[inline]
    pub fn is_active(&self, neuron: usize) -> bool {
        match self {
            ActiveNeurons::All => true,
            ActiveNeurons::Subset(mask) => mask[neuron],
        }
    }

    pub fn count(&self, n: usize) -> usize {
        match self {
            ActiveNeurons::All => n,
            ActiveNeurons::Subset(mask) => count_true(mask),
        }
    }
}

/// Fully derived, immutable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedParameters {
    /// Primary parameters after overrides
    pub primary: PrimaryParameters,
    /// Neuron positions on the ring
    pub x: Array1<f64>,
    /// Absolute kernel width
    pub sigma: f64,
    /// Absolute kernel center shift, in `[0, N)`
    pub shift: f64,
    /// Discretized Gaussian mass used for weight normalization
    pub area: f64,
    pub w_e_norm: f64,
    pub w_i_norm: f64,
    /// Recurrent weight rescaling multiplier
    pub weight_factor: f64,
    pub exc_subset: Array1<bool>,
    pub inh_subset: Array1<bool>,
    /// Input weight scales (additive input only)
    pub w_e_in: Option<f64>,
    pub w_i_in: Option<f64>,
    /// Projection gain P
    pub gain: NeuronField,
    /// External excitatory drive I_E
    pub drive_exc: NeuronField,
    /// External inhibitory drive I_I
    pub drive_inh: NeuronField,
    pub initial_bump_center: f64,
    pub initial_bump_std: f64,
    pub active_neurons: ActiveNeurons,
    /// Initial rate vector r0
    pub initial_rates: Array1<f64>,
    /// Diagnostics emitted during derivation, in order
    pub warnings: Vec<DerivationWarning>,
}

impl DerivedParameters {
    #[inline]
    pub fn n_neurons(&self) -> usize {
        self.primary.n_neurons
    }

    #[inline]
    pub fn time_steps(&self) -> usize {
        self.primary.time_steps
    }
}

impl PrimaryParameters {
    /// Derive without overrides
    pub fn derive(&self) -> ConfigurationResult<DerivedParameters> {
        derive(self, None)
    }
}

/// Compute every derived quantity from primary parameters and overrides
///
/// # Errors
///
/// Returns `ConfigurationError` for invalid overrides or values, an unknown
/// input type or stimulus kind, or a non-positive kernel area. No partial
/// state is returned on error.
pub fn derive(
    primary: &PrimaryParameters,
    overrides: Option<&ParameterOverrides>,
) -> ConfigurationResult<DerivedParameters> {
    let mut warnings = Vec::new();

    // 1. Overrides
    let mut params = primary.clone();
    if let Some(overrides) = overrides {
        overrides.apply(&mut params, &mut warnings)?;
    }
    params.validate()?;

    let n = params.n_neurons;
    let n_f = n as f64;

    // 2. Geometry
    let x = Array1::from_iter((0..n).map(|i| i as f64));
    let sigma = params.sigma_percent * n_f;
    let shift = (params.shift_percent * n_f) % n_f;

    // 3. Kernel normalization
    let area = kernel_area(&x, sigma);
    if !(area > 0.0) {
        return Err(ConfigurationError::NonPositiveArea(area));
    }
    let w_e_norm = params.w_e / area;
    let w_i_norm = params.w_i / area;
    debug!(
        n,
        sigma, shift, area, w_e_norm, w_i_norm, "Derived ring geometry and kernel normalization"
    );

    // 4. Rescale, first pass
    let mut weight_factor = 1.0;
    if params.stimulus_kind == StimulusKind::Transient && params.p_inh != 1.0 && params.rescale {
        weight_factor = 1.0 / (1.0 - params.p_inh);
        record(
            &mut warnings,
            DerivationWarning::TransientRescale { weight_factor },
        );
    }

    // 5. Selective subsets
    let mut rng = StdRng::seed_from_u64(params.seed);
    let n_exc = subset_size(params.p_exc, n, SubsetKind::Excitatory, &mut warnings);
    let n_inh = subset_size(params.p_inh, n, SubsetKind::Inhibitory, &mut warnings);
    let exc_subset = sample_subset(&mut rng, n, n_exc);
    let inh_subset = sample_subset(&mut rng, n, n_inh);

    // 6. External drive
    let (gain, drive_exc, drive_inh, w_e_in, w_i_in) = match params.input_type {
        InputType::Additive => {
            // Both input channels use the excitatory normalized weight
            let w_e_in = w_e_norm;
            let w_i_in = w_e_norm;

            let drive_exc = match params.stimulus_kind {
                StimulusKind::Transient => NeuronField::Uniform(0.0),
                StimulusKind::Persistent => NeuronField::PerNeuron(scaled_mask(
                    &exc_subset,
                    w_e_in * params.r_exc_in * params.n_exc_in as f64,
                )),
            };
            let drive_inh = NeuronField::PerNeuron(scaled_mask(
                &inh_subset,
                w_i_in * params.r_inh_in * params.n_inh_in as f64,
            ));

            (
                NeuronField::Uniform(1.0),
                drive_exc,
                drive_inh,
                Some(w_e_in),
                Some(w_i_in),
            )
        }
        InputType::Projection => {
            let gain = if params.p_inh != 1.0 {
                NeuronField::PerNeuron(inh_subset.mapv(|inh| if inh { 0.0 } else { 1.0 }))
            } else {
                NeuronField::Uniform(1.0)
            };
            (
                gain,
                NeuronField::Uniform(0.0),
                NeuronField::Uniform(0.0),
                None,
                None,
            )
        }
    };

    // 7. Initial condition
    let initial_bump_center = sigma;
    let initial_bump_std = sigma;
    let active_neurons = match select_active_neurons(&exc_subset, &inh_subset) {
        Some(active) => active,
        None => {
            record(&mut warnings, DerivationWarning::InitialConditionUnset);
            return Err(ConfigurationError::InitialConditionUnset);
        }
    };
    let initial_rates = Array1::from_iter(x.iter().enumerate().map(|(i, &xi)| {
        let z = (xi - initial_bump_center) / initial_bump_std;
        let bump = (-0.5 * z * z).exp();
        if active_neurons.is_active(i) {
            bump
        } else {
            0.0
        }
    }));

    // 8. Rescale, second pass
    let n_active = active_neurons.count(n);
    if params.stimulus_kind == StimulusKind::Persistent && params.rescale && n_active != n {
        let percent_active = n_active as f64 / n_f;
        weight_factor = 1.0 / percent_active;
        record(
            &mut warnings,
            DerivationWarning::PersistentRescale { weight_factor },
        );
    }

    debug!(
        n_exc,
        n_inh, n_active, weight_factor, warnings = warnings.len(), "Parameter derivation complete"
    );

    Ok(DerivedParameters {
        primary: params,
        x,
        sigma,
        shift,
        area,
        w_e_norm,
        w_i_norm,
        weight_factor,
        exc_subset,
        inh_subset,
        w_e_in,
        w_i_in,
        gain,
        drive_exc,
        drive_inh,
        initial_bump_center,
        initial_bump_std,
        active_neurons,
        initial_rates,
        warnings,
    })
}

/// `2 * floor(sum_i exp(-0.5 i^2 / sigma^2))` over the ring positions
///
/// Approximates the mass of the unshifted, untruncated kernel. At least 2 for
/// any positive `sigma` (the `i = 0` term is exactly 1); NaN when `sigma == 0`.
pub fn kernel_area(x: &Array1<f64>, sigma: f64) -> f64 {
    let mass: f64 = x
        .iter()
        .map(|&xi| {
            let z = xi / sigma;
            (-0.5 * z * z).exp()
        })
        .sum();
    2.0 * mass.floor()
}

fn record(warnings: &mut Vec<DerivationWarning>, warning: DerivationWarning) {
    warn!("{}", warning);
    warnings.push(warning);
}

fn subset_size(
    fraction: f64,
    n: usize,
    population: SubsetKind,
    warnings: &mut Vec<DerivationWarning>,
) -> usize {
    let requested = fraction * n as f64;
    let rounded = (requested.round() as usize).min(n);
    if rounded as f64 != requested {
        record(
            warnings,
            DerivationWarning::SubsetRounded {
                population,
                requested,
                rounded,
            },
        );
    }
    rounded
}

/// Draw `amount` distinct neurons uniformly without replacement
fn sample_subset(rng: &mut StdRng, n: usize, amount: usize) -> Array1<bool> {
    let mut mask = Array1::from_elem(n, false);
    for idx in rand::seq::index::sample(rng, n, amount).iter() {
        mask[idx] = true;
    }
    mask
}

fn scaled_mask(mask: &Array1<bool>, scale: f64) -> Array1<f64> {
    mask.mapv(|selected| if selected { scale } else { 0.0 })
}

fn count_true(mask: &Array1<bool>) -> usize {
    mask.iter().filter(|&&m| m).count()
}

/// Case analysis on subset sizes
///
/// The four arms cover every combination of (inh all / some / none) and
/// (exc some / none); `None` is kept for the fallthrough.
fn select_active_neurons(
    exc_subset: &Array1<bool>,
    inh_subset: &Array1<bool>,
) -> Option<ActiveNeurons> {
    let n = inh_subset.len();
    let n_inh = count_true(inh_subset);
    let n_exc = count_true(exc_subset);

    if n_inh == n {
        // global inhibition
        Some(ActiveNeurons::Subset(exc_subset.clone()))
    } else if n_inh != 0 {
        // selective inhibition
        Some(ActiveNeurons::Subset(inh_subset.mapv(|inh| !inh)))
    } else if n_exc != 0 {
        // selective excitation only
        Some(ActiveNeurons::Subset(exc_subset.clone()))
    } else if n_exc == 0 {
        Some(ActiveNeurons::All)
    } else {
        None
    }
}
