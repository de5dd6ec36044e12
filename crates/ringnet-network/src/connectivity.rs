// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ring Connectivity
//!
//! Gaussian-minus-constant kernel over circular distance, and its expansion
//! into the dense circulant weight matrix.
//!
//! ```text
//! c        = shift mod N
//! d_i      = |x_i - c|
//! dx_i     = min(d_i, N - d_i)
//! kernel_i = weight_factor * (w_E * exp(-0.5 dx_i^2 / sigma^2) - w_I)
//! W[i, j]  = kernel[(i - j) mod N]      (column j = kernel rolled by j)
//! ```

use ndarray::{Array1, Array2};
use ringnet_parameters::DerivedParameters;

/// Build the base kernel (row/column generator of the circulant matrix)
pub fn build_kernel(params: &DerivedParameters) -> Array1<f64> {
    let n = params.n_neurons() as f64;
    let center = params.shift % n;

    params.x.mapv(|xi| {
        let d = (xi - center).abs();
        let dx = d.min(n - d);
        let z = dx / params.sigma;
        let weight = params.w_e_norm * (-0.5 * z * z).exp() - params.w_i_norm;
        params.weight_factor * weight
    })
}

/// Expand a kernel into the dense N x N circulant matrix
pub fn circulant(kernel: &Array1<f64>) -> Array2<f64> {
    let n = kernel.len();
    Array2::from_shape_fn((n, n), |(i, j)| kernel[(i + n - j) % n])
}
