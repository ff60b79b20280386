// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discrete Fourier analysis of sampled shapes.
//!
//! [`extract`] turns a closed sequence of points into the
//! [`FrequencyComponent`]s whose sum retraces it: each sample is read as the
//! complex number `x + iy` and a direct `O(N²)` transform produces one
//! rotating vector per bin. `N` here is a few hundred at most, so the direct
//! sum is preferred over an FFT and keeps the bin bookkeeping obvious.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use num_complex::Complex64;

use crate::path::FrequencyComponent;

/// Computes the frequency components of a closed shape given as `N` evenly
/// spaced samples of one traversal.
///
/// The result is in canonical order `0, +1, −1, +2, −2, …`: raw bin `k`
/// carries frequency `+k` and raw bin `N−k` carries `−k`, since rotating by
/// `N−k` turns per period is indistinguishable from rotating backwards by
/// `k`. For even `N` the unpaired Nyquist bin is kept as `+N/2`.
///
/// Feeding the result back through a path engine with `sample_count = N` and
/// all frequencies active reproduces the input points (up to rounding).
///
/// An empty input yields an empty component list.
#[must_use]
pub fn extract(points: &[Point]) -> Vec<FrequencyComponent> {
    let bins = transform(points);
    let n = bins.len();
    let mut components = Vec::with_capacity(n);
    if n == 0 {
        return components;
    }
    components.push(component(0, bins[0], n));
    for k in 1..=n / 2 {
        components.push(component(k as i32, bins[k], n));
        let mirror = n - k;
        if mirror != k {
            components.push(component(-(k as i32), bins[mirror], n));
        }
    }
    components
}

/// Direct DFT: `c_k = Σₙ zₙ·e^{−i·2πkn/N}`.
fn transform(points: &[Point]) -> Vec<Complex64> {
    let n = points.len();
    let mut bins = Vec::with_capacity(n);
    for k in 0..n {
        let mut sum = Complex64::new(0.0, 0.0);
        for (i, p) in points.iter().enumerate() {
            let angle = -core::f64::consts::TAU * (k as f64) * (i as f64) / (n as f64);
            sum += Complex64::new(p.x, p.y) * Complex64::new(angle.cos(), angle.sin());
        }
        bins.push(sum);
    }
    bins
}

fn component(frequency: i32, bin: Complex64, n: usize) -> FrequencyComponent {
    FrequencyComponent::new(frequency, bin.norm() / n as f64, bin.arg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathEngine;
    use alloc::vec;

    const EPS: f64 = 1e-9;

    fn sample_circle(n: usize, radius: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let t = core::f64::consts::TAU * i as f64 / n as f64;
                Point::new(radius * t.cos(), radius * t.sin())
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_no_components() {
        assert!(extract(&[]).is_empty());
    }

    #[test]
    fn circle_concentrates_in_the_first_bin() {
        let components = extract(&sample_circle(16, 3.0));
        for c in &components {
            if c.frequency == 1 {
                assert!((c.amplitude - 3.0).abs() < EPS);
                assert!(c.phase.abs() < EPS);
            } else {
                assert!(c.amplitude < EPS, "spurious energy at {}", c.frequency);
            }
        }
    }

    #[test]
    fn components_come_in_canonical_order() {
        let components = extract(&sample_circle(7, 1.0));
        let freqs: Vec<i32> = components.iter().map(|c| c.frequency).collect();
        assert_eq!(freqs, vec![0, 1, -1, 2, -2, 3, -3]);

        let even = extract(&sample_circle(8, 1.0));
        let freqs: Vec<i32> = even.iter().map(|c| c.frequency).collect();
        assert_eq!(freqs, vec![0, 1, -1, 2, -2, 3, -3, 4]);
    }

    #[test]
    fn constant_offset_lands_in_the_zero_bin() {
        let points = vec![Point::new(2.0, -1.0); 12];
        let components = extract(&points);
        assert!((components[0].amplitude - (5.0_f64).sqrt()).abs() < EPS);
        for c in &components[1..] {
            assert!(c.amplitude < EPS);
        }
    }

    #[test]
    fn extracted_components_retrace_the_input() {
        // An asymmetric shape so every bin carries something.
        let n = 24;
        let points: Vec<Point> = (0..n)
            .map(|i| {
                let t = core::f64::consts::TAU * i as f64 / n as f64;
                Point::new(
                    2.0 * t.cos() + 0.5 * (3.0 * t).cos() + 0.3,
                    1.5 * t.sin() - 0.4 * (2.0 * t).sin(),
                )
            })
            .collect();

        let mut engine = PathEngine::from_components(extract(&points));
        engine.set_sample_count(n);
        let used = engine.used_frequency_count();
        let path = engine.compute_path(used);
        for (got, want) in path.iter().zip(&points) {
            assert!((*got - *want).hypot() < 1e-7);
        }
    }
}
