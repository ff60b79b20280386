// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigonometric-polynomial path computation.
//!
//! [`PathEngine`] owns a list of [`FrequencyComponent`]s and evaluates the sum
//!
//! ```text
//! x(t) = Σ aₙ·cos(fₙ·t + φₙ)        y(t) = Σ aₙ·sin(fₙ·t + φₙ)
//! ```
//!
//! over one period `t ∈ [0, 2π)`, producing a cached closed path sample and,
//! for any explicit time, the chain of partial sums (the tip of each rotating
//! vector). Truncation is symmetric around the constant term: a component is
//! active iff `|frequency| ≤ used_frequency_count`.
//!
//! Time is advanced by modular wrapping of an explicit value, never by a
//! per-frame accumulator, so long sessions cannot drift.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// One full period.
const TAU: f64 = core::f64::consts::TAU;

/// Number of path samples per period when none is specified.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// One rotating term `amplitude·e^{i(frequency·t + phase)}`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyComponent {
    /// Signed rotation frequency in turns per period; positive is
    /// counter-clockwise in cartesian terms.
    pub frequency: i32,
    /// Vector length; never negative.
    pub amplitude: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl FrequencyComponent {
    /// Creates a component; a negative `amplitude` is clamped to zero.
    #[must_use]
    pub fn new(frequency: i32, amplitude: f64, phase: f64) -> Self {
        Self {
            frequency,
            amplitude: amplitude.max(0.0),
            phase,
        }
    }

    /// The vector this term contributes at time `t`.
    #[must_use]
    pub fn eval(&self, t: f64) -> Vec2 {
        let angle = f64::from(self.frequency) * t + self.phase;
        Vec2::new(self.amplitude * angle.cos(), self.amplitude * angle.sin())
    }
}

/// Maps slider progress `p ∈ [0, 1]` to a frequency count in `[1, n]`.
///
/// The cubic ease gives low counts (coarse shapes) more of the slider's
/// travel than high counts.
#[must_use]
pub fn used_from_progress(progress: f64, n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let p = progress.clamp(0.0, 1.0);
    let used = (p * p * p * (n as f64 - 1.0)).round() as usize + 1;
    used.clamp(1, n)
}

/// Inverse of [`used_from_progress`], for initializing a slider from a
/// target frequency count.
#[must_use]
pub fn progress_for_used(used: usize, n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let used = used.clamp(1, n);
    (((used - 1) as f64) / ((n - 1) as f64)).powf(1.0 / 3.0)
}

/// Owns the component list and animation state, and derives the path.
///
/// The sampled path is cached and recomputed only when the components or the
/// truncation level change; it is never mutated in place.
#[derive(Clone, Debug, Default)]
pub struct PathEngine {
    components: Vec<FrequencyComponent>,
    sample_count: usize,
    /// Current animation time, always in `[0, 2π)`.
    time: f64,
    /// Whether the per-frame loop should advance time.
    running: bool,
    /// Truncation level, clamped to `[1, component count]`.
    used: usize,
    cached_path: Option<Vec<Point>>,
}

impl PathEngine {
    /// Creates an engine with no components and the default sample count.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            sample_count: DEFAULT_SAMPLE_COUNT,
            time: 0.0,
            running: true,
            used: 1,
            cached_path: None,
        }
    }

    /// Creates an engine from a component list, fully untruncated.
    #[must_use]
    pub fn from_components(components: Vec<FrequencyComponent>) -> Self {
        let mut engine = Self::new();
        engine.set_components(components);
        engine.used = engine.component_count().max(1);
        engine
    }

    /// Sets the number of path samples per period (also used by
    /// [`dt`](Self::dt)). Zero is treated as one.
    pub fn set_sample_count(&mut self, sample_count: usize) {
        self.sample_count = sample_count.max(1);
        self.cached_path = None;
    }

    /// Replaces the component list and invalidates the cached path.
    ///
    /// The truncation level is re-clamped to the new list.
    pub fn set_components(&mut self, components: Vec<FrequencyComponent>) {
        self.components = components;
        self.used = self.used.clamp(1, self.component_count().max(1));
        self.cached_path = None;
    }

    /// The current component list.
    #[must_use]
    pub fn components(&self) -> &[FrequencyComponent] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Updates one component's amplitude (clamped at zero) and invalidates
    /// the cached path. Out-of-range indices and non-finite values are
    /// ignored, leaving the previous amplitude in place.
    pub fn set_amplitude(&mut self, index: usize, amplitude: f64) {
        if !amplitude.is_finite() {
            return;
        }
        if let Some(c) = self.components.get_mut(index) {
            c.amplitude = amplitude.max(0.0);
            self.cached_path = None;
        }
    }

    /// Current truncation level.
    #[must_use]
    pub fn used_frequency_count(&self) -> usize {
        self.used
    }

    /// Sets the truncation level, clamped to `[1, component count]`.
    pub fn set_used_frequency_count(&mut self, used: usize) {
        let clamped = used.clamp(1, self.component_count().max(1));
        if clamped != self.used {
            self.used = clamped;
            self.cached_path = None;
        }
    }

    /// Sets the truncation level from slider progress in `[0, 1]`.
    /// Non-finite values are ignored, leaving the level unchanged.
    pub fn set_used_progress(&mut self, progress: f64) {
        if !progress.is_finite() {
            return;
        }
        let n = self.component_count().max(1);
        self.set_used_frequency_count(used_from_progress(progress, n));
    }

    /// Slider progress corresponding to the current truncation level.
    #[must_use]
    pub fn used_progress(&self) -> f64 {
        progress_for_used(self.used, self.component_count().max(1))
    }

    /// Whether the animation is running.
    #[must_use]
    pub fn running(&self) -> bool {
        self.running
    }

    /// Starts or pauses the animation.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Current animation time in `[0, 2π)`.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Sets the animation time, wrapped into `[0, 2π)`.
    pub fn set_time(&mut self, time: f64) {
        self.time = wrap_time(time);
    }

    /// The sampling (and animation) step `2π / sample_count`.
    #[must_use]
    pub fn dt(&self) -> f64 {
        TAU / self.sample_count as f64
    }

    /// Advances time by `dt` (which may be negative), wrapping into
    /// `[0, 2π)`, and returns the new time.
    pub fn advance_time(&mut self, dt: f64) -> f64 {
        self.time = wrap_time(self.time + dt);
        self.time
    }

    /// Components active at the given truncation level.
    pub fn active_components(
        &self,
        used: usize,
    ) -> impl Iterator<Item = &FrequencyComponent> + '_ {
        self.components
            .iter()
            .filter(move |c| c.frequency.unsigned_abs() as usize <= used)
    }

    /// The point traced at `time` with `used` active frequencies.
    #[must_use]
    pub fn point_at(&self, time: f64, used: usize) -> Point {
        let mut p = Point::ORIGIN;
        for c in self.active_components(used) {
            p += c.eval(time);
        }
        p
    }

    /// The chain of partial sums at `time`: the first element is the origin,
    /// each following element is the tip of one more rotating vector, and the
    /// last element is the traced point.
    ///
    /// With no active components this is a single point at the origin.
    #[must_use]
    pub fn position_at(&self, time: f64, used: usize) -> Vec<Point> {
        let mut tips = Vec::with_capacity(self.components.len() + 1);
        let mut p = Point::ORIGIN;
        tips.push(p);
        for c in self.active_components(used) {
            p += c.eval(time);
            tips.push(p);
        }
        tips
    }

    /// Samples the truncated sum over one period. Pure; does not touch the
    /// cache.
    #[must_use]
    pub fn compute_path(&self, used: usize) -> Vec<Point> {
        let dt = self.dt();
        (0..self.sample_count)
            .map(|n| self.point_at(n as f64 * dt, used))
            .collect()
    }

    /// The path at the current truncation level, computed lazily and cached.
    pub fn path(&mut self) -> &[Point] {
        if self.cached_path.is_none() {
            self.cached_path = Some(self.compute_path(self.used));
        }
        self.cached_path.as_deref().unwrap_or(&[])
    }
}

/// Wraps a time value into `[0, 2π)`.
fn wrap_time(t: f64) -> f64 {
    let mut t = t % TAU;
    if t < 0.0 {
        t += TAU;
    }
    t
}
