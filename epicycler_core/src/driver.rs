// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-by-frame animation planning.
//!
//! [`Animator`] is the per-frame brain of a plot: each tick it advances the
//! path engine's time (when running) and steps the single active view
//! transition, reporting whether anything changed. It never talks to a
//! platform scheduler; the backend owns the callback loop and calls
//! [`Animator::tick`] from it, so all of the convergence logic stays
//! platform-independent and testable.
//!
//! Transitions converge in bounded time: zoom steps are geometric with an
//! exact final step, translation steps are proportional with a one-pixel
//! floor, and each axis latches done independently. Starting a new transition
//! replaces the active one, so two animations can never fight over the view.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::coords::CoordinateSystem;
use crate::path::PathEngine;

/// Fraction of the remaining distance a transition covers per frame.
const TRANSITION_RATE: f64 = 0.05;

/// Convergence threshold for zoom ratios.
const ZOOM_EPSILON: f64 = 1e-4;

/// Convergence threshold for translation, in screen pixels.
const PAN_EPSILON: f64 = 0.5;

/// Where a [`ZoomTransition`] keeps its fixed point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomAnchor {
    /// The center of the screen, wherever the view is.
    ScreenCenter,
    /// A fixed cartesian point, re-projected each step so it stays pinned
    /// even while a concurrent translation moves the view.
    Cartesian(Point),
}

impl ZoomAnchor {
    fn resolve(self, cs: &CoordinateSystem) -> Point {
        match self {
            Self::ScreenCenter => cs.screen_center(),
            Self::Cartesian(p) => cs.to_screen(p),
        }
    }
}

/// Animated zoom toward an absolute zoom level.
///
/// Each step multiplies the zoom by at most `1 ± rate` of the remaining
/// ratio; the last step applies the exact remainder so the transition lands
/// on the target instead of oscillating around it.
#[derive(Clone, Copy, Debug)]
pub struct ZoomTransition {
    target_pixels_per_unit: f64,
    anchor: ZoomAnchor,
    rate: f64,
    done: bool,
}

impl ZoomTransition {
    /// Creates a transition toward `target_pixels_per_unit` with the default
    /// rate.
    #[must_use]
    pub fn new(target_pixels_per_unit: f64, anchor: ZoomAnchor) -> Self {
        Self {
            target_pixels_per_unit,
            anchor,
            rate: TRANSITION_RATE,
            done: false,
        }
    }

    /// Advances one frame; returns `true` once the target level is reached.
    pub fn step(&mut self, cs: &mut CoordinateSystem) -> bool {
        if self.done {
            return true;
        }
        let before = cs.pixels_per_unit();
        let remaining = self.target_pixels_per_unit / before;
        let factor = if remaining >= 1.0 {
            remaining.min(1.0 + self.rate)
        } else {
            remaining.max(1.0 / (1.0 + self.rate))
        };
        cs.zoom(factor, self.anchor.resolve(cs));

        // Done on arrival; also done if clamping stopped the level from
        // moving, so an unreachable target can't run forever.
        let now = cs.pixels_per_unit();
        self.done = (self.target_pixels_per_unit / now - 1.0).abs() < ZOOM_EPSILON
            || (now - before).abs() <= f64::EPSILON * before;
        self.done
    }
}

/// Animated translation bringing a cartesian point to the screen center.
///
/// Each axis converges independently: the step is a fixed fraction of the
/// remaining distance with a one-pixel floor, capped at the remainder, so
/// long pans start fast and short ones still finish.
#[derive(Clone, Copy, Debug)]
pub struct RecenterTransition {
    target: Point,
    rate: f64,
    done_x: bool,
    done_y: bool,
}

impl RecenterTransition {
    /// Creates a transition centering the cartesian point `target`.
    #[must_use]
    pub fn new(target: Point) -> Self {
        Self {
            target,
            rate: TRANSITION_RATE,
            done_x: false,
            done_y: false,
        }
    }

    /// Advances one frame; returns `true` once both axes have converged.
    pub fn step(&mut self, cs: &mut CoordinateSystem) -> bool {
        // Remaining screen-pixel offset from the target to the center,
        // recomputed every step so concurrent zooming can't stale it.
        let remaining = cs.screen_center() - cs.to_screen(self.target);
        self.done_x = self.done_x || remaining.x.abs() < PAN_EPSILON;
        self.done_y = self.done_y || remaining.y.abs() < PAN_EPSILON;

        let delta = Vec2::new(
            if self.done_x { 0.0 } else { axis_step(remaining.x, self.rate) },
            if self.done_y { 0.0 } else { axis_step(remaining.y, self.rate) },
        );
        if delta != Vec2::ZERO {
            cs.pan(delta);
        }
        self.done_x && self.done_y
    }
}

/// One proportional step toward zero remainder, at least one pixel, never
/// past the target.
fn axis_step(remaining: f64, rate: f64) -> f64 {
    let magnitude = (rate * remaining.abs() + 1.0).min(remaining.abs());
    magnitude.copysign(remaining)
}

/// Combined zoom-and-recenter animation back to the initial view.
#[derive(Clone, Copy, Debug)]
pub struct ResetTransition {
    zoom: ZoomTransition,
    recenter: RecenterTransition,
}

impl ResetTransition {
    /// Creates a transition restoring the view the coordinate system was
    /// constructed with.
    #[must_use]
    pub fn new(cs: &CoordinateSystem) -> Self {
        Self {
            zoom: ZoomTransition::new(
                cs.initial_pixels_per_unit(),
                ZoomAnchor::Cartesian(cs.initial_center()),
            ),
            recenter: RecenterTransition::new(cs.initial_center()),
        }
    }

    /// Advances both parts one frame; done when both are.
    pub fn step(&mut self, cs: &mut CoordinateSystem) -> bool {
        let zoom_done = self.zoom.step(cs);
        let recenter_done = self.recenter.step(cs);
        zoom_done && recenter_done
    }
}

/// Any view animation the [`Animator`] can run.
#[derive(Clone, Copy, Debug)]
pub enum Transition {
    /// Animated zoom to a level.
    Zoom(ZoomTransition),
    /// Animated recentering on a point.
    Recenter(RecenterTransition),
    /// Animated restore of the initial view.
    Reset(ResetTransition),
}

impl Transition {
    fn step(&mut self, cs: &mut CoordinateSystem) -> bool {
        match self {
            Self::Zoom(t) => t.step(cs),
            Self::Recenter(t) => t.step(cs),
            Self::Reset(t) => t.step(cs),
        }
    }
}

/// What a tick did, so the backend can decide whether to redraw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The view or the animation time changed this frame.
    pub needs_redraw: bool,
    /// A transition is still running and wants further frames.
    pub transition_active: bool,
}

/// Per-frame driver holding the single active view transition.
#[derive(Debug, Default)]
pub struct Animator {
    transition: Option<Transition>,
}

impl Animator {
    /// Creates an idle animator.
    #[must_use]
    pub fn new() -> Self {
        Self { transition: None }
    }

    /// Starts a transition, replacing any active one.
    pub fn begin(&mut self, transition: Transition) {
        self.transition = Some(transition);
    }

    /// Drops the active transition, freezing the view where it is.
    pub fn cancel(&mut self) {
        self.transition = None;
    }

    /// Whether a transition is currently running.
    #[must_use]
    pub fn transition_active(&self) -> bool {
        self.transition.is_some()
    }

    /// Advances one frame: steps the animation time (when the engine is
    /// running) and the active transition.
    pub fn tick(&mut self, cs: &mut CoordinateSystem, engine: &mut PathEngine) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if engine.running() {
            engine.advance_time(engine.dt());
            outcome.needs_redraw = true;
        }

        if let Some(transition) = &mut self.transition {
            if transition.step(cs) {
                self.transition = None;
            }
            outcome.needs_redraw = true;
        }
        outcome.transition_active = self.transition.is_some();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> CoordinateSystem {
        CoordinateSystem::new(800.0, 600.0, Point::ORIGIN, 100.0)
    }

    #[test]
    fn zoom_transition_lands_exactly_on_target() {
        let mut cs = standard();
        let mut t = ZoomTransition::new(250.0, ZoomAnchor::ScreenCenter);
        let mut frames = 0;
        while !t.step(&mut cs) {
            frames += 1;
            assert!(frames < 10_000, "zoom transition failed to converge");
        }
        assert!((cs.pixels_per_unit() - 250.0).abs() / 250.0 < 1e-3);
        // Anchored at the center, so the center point must not move.
        let center = cs.to_cartesian(cs.screen_center());
        assert!((center - Point::ORIGIN).hypot() < 1e-6);
    }

    #[test]
    fn zoom_transition_converges_when_zooming_out() {
        let mut cs = standard();
        let mut t = ZoomTransition::new(10.0, ZoomAnchor::ScreenCenter);
        let mut frames = 0;
        while !t.step(&mut cs) {
            frames += 1;
            assert!(frames < 10_000, "zoom-out transition failed to converge");
        }
        assert!((cs.pixels_per_unit() - 10.0).abs() / 10.0 < 1e-3);
    }

    #[test]
    fn recenter_transition_centers_the_target() {
        let mut cs = standard();
        let target = Point::new(3.0, -2.0);
        let mut t = RecenterTransition::new(target);
        let mut frames = 0;
        while !t.step(&mut cs) {
            frames += 1;
            assert!(frames < 10_000, "recenter transition failed to converge");
        }
        let center = cs.to_cartesian(cs.screen_center());
        assert!((center - target).hypot() * cs.pixels_per_unit() < 1.0);
    }

    #[test]
    fn reset_restores_the_initial_view() {
        let mut cs = CoordinateSystem::new(800.0, 600.0, Point::new(1.0, 2.0), 80.0);
        cs.zoom(5.0, Point::new(120.0, 40.0));
        cs.pan(Vec2::new(-300.0, 140.0));

        let mut t = ResetTransition::new(&cs);
        let mut frames = 0;
        while !t.step(&mut cs) {
            frames += 1;
            assert!(frames < 10_000, "reset transition failed to converge");
        }
        assert!((cs.pixels_per_unit() - 80.0).abs() / 80.0 < 1e-3);
        let center = cs.to_cartesian(cs.screen_center());
        assert!((center - Point::new(1.0, 2.0)).hypot() * cs.pixels_per_unit() < 2.0);
    }

    #[test]
    fn beginning_a_transition_replaces_the_active_one() {
        let mut animator = Animator::new();
        animator.begin(Transition::Zoom(ZoomTransition::new(
            200.0,
            ZoomAnchor::ScreenCenter,
        )));
        animator.begin(Transition::Recenter(RecenterTransition::new(Point::ORIGIN)));
        assert!(animator.transition_active());

        // The zoom was replaced, so ticking to completion must leave the
        // zoom level untouched.
        let mut cs = standard();
        let mut engine = PathEngine::new();
        engine.set_running(false);
        for _ in 0..10 {
            animator.tick(&mut cs, &mut engine);
        }
        assert!((cs.pixels_per_unit() - 100.0).abs() < 1e-9);
        assert!(!animator.transition_active());
    }

    #[test]
    fn tick_advances_time_only_while_running() {
        let mut cs = standard();
        let mut engine = PathEngine::from_components(alloc::vec![
            crate::path::FrequencyComponent::new(1, 1.0, 0.0),
        ]);
        let outcome = Animator::new().tick(&mut cs, &mut engine);
        assert!(outcome.needs_redraw);
        assert!((engine.time() - engine.dt()).abs() < 1e-12);

        engine.set_running(false);
        let before = engine.time();
        let outcome = Animator::new().tick(&mut cs, &mut engine);
        assert!(!outcome.needs_redraw);
        assert_eq!(engine.time(), before);
    }

    #[test]
    fn idle_tick_reports_nothing_to_do() {
        // Paused engine, no transition: callers can stop scheduling frames.
        let mut cs = standard();
        let mut engine = PathEngine::new();
        engine.set_running(false);
        let outcome = Animator::new().tick(&mut cs, &mut engine);
        assert_eq!(outcome, TickOutcome::default());
    }

    #[test]
    fn cancel_freezes_the_view() {
        let mut animator = Animator::new();
        animator.begin(Transition::Zoom(ZoomTransition::new(
            500.0,
            ZoomAnchor::ScreenCenter,
        )));
        animator.cancel();
        assert!(!animator.transition_active());
    }
}
