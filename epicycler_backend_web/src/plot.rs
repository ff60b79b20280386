// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The plot object exported to JavaScript.
//!
//! [`EpicyclePlot`] wires the core pieces together for the browser: four
//! stacked canvases (grid, epicycles, path, marker) inside a caller-supplied
//! container, a [`RafLoop`] driving the animator, and a pointer/wheel API the
//! page forwards its DOM events into. Layers repaint independently — the grid
//! only when the view changes, the animated layers every frame while anything
//! moves.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use epicycler_core::coords::CoordinateSystem;
use epicycler_core::driver::{
    Animator, RecenterTransition, ResetTransition, Transition, ZoomAnchor, ZoomTransition,
};
use epicycler_core::input::{Gesture, GestureTracker};
use epicycler_core::path::{FrequencyComponent, PathEngine};
use epicycler_core::render::{self, Theme};
use epicycler_core::spectrum;
use epicycler_core::surface::Surface as _;
use kurbo::Point;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

use crate::canvas::CanvasSurface;
use crate::raf::RafLoop;

/// Zoom factor per wheel notch.
const WHEEL_ZOOM_FACTOR: f64 = 1.05;

struct Inner {
    cs: CoordinateSystem,
    engine: PathEngine,
    animator: Animator,
    tracker: GestureTracker,
    theme: Theme,

    grid_layer: CanvasSurface,
    epicycle_layer: CanvasSurface,
    path_layer: CanvasSurface,
    marker_layer: CanvasSurface,

    /// The view (pan/zoom/size) changed; the grid layer must repaint.
    view_dirty: bool,
    /// The components or truncation changed; everything above the grid must
    /// repaint even while paused.
    scene_dirty: bool,
}

impl Inner {
    /// Advances one frame. Returns whether anything will still be moving
    /// next frame, so the caller can park the loop when idle.
    fn tick(&mut self) -> bool {
        let transition_was_active = self.animator.transition_active();
        let outcome = self.animator.tick(&mut self.cs, &mut self.engine);
        if transition_was_active {
            self.view_dirty = true;
        }
        if outcome.needs_redraw || self.view_dirty || self.scene_dirty {
            self.redraw();
        }
        self.engine.running() || outcome.transition_active
    }

    fn redraw(&mut self) {
        if self.view_dirty {
            render::draw_grid_layer(&mut self.grid_layer, &self.cs, &self.theme);
            self.view_dirty = false;
        }
        render::draw_epicycles(&mut self.epicycle_layer, &self.cs, &self.engine, &self.theme);

        let time = self.engine.time();
        let Self {
            cs,
            engine,
            theme,
            path_layer,
            marker_layer,
            ..
        } = self;
        let path = engine.path();
        render::draw_path(path_layer, cs, path, time, theme);
        render::draw_marker(marker_layer, cs, path, time, theme);
        self.scene_dirty = false;
    }

    fn apply_gesture(&mut self, gesture: Gesture) {
        // Direct manipulation overrides any running transition.
        self.animator.cancel();
        match gesture {
            Gesture::Pan(delta) => self.cs.pan(delta),
            Gesture::Pinch { factor, anchor } => self.cs.zoom(factor, anchor),
        }
        self.view_dirty = true;
    }
}

/// An interactive epicycle plot bound to a DOM container.
#[wasm_bindgen]
pub struct EpicyclePlot {
    inner: Rc<RefCell<Inner>>,
    raf: RafLoop,
}

impl core::fmt::Debug for EpicyclePlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EpicyclePlot").finish_non_exhaustive()
    }
}

impl EpicyclePlot {
    /// Resumes the frame loop after it parked itself idle. Every mutating
    /// entry point calls this; the next tick repaints and decides whether to
    /// keep going.
    fn wake(&self) {
        self.raf.start();
    }
}

#[wasm_bindgen]
impl EpicyclePlot {
    /// Builds a plot inside `container`, creating the four canvas layers,
    /// and starts the frame loop.
    ///
    /// `width` and `height` are CSS pixels; `pixels_per_unit` is the initial
    /// zoom level, centered on the cartesian origin.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: &HtmlElement,
        width: f64,
        height: f64,
        pixels_per_unit: f64,
    ) -> Result<EpicyclePlot, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let style = container.style();
        style.set_property("position", "relative")?;
        style.set_property("width", &alloc::format!("{width}px"))?;
        style.set_property("height", &alloc::format!("{height}px"))?;

        let dpr = device_pixel_ratio();
        let mut make_layer = |z: u32| -> Result<CanvasSurface, JsValue> {
            let canvas = create_layer_canvas(&document, container, z)?;
            let mut surface = CanvasSurface::new(canvas)?;
            surface.resize(width, height, dpr);
            Ok(surface)
        };

        let inner = Rc::new(RefCell::new(Inner {
            cs: CoordinateSystem::new(width, height, Point::ORIGIN, pixels_per_unit),
            engine: PathEngine::new(),
            animator: Animator::new(),
            tracker: GestureTracker::new(),
            theme: Theme::default(),
            grid_layer: make_layer(0)?,
            epicycle_layer: make_layer(1)?,
            path_layer: make_layer(2)?,
            marker_layer: make_layer(3)?,
            view_dirty: true,
            scene_dirty: true,
        }));

        let inner_cb = Rc::clone(&inner);
        let raf = RafLoop::new(move |_stamp| inner_cb.borrow_mut().tick());
        raf.start();

        Ok(Self { inner, raf })
    }

    /// Resizes the plot, keeping the cartesian point at the screen center.
    pub fn resize(&self, width: f64, height: f64) {
        let mut inner = self.inner.borrow_mut();
        let dpr = device_pixel_ratio();
        inner.grid_layer.resize(width, height, dpr);
        inner.epicycle_layer.resize(width, height, dpr);
        inner.path_layer.resize(width, height, dpr);
        inner.marker_layer.resize(width, height, dpr);
        inner.cs.resize(width, height, None);
        inner.view_dirty = true;
        inner.scene_dirty = true;
        self.wake();
    }

    /// Replaces the frequency components from three parallel arrays.
    ///
    /// All components start active.
    pub fn set_components(
        &self,
        frequencies: Vec<i32>,
        amplitudes: Vec<f64>,
        phases: Vec<f64>,
    ) -> Result<(), JsValue> {
        if frequencies.len() != amplitudes.len() || frequencies.len() != phases.len() {
            return Err(JsValue::from_str("component arrays differ in length"));
        }
        let components: Vec<FrequencyComponent> = frequencies
            .iter()
            .zip(&amplitudes)
            .zip(&phases)
            .map(|((&f, &a), &p)| FrequencyComponent::new(f, a, p))
            .collect();
        let count = components.len();

        let mut inner = self.inner.borrow_mut();
        inner.engine.set_components(components);
        inner.engine.set_used_frequency_count(count);
        inner.scene_dirty = true;
        self.wake();
        Ok(())
    }

    /// Derives components from a sampled shape (two parallel coordinate
    /// arrays) via Fourier analysis, so the plot retraces the shape.
    pub fn set_shape(&self, xs: Vec<f64>, ys: Vec<f64>) -> Result<(), JsValue> {
        if xs.len() != ys.len() {
            return Err(JsValue::from_str("coordinate arrays differ in length"));
        }
        let points: Vec<Point> = xs
            .iter()
            .zip(&ys)
            .map(|(&x, &y)| Point::new(x, y))
            .collect();
        let components = spectrum::extract(&points);
        let count = components.len();

        let mut inner = self.inner.borrow_mut();
        // Sampling at the input resolution makes the traced path pass
        // through the input points exactly.
        inner.engine.set_sample_count(points.len().max(1));
        inner.engine.set_components(components);
        inner.engine.set_used_frequency_count(count);
        inner.scene_dirty = true;
        self.wake();
        Ok(())
    }

    /// Number of frequency components.
    #[wasm_bindgen(getter)]
    pub fn component_count(&self) -> usize {
        self.inner.borrow().engine.component_count()
    }

    /// Updates one component's amplitude; out-of-range indices are ignored.
    pub fn set_amplitude(&self, index: usize, amplitude: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.engine.set_amplitude(index, amplitude);
        inner.scene_dirty = true;
        self.wake();
    }

    /// Sets the truncation level from slider progress in `[0, 1]`.
    pub fn set_used_progress(&self, progress: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.engine.set_used_progress(progress);
        inner.scene_dirty = true;
        self.wake();
    }

    /// Slider progress for the current truncation level.
    #[wasm_bindgen(getter)]
    pub fn used_progress(&self) -> f64 {
        self.inner.borrow().engine.used_progress()
    }

    /// Current truncation level.
    #[wasm_bindgen(getter)]
    pub fn used_frequency_count(&self) -> usize {
        self.inner.borrow().engine.used_frequency_count()
    }

    /// Whether the animation is advancing.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.borrow().engine.running()
    }

    /// Starts or pauses the animation. Pausing lets the frame loop park
    /// itself once nothing else is moving.
    pub fn set_running(&self, running: bool) {
        self.inner.borrow_mut().engine.set_running(running);
        self.wake();
    }

    /// Advances the animation by `direction` sampling steps while paused;
    /// negative values step backwards (time wraps at the period edges).
    pub fn step(&self, direction: i32) {
        let mut inner = self.inner.borrow_mut();
        let dt = inner.engine.dt() * f64::from(direction);
        inner.engine.advance_time(dt);
        inner.scene_dirty = true;
        self.wake();
    }

    /// Repaints every layer immediately instead of waiting for the next
    /// animation frame.
    pub fn draw(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.view_dirty = true;
        inner.scene_dirty = true;
        inner.redraw();
    }

    /// Erases all layers. Idempotent; while the animation runs, the next
    /// frame repaints them.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.grid_layer.clear();
        inner.epicycle_layer.clear();
        inner.path_layer.clear();
        inner.marker_layer.clear();
    }

    /// Pans the view by a screen-pixel delta, cancelling any running
    /// transition.
    pub fn pan(&self, dx: f64, dy: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.apply_gesture(Gesture::Pan(kurbo::Vec2::new(dx, dy)));
        self.wake();
    }

    /// Zooms by `factor` about the screen point `(x, y)`, cancelling any
    /// running transition.
    pub fn zoom_at(&self, factor: f64, x: f64, y: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.apply_gesture(Gesture::Pinch {
            factor,
            anchor: Point::new(x, y),
        });
        self.wake();
    }

    /// Current animation time in `[0, 2π)`.
    #[wasm_bindgen(getter)]
    pub fn time(&self) -> f64 {
        self.inner.borrow().engine.time()
    }

    /// Current zoom level in pixels per cartesian unit.
    #[wasm_bindgen(getter)]
    pub fn pixels_per_unit(&self) -> f64 {
        self.inner.borrow().cs.pixels_per_unit()
    }

    /// Forwards a `pointerdown` event (surface coordinates).
    pub fn pointer_down(&self, id: u32, x: f64, y: f64) {
        self.inner
            .borrow_mut()
            .tracker
            .pointer_down(u64::from(id), Point::new(x, y));
    }

    /// Forwards a `pointermove` event; recognized gestures pan or zoom the
    /// view immediately.
    pub fn pointer_move(&self, id: u32, x: f64, y: f64) {
        let mut inner = self.inner.borrow_mut();
        if let Some(gesture) = inner.tracker.pointer_move(u64::from(id), Point::new(x, y)) {
            inner.apply_gesture(gesture);
            self.wake();
        }
    }

    /// Forwards a `pointerup` (or `pointercancel`/`pointerleave`) event.
    pub fn pointer_up(&self, id: u32) {
        self.inner.borrow_mut().tracker.pointer_up(u64::from(id));
    }

    /// Forwards a wheel event, zooming about the cursor.
    pub fn wheel(&self, delta_y: f64, x: f64, y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 {
            WHEEL_ZOOM_FACTOR
        } else {
            1.0 / WHEEL_ZOOM_FACTOR
        };
        let mut inner = self.inner.borrow_mut();
        inner.animator.cancel();
        inner.cs.zoom(factor, Point::new(x, y));
        inner.view_dirty = true;
        self.wake();
    }

    /// Starts an animated zoom to an absolute level, anchored at the screen
    /// center.
    pub fn zoom_to(&self, pixels_per_unit: f64) {
        self.inner
            .borrow_mut()
            .animator
            .begin(Transition::Zoom(ZoomTransition::new(
                pixels_per_unit,
                ZoomAnchor::ScreenCenter,
            )));
        self.wake();
    }

    /// Starts an animated pan bringing a cartesian point to the center.
    pub fn recenter(&self, x: f64, y: f64) {
        self.inner
            .borrow_mut()
            .animator
            .begin(Transition::Recenter(RecenterTransition::new(Point::new(
                x, y,
            ))));
        self.wake();
    }

    /// Starts an animated restore of the initial view.
    pub fn reset_view(&self) {
        let mut inner = self.inner.borrow_mut();
        let transition = ResetTransition::new(&inner.cs);
        inner.animator.begin(Transition::Reset(transition));
        self.wake();
    }

    /// Parks the frame loop immediately. Any mutating call (or
    /// [`start`](Self::start)) resumes it.
    pub fn stop(&self) {
        self.raf.stop();
    }

    /// Resumes the frame loop after [`stop`](Self::stop). The loop also
    /// parks itself while the plot is paused and nothing is animating.
    pub fn start(&self) {
        self.raf.start();
    }
}

fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Creates one absolutely positioned canvas layer inside `container`.
fn create_layer_canvas(
    document: &Document,
    container: &HtmlElement,
    z_index: u32,
) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
    let style = canvas.style();
    style.set_property("position", "absolute")?;
    style.set_property("left", "0")?;
    style.set_property("top", "0")?;
    style.set_property("z-index", &alloc::format!("{z_index}"))?;
    container.append_child(&canvas)?;
    Ok(canvas)
}
