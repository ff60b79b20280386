// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web example: interactive Fourier epicycle plot.
//!
//! Builds an [`EpicyclePlot`] retracing a square outline derived by Fourier
//! analysis, and wires DOM controls to it: drag to pan, pinch or scroll to
//! zoom, a slider for the number of active frequencies, and buttons for
//! play/pause, single-step, and view reset.
//!
//! Build with: `wasm-pack build --target web demos/web_epicycles`
//!
//! [`EpicyclePlot`]: epicycler_backend_web::EpicyclePlot

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use epicycler_backend_web::EpicyclePlot;

const PLOT_W: f64 = 800.0;
const PLOT_H: f64 = 600.0;
const INITIAL_PIXELS_PER_UNIT: f64 = 80.0;

/// Samples along the square outline (kept modest: analysis is `O(N²)`).
const SQUARE_SAMPLES: usize = 120;

/// Half the square's side length, in cartesian units.
const SQUARE_HALF_SIDE: f64 = 2.0;

/// Entry point — called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().expect("no window");
    let document = window.document().expect("no document");
    let body = document.body().expect("no body");

    let container: HtmlElement = document.create_element("div")?.unchecked_into();
    container.style().set_property("touch-action", "none")?;
    body.append_child(&container)?;

    let plot = Rc::new(EpicyclePlot::new(
        &container,
        PLOT_W,
        PLOT_H,
        INITIAL_PIXELS_PER_UNIT,
    )?);

    let (xs, ys) = square_outline();
    plot.set_shape(xs, ys)?;

    wire_pointer_events(&container, &plot)?;
    wire_controls(&document, &body, &plot)?;

    Ok(())
}

/// Points along a square outline, starting mid-right and going
/// counter-clockwise.
fn square_outline() -> (Vec<f64>, Vec<f64>) {
    let h = SQUARE_HALF_SIDE;
    let mut xs = Vec::with_capacity(SQUARE_SAMPLES);
    let mut ys = Vec::with_capacity(SQUARE_SAMPLES);
    for i in 0..SQUARE_SAMPLES {
        // Perimeter parameter in [0, 8h).
        let p = 8.0 * h * i as f64 / SQUARE_SAMPLES as f64;
        let (x, y) = if p < 2.0 * h {
            (h, p - h)
        } else if p < 4.0 * h {
            (h - (p - 2.0 * h), h)
        } else if p < 6.0 * h {
            (-h, h - (p - 4.0 * h))
        } else {
            (-h + (p - 6.0 * h), -h)
        };
        xs.push(x);
        ys.push(y);
    }
    (xs, ys)
}

fn wire_pointer_events(container: &HtmlElement, plot: &Rc<EpicyclePlot>) -> Result<(), JsValue> {
    let target: &web_sys::EventTarget = container;

    let p = Rc::clone(plot);
    let down = Closure::wrap(Box::new(move |e: web_sys::PointerEvent| {
        e.prevent_default();
        p.pointer_down(e.pointer_id() as u32, f64::from(e.offset_x()), f64::from(e.offset_y()));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("pointerdown", down.as_ref().unchecked_ref())?;
    down.forget();

    let p = Rc::clone(plot);
    let mv = Closure::wrap(Box::new(move |e: web_sys::PointerEvent| {
        p.pointer_move(e.pointer_id() as u32, f64::from(e.offset_x()), f64::from(e.offset_y()));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("pointermove", mv.as_ref().unchecked_ref())?;
    mv.forget();

    for kind in ["pointerup", "pointercancel", "pointerleave"] {
        let p = Rc::clone(plot);
        let up = Closure::wrap(Box::new(move |e: web_sys::PointerEvent| {
            p.pointer_up(e.pointer_id() as u32);
        }) as Box<dyn FnMut(_)>);
        target.add_event_listener_with_callback(kind, up.as_ref().unchecked_ref())?;
        up.forget();
    }

    let p = Rc::clone(plot);
    let wheel = Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
        e.prevent_default();
        p.wheel(e.delta_y(), f64::from(e.offset_x()), f64::from(e.offset_y()));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
    wheel.forget();

    Ok(())
}

fn wire_controls(
    document: &Document,
    body: &HtmlElement,
    plot: &Rc<EpicyclePlot>,
) -> Result<(), JsValue> {
    let controls: HtmlElement = document.create_element("div")?.unchecked_into();
    body.append_child(&controls)?;

    // Play/pause toggle.
    let toggle: HtmlElement = document.create_element("button")?.unchecked_into();
    toggle.set_text_content(Some("Pause"));
    controls.append_child(&toggle)?;
    {
        let p = Rc::clone(plot);
        let button = toggle.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let running = !p.running();
            p.set_running(running);
            button.set_text_content(Some(if running { "Pause" } else { "Play" }));
        }) as Box<dyn FnMut(_)>);
        toggle.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // Single step while paused.
    let step: HtmlElement = document.create_element("button")?.unchecked_into();
    step.set_text_content(Some("Step"));
    controls.append_child(&step)?;
    {
        let p = Rc::clone(plot);
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| p.step(1)) as Box<dyn FnMut(_)>);
        step.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // Animated view reset.
    let reset: HtmlElement = document.create_element("button")?.unchecked_into();
    reset.set_text_content(Some("Reset view"));
    controls.append_child(&reset)?;
    {
        let p = Rc::clone(plot);
        let cb =
            Closure::wrap(Box::new(move |_: web_sys::Event| p.reset_view()) as Box<dyn FnMut(_)>);
        reset.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // Active-frequency slider (cubic mapping lives in the core).
    let slider: HtmlInputElement = document.create_element("input")?.unchecked_into();
    slider.set_type("range");
    slider.set_min("0");
    slider.set_max("1");
    slider.set_step("0.001");
    slider.set_value_as_number(plot.used_progress());
    controls.append_child(&slider)?;
    {
        let p = Rc::clone(plot);
        let input = slider.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            p.set_used_progress(input.value_as_number());
        }) as Box<dyn FnMut(_)>);
        slider.add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}
