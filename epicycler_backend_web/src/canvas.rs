// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HTML canvas implementation of the core drawing contract.
//!
//! [`CanvasSurface`] maps [`Surface`] calls onto a `CanvasRenderingContext2d`.
//! The backing store is scaled by the device pixel ratio while all
//! coordinates stay in CSS pixels, so strokes and text come out crisp on
//! high-DPI displays.

use alloc::format;
use alloc::string::String;

use epicycler_core::surface::{Color, Stroke, Surface};
use kurbo::{Circle, Point};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A 2D canvas drawing target.
///
/// Drawing calls that the browser can only fail for unrecoverable reasons
/// (detached context, invalid state) are ignored rather than propagated; the
/// [`Surface`] contract is infallible and a lost frame heals on the next one.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Surface size in CSS pixels.
    width: f64,
    height: f64,
}

impl core::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl CanvasSurface {
    /// Wraps a canvas element, fetching its 2D context.
    ///
    /// Fails if the element has no 2D context (e.g. one of another kind was
    /// already created for it).
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;
        let mut surface = Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
        };
        let (w, h) = (surface.canvas.width(), surface.canvas.height());
        surface.resize(f64::from(w), f64::from(h), 1.0);
        Ok(surface)
    }

    /// The wrapped canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resizes the backing store to `width` × `height` CSS pixels at the
    /// given device pixel ratio.
    ///
    /// Resizing resets the context, so callers must repaint afterwards.
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        let dpr = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.width = width.max(0.0);
        self.height = height.max(0.0);

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "canvas sizes are small positive numbers"
        )]
        {
            self.canvas.set_width((self.width * dpr) as u32);
            self.canvas.set_height((self.height * dpr) as u32);
        }
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", self.width));
        let _ = style.set_property("height", &format!("{}px", self.height));

        // Draw in CSS pixels on the scaled backing store.
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    fn apply_stroke(&self, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(&css_color(stroke.color));
        self.ctx.set_line_width(stroke.width);
        let dash = js_sys::Array::new();
        if let Some([on, off]) = stroke.dash {
            dash.push(&JsValue::from_f64(on));
            dash.push(&JsValue::from_f64(off));
        }
        let _ = self.ctx.set_line_dash(&dash);
    }

    fn trace_polyline(&self, points: &[Point], closed: bool) {
        self.ctx.begin_path();
        self.ctx.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            self.ctx.line_to(p.x, p.y);
        }
        if closed {
            self.ctx.close_path();
        }
    }

    fn set_font(&self, size: f64) {
        self.ctx.set_font(&format!("{size}px sans-serif"));
        self.ctx.set_text_baseline("top");
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        let _ = self.ctx.set_line_dash(&js_sys::Array::new());
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_background(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        self.apply_stroke(stroke);
        self.trace_polyline(points, closed);
        self.ctx.stroke();
    }

    fn stroke_circle(&mut self, circle: Circle, stroke: &Stroke) {
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            circle.center.x,
            circle.center.y,
            circle.radius,
            0.0,
            core::f64::consts::TAU,
        );
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, circle: Circle, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            circle.center.x,
            circle.center.y,
            circle.radius,
            0.0,
            core::f64::consts::TAU,
        );
        self.ctx.fill();
    }

    fn draw_text(&mut self, text: &str, at: Point, size: f64, fill: Color, outline: Option<(Color, f64)>) {
        self.set_font(size);
        if let Some((color, width)) = outline {
            self.ctx.set_stroke_style_str(&css_color(color));
            self.ctx.set_line_width(width);
            let _ = self.ctx.set_line_dash(&js_sys::Array::new());
            let _ = self.ctx.stroke_text(text, at.x, at.y);
        }
        self.ctx.set_fill_style_str(&css_color(fill));
        let _ = self.ctx.fill_text(text, at.x, at.y);
    }

    fn text_width(&mut self, text: &str, size: f64) -> f64 {
        self.set_font(size);
        self.ctx
            .measure_text(text)
            .map_or_else(|_| text.chars().count() as f64 * size * 0.6, |m| m.width())
    }
}

/// Formats a [`Color`] as a CSS `rgba()` string.
fn css_color(color: Color) -> String {
    format!(
        "rgba({},{},{},{})",
        color.r,
        color.g,
        color.b,
        f64::from(color.a) / 255.0
    )
}
