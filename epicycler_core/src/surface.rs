// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing contract between the renderer and platform backends.
//!
//! The core never draws pixels itself: [`crate::render`] describes a frame as
//! calls against the [`Surface`] trait, and each backend crate implements it
//! for its platform (the web backend maps it onto a 2D canvas context). The
//! trait is deliberately small — lines, polylines, circles, and text are all
//! the plot ever needs.

use kurbo::{Circle, Point};

/// An 8-bit sRGB color with alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// How a line, polyline, or circle outline is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Line width in surface pixels.
    pub width: f64,
    /// Dash pattern `[on, off]` in surface pixels; `None` is solid.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    /// A solid stroke.
    #[must_use]
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    /// A dashed stroke with an `[on, off]` pattern.
    #[must_use]
    pub const fn dashed(color: Color, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// A 2D drawing target. All coordinates are surface pixels, y growing
/// downward.
pub trait Surface {
    /// Erases everything to transparent.
    fn clear(&mut self);

    /// Fills the whole surface with an opaque color.
    fn fill_background(&mut self, color: Color);

    /// Strokes a single line segment.
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// Strokes a polyline through `points`, optionally closing it back to
    /// the first point. Fewer than two points draws nothing.
    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke);

    /// Strokes a circle outline.
    fn stroke_circle(&mut self, circle: Circle, stroke: &Stroke);

    /// Fills a circle.
    fn fill_circle(&mut self, circle: Circle, color: Color);

    /// Draws text with its top-left corner at `at`, optionally outlined for
    /// contrast against busy backgrounds.
    fn draw_text(&mut self, text: &str, at: Point, size: f64, fill: Color, outline: Option<(Color, f64)>);

    /// Measures the rendered width of `text` at `size`, in surface pixels.
    fn text_width(&mut self, text: &str, size: f64) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_constructors() {
        assert_eq!(Color::rgb(1, 2, 3), Color::rgba(1, 2, 3, 255));
        assert_eq!(Color::rgba(0, 0, 0, 0).a, 0);
    }

    #[test]
    fn stroke_constructors() {
        let c = Color::rgb(9, 9, 9);
        assert_eq!(Stroke::solid(c, 2.0).dash, None);
        assert_eq!(Stroke::dashed(c, 2.0, [4.0, 2.0]).dash, Some([4.0, 2.0]));
    }
}
