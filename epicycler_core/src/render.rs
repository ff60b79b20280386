// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame description.
//!
//! Each function here paints one layer of the plot onto a [`Surface`]: the
//! grid with axes and labels, the rotating epicycle vectors, the traced path,
//! and the marker at the pen tip. Layers are separate because they change at
//! different rates — the grid only on view changes, the epicycles and marker
//! every animation frame — and the backend keeps each on its own surface so
//! a frame only repaints what moved.

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point};

use crate::coords::{CoordinateSystem, GridLayout};
use crate::path::PathEngine;
use crate::surface::{Color, Stroke, Surface};

const TAU: f64 = core::f64::consts::TAU;

/// Hard cap on grid lines per direction, guarding against a degenerate step.
const MAX_GRID_LINES: usize = 1_000;

/// Colors and stroke widths for every layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Plot background.
    pub background: Color,
    /// Axes, origin dot, and label fill.
    pub axis: Color,
    /// Primary grid lines.
    pub grid: Color,
    /// Secondary grid lines.
    pub secondary_grid: Color,
    /// The full traced path.
    pub path: Color,
    /// The already-traced portion of the path.
    pub path_active: Color,
    /// Epicycles rotating counter-clockwise (positive frequency).
    pub counterclockwise: Color,
    /// Epicycles rotating clockwise (negative frequency).
    pub clockwise: Color,

    /// Axis stroke width.
    pub axis_width: f64,
    /// Grid stroke width (both levels).
    pub grid_width: f64,
    /// Rotating vector stroke width.
    pub vector_width: f64,
    /// Epicycle circle stroke width.
    pub epicycle_width: f64,
    /// Path stroke width.
    pub path_width: f64,
    /// Axis label font size in pixels.
    pub label_size: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb(0xff, 0xff, 0xff),
            axis: Color::rgb(0x3c, 0x3c, 0x3c),
            grid: Color::rgb(0x77, 0x77, 0x77),
            secondary_grid: Color::rgba(0x77, 0x77, 0x77, 0x6e),
            path: Color::rgb(0x88, 0x88, 0x88),
            path_active: Color::rgb(0x44, 0x44, 0x44),
            counterclockwise: Color::rgb(0xb0, 0x1a, 0x00),
            clockwise: Color::rgb(0x14, 0x84, 0xe6),

            axis_width: 2.0,
            grid_width: 1.0,
            vector_width: 5.0,
            epicycle_width: 2.0,
            path_width: 6.0,
            label_size: 15.0,
        }
    }
}

impl Theme {
    fn rotation_color(&self, frequency: i32) -> Color {
        if frequency < 0 {
            self.clockwise
        } else {
            self.counterclockwise
        }
    }
}

/// Paints the background, both grid levels, the axes, the viewport border,
/// the axis labels, and the origin dot.
pub fn draw_grid_layer(surface: &mut dyn Surface, cs: &CoordinateSystem, theme: &Theme) {
    surface.clear();
    surface.fill_background(theme.background);

    let secondary = Stroke::solid(theme.secondary_grid, theme.grid_width);
    draw_grid_lines(surface, cs, cs.secondary_grid(), &secondary);
    let primary = Stroke::solid(theme.grid, theme.grid_width);
    draw_grid_lines(surface, cs, cs.grid(), &primary);

    draw_axes(surface, cs, theme);
    draw_border(surface, cs, theme);
    draw_labels(surface, cs, theme);

    // Origin dot, when visible.
    let origin = cs.to_screen(Point::ORIGIN);
    if cs.viewport_screen().contains(origin) {
        surface.fill_circle(Circle::new(origin, theme.axis_width + 1.0), theme.axis);
    }
}

fn draw_grid_lines(
    surface: &mut dyn Surface,
    cs: &CoordinateSystem,
    grid: &GridLayout,
    stroke: &Stroke,
) {
    let vp = cs.viewport_screen();
    let step = grid.screen_step;
    if !(step > 0.0) || !step.is_finite() {
        return;
    }

    let mut x = grid.screen_x_min;
    for _ in 0..MAX_GRID_LINES {
        if x > vp.x1 {
            break;
        }
        if x >= vp.x0 {
            surface.stroke_line(Point::new(x, vp.y0), Point::new(x, vp.y1), stroke);
        }
        x += step;
    }
    let mut y = grid.screen_y_min;
    for _ in 0..MAX_GRID_LINES {
        if y > vp.y1 {
            break;
        }
        if y >= vp.y0 {
            surface.stroke_line(Point::new(vp.x0, y), Point::new(vp.x1, y), stroke);
        }
        y += step;
    }
}

fn draw_axes(surface: &mut dyn Surface, cs: &CoordinateSystem, theme: &Theme) {
    let vp = cs.viewport_screen();
    let stroke = Stroke::solid(theme.axis, theme.axis_width);
    let origin = cs.to_screen(Point::ORIGIN);
    if origin.x >= vp.x0 && origin.x <= vp.x1 {
        surface.stroke_line(
            Point::new(origin.x, vp.y0),
            Point::new(origin.x, vp.y1),
            &stroke,
        );
    }
    if origin.y >= vp.y0 && origin.y <= vp.y1 {
        surface.stroke_line(
            Point::new(vp.x0, origin.y),
            Point::new(vp.x1, origin.y),
            &stroke,
        );
    }
}

/// The viewport border marks the edge of the bounded domain when it is
/// inside the screen.
fn draw_border(surface: &mut dyn Surface, cs: &CoordinateSystem, theme: &Theme) {
    let vp = cs.viewport_screen();
    let corners = [
        Point::new(vp.x0, vp.y0),
        Point::new(vp.x1, vp.y0),
        Point::new(vp.x1, vp.y1),
        Point::new(vp.x0, vp.y1),
    ];
    surface.stroke_polyline(&corners, true, &Stroke::solid(theme.axis, theme.axis_width));
}

fn draw_labels(surface: &mut dyn Surface, cs: &CoordinateSystem, theme: &Theme) {
    let vp = cs.viewport_screen();
    let grid = *cs.grid();
    let digits = cs.max_label_digits();
    let origin = cs.to_screen(Point::ORIGIN);
    let size = theme.label_size;
    let pad = 4.0;
    let outline = Some((theme.background, 3.0));

    // A viewport too short for a label row gets no labels at all; the grid
    // and axes still draw.
    if vp.y1 - vp.y0 < size + 2.0 * pad {
        return;
    }

    // Labels hug their axis but are pushed inside the viewport when the
    // axis itself is off screen.
    let row_y = (origin.y + pad).clamp(vp.y0 + pad, vp.y1 - size - pad);
    let column_x_limit = vp.x1 - pad;

    if grid.cartesian_step > 0.0 && grid.screen_step > 0.0 {
        // Along the x axis.
        let mut value = grid.cartesian_x_min;
        let mut x = grid.screen_x_min;
        for _ in 0..MAX_GRID_LINES {
            if x > vp.x1 {
                break;
            }
            if x >= vp.x0 && value.abs() > grid.cartesian_step / 2.0 {
                let text = format_label(value, digits);
                surface.draw_text(&text, Point::new(x + pad, row_y), size, theme.axis, outline);
            }
            value += grid.cartesian_step;
            x += grid.screen_step;
        }

        // Along the y axis.
        let mut value = grid.cartesian_y_max;
        let mut y = grid.screen_y_min;
        for _ in 0..MAX_GRID_LINES {
            if y > vp.y1 {
                break;
            }
            if y >= vp.y0 && value.abs() > grid.cartesian_step / 2.0 {
                let text = format_label(value, digits);
                let width = surface.text_width(&text, size);
                // max-then-min rather than clamp: a label wider than the
                // viewport inverts the bounds, which must not panic.
                let x = (origin.x - width - pad)
                    .max(vp.x0 + pad)
                    .min(column_x_limit - width);
                surface.draw_text(&text, Point::new(x, y + pad), size, theme.axis, outline);
            }
            value -= grid.cartesian_step;
            y += grid.screen_step;
        }
    }

    // A single "0" at the origin stands in for both axes' zero labels.
    if cs.viewport_screen().contains(origin) {
        surface.draw_text(
            "0",
            Point::new(origin.x + pad, origin.y + pad),
            size,
            theme.axis,
            outline,
        );
    }
}

/// Formats an axis label, rounding to `digits` decimals and trimming
/// trailing zeros.
fn format_label(value: f64, digits: u32) -> String {
    let factor = 10.0_f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == rounded.trunc() {
        return format!("{}", rounded as i64);
    }
    let text = format!("{rounded:.prec$}", prec = digits as usize);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    String::from(text)
}

/// Paints the rotating vector chain: one dashed circle and one solid vector
/// per active component, colored by rotation direction.
pub fn draw_epicycles(
    surface: &mut dyn Surface,
    cs: &CoordinateSystem,
    engine: &PathEngine,
    theme: &Theme,
) {
    surface.clear();
    let used = engine.used_frequency_count();
    let time = engine.time();

    let mut tip = Point::ORIGIN;
    for component in engine.active_components(used) {
        let center = cs.to_screen(tip);
        tip += component.eval(time);
        let end = cs.to_screen(tip);
        let color = theme.rotation_color(component.frequency);

        let radius = component.amplitude * cs.pixels_per_unit();
        if radius > 0.0 {
            surface.stroke_circle(
                Circle::new(center, radius),
                &Stroke::dashed(color, theme.epicycle_width, [6.0, 6.0]),
            );
        }
        surface.stroke_line(center, end, &Stroke::solid(color, theme.vector_width));
    }
}

/// Paints the sampled path: the whole period in the muted path color, then
/// the portion already traced this period on top in the active color.
pub fn draw_path(
    surface: &mut dyn Surface,
    cs: &CoordinateSystem,
    path: &[Point],
    time: f64,
    theme: &Theme,
) {
    surface.clear();
    if path.len() < 2 {
        return;
    }
    let screen: alloc::vec::Vec<Point> = path.iter().map(|&p| cs.to_screen(p)).collect();
    surface.stroke_polyline(&screen, true, &Stroke::solid(theme.path, theme.path_width));

    let traced = traced_samples(time, path.len());
    if traced >= 2 {
        surface.stroke_polyline(
            &screen[..traced],
            false,
            &Stroke::solid(theme.path_active, theme.path_width),
        );
    }
}

/// Paints the pen-tip marker on the sample the animation has reached.
pub fn draw_marker(
    surface: &mut dyn Surface,
    cs: &CoordinateSystem,
    path: &[Point],
    time: f64,
    theme: &Theme,
) {
    surface.clear();
    if path.is_empty() {
        return;
    }
    let index = traced_samples(time, path.len()).saturating_sub(1).min(path.len() - 1);
    let at = cs.to_screen(path[index]);
    // A background-colored halo keeps the marker readable on the path.
    surface.fill_circle(Circle::new(at, theme.path_width + 4.0), theme.background);
    surface.fill_circle(Circle::new(at, theme.path_width + 1.0), theme.path_active);
}

/// Number of path samples traced by `time` within the current period.
fn traced_samples(time: f64, len: usize) -> usize {
    ((time / TAU) * len as f64).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FrequencyComponent;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Test double recording every drawing call.
    #[derive(Debug, Default)]
    struct Recorder {
        clears: usize,
        backgrounds: Vec<Color>,
        lines: Vec<(Point, Point, Stroke)>,
        polylines: Vec<(Vec<Point>, bool, Stroke)>,
        circles: Vec<(Circle, Stroke)>,
        fills: Vec<(Circle, Color)>,
        texts: Vec<(String, Point)>,
    }

    impl Surface for Recorder {
        fn clear(&mut self) {
            self.clears += 1;
        }
        fn fill_background(&mut self, color: Color) {
            self.backgrounds.push(color);
        }
        fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
            self.lines.push((from, to, *stroke));
        }
        fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke) {
            self.polylines.push((points.to_vec(), closed, *stroke));
        }
        fn stroke_circle(&mut self, circle: Circle, stroke: &Stroke) {
            self.circles.push((circle, *stroke));
        }
        fn fill_circle(&mut self, circle: Circle, color: Color) {
            self.fills.push((circle, color));
        }
        fn draw_text(&mut self, text: &str, at: Point, _size: f64, _fill: Color, _outline: Option<(Color, f64)>) {
            self.texts.push((String::from(text), at));
        }
        fn text_width(&mut self, text: &str, size: f64) -> f64 {
            text.len() as f64 * size * 0.6
        }
    }

    fn standard() -> CoordinateSystem {
        CoordinateSystem::new(800.0, 600.0, Point::ORIGIN, 100.0)
    }

    #[test]
    fn grid_layer_paints_background_axes_and_origin() {
        let cs = standard();
        let theme = Theme::default();
        let mut rec = Recorder::default();
        draw_grid_layer(&mut rec, &cs, &theme);

        assert_eq!(rec.backgrounds, vec![theme.background]);
        // Both axes are visible and are the widest lines painted.
        let axes: Vec<_> = rec
            .lines
            .iter()
            .filter(|(_, _, s)| s.color == theme.axis)
            .collect();
        assert_eq!(axes.len(), 2);
        // The origin dot and its "0" label.
        assert_eq!(rec.fills.len(), 1);
        assert!(rec.texts.iter().any(|(t, _)| t == "0"));
    }

    #[test]
    fn grid_lines_stay_inside_the_viewport() {
        let cs = standard();
        let mut rec = Recorder::default();
        draw_grid_layer(&mut rec, &cs, &Theme::default());
        let vp = cs.viewport_screen();
        for (from, to, _) in &rec.lines {
            for p in [from, to] {
                assert!(p.x >= vp.x0 - 1e-9 && p.x <= vp.x1 + 1e-9);
                assert!(p.y >= vp.y0 - 1e-9 && p.y <= vp.y1 + 1e-9);
            }
        }
    }

    #[test]
    fn labels_keep_trailing_zeros_out() {
        assert_eq!(format_label(100.0, 3), "100");
        assert_eq!(format_label(0.5, 3), "0.5");
        assert_eq!(format_label(-0.25, 3), "-0.25");
        assert_eq!(format_label(0.1234567, 3), "0.123");
        assert_eq!(format_label(-2.0, 3), "-2");
    }

    #[test]
    fn degenerate_viewports_draw_without_labels() {
        let theme = Theme::default();

        // Too short for a label row: labels are skipped, the rest draws.
        let cs = CoordinateSystem::new(800.0, 10.0, Point::ORIGIN, 100.0);
        let mut rec = Recorder::default();
        draw_grid_layer(&mut rec, &cs, &theme);
        assert!(rec.texts.is_empty());
        assert!(!rec.lines.is_empty());

        // Narrower than any label text: labels may land partly outside,
        // but drawing must not panic.
        let cs = CoordinateSystem::new(12.0, 600.0, Point::ORIGIN, 100.0);
        let mut rec = Recorder::default();
        draw_grid_layer(&mut rec, &cs, &theme);
    }

    #[test]
    fn epicycles_color_by_rotation_direction() {
        let cs = standard();
        let theme = Theme::default();
        let engine = PathEngine::from_components(vec![
            FrequencyComponent::new(1, 1.0, 0.0),
            FrequencyComponent::new(-1, 0.5, 0.0),
        ]);
        let mut rec = Recorder::default();
        draw_epicycles(&mut rec, &cs, &engine, &theme);

        assert_eq!(rec.circles.len(), 2);
        assert_eq!(rec.lines.len(), 2);
        assert_eq!(rec.circles[0].1.color, theme.counterclockwise);
        assert_eq!(rec.circles[1].1.color, theme.clockwise);
        // Circle radii are amplitudes scaled by the zoom level.
        assert!((rec.circles[0].0.radius - 100.0).abs() < 1e-9);
        assert!((rec.circles[1].0.radius - 50.0).abs() < 1e-9);
        // The chain: first circle at the origin, second at the first tip.
        assert_eq!(rec.circles[0].0.center, cs.to_screen(Point::ORIGIN));
        assert_eq!(rec.circles[1].0.center, rec.lines[0].1);
    }

    #[test]
    fn path_draws_full_period_and_traced_portion() {
        let cs = standard();
        let theme = Theme::default();
        let mut engine = PathEngine::from_components(vec![FrequencyComponent::new(1, 1.0, 0.0)]);
        let path: Vec<Point> = engine.path().to_vec();

        let mut rec = Recorder::default();
        draw_path(&mut rec, &cs, &path, TAU / 4.0, &theme);
        assert_eq!(rec.polylines.len(), 2);
        let (full, closed, _) = &rec.polylines[0];
        assert!(*closed);
        assert_eq!(full.len(), path.len());
        let (active, closed, stroke) = &rec.polylines[1];
        assert!(!*closed);
        assert_eq!(stroke.color, theme.path_active);
        // A quarter period traces a quarter of the samples.
        assert_eq!(active.len(), 250);
    }

    #[test]
    fn marker_sits_on_the_reached_sample() {
        let cs = standard();
        let theme = Theme::default();
        let mut engine = PathEngine::from_components(vec![FrequencyComponent::new(1, 1.0, 0.0)]);
        let path: Vec<Point> = engine.path().to_vec();

        let mut rec = Recorder::default();
        draw_marker(&mut rec, &cs, &path, 0.0, &theme);
        assert_eq!(rec.fills.len(), 2);
        assert_eq!(rec.fills[1].0.center, cs.to_screen(path[0]));

        let mut rec = Recorder::default();
        draw_marker(&mut rec, &cs, &path, TAU * 0.999_999, &theme);
        assert_eq!(rec.fills[1].0.center, cs.to_screen(path[path.len() - 1]));
    }

    #[test]
    fn empty_path_paints_nothing() {
        let cs = standard();
        let theme = Theme::default();
        let mut rec = Recorder::default();
        draw_path(&mut rec, &cs, &[], 0.0, &theme);
        draw_marker(&mut rec, &cs, &[], 0.0, &theme);
        assert!(rec.polylines.is_empty());
        assert!(rec.fills.is_empty());
    }
}
