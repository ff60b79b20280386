// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartesian ↔ screen coordinate mapping.
//!
//! [`CoordinateSystem`] owns the affine viewport state of a plot: the zoom
//! level (pixels per cartesian unit), the two origin duals, the visible
//! viewport, and the derived grid geometry. It converts between two frames
//! of reference:
//!
//! ```text
//!     SCREEN:          CARTESIAN:
//!
//!                            y
//!                      ..... ^ .....
//!     0 ---- > x       :     |     :
//!     |      :         ----- 0 --- > x
//!     |      :         :     |     :
//!     v ......         ..... | .....
//!     y
//! ```
//!
//! Screen y grows downward, cartesian y grows upward. The cartesian domain is
//! a fixed bounded square (±10 000 units); the viewport is always clamped
//! against it, so panning or zooming out can never reveal space outside the
//! domain. All derived state (viewport, grid steps, grid starting points) is
//! recomputed on every pan, zoom, or resize and exposed through read-only
//! accessors.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

/// Half-extent of the fixed cartesian domain, in cartesian units.
pub const CARTESIAN_EXTENT: f64 = 10_000.0;

/// Upper bound for [`CoordinateSystem::pixels_per_unit`].
pub const MAX_PIXELS_PER_UNIT: f64 = 100_000.0;

/// Fraction of the smaller screen dimension the whole cartesian domain may
/// shrink to before zooming out is stopped.
const MIN_DOMAIN_SCREEN_FRACTION: f64 = 0.4;

/// Grid-line spacing and starting points for one grid level, in both frames.
///
/// The starting points sit one whole step *outside* the visible viewport
/// (below the left edge, above the top edge) so that edge lines are always
/// included and lines stay put while panning; the renderer clips to the
/// viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridLayout {
    /// Spacing between grid lines, in cartesian units.
    pub cartesian_step: f64,
    /// Spacing between grid lines, in screen pixels.
    pub screen_step: f64,
    /// First vertical line, in cartesian units.
    pub cartesian_x_min: f64,
    /// First horizontal line (topmost), in cartesian units.
    pub cartesian_y_max: f64,
    /// First vertical line, in screen pixels.
    pub screen_x_min: f64,
    /// First horizontal line (topmost), in screen pixels.
    pub screen_y_min: f64,
}

/// Bidirectional affine mapping between the cartesian plane and the screen.
///
/// Constructed with [`new`](Self::new), mutated only through
/// [`resize`](Self::resize), [`pan`](Self::pan), and [`zoom`](Self::zoom);
/// everything else is a read-only query.
#[derive(Clone, Debug)]
pub struct CoordinateSystem {
    /// Cartesian point at the screen center at construction time.
    initial_center: Point,
    /// Zoom level at construction time.
    initial_pixels_per_unit: f64,

    /// Screen frame edges: `(0, 0)` to `(width, height)`.
    screen_edges: Rect,
    /// Fixed bounded cartesian domain.
    cartesian_domain: Rect,

    /// Origin of the cartesian frame, in screen coordinates.
    cartesian_origin_in_screen: Point,
    /// Origin of the screen frame (top-left corner), in cartesian coordinates.
    ///
    /// Kept mutually consistent with `cartesian_origin_in_screen`.
    screen_origin_in_cartesian: Point,

    /// Current zoom level, always within `[min_ppu, MAX_PIXELS_PER_UNIT]`.
    pixels_per_unit: f64,
    /// Lower zoom bound, derived from the screen size and the domain.
    min_pixels_per_unit: f64,

    /// Visible viewport (screen ∩ cartesian domain), in screen coordinates.
    viewport_screen: Rect,
    /// Visible viewport (screen ∩ cartesian domain), in cartesian coordinates.
    viewport_cartesian: Rect,

    /// Primary grid geometry.
    grid: GridLayout,
    /// Secondary grid geometry (step = primary / 5).
    secondary_grid: GridLayout,
}

impl CoordinateSystem {
    /// Creates a coordinate system for a `width` × `height` pixel surface
    /// with `center` as the cartesian point at the screen center.
    ///
    /// `pixels_per_unit` is clamped to the valid zoom range for this size.
    #[must_use]
    pub fn new(width: f64, height: f64, center: Point, pixels_per_unit: f64) -> Self {
        let mut cs = Self {
            initial_center: center,
            initial_pixels_per_unit: pixels_per_unit,
            screen_edges: Rect::new(0.0, 0.0, width.max(1.0), height.max(1.0)),
            cartesian_domain: Rect::new(
                -CARTESIAN_EXTENT,
                -CARTESIAN_EXTENT,
                CARTESIAN_EXTENT,
                CARTESIAN_EXTENT,
            ),
            cartesian_origin_in_screen: Point::ORIGIN,
            screen_origin_in_cartesian: Point::ORIGIN,
            pixels_per_unit,
            min_pixels_per_unit: 0.0,
            viewport_screen: Rect::ZERO,
            viewport_cartesian: Rect::ZERO,
            grid: GridLayout::default(),
            secondary_grid: GridLayout::default(),
        };
        cs.resize(width, height, Some(center));
        cs
    }

    /// Recomputes the system for a new surface size.
    ///
    /// If `center` is `None`, the cartesian point currently at the screen
    /// center stays at the screen center. A zero (or negative) dimension is
    /// skipped entirely: the previous state is kept until a valid size
    /// arrives, so no derived value can become NaN.
    pub fn resize(&mut self, width: f64, height: f64, center: Option<Point>) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let center = center.unwrap_or_else(|| self.to_cartesian(self.screen_center()));

        self.screen_edges = Rect::new(0.0, 0.0, width, height);
        self.min_pixels_per_unit = self.derive_min_pixels_per_unit();
        self.pixels_per_unit = self
            .pixels_per_unit
            .clamp(self.min_pixels_per_unit, MAX_PIXELS_PER_UNIT);

        // Place the requested center at the screen center, then derive the
        // dual origin from it.
        self.screen_origin_in_cartesian = Point::new(
            center.x - width / (2.0 * self.pixels_per_unit),
            center.y + height / (2.0 * self.pixels_per_unit),
        );
        self.cartesian_origin_in_screen = self.to_screen(Point::ORIGIN);

        self.update_derived();
    }

    /// Shifts both origins by a screen-pixel delta. O(1).
    pub fn pan(&mut self, delta: Vec2) {
        self.cartesian_origin_in_screen += delta;
        self.screen_origin_in_cartesian = self.to_cartesian(Point::ORIGIN);
        self.update_derived();
    }

    /// Multiplies the zoom level by `factor`, keeping the cartesian point
    /// under `anchor` (screen coordinates) fixed.
    ///
    /// The new zoom level is silently clamped to the valid range; the anchor
    /// invariant holds for the clamped factor.
    pub fn zoom(&mut self, factor: f64, anchor: Point) {
        let old = self.pixels_per_unit;
        self.pixels_per_unit = (old * factor).clamp(self.min_pixels_per_unit, MAX_PIXELS_PER_UNIT);

        // Both axes use the same form. With s = new/old, holding the anchor
        // fixed requires origin' − anchor = (origin − anchor)·s on each axis,
        // i.e. Δorigin = (origin − anchor)·(s − 1); the screen-y flip lives
        // in the origin duals, not here.
        let scale_change = self.pixels_per_unit / old - 1.0;
        self.pan((self.cartesian_origin_in_screen - anchor) * scale_change);
    }

    /// Converts a cartesian point to screen coordinates.
    #[must_use]
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(self.to_screen_x(p.x), self.to_screen_y(p.y))
    }

    /// Converts a screen point to cartesian coordinates.
    #[must_use]
    pub fn to_cartesian(&self, p: Point) -> Point {
        Point::new(self.to_cartesian_x(p.x), self.to_cartesian_y(p.y))
    }

    /// Converts a cartesian x coordinate to screen pixels.
    #[must_use]
    pub fn to_screen_x(&self, x: f64) -> f64 {
        (x - self.screen_origin_in_cartesian.x) * self.pixels_per_unit
    }

    /// Converts a cartesian y coordinate to screen pixels.
    #[must_use]
    pub fn to_screen_y(&self, y: f64) -> f64 {
        (self.screen_origin_in_cartesian.y - y) * self.pixels_per_unit
    }

    /// Converts a screen x coordinate to cartesian units.
    #[must_use]
    pub fn to_cartesian_x(&self, sx: f64) -> f64 {
        (sx - self.cartesian_origin_in_screen.x) / self.pixels_per_unit
    }

    /// Converts a screen y coordinate to cartesian units.
    #[must_use]
    pub fn to_cartesian_y(&self, sy: f64) -> f64 {
        (self.cartesian_origin_in_screen.y - sy) / self.pixels_per_unit
    }

    /// Current zoom level in pixels per cartesian unit.
    #[must_use]
    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    /// Lower zoom bound for the current surface size.
    #[must_use]
    pub fn min_pixels_per_unit(&self) -> f64 {
        self.min_pixels_per_unit
    }

    /// Zoom level the system was constructed with.
    #[must_use]
    pub fn initial_pixels_per_unit(&self) -> f64 {
        self.initial_pixels_per_unit
    }

    /// Cartesian point that was at the screen center at construction.
    #[must_use]
    pub fn initial_center(&self) -> Point {
        self.initial_center
    }

    /// Screen frame edges: `(0, 0)` to `(width, height)`.
    #[must_use]
    pub fn screen_edges(&self) -> Rect {
        self.screen_edges
    }

    /// The screen center point, in screen coordinates.
    #[must_use]
    pub fn screen_center(&self) -> Point {
        Point::new(self.screen_edges.x1 / 2.0, self.screen_edges.y1 / 2.0)
    }

    /// The fixed cartesian domain.
    #[must_use]
    pub fn cartesian_domain(&self) -> Rect {
        self.cartesian_domain
    }

    /// Visible viewport in screen coordinates (y0 = top edge).
    #[must_use]
    pub fn viewport_screen(&self) -> Rect {
        self.viewport_screen
    }

    /// Visible viewport in cartesian coordinates (y0 = bottom edge).
    #[must_use]
    pub fn viewport_cartesian(&self) -> Rect {
        self.viewport_cartesian
    }

    /// Primary grid geometry.
    #[must_use]
    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    /// Secondary grid geometry.
    #[must_use]
    pub fn secondary_grid(&self) -> &GridLayout {
        &self.secondary_grid
    }

    /// Decimal digits to keep in axis labels, fixed by the maximum zoom.
    #[must_use]
    pub fn max_label_digits(&self) -> u32 {
        (log10(MAX_PIXELS_PER_UNIT) - 2.0).round() as u32
    }

    /// Lower zoom bound: the whole domain may not shrink below a fixed
    /// fraction of the larger screen dimension.
    fn derive_min_pixels_per_unit(&self) -> f64 {
        let domain = self.cartesian_domain;
        if self.screen_edges.x1 >= self.screen_edges.y1 {
            self.screen_edges.x1 / domain.width() * MIN_DOMAIN_SCREEN_FRACTION
        } else {
            self.screen_edges.y1 / domain.height() * MIN_DOMAIN_SCREEN_FRACTION
        }
    }

    /// Recomputes viewport, grid steps, and grid starting points.
    fn update_derived(&mut self) {
        self.update_viewport();
        self.update_grid_steps();
        self.update_grid_starts();
    }

    /// Viewport = screen ∩ cartesian domain, expressed in both frames.
    fn update_viewport(&mut self) {
        let domain = self.cartesian_domain;
        let screen = self.screen_edges;

        self.viewport_cartesian = Rect::new(
            self.to_cartesian_x(screen.x0).max(domain.x0),
            self.to_cartesian_y(screen.y1).max(domain.y0),
            self.to_cartesian_x(screen.x1).min(domain.x1),
            self.to_cartesian_y(screen.y0).min(domain.y1),
        );
        self.viewport_screen = Rect::new(
            self.to_screen_x(domain.x0).max(screen.x0),
            self.to_screen_y(domain.y1).max(screen.y0),
            self.to_screen_x(domain.x1).min(screen.x1),
            self.to_screen_y(domain.y0).min(screen.y1),
        );
    }

    /// Primary step is the power of ten nearest one tenth of the smaller
    /// visible cartesian dimension, so the number of visible lines stays
    /// roughly constant under zoom. Secondary step is a fifth of it.
    fn update_grid_steps(&mut self) {
        let vs = self.viewport_screen;
        let cartesian_width = (vs.x1 - vs.x0) / self.pixels_per_unit;
        let cartesian_height = (vs.y1 - vs.y0) / self.pixels_per_unit;
        let min_dimension = cartesian_width.min(cartesian_height);
        if min_dimension <= 0.0 {
            // Degenerate viewport; keep the previous grid.
            return;
        }

        let step = 10.0_f64.powf((log10(min_dimension) - 1.0).ceil());
        self.grid.cartesian_step = step;
        self.grid.screen_step = step * self.pixels_per_unit;
        self.secondary_grid.cartesian_step = step / 5.0;
        self.secondary_grid.screen_step = self.grid.screen_step / 5.0;
    }

    /// Anchors each grid to the multiple of its step one whole step outside
    /// the viewport edge, so lines don't swim during panning.
    fn update_grid_starts(&mut self) {
        let vc = self.viewport_cartesian;

        self.grid.cartesian_x_min = grid_start(self.grid.cartesian_step, vc.x0, -1.0);
        self.grid.cartesian_y_max = grid_start(self.grid.cartesian_step, vc.y1, 1.0);
        self.grid.screen_x_min = self.to_screen_x(self.grid.cartesian_x_min);
        self.grid.screen_y_min = self.to_screen_y(self.grid.cartesian_y_max);

        self.secondary_grid.cartesian_x_min =
            grid_start(self.secondary_grid.cartesian_step, vc.x0, -1.0);
        self.secondary_grid.cartesian_y_max =
            grid_start(self.secondary_grid.cartesian_step, vc.y1, 1.0);
        self.secondary_grid.screen_x_min = self.to_screen_x(self.secondary_grid.cartesian_x_min);
        self.secondary_grid.screen_y_min = self.to_screen_y(self.secondary_grid.cartesian_y_max);
    }
}

/// Base-10 logarithm via `ln`; the `no_std` float shim carries no `log10`.
fn log10(x: f64) -> f64 {
    x.ln() / core::f64::consts::LN_10
}

/// Multiple of `step` one step beyond `edge` (`offset` = −1 for the left
/// edge, +1 for the top edge).
fn grid_start(step: f64, edge: f64, offset: f64) -> f64 {
    if step <= 0.0 {
        return edge;
    }
    step * ((edge / step).floor() + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a - b).hypot() < 1e-6,
            "points differ: {a:?} vs {b:?}"
        );
    }

    fn standard() -> CoordinateSystem {
        CoordinateSystem::new(800.0, 600.0, Point::ORIGIN, 100.0)
    }

    #[test]
    fn origin_maps_to_screen_center() {
        let cs = standard();
        assert_close(cs.to_screen(Point::ORIGIN), Point::new(400.0, 300.0));
        assert_close(cs.to_cartesian(Point::new(400.0, 300.0)), Point::ORIGIN);
    }

    #[test]
    fn screen_y_grows_downward() {
        let cs = standard();
        // Cartesian +y is above the center on screen.
        assert!(cs.to_screen_y(1.0) < cs.to_screen_y(0.0));
        assert!((cs.to_screen_y(1.0) - 200.0).abs() < EPS);
    }

    #[test]
    fn round_trip_within_tolerance() {
        let cs = CoordinateSystem::new(640.0, 480.0, Point::new(2.5, -1.25), 37.0);
        for &p in &[
            Point::ORIGIN,
            Point::new(1.0, 1.0),
            Point::new(-123.456, 78.9),
            Point::new(9_999.0, -9_999.0),
        ] {
            assert_close(cs.to_cartesian(cs.to_screen(p)), p);
        }
        for &s in &[Point::new(0.0, 0.0), Point::new(320.0, 240.0), Point::new(639.0, 1.0)] {
            assert_close(cs.to_screen(cs.to_cartesian(s)), s);
        }
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        for &factor in &[2.0, 0.5, 1.0, 3.7, 0.123] {
            for &anchor in &[
                Point::new(400.0, 300.0),
                Point::new(0.0, 0.0),
                Point::new(799.0, 13.0),
                Point::new(111.0, 555.0),
            ] {
                let mut cs = standard();
                let before = cs.to_cartesian(anchor);
                cs.zoom(factor, anchor);
                let after = cs.to_cartesian(anchor);
                assert_close(before, after);
            }
        }
    }

    #[test]
    fn zoom_anchor_holds_even_when_clamped() {
        let mut cs = standard();
        let anchor = Point::new(100.0, 200.0);
        let before = cs.to_cartesian(anchor);
        cs.zoom(1.0e9, anchor);
        assert!((cs.pixels_per_unit() - MAX_PIXELS_PER_UNIT).abs() < EPS);
        assert_close(before, cs.to_cartesian(anchor));
    }

    #[test]
    fn pixels_per_unit_stays_bounded() {
        let mut cs = standard();
        for i in 0..200 {
            let factor = if i % 3 == 0 { 10.0 } else { 0.05 };
            cs.zoom(factor, Point::new(13.0 * (i as f64 % 7.0), 400.0));
            assert!(cs.pixels_per_unit() >= cs.min_pixels_per_unit() - EPS);
            assert!(cs.pixels_per_unit() <= MAX_PIXELS_PER_UNIT + EPS);
        }
    }

    #[test]
    fn grid_step_is_a_power_of_ten() {
        let mut cs = standard();
        for _ in 0..40 {
            cs.zoom(1.3, Point::new(200.0, 100.0));
            let step = cs.grid().cartesian_step;
            let exponent = log10(step);
            assert!(
                (exponent - exponent.round()).abs() < 1e-9,
                "step {step} is not a power of ten"
            );
            let secondary = cs.secondary_grid().cartesian_step;
            assert!((secondary - step / 5.0).abs() < EPS);
        }
    }

    #[test]
    fn grid_lines_do_not_swim_under_pan() {
        let mut cs = standard();
        let step = cs.grid().cartesian_step;
        let anchored = |v: f64| (v / step).round() * step;
        let before = anchored(cs.grid().cartesian_x_min);
        cs.pan(Vec2::new(step * cs.pixels_per_unit() * 0.3, 0.0));
        // Same step, and the start is still an exact multiple of it.
        assert!((cs.grid().cartesian_step - step).abs() < EPS);
        let after = cs.grid().cartesian_x_min;
        assert!((after - anchored(after)).abs() < 1e-9);
        // A fractional pan moves the start by at most one step.
        assert!((after - before).abs() <= step + EPS);
    }

    #[test]
    fn viewport_clamped_to_domain() {
        let mut cs = standard();
        // Zoom all the way out, then pan hard; the viewport must stay inside
        // the fixed domain in cartesian terms.
        cs.zoom(1.0e-9, cs.screen_center());
        cs.pan(Vec2::new(1.0e7, -1.0e7));
        let vc = cs.viewport_cartesian();
        let domain = cs.cartesian_domain();
        assert!(vc.x0 >= domain.x0 - EPS);
        assert!(vc.x1 <= domain.x1 + EPS);
        assert!(vc.y0 >= domain.y0 - EPS);
        assert!(vc.y1 <= domain.y1 + EPS);
    }

    #[test]
    fn zero_size_resize_keeps_prior_state() {
        let mut cs = standard();
        let before_ppu = cs.pixels_per_unit();
        let before_grid = *cs.grid();
        let before_origin = cs.to_screen(Point::ORIGIN);
        cs.resize(0.0, 600.0, None);
        cs.resize(800.0, 0.0, None);
        assert_eq!(cs.pixels_per_unit(), before_ppu);
        assert_eq!(*cs.grid(), before_grid);
        assert_close(cs.to_screen(Point::ORIGIN), before_origin);
    }

    #[test]
    fn resize_without_center_keeps_screen_center_point() {
        let mut cs = standard();
        cs.pan(Vec2::new(120.0, -45.0));
        let center_before = cs.to_cartesian(cs.screen_center());
        cs.resize(1024.0, 768.0, None);
        assert_close(cs.to_cartesian(cs.screen_center()), center_before);
    }

    #[test]
    fn pan_shifts_by_screen_pixels() {
        let mut cs = standard();
        cs.pan(Vec2::new(50.0, -20.0));
        assert_close(cs.to_screen(Point::ORIGIN), Point::new(450.0, 280.0));
    }

    #[test]
    fn log10_matches_powers_of_ten() {
        assert!((log10(1_000.0) - 3.0).abs() < 1e-12);
        assert!((log10(0.01) + 2.0).abs() < 1e-12);
        assert!((log10(1.0)).abs() < 1e-12);
    }

    #[test]
    fn label_digits_follow_max_zoom() {
        let cs = standard();
        assert_eq!(cs.max_label_digits(), 3);
    }
}
