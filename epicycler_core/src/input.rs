// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture recognition.
//!
//! [`GestureTracker`] turns raw pointer events (already translated to surface
//! coordinates by the backend) into view gestures: one active pointer drags
//! the view, two pinch-zoom it. The tracker is pure state, so the recognition
//! rules are testable without a platform event source.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Per-event zoom factor while pinching apart.
const PINCH_OUT_FACTOR: f64 = 1.03;

/// Per-event zoom factor while pinching together.
const PINCH_IN_FACTOR: f64 = 0.97;

/// A view change recognized from pointer movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Drag the view by this screen-pixel delta.
    Pan(Vec2),
    /// Zoom by `factor`, keeping `anchor` (screen coordinates) fixed.
    Pinch {
        /// Fixed per-event zoom step.
        factor: f64,
        /// Midpoint between the two pointers.
        anchor: Point,
    },
}

/// Tracks active pointers and recognizes pan and pinch gestures.
///
/// Pointers beyond the first two are tracked but ignored for recognition.
/// When a pinch ends (a pointer lifts), the distance baseline is cleared so
/// the next pinch starts fresh instead of jumping.
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    /// Active pointers in press order.
    pointers: Vec<(u64, Point)>,
    /// Pointer distance at the previous two-pointer event.
    last_pinch_distance: Option<f64>,
}

impl GestureTracker {
    /// Creates a tracker with no active pointers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently pressed pointers.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Records a pointer press. A repeated id just updates its position.
    pub fn pointer_down(&mut self, id: u64, position: Point) {
        if let Some(entry) = self.pointers.iter_mut().find(|(i, _)| *i == id) {
            entry.1 = position;
        } else {
            self.pointers.push((id, position));
        }
    }

    /// Records a pointer release and resets the pinch baseline.
    pub fn pointer_up(&mut self, id: u64) {
        self.pointers.retain(|(i, _)| *i != id);
        if self.pointers.len() < 2 {
            self.last_pinch_distance = None;
        }
    }

    /// Records a pointer move and returns the gesture it implies, if any.
    ///
    /// Unknown pointer ids (moves without a preceding press, e.g. hover) are
    /// ignored.
    pub fn pointer_move(&mut self, id: u64, position: Point) -> Option<Gesture> {
        let index = self.pointers.iter().position(|(i, _)| *i == id)?;
        let previous = self.pointers[index].1;
        self.pointers[index].1 = position;

        match self.pointers.len() {
            1 => {
                let delta = position - previous;
                (delta != Vec2::ZERO).then_some(Gesture::Pan(delta))
            }
            _ if index < 2 => self.recognize_pinch(),
            _ => None,
        }
    }

    fn recognize_pinch(&mut self) -> Option<Gesture> {
        let (a, b) = (self.pointers[0].1, self.pointers[1].1);
        let distance = (b - a).hypot();
        let previous = self.last_pinch_distance.replace(distance);

        let previous = previous?;
        let factor = if distance > previous {
            PINCH_OUT_FACTOR
        } else if distance < previous {
            PINCH_IN_FACTOR
        } else {
            return None;
        };
        Some(Gesture::Pinch {
            factor,
            anchor: a.midpoint(b),
        })
    }
}
