// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core math and state for interactive Fourier epicycle plots.
//!
//! `epicycler_core` owns everything about an epicycle plot that is not
//! platform drawing: the pan/zoom coordinate mapping, the trigonometric
//! path engine, DFT shape analysis, gesture recognition, and the per-frame
//! animation driver. It is `no_std` compatible (with `alloc`); backends
//! supply a [`surface::Surface`] implementation and a frame callback.
//!
//! # Architecture
//!
//! Each frame flows the same way regardless of platform:
//!
//! ```text
//!   Backend (frame callback, pointer events)
//!       │
//!       ▼
//!   GestureTracker ──► Gesture ──► CoordinateSystem (pan/zoom)
//!                                        │
//!   Animator::tick() ──► PathEngine      │
//!         │                  │           │
//!         └──────────────────┴───────────┘
//!                            ▼
//!              render::draw_* ──► Surface (backend)
//! ```
//!
//! **[`coords`]** — Cartesian ↔ screen affine mapping with anchored zoom,
//! bounded domain, and adaptive power-of-ten grids.
//!
//! **[`path`]** — Frequency components and the engine that sums them into a
//! closed path, with truncation and drift-free time stepping.
//!
//! **[`spectrum`]** — Direct DFT turning a sampled shape into frequency
//! components in canonical `0, +1, −1, …` order.
//!
//! **[`driver`]** — Per-frame animator: time stepping plus the single active
//! view transition (zoom, recenter, reset).
//!
//! **[`input`]** — Pointer-cache gesture recognition (drag pan, pinch zoom).
//!
//! **[`surface`]** — The [`Surface`](surface::Surface) drawing trait that
//! platform backends implement.
//!
//! **[`render`]** — Layered frame description: grid/axes/labels, epicycles,
//! path, marker.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod coords;
pub mod driver;
pub mod input;
pub mod path;
pub mod render;
pub mod spectrum;
pub mod surface;
