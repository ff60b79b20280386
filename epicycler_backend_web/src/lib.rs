// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for epicycler.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` frame source
//! - [`CanvasSurface`]: 2D canvas implementation of the core drawing contract
//! - [`EpicyclePlot`]: the assembled plot object exported to JavaScript

#![no_std]

extern crate alloc;

mod canvas;
mod plot;
mod raf;

pub use canvas::CanvasSurface;
pub use epicycler_core::surface::Surface;
pub use plot::EpicyclePlot;
pub use raf::{FrameStamp, RafLoop};
