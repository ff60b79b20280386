// Copyright 2026 the Epicycler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame source.
//!
//! [`RafLoop`] keeps a browser animation callback registered for as long as
//! there is work to do. Two things end the rescheduling: [`stop`](RafLoop::stop),
//! or the frame callback itself returning `false`. The second form is how an
//! idle plot parks — nothing is animating, so no frame is requested — and
//! [`start`](RafLoop::start) is cheap to call from every mutating entry
//! point to resume it.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Bound as plain globals; going through `web_sys::Window` would refetch and
// unwrap the window object once per frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// One animation frame, as seen by the [`RafLoop`] callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStamp {
    /// Browser timestamp in seconds (from `performance.now()`).
    pub seconds: f64,
    /// Monotonically increasing frame counter, starting at zero.
    pub frame_index: u64,
}

type FrameFn = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// The JS closure handed to `requestAnimationFrame`. Filled once at
    /// construction; the closure reaches it through a weak handle when it
    /// re-registers itself.
    frame_fn: RefCell<Option<FrameFn>>,
    running: Cell<bool>,
    /// Registration id of the pending frame, for cancellation.
    pending: Cell<i32>,
    frame_counter: Cell<u64>,
}

impl RafInner {
    fn schedule(&self) {
        if let Some(ref frame_fn) = *self.frame_fn.borrow() {
            let id = request_animation_frame(frame_fn.as_ref().unchecked_ref());
            self.pending.set(id);
        }
    }
}

/// A parkable `requestAnimationFrame` loop.
///
/// The callback receives a [`FrameStamp`] per frame and returns whether it
/// wants another one; returning `false` parks the loop until the next
/// [`start`](Self::start). Dropping the loop cancels the pending frame, so a
/// callback can never fire against freed state.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

impl RafLoop {
    /// Creates a parked loop around `callback`; call [`start`](Self::start)
    /// to begin receiving frames.
    pub fn new(mut callback: impl FnMut(FrameStamp) -> bool + 'static) -> Self {
        let inner = Rc::new(RafInner {
            frame_fn: RefCell::new(None),
            running: Cell::new(false),
            pending: Cell::new(0),
            frame_counter: Cell::new(0),
        });

        // The closure holds only a weak handle. The `RafLoop` is the sole
        // owner, so dropping it frees the state even though the browser may
        // still reference the closure.
        let weak: Weak<RafInner> = Rc::downgrade(&inner);
        let frame_fn = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else { return };
            if !inner.running.get() {
                return;
            }

            let frame_index = inner.frame_counter.get();
            inner.frame_counter.set(frame_index + 1);
            let more = callback(FrameStamp {
                seconds: timestamp_ms / 1_000.0,
                frame_index,
            });

            // `stop` may have been called from inside the callback.
            if more && inner.running.get() {
                inner.schedule();
            } else {
                inner.running.set(false);
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.frame_fn.borrow_mut() = Some(frame_fn);

        Self { inner }
    }

    /// Starts (or resumes) the loop; a no-op while already running.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);
        self.inner.schedule();
    }

    /// Parks the loop, cancelling the pending frame.
    ///
    /// [`start`](Self::start) resumes it; the frame counter keeps its value.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.pending.get());
    }

    /// Whether a frame is currently scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish()
    }
}
