// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Gesture: one shared engine for every pointer gesture.
//!
//! Drag-and-drop, column resize, splitter drags, and dialog move/resize all
//! compete for the same pointer. [`GestureController`] arbitrates them: at most
//! one gesture exists at a time, it owns the per-widget context memoized during
//! the gesture, and every way a gesture can end (release, Escape, window blur,
//! capture loss, leaving the window, explicit cancel, or a handler's request)
//! funnels into the same teardown.
//!
//! The host supplies three collaborators:
//!
//! - [`GeometryProvider`]: widget bounds and page/local point translation.
//! - [`OverlayRenderer`]: border box, insertion line, shade box, and cursor.
//! - [`Platform`]: pointer capture and the interval timer.
//!
//! Widgets register with [`Capabilities`] and a [`WidgetKind`], install drop
//! handlers, and start gestures. Handlers see the gesture through a
//! [`GestureCx`].
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use thicket_event::{Key, PointerState};
//! use thicket_gesture::recording::{FixedGeometry, Recorder};
//! use thicket_gesture::{
//!     Capabilities, CancelReason, DropKind, GestureController, GestureOutcome, GestureStart,
//!     WidgetKind,
//! };
//! use thicket_hit::DropPosition;
//!
//! let geometry = FixedGeometry::default();
//! geometry.set(1_u32, Rect::new(0.0, 0.0, 200.0, 100.0));
//! let rec = Recorder::default();
//! let mut gc: GestureController<u32, &str> = GestureController::new(geometry, rec.clone(), rec.clone());
//!
//! gc.register_widget(1, WidgetKind::List, Capabilities::DROP_TARGET);
//! gc.set_drop_handler(1, |ev, _cx| {
//!     if ev.kind == DropKind::Over {
//!         ev.accept(DropPosition::Before);
//!     }
//! })
//! .unwrap();
//!
//! gc.start_gesture(GestureStart::drag(PointerState::new(Point::new(5.0, 5.0)), "file.txt"))
//!     .unwrap();
//! assert!(gc.pointer_move(PointerState::new(Point::new(20.0, 30.0)), Some(1)));
//! assert_eq!(gc.hovered_widget(), Some(1));
//!
//! gc.key_down(Key::Escape);
//! assert!(!gc.is_active());
//! assert_eq!(gc.last_outcome(), Some(GestureOutcome::Cancelled(CancelReason::Escape)));
//! assert!(gc.overlays().is_clear());
//! ```
//!
//! ## Features
//!
//! - `tracing`: log gesture start, target changes, drops, cancellations, and
//!   timer activity through the `tracing` crate.

mod caps;
mod context;
mod controller;
mod error;
mod overlay;
mod platform;
pub mod recording;

pub use caps::{Capabilities, NoParent, ParentLookup, WidgetKind};
pub use context::{GestureCx, WidgetContext};
pub use controller::{
    CancelReason, DropDetail, DropEvent, DropHandler, DropKind, GestureConfig, GestureController,
    GestureMode, GestureOutcome, GestureStart, Listener, ListenerEvent, ListenerKind,
};
pub use error::{GestureError, Result};
pub use overlay::{CursorGlyph, OverlayRenderer, Overlays};
pub use platform::{GeometryProvider, Platform};
