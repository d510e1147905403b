// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Event: the canonical pointer/event model shared by every Thicket crate.
//!
//! ## Overview
//!
//! Platform input arrives in many shapes. This crate normalizes it into one
//! pointer-state shape and defines the cancellable event object that widgets
//! and the gesture controller exchange.
//!
//! - [`PointerState`]: position, held modifier keys, and pressed button.
//! - [`Input`]: the closed set of platform notifications a gesture engine consumes
//!   (press, move, release, key down, window blur, capture loss, leaving the window, timer tick).
//! - [`InteractionEvent`]: a per-dispatch event carrying a widget-specific kind and
//!   detail payload, with sticky [`cancel`](InteractionEvent::cancel) and
//!   [`accept`](InteractionEvent::accept) semantics.
//! - [`DropPosition`]: where a drop lands relative to its target.
//! - [`press::PressState`]: the click-vs-drag state machine applied on item press.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use thicket_event::{DropPosition, InteractionEvent, Modifiers, PointerState};
//!
//! let pointer = PointerState::new(Point::new(10.0, 20.0)).with_modifiers(Modifiers::SHIFT);
//! assert!(pointer.modifiers.contains(Modifiers::SHIFT));
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Kind { DragOver }
//!
//! let mut ev = InteractionEvent::new(Kind::DragOver, 3_usize);
//! ev.accept(DropPosition::Over);
//! assert_eq!(ev.accept_position(), Some(DropPosition::Over));
//! ev.cancel();
//! ev.cancel();
//! assert!(ev.is_cancelled());
//! ```

mod event;
mod pointer;
pub mod press;

pub use event::{DropPosition, InteractionEvent};
pub use pointer::{Input, Key, Modifiers, PointerButton, PointerState};
