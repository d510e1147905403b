// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click-vs-drag disambiguation for item presses.
//!
//! Pressing an item can mean two things: "select this" or "start dragging this".
//! For an item that is already selected the two intents conflict, because
//! selecting it again on press would collapse a multi-selection the user is
//! about to drag. [`PressState`] resolves this with a small state machine:
//!
//! - **Immediate**: pressing an unselected item, or pressing with any modifier
//!   key held, selects on press.
//! - **Deferred**: pressing an already-selected item without modifiers records
//!   the item but leaves the selection alone. If the pointer is released over
//!   the same item and no gesture started in between, the selection is applied
//!   on release (click semantics).
//! - **Drag wins**: any move notification while the button is held starts a
//!   gesture and discards a deferred selection.
//!
//! ## Usage
//!
//! ```
//! use kurbo::Point;
//! use thicket_event::Modifiers;
//! use thicket_event::press::{PressOutcome, PressState, ReleaseOutcome};
//!
//! let mut press: PressState<usize> = PressState::new();
//!
//! // Item 2 is already selected: selection is deferred.
//! let outcome = press.on_press(2, true, Modifiers::empty(), Point::new(5.0, 45.0));
//! assert_eq!(outcome, PressOutcome::Deferred);
//!
//! // Released over the same item without moving: apply it now.
//! assert_eq!(press.on_release(Some(&2)), ReleaseOutcome::ApplyDeferred(2));
//! ```
//!
//! ```
//! # use kurbo::Point;
//! # use thicket_event::Modifiers;
//! # use thicket_event::press::{PressOutcome, PressState, ReleaseOutcome};
//! let mut press: PressState<usize> = PressState::new();
//! press.on_press(2, true, Modifiers::empty(), Point::new(5.0, 45.0));
//!
//! // Movement while held starts a drag; the deferred selection is dropped.
//! assert!(press.on_move(Point::new(6.0, 48.0)));
//! assert_eq!(press.on_gesture_start(), Some(2));
//! assert_eq!(press.on_release(Some(&2)), ReleaseOutcome::DragEnded);
//! ```

use kurbo::Point;

use crate::Modifiers;

/// Phase of the press state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum PressPhase<K> {
    /// No button held over an item.
    Idle,
    /// Button held; selection was applied on press.
    Pressed {
        /// Pressed item.
        item: K,
        /// Pointer position at press time.
        down: Point,
    },
    /// Button held over an already-selected item; selection is deferred to release.
    PressPendingSelection {
        /// Pressed item whose selection is pending.
        item: K,
        /// Pointer position at press time.
        down: Point,
    },
    /// A gesture started from this press.
    Dragging,
}

/// What the widget should do right after a press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PressOutcome<K> {
    /// Apply selection to this item now.
    SelectNow(K),
    /// Leave selection untouched until release.
    Deferred,
}

/// What the widget should do on release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome<K> {
    /// Apply the deferred selection to this item.
    ApplyDeferred(K),
    /// Selection was already applied on press; nothing left to do.
    AlreadySelected(K),
    /// A gesture started from the press; release belongs to the gesture.
    DragEnded,
    /// Released away from the pressed item, or no press was active.
    Suppressed(Option<K>),
}

/// Click-vs-drag state machine for a single pointer.
#[derive(Clone, Debug)]
pub struct PressState<K> {
    phase: PressPhase<K>,
    /// Distance the pointer must travel while held before a drag starts.
    ///
    /// `None` means any move notification while the button is held starts a drag.
    pub drag_threshold: Option<f64>,
}

impl<K: PartialEq + Clone> PressState<K> {
    /// Create an idle state machine where any move starts a drag.
    pub const fn new() -> Self {
        Self {
            phase: PressPhase::Idle,
            drag_threshold: None,
        }
    }

    /// Create an idle state machine with a spatial drag threshold.
    pub const fn with_threshold(drag_threshold: Option<f64>) -> Self {
        Self {
            phase: PressPhase::Idle,
            drag_threshold,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> &PressPhase<K> {
        &self.phase
    }

    /// Returns `true` while the button is held over an item (pending or applied).
    pub const fn is_pressed(&self) -> bool {
        matches!(
            self.phase,
            PressPhase::Pressed { .. } | PressPhase::PressPendingSelection { .. }
        )
    }

    /// Item pressed in the current interaction, if the press has not turned into a drag.
    pub fn pressed_item(&self) -> Option<&K> {
        match &self.phase {
            PressPhase::Pressed { item, .. } | PressPhase::PressPendingSelection { item, .. } => {
                Some(item)
            }
            PressPhase::Idle | PressPhase::Dragging => None,
        }
    }

    /// Record a press on `item`.
    ///
    /// `already_selected` reports the item's selection state before the press.
    pub fn on_press(
        &mut self,
        item: K,
        already_selected: bool,
        modifiers: Modifiers,
        position: Point,
    ) -> PressOutcome<K> {
        if already_selected && modifiers.is_empty() {
            self.phase = PressPhase::PressPendingSelection {
                item,
                down: position,
            };
            PressOutcome::Deferred
        } else {
            self.phase = PressPhase::Pressed {
                item: item.clone(),
                down: position,
            };
            PressOutcome::SelectNow(item)
        }
    }

    /// Process a move while the button may be held.
    ///
    /// Returns `true` when the caller should start a gesture. The state machine
    /// does not switch to [`PressPhase::Dragging`] until
    /// [`on_gesture_start`](Self::on_gesture_start) confirms that one started, so
    /// a refused or cancelled drag start leaves the press intact.
    pub fn on_move(&self, position: Point) -> bool {
        let down = match &self.phase {
            PressPhase::Pressed { down, .. } | PressPhase::PressPendingSelection { down, .. } => {
                *down
            }
            PressPhase::Idle | PressPhase::Dragging => return false,
        };
        self.drag_threshold
            .is_none_or(|threshold| down.distance(position) > threshold)
    }

    /// A gesture started from the current press.
    ///
    /// Returns the item whose deferred selection was discarded, if any.
    pub fn on_gesture_start(&mut self) -> Option<K> {
        match core::mem::replace(&mut self.phase, PressPhase::Dragging) {
            PressPhase::PressPendingSelection { item, .. } => Some(item),
            PressPhase::Pressed { .. } => None,
            PressPhase::Idle => {
                // A gesture can start without a tracked press (e.g. programmatic drags).
                self.phase = PressPhase::Idle;
                None
            }
            PressPhase::Dragging => None,
        }
    }

    /// Process a release. `current` is the item under the pointer, if any.
    pub fn on_release(&mut self, current: Option<&K>) -> ReleaseOutcome<K> {
        match core::mem::replace(&mut self.phase, PressPhase::Idle) {
            PressPhase::Idle => ReleaseOutcome::Suppressed(None),
            PressPhase::Dragging => ReleaseOutcome::DragEnded,
            PressPhase::PressPendingSelection { item, .. } => {
                if current == Some(&item) {
                    ReleaseOutcome::ApplyDeferred(item)
                } else {
                    ReleaseOutcome::Suppressed(Some(item))
                }
            }
            PressPhase::Pressed { item, .. } => {
                if current == Some(&item) {
                    ReleaseOutcome::AlreadySelected(item)
                } else {
                    ReleaseOutcome::Suppressed(Some(item))
                }
            }
        }
    }

    /// Drop any press or drag in progress.
    ///
    /// Returns `true` if the state machine was not idle.
    pub fn cancel(&mut self) -> bool {
        !matches!(
            core::mem::replace(&mut self.phase, PressPhase::Idle),
            PressPhase::Idle
        )
    }
}

impl<K: PartialEq + Clone> Default for PressState<K> {
    fn default() -> Self {
        Self::new()
    }
}
