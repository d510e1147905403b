// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable interaction events.

/// Where a dropped payload lands relative to the resolved target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropPosition {
    /// Insert before the target.
    Before,
    /// Drop onto the target itself (e.g. into a folder).
    Over,
    /// Insert after the target.
    After,
}

impl DropPosition {
    /// Classify a fraction along an item's extent into thirds.
    ///
    /// `fraction` is clamped into `[0, 1]`. The first third is [`Before`](Self::Before),
    /// the last third is [`After`](Self::After), and the rest is [`Over`](Self::Over).
    pub fn from_thirds(fraction: f64) -> Self {
        let f = fraction.clamp(0.0, 1.0);
        if f < 1.0 / 3.0 {
            Self::Before
        } else if f >= 2.0 / 3.0 {
            Self::After
        } else {
            Self::Over
        }
    }
}

/// One dispatched interaction event.
///
/// Events are created fresh for each dispatch and never reused. `K` is the
/// widget-specific event kind and `T` the widget-specific detail payload.
///
/// Cancellation is sticky: once [`cancel`](Self::cancel) has been called the event
/// stays cancelled. Drop-capable events record the position a consumer agreed to
/// with [`accept`](Self::accept); the last call wins.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionEvent<K, T> {
    /// Event kind.
    pub kind: K,
    /// Widget-specific detail payload.
    pub detail: T,
    cancelled: bool,
    accept_position: Option<DropPosition>,
}

impl<K, T> InteractionEvent<K, T> {
    /// Create a fresh, uncancelled event.
    pub const fn new(kind: K, detail: T) -> Self {
        Self {
            kind,
            detail,
            cancelled: false,
            accept_position: None,
        }
    }

    /// Cancel the event. Calling this more than once has no further effect.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Accept a drop at `position`.
    pub fn accept(&mut self, position: DropPosition) {
        self.accept_position = Some(position);
    }

    /// Position passed to the most recent [`accept`](Self::accept), if any.
    pub const fn accept_position(&self) -> Option<DropPosition> {
        self.accept_position
    }
}
