// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-family handling of the "over" band when no handler accepts it.
//!
//! Widget families disagree on what an unaccepted middle band means, and the
//! difference is observable to users, so it is kept as a table rather than
//! unified:
//!
//! | Family | No handler registered | Handler registered, did not accept |
//! |---|---|---|
//! | [`List`](WidgetFamily::List) | middle band → `Before` | middle band → `Before` |
//! | [`Grid`](WidgetFamily::Grid) | middle band → `Before` | middle band → `Before` |
//! | [`Tree`](WidgetFamily::Tree) | `Over` stands (drop into node) | no highlight over the middle band |
//! | [`TabStrip`](WidgetFamily::TabStrip) | middle band → `Before` | no highlight over the middle band |
//!
//! `Before` and `After` always stand; only `Over` needs a consumer.

use thicket_event::DropPosition;

/// Widget families with distinct drop-position policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetFamily {
    /// Linear list.
    List,
    /// Grid / thumbnail list.
    Grid,
    /// Hierarchical tree.
    Tree,
    /// Tab strip.
    TabStrip,
}

/// What to do with a proposed `Over` nobody accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnacceptedOver {
    /// Treat it as `Before`.
    CollapseToBefore,
    /// Keep `Over`.
    Keep,
    /// Show no highlight and refuse the drop onto the middle band.
    Suppress,
}

impl WidgetFamily {
    /// Policy applied when the widget has no event handler at all.
    pub const fn without_handler(self) -> UnacceptedOver {
        match self {
            Self::List | Self::Grid | Self::TabStrip => UnacceptedOver::CollapseToBefore,
            Self::Tree => UnacceptedOver::Keep,
        }
    }

    /// Policy applied when a handler saw the proposal but called neither
    /// `accept` nor `cancel`.
    pub const fn with_silent_handler(self) -> UnacceptedOver {
        match self {
            Self::List | Self::Grid => UnacceptedOver::CollapseToBefore,
            Self::Tree | Self::TabStrip => UnacceptedOver::Suppress,
        }
    }

    /// Apply the no-handler rule to a geometric proposal.
    ///
    /// Resolvers call this before any handler has seen the proposal: with a
    /// handler the proposal passes through untouched, without one the
    /// [`without_handler`](Self::without_handler) policy applies.
    pub fn propose(self, proposed: DropPosition, has_handler: bool) -> Option<DropPosition> {
        if has_handler {
            Some(proposed)
        } else {
            self.settle(proposed, false, None, false)
        }
    }

    /// Settle the final position for a proposal.
    ///
    /// - `proposed` is what the resolver computed from geometry.
    /// - `has_handler` reports whether the widget has an event handler.
    /// - `accepted` is the position the handler accepted, if any.
    /// - `cancelled` reports whether the handler cancelled the event.
    ///
    /// Returns `None` when the drop must not be offered.
    pub fn settle(
        self,
        proposed: DropPosition,
        has_handler: bool,
        accepted: Option<DropPosition>,
        cancelled: bool,
    ) -> Option<DropPosition> {
        if cancelled {
            return None;
        }
        if let Some(position) = accepted {
            return Some(position);
        }
        let policy = if has_handler {
            self.with_silent_handler()
        } else {
            self.without_handler()
        };
        match (proposed, policy) {
            (DropPosition::Over, UnacceptedOver::CollapseToBefore) => Some(DropPosition::Before),
            (DropPosition::Over, UnacceptedOver::Suppress) => None,
            (position, _) => Some(position),
        }
    }
}
