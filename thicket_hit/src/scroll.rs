// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auto-scroll near container edges and dwell-to-expand tracking.

use kurbo::{Point, Rect};

use crate::Flow;

/// Auto-scroll and auto-expand parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScrollConfig {
    /// Distance from a container edge, in pixels, that triggers scrolling.
    pub margin: f64,
    /// Scroll distance per timer tick.
    pub step: f64,
    /// Consecutive ticks over one collapsed node before it expands.
    pub expand_after_ticks: u32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            margin: 16.0,
            step: 10.0,
            expand_after_ticks: 3,
        }
    }
}

impl AutoScrollConfig {
    /// New scroll offset for one tick, or `None` if the offset does not change.
    ///
    /// `viewport` and `pointer` share one coordinate space. The offset moves by
    /// [`step`](Self::step) toward the edge the pointer is within
    /// [`margin`](Self::margin) of, clamped to `[0, max_scroll]`.
    pub fn step_offset(
        &self,
        viewport: Rect,
        pointer: Point,
        flow: Flow,
        offset: f64,
        max_scroll: f64,
    ) -> Option<f64> {
        let (p, lo, hi) = match flow {
            Flow::Vertical => (pointer.y, viewport.y0, viewport.y1),
            Flow::Horizontal => (pointer.x, viewport.x0, viewport.x1),
        };
        let delta = if p < lo + self.margin {
            -self.step
        } else if p > hi - self.margin {
            self.step
        } else {
            return None;
        };
        let next = (offset + delta).clamp(0.0, max_scroll.max(0.0));
        (next != offset).then_some(next)
    }
}

/// Counts consecutive ticks spent over one expandable node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DwellTracker {
    node: Option<usize>,
    ticks: u32,
}

impl DwellTracker {
    /// Create an idle tracker.
    pub const fn new() -> Self {
        Self { node: None, ticks: 0 }
    }

    /// Record one tick.
    ///
    /// - `node` is the item under the pointer, if any.
    /// - `expandable` is true for collapsed nodes that have children.
    /// - `scrolled` is true if this tick changed the scroll offset.
    ///
    /// Returns the node to expand once it has been dwelt on for
    /// `expand_after_ticks` consecutive ticks; the count then restarts.
    pub fn tick(
        &mut self,
        node: Option<usize>,
        expandable: bool,
        scrolled: bool,
        config: &AutoScrollConfig,
    ) -> Option<usize> {
        if scrolled || !expandable || node.is_none() {
            *self = Self::new();
            return None;
        }
        if self.node == node {
            self.ticks += 1;
        } else {
            self.node = node;
            self.ticks = 1;
        }
        if self.ticks >= config.expand_after_ticks {
            *self = Self::new();
            return node;
        }
        None
    }

    /// Node currently being dwelt on.
    pub const fn node(&self) -> Option<usize> {
        self.node
    }

    /// Consecutive ticks counted for [`node`](Self::node).
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }
}
