// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators: geometry and platform services.

use core::time::Duration;

use kurbo::{Point, Rect};

/// Widget geometry in one shared page coordinate space.
pub trait GeometryProvider<W> {
    /// Bounding rectangle of `widget` in page coordinates, if it is laid out.
    fn bounds(&self, widget: &W) -> Option<Rect>;

    /// Translate a page point into `widget`-local coordinates.
    fn to_local(&self, widget: &W, page: Point) -> Option<Point> {
        let origin = self.bounds(widget)?.origin();
        Some(Point::new(page.x - origin.x, page.y - origin.y))
    }

    /// Translate a `widget`-local point into page coordinates.
    fn to_page(&self, widget: &W, local: Point) -> Option<Point> {
        let origin = self.bounds(widget)?.origin();
        Some(Point::new(local.x + origin.x, local.y + origin.y))
    }
}

/// Pointer capture and interval timer services of the host.
pub trait Platform {
    /// Request exclusive pointer capture. Returns `false` if refused.
    fn capture_pointer(&mut self) -> bool;

    /// Release pointer capture.
    fn release_pointer(&mut self);

    /// Start delivering [`tick`](crate::GestureController::tick) notifications every `period`.
    fn start_interval(&mut self, period: Duration);

    /// Stop the interval started by [`start_interval`](Self::start_interval).
    fn stop_interval(&mut self);
}
