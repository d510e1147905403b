// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proposed geometry for resize and move gestures.

use kurbo::{Rect, Size, Vec2};

use crate::{EdgeMask, EdgeZone};

/// Size limits applied while resizing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeLimits {
    /// Smallest allowed size.
    pub min: Size,
    /// Largest allowed size.
    pub max: Size,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min: Size::ZERO,
            max: Size::new(f64::INFINITY, f64::INFINITY),
        }
    }
}

/// Clamp `start + delta` into `[min, max]`.
///
/// A `max` below `min` is treated as `min`.
pub fn resize_extent(start: f64, delta: f64, min: f64, max: f64) -> f64 {
    (start + delta).clamp(min, max.max(min))
}

/// Move the sides named by `zone` by `delta`, keeping the opposite sides fixed.
///
/// Width and height are clamped to `limits`; when a clamp applies, the moved
/// side is the one pulled back.
pub fn resize_rect(start: Rect, zone: EdgeZone, delta: Vec2, limits: SizeLimits) -> Rect {
    let sides = zone.sides();
    let mut r = start;
    if sides.contains(EdgeMask::LEFT) {
        let w = resize_extent(start.width(), -delta.x, limits.min.width, limits.max.width);
        r.x0 = r.x1 - w;
    } else if sides.contains(EdgeMask::RIGHT) {
        let w = resize_extent(start.width(), delta.x, limits.min.width, limits.max.width);
        r.x1 = r.x0 + w;
    }
    if sides.contains(EdgeMask::TOP) {
        let h = resize_extent(start.height(), -delta.y, limits.min.height, limits.max.height);
        r.y0 = r.y1 - h;
    } else if sides.contains(EdgeMask::BOTTOM) {
        let h = resize_extent(start.height(), delta.y, limits.min.height, limits.max.height);
        r.y1 = r.y0 + h;
    }
    r
}

/// Translate `start` by `delta`, keeping it inside `bounds` when given.
///
/// A rectangle larger than `bounds` is pinned to the bounds' top-left corner.
pub fn move_rect(start: Rect, delta: Vec2, bounds: Option<Rect>) -> Rect {
    let moved = start + delta;
    let Some(b) = bounds else {
        return moved;
    };
    let x = moved.x0.min(b.x1 - moved.width()).max(b.x0);
    let y = moved.y0.min(b.y1 - moved.height()).max(b.y0);
    moved.with_origin((x, y))
}
