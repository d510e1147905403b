// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge and corner classification for resizable rectangles.

use kurbo::{Point, Rect};

bitflags::bitflags! {
    /// Sides of a rectangle a widget lets the user drag.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EdgeMask: u8 {
        /// Left side.
        const LEFT = 1 << 0;
        /// Top side.
        const TOP = 1 << 1;
        /// Right side.
        const RIGHT = 1 << 2;
        /// Bottom side.
        const BOTTOM = 1 << 3;
    }
}

/// One of the eight resize directions, or none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeZone {
    /// Not near any honoured edge.
    #[default]
    None,
    /// Left side.
    Left,
    /// Top side.
    Top,
    /// Right side.
    Right,
    /// Bottom side.
    Bottom,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl EdgeZone {
    /// The sides this zone moves.
    pub const fn sides(self) -> EdgeMask {
        match self {
            Self::None => EdgeMask::empty(),
            Self::Left => EdgeMask::LEFT,
            Self::Top => EdgeMask::TOP,
            Self::Right => EdgeMask::RIGHT,
            Self::Bottom => EdgeMask::BOTTOM,
            Self::TopLeft => EdgeMask::TOP.union(EdgeMask::LEFT),
            Self::TopRight => EdgeMask::TOP.union(EdgeMask::RIGHT),
            Self::BottomLeft => EdgeMask::BOTTOM.union(EdgeMask::LEFT),
            Self::BottomRight => EdgeMask::BOTTOM.union(EdgeMask::RIGHT),
        }
    }

    fn from_sides(sides: EdgeMask) -> Self {
        let horizontal = sides & (EdgeMask::LEFT | EdgeMask::RIGHT);
        let vertical = sides & (EdgeMask::TOP | EdgeMask::BOTTOM);
        match (vertical, horizontal) {
            (v, h) if v == EdgeMask::TOP && h == EdgeMask::LEFT => Self::TopLeft,
            (v, h) if v == EdgeMask::TOP && h == EdgeMask::RIGHT => Self::TopRight,
            (v, h) if v == EdgeMask::BOTTOM && h == EdgeMask::LEFT => Self::BottomLeft,
            (v, h) if v == EdgeMask::BOTTOM && h == EdgeMask::RIGHT => Self::BottomRight,
            (v, _) if v == EdgeMask::TOP => Self::Top,
            (v, _) if v == EdgeMask::BOTTOM => Self::Bottom,
            (_, h) if h == EdgeMask::LEFT => Self::Left,
            (_, h) if h == EdgeMask::RIGHT => Self::Right,
            _ => Self::None,
        }
    }
}

/// Parameters for [`classify`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeConfig {
    /// Maximum distance from a side, in pixels, that still counts as on it.
    pub tolerance: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self { tolerance: 6.0 }
    }
}

/// Classify `pt` against the sides of `rect`.
///
/// A side is hit when the point lies within `tolerance` of it (inside or
/// outside the rectangle) and within the tolerance-expanded extent of the
/// perpendicular axis. Sides missing from `mask` are ignored, so a corner is
/// only reported when both of its sides are honoured.
pub fn classify(rect: Rect, pt: Point, mask: EdgeMask, config: EdgeConfig) -> EdgeZone {
    let tol = config.tolerance.max(0.0);
    let within_x = pt.x >= rect.x0 - tol && pt.x <= rect.x1 + tol;
    let within_y = pt.y >= rect.y0 - tol && pt.y <= rect.y1 + tol;
    if !(within_x && within_y) {
        return EdgeZone::None;
    }
    let horizontal = pick_side(
        mask,
        (EdgeMask::LEFT, (pt.x - rect.x0).abs()),
        (EdgeMask::RIGHT, (pt.x - rect.x1).abs()),
        tol,
    );
    let vertical = pick_side(
        mask,
        (EdgeMask::TOP, (pt.y - rect.y0).abs()),
        (EdgeMask::BOTTOM, (pt.y - rect.y1).abs()),
        tol,
    );
    EdgeZone::from_sides(horizontal | vertical)
}

/// On narrow rectangles both sides of an axis can qualify; the closer one wins.
fn pick_side(mask: EdgeMask, low: (EdgeMask, f64), high: (EdgeMask, f64), tol: f64) -> EdgeMask {
    let low_ok = mask.contains(low.0) && low.1 <= tol;
    let high_ok = mask.contains(high.0) && high.1 <= tol;
    match (low_ok, high_ok) {
        (true, true) if low.1 <= high.1 => low.0,
        (true, true) | (false, true) => high.0,
        (true, false) => low.0,
        (false, false) => EdgeMask::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: Rect = Rect::new(100.0, 100.0, 300.0, 250.0);

    fn zone(x: f64, y: f64, mask: EdgeMask) -> EdgeZone {
        classify(R, Point::new(x, y), mask, EdgeConfig::default())
    }

    #[test]
    fn sides_and_corners() {
        let all = EdgeMask::all();
        assert_eq!(zone(102.0, 170.0, all), EdgeZone::Left);
        assert_eq!(zone(298.0, 170.0, all), EdgeZone::Right);
        assert_eq!(zone(200.0, 96.0, all), EdgeZone::Top);
        assert_eq!(zone(200.0, 255.0, all), EdgeZone::Bottom);
        assert_eq!(zone(101.0, 103.0, all), EdgeZone::TopLeft);
        assert_eq!(zone(304.0, 98.0, all), EdgeZone::TopRight);
        assert_eq!(zone(97.0, 249.0, all), EdgeZone::BottomLeft);
        assert_eq!(zone(300.0, 250.0, all), EdgeZone::BottomRight);
        assert_eq!(zone(200.0, 170.0, all), EdgeZone::None);
    }

    #[test]
    fn tolerance_is_six_pixels() {
        let all = EdgeMask::all();
        assert_eq!(zone(306.0, 170.0, all), EdgeZone::Right);
        assert_eq!(zone(306.5, 170.0, all), EdgeZone::None);
        assert_eq!(zone(293.5, 170.0, all), EdgeZone::None);
    }

    #[test]
    fn mask_limits_zones() {
        let se = EdgeMask::RIGHT | EdgeMask::BOTTOM;
        assert_eq!(zone(102.0, 170.0, se), EdgeZone::None);
        assert_eq!(zone(101.0, 103.0, se), EdgeZone::None);
        assert_eq!(zone(300.0, 250.0, se), EdgeZone::BottomRight);
        // Corner with only one honoured side degrades to that side.
        assert_eq!(zone(101.0, 249.0, se), EdgeZone::Bottom);
        assert_eq!(zone(298.0, 170.0, EdgeMask::empty()), EdgeZone::None);
    }

    #[test]
    fn narrow_rect_prefers_closer_side() {
        let thin = Rect::new(0.0, 0.0, 8.0, 100.0);
        let at = |x| classify(thin, Point::new(x, 50.0), EdgeMask::all(), EdgeConfig::default());
        assert_eq!(at(1.0), EdgeZone::Left);
        assert_eq!(at(3.0), EdgeZone::Left);
        assert_eq!(at(5.0), EdgeZone::Right);
        let right_only = classify(
            thin,
            Point::new(3.0, 50.0),
            EdgeMask::RIGHT,
            EdgeConfig::default(),
        );
        assert_eq!(right_only, EdgeZone::Right);
    }

    #[test]
    fn zone_sides_round_trip() {
        for z in [EdgeZone::TopLeft, EdgeZone::Bottom, EdgeZone::Right, EdgeZone::None] {
            assert_eq!(EdgeZone::from_sides(z.sides()), z);
        }
    }
}
