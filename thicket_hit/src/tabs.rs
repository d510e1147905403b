// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tab strip resolution.

use kurbo::{Point, Rect};
use thicket_event::DropPosition;

use crate::{Affordance, Flow, ResolvedTarget, WidgetFamily};

/// Resolve a strip-local point against rendered tab rectangles.
///
/// Tabs must be ordered left to right. The left third of a tab is `Before`,
/// the right third is `After`, and the remainder is `Over`. Points left of the
/// first tab resolve `Before` it and points right of the last tab resolve
/// `After` it. Returns `None` for an empty strip.
pub fn resolve_tabs(tabs: &[Rect], local: Point, has_handler: bool) -> Option<ResolvedTarget> {
    let slot = tabs.partition_point(|r| r.x0 <= local.x);
    let index = slot.saturating_sub(1);
    let tab = *tabs.get(index)?;
    let proposed = if local.x < tab.x0 {
        DropPosition::Before
    } else if local.x >= tab.x1 {
        DropPosition::After
    } else {
        let width = tab.width();
        if width <= 0.0 {
            DropPosition::Before
        } else {
            DropPosition::from_thirds((local.x - tab.x0) / width)
        }
    };
    let position = WidgetFamily::TabStrip.propose(proposed, has_handler)?;
    Some(ResolvedTarget {
        index,
        position,
        affordance: Affordance::for_cell(tab, position, Flow::Horizontal),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> [Rect; 3] {
        [
            Rect::new(0.0, 0.0, 90.0, 24.0),
            Rect::new(90.0, 0.0, 150.0, 24.0),
            Rect::new(150.0, 0.0, 270.0, 24.0),
        ]
    }

    #[test]
    fn horizontal_thirds() {
        let tabs = strip();
        let at = |x: f64| {
            let hit = resolve_tabs(&tabs, Point::new(x, 10.0), true).unwrap();
            (hit.index, hit.position)
        };
        assert_eq!(at(10.0), (0, DropPosition::Before));
        assert_eq!(at(45.0), (0, DropPosition::Over));
        assert_eq!(at(80.0), (0, DropPosition::After));
        assert_eq!(at(95.0), (1, DropPosition::Before));
        assert_eq!(at(260.0), (2, DropPosition::After));
    }

    #[test]
    fn beyond_the_strip_clamps() {
        let tabs = strip();
        let right = resolve_tabs(&tabs, Point::new(400.0, 10.0), true).unwrap();
        assert_eq!((right.index, right.position), (2, DropPosition::After));
        let left = resolve_tabs(&tabs, Point::new(-5.0, 10.0), true).unwrap();
        assert_eq!((left.index, left.position), (0, DropPosition::Before));
    }

    #[test]
    fn over_collapses_without_handler() {
        let tabs = strip();
        let hit = resolve_tabs(&tabs, Point::new(45.0, 10.0), false).unwrap();
        assert_eq!(hit.position, DropPosition::Before);
    }

    #[test]
    fn empty_strip_has_no_target() {
        assert!(resolve_tabs(&[], Point::new(1.0, 1.0), true).is_none());
    }
}
