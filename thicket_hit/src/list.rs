// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear list resolution over uniform rows.

use kurbo::{Point, Rect};
use thicket_event::DropPosition;

use crate::{Affordance, Flow, ResolvedTarget, WidgetFamily};

/// Geometry of a uniform-row list, in list-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListGeometry {
    /// Number of rows.
    pub len: usize,
    /// Height of every row.
    pub row_height: f64,
    /// Width of the rows (used for affordance geometry).
    pub width: f64,
    /// Vertical scroll offset of the list content.
    pub scroll_offset: f64,
}

impl ListGeometry {
    /// Create list geometry with no scroll.
    pub fn new(len: usize, row_height: f64, width: f64) -> Self {
        Self {
            len,
            // Clamp finite negatives to zero; zero-height rows resolve to nothing.
            row_height: row_height.max(0.0),
            width,
            scroll_offset: 0.0,
        }
    }

    /// Returns a copy with the given scroll offset.
    #[must_use]
    pub fn with_scroll(mut self, scroll_offset: f64) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    /// Total content height.
    pub fn content_height(&self) -> f64 {
        self.row_height * self.len as f64
    }

    /// Raw row index at `local_y`: `floor((scroll_offset + local_y) / row_height)`.
    ///
    /// Not clamped; may be negative above the first row or `>= len` below the last.
    pub fn raw_index_at(&self, local_y: f64) -> Option<isize> {
        if self.row_height <= 0.0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Row indices are far below the f64 integer range"
        )]
        let i = ((self.scroll_offset + local_y) / self.row_height).floor() as isize;
        Some(i)
    }

    /// Row rectangle for `index` in list-local (viewport) coordinates.
    pub fn row_rect(&self, index: usize) -> Rect {
        let top = index as f64 * self.row_height - self.scroll_offset;
        Rect::new(0.0, top, self.width, top + self.row_height)
    }

    /// Resolve a list-local point into a target row and drop position.
    ///
    /// Returns `None` for an empty list or degenerate row height. Points above
    /// the first row resolve `Before` row 0; points below the last row resolve
    /// `After` the last row. Without a handler the middle band collapses to
    /// `Before`.
    pub fn resolve(&self, local: Point, has_handler: bool) -> Option<ResolvedTarget> {
        if self.len == 0 {
            return None;
        }
        let raw = self.raw_index_at(local.y)?;
        let last = self.len - 1;
        let (index, proposed) = if raw < 0 {
            (0, DropPosition::Before)
        } else if raw as usize > last {
            (last, DropPosition::After)
        } else {
            let index = raw as usize;
            let row = self.row_rect(index);
            let fraction = (local.y - row.y0) / self.row_height;
            (index, DropPosition::from_thirds(fraction))
        };
        let position = WidgetFamily::List.propose(proposed, has_handler)?;
        Some(ResolvedTarget {
            index,
            position,
            affordance: Affordance::for_cell(self.row_rect(index), position, Flow::Vertical),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_of_offset_over_row_height() {
        let list = ListGeometry::new(10, 20.0, 100.0);
        let hit = list.resolve(Point::new(5.0, 30.0), true).unwrap();
        assert_eq!(hit.index, 1);
        // 30 is the middle of row 1 (20..40).
        assert_eq!(hit.position, DropPosition::Over);
        assert_eq!(hit.affordance, Affordance::Border(Rect::new(0.0, 20.0, 100.0, 40.0)));
    }

    #[test]
    fn scroll_offset_shifts_rows() {
        let list = ListGeometry::new(10, 20.0, 100.0).with_scroll(45.0);
        // 45 + 10 = 55 → row 2, fraction (55 - 40) / 20 = 0.75 → after.
        let hit = list.resolve(Point::new(0.0, 10.0), true).unwrap();
        assert_eq!(hit.index, 2);
        assert_eq!(hit.position, DropPosition::After);
        assert_eq!(list.row_rect(2), Rect::new(0.0, -5.0, 100.0, 15.0));
    }

    #[test]
    fn middle_band_collapses_without_handler() {
        let list = ListGeometry::new(3, 30.0, 50.0);
        let hit = list.resolve(Point::new(0.0, 45.0), false).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.position, DropPosition::Before);
    }

    #[test]
    fn outside_rows_clamp_to_ends() {
        let list = ListGeometry::new(3, 20.0, 50.0);
        let below = list.resolve(Point::new(0.0, 500.0), true).unwrap();
        assert_eq!((below.index, below.position), (2, DropPosition::After));
        let above = list.resolve(Point::new(0.0, -3.0), true).unwrap();
        assert_eq!((above.index, above.position), (0, DropPosition::Before));
    }

    #[test]
    fn empty_and_degenerate_lists_have_no_target() {
        assert!(ListGeometry::new(0, 20.0, 50.0).resolve(Point::ZERO, true).is_none());
        assert!(ListGeometry::new(4, 0.0, 50.0).resolve(Point::ZERO, true).is_none());
        assert!(ListGeometry::new(4, -3.0, 50.0).resolve(Point::ZERO, true).is_none());
    }

    proptest::proptest! {
        #[test]
        fn resolved_index_is_always_in_range(
            len in 1_usize..200,
            row_height in 1.0_f64..80.0,
            scroll in 0.0_f64..2000.0,
            y in -500.0_f64..5000.0,
        ) {
            let list = ListGeometry::new(len, row_height, 100.0).with_scroll(scroll);
            let hit = list.resolve(Point::new(0.0, y), true).unwrap();
            proptest::prop_assert!(hit.index < len);
        }
    }
}
