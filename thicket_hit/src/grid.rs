// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid / thumbnail list resolution.
//!
//! Thumbnail lists wrap items into rows whose lengths depend on the container
//! width, so rows cannot be derived from the index alone. Instead a
//! [`GridMatrix`] is built once per gesture by scanning the rendered item
//! rectangles: items sharing a top offset form a row, and each row keeps its
//! items' left offsets in ascending order.

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use thicket_event::DropPosition;

use crate::{Affordance, Flow, ResolvedTarget, WidgetFamily};

/// One rendered item inside a [`GridRow`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    /// Flat item index.
    pub index: usize,
    /// Rendered item rectangle.
    pub rect: Rect,
}

/// Items sharing a top offset.
#[derive(Clone, Debug, PartialEq)]
pub struct GridRow {
    /// Shared top offset.
    pub top: f64,
    /// Tallest bottom edge among the row's items.
    pub bottom: f64,
    /// Items sorted by left offset.
    pub cells: SmallVec<[GridCell; 8]>,
}

/// Row/column matrix of a rendered grid, in container-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridMatrix {
    rows: Vec<GridRow>,
}

impl GridMatrix {
    /// Build the matrix from rendered item rectangles, in item index order.
    ///
    /// Rows are ordered by top offset and cells within a row by left offset.
    pub fn build(items: impl IntoIterator<Item = Rect>) -> Self {
        let mut rows: Vec<GridRow> = Vec::new();
        for (index, rect) in items.into_iter().enumerate() {
            let cell = GridCell { index, rect };
            // Equal top offset means same row; rendered tops are exact copies for
            // items laid out on one line.
            if let Some(row) = rows.iter_mut().find(|r| r.top == rect.y0) {
                row.bottom = row.bottom.max(rect.y1);
                row.cells.push(cell);
            } else {
                let mut cells = SmallVec::new();
                cells.push(cell);
                rows.push(GridRow {
                    top: rect.y0,
                    bottom: rect.y1,
                    cells,
                });
            }
        }
        rows.sort_by(|a, b| a.top.total_cmp(&b.top));
        for row in &mut rows {
            row.cells.sort_by(|a, b| a.rect.x0.total_cmp(&b.rect.x0));
        }
        Self { rows }
    }

    /// Rows of the matrix, top to bottom.
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Returns `true` if the matrix holds no items.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the row containing `y`.
    ///
    /// A row spans from its top to the next row's top; points above the first
    /// row resolve to row 0 and points below the last row to the last row.
    pub fn row_at(&self, y: f64) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        let after = self.rows.partition_point(|r| r.top <= y);
        Some(after.saturating_sub(1))
    }

    /// Resolve a container-local point into a target item and drop position.
    ///
    /// Within the row the target is the last item whose left offset is at or
    /// before `x` (the first item if `x` is left of all of them). A point right
    /// of the last item's right edge resolves `After` that item. Horizontal
    /// position within an item uses thirds, with the same handler rule as the
    /// linear list.
    pub fn resolve(&self, local: Point, has_handler: bool) -> Option<ResolvedTarget> {
        let row = &self.rows[self.row_at(local.y)?];
        let slot = row.cells.partition_point(|c| c.rect.x0 <= local.x);
        let cell = row.cells[slot.saturating_sub(1)];
        let proposed = if local.x >= cell.rect.x1 {
            DropPosition::After
        } else if local.x < cell.rect.x0 {
            DropPosition::Before
        } else {
            let width = cell.rect.width();
            if width <= 0.0 {
                DropPosition::Before
            } else {
                DropPosition::from_thirds((local.x - cell.rect.x0) / width)
            }
        };
        let position = WidgetFamily::Grid.propose(proposed, has_handler)?;
        Some(ResolvedTarget {
            index: cell.index,
            position,
            affordance: Affordance::for_cell(cell.rect, position, Flow::Horizontal),
        })
    }
}
