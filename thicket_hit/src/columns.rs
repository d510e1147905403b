// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table column boundaries for reorder and resize hit testing.

use kurbo::Line;
use smallvec::SmallVec;

/// Column edges and midpoints measured from rendered cell widths.
///
/// Built once per gesture. Insertion index `i` (0 ..= column count) owns the
/// range `(mid[i - 1], mid[i]]` where `mid[k]` is the centre of column `k`;
/// a pointer exactly on a centre goes to the lower index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnBoundaries {
    edges: SmallVec<[f64; 16]>,
    mids: SmallVec<[f64; 16]>,
}

impl ColumnBoundaries {
    /// Build boundaries from the left edge of the first column and each column's width.
    pub fn from_widths(origin_x: f64, widths: impl IntoIterator<Item = f64>) -> Self {
        let mut edges = SmallVec::new();
        let mut mids = SmallVec::new();
        let mut x = origin_x;
        edges.push(x);
        for w in widths {
            let w = w.max(0.0);
            mids.push(x + w * 0.5);
            x += w;
            edges.push(x);
        }
        Self { edges, mids }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.mids.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.mids.is_empty()
    }

    /// Insertion index for pointer `x`, in `0 ..= len()`.
    pub fn insertion_index(&self, x: f64) -> usize {
        self.mids.partition_point(|&m| m < x)
    }

    /// X coordinate of boundary `index` (left edge of column `index`).
    pub fn boundary_x(&self, index: usize) -> Option<f64> {
        self.edges.get(index).copied()
    }

    /// Vertical insertion line at boundary `index` spanning `top..bottom`.
    pub fn insertion_line(&self, index: usize, top: f64, bottom: f64) -> Option<Line> {
        let x = self.boundary_x(index)?;
        Some(Line::new((x, top), (x, bottom)))
    }

    /// Column whose right edge is within `tolerance` of `x`.
    ///
    /// When two edges qualify the closer one wins.
    pub fn resize_handle_at(&self, x: f64, tolerance: f64) -> Option<usize> {
        self.edges
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &edge)| (i - 1, (x - edge).abs()))
            .filter(|&(_, d)| d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(column, _)| column)
    }

    /// Width of column `index`.
    pub fn width(&self, index: usize) -> Option<f64> {
        Some(self.edges.get(index + 1)? - self.edges.get(index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_at_125_inserts_at_2() {
        let cols = ColumnBoundaries::from_widths(0.0, [50.0, 70.0, 30.0]);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols.insertion_index(125.0), 2);
        assert_eq!(cols.boundary_x(2), Some(120.0));
    }

    #[test]
    fn ranges_cover_every_insertion_index() {
        let cols = ColumnBoundaries::from_widths(0.0, [50.0, 70.0, 30.0]);
        assert_eq!(cols.insertion_index(-40.0), 0);
        assert_eq!(cols.insertion_index(24.0), 0);
        assert_eq!(cols.insertion_index(26.0), 1);
        assert_eq!(cols.insertion_index(140.0), 3);
        assert_eq!(cols.insertion_index(900.0), 3);
    }

    #[test]
    fn midpoint_ties_go_to_lower_index() {
        let cols = ColumnBoundaries::from_widths(0.0, [50.0, 70.0, 30.0]);
        assert_eq!(cols.insertion_index(25.0), 0);
        assert_eq!(cols.insertion_index(85.0), 1);
        assert_eq!(cols.insertion_index(135.0), 2);
    }

    #[test]
    fn resize_handles_sit_on_right_edges() {
        let cols = ColumnBoundaries::from_widths(10.0, [50.0, 70.0, 30.0]);
        assert_eq!(cols.resize_handle_at(62.0, 6.0), Some(0));
        assert_eq!(cols.resize_handle_at(128.0, 6.0), Some(1));
        assert_eq!(cols.resize_handle_at(100.0, 6.0), None);
        // The left edge of the first column is not a handle.
        assert_eq!(cols.resize_handle_at(10.0, 6.0), None);
        assert_eq!(cols.width(1), Some(70.0));
    }

    #[test]
    fn insertion_line_is_vertical() {
        let cols = ColumnBoundaries::from_widths(0.0, [40.0, 40.0]);
        assert_eq!(cols.insertion_line(1, 0.0, 24.0), Some(Line::new((40.0, 0.0), (40.0, 24.0))));
        assert_eq!(cols.insertion_line(5, 0.0, 24.0), None);
    }

    proptest::proptest! {
        #[test]
        fn insertion_index_never_exceeds_column_count(
            widths in proptest::collection::vec(0.0_f64..300.0, 0..12),
            x in -500.0_f64..4000.0,
        ) {
            let cols = ColumnBoundaries::from_widths(0.0, widths.iter().copied());
            proptest::prop_assert!(cols.insertion_index(x) <= cols.len());
        }
    }
}
