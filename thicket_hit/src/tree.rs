// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical tree resolution over item labels.

use kurbo::{Point, Rect};
use thicket_event::DropPosition;

use crate::{Affordance, Flow, ResolvedTarget, WidgetFamily};

/// A rendered tree row label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeLabel {
    /// Flat (visible-order) index of the item.
    pub index: usize,
    /// Label rectangle in tree-local coordinates.
    pub rect: Rect,
    /// The root item has no siblings and only accepts drops onto itself.
    pub is_root: bool,
}

impl TreeLabel {
    /// Resolve a tree-local point against this label.
    ///
    /// The label height is split into thirds: top is `Before`, bottom is
    /// `After`, the middle is `Over`. The root always resolves to `Over`.
    pub fn resolve(&self, local: Point, has_handler: bool) -> Option<ResolvedTarget> {
        let proposed = if self.is_root {
            DropPosition::Over
        } else {
            let height = self.rect.height();
            if height <= 0.0 {
                DropPosition::Over
            } else {
                DropPosition::from_thirds((local.y - self.rect.y0) / height)
            }
        };
        let position = WidgetFamily::Tree.propose(proposed, has_handler)?;
        Some(ResolvedTarget {
            index: self.index,
            position,
            affordance: Affordance::for_cell(self.rect, position, Flow::Vertical),
        })
    }
}

/// Find the label whose vertical band contains `local.y` and resolve against it.
///
/// Labels must be in visible order (ascending top offsets). Returns `None` if
/// no label's band contains the point.
pub fn resolve_labels(
    labels: &[TreeLabel],
    local: Point,
    has_handler: bool,
) -> Option<ResolvedTarget> {
    let slot = labels.partition_point(|l| l.rect.y0 <= local.y);
    let label = labels.get(slot.checked_sub(1)?)?;
    if local.y >= label.rect.y1 {
        return None;
    }
    label.resolve(local, has_handler)
}

/// The visible rows of a tree: one label per row and the node it shows.
///
/// Built once per gesture and rebuilt only when the visible set changes,
/// e.g. after an auto-expand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeRows {
    labels: Vec<TreeLabel>,
    nodes: Vec<usize>,
}

impl TreeRows {
    /// Collect rows from `(node, label rectangle)` pairs in visible order.
    ///
    /// `root` names the node that only accepts drops onto itself.
    pub fn new(rows: impl IntoIterator<Item = (usize, Rect)>, root: usize) -> Self {
        let (nodes, labels) = rows
            .into_iter()
            .enumerate()
            .map(|(index, (node, rect))| {
                let label = TreeLabel {
                    index,
                    rect,
                    is_root: node == root,
                };
                (node, label)
            })
            .unzip();
        Self { labels, nodes }
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no row is visible.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Node shown on `row`.
    pub fn node(&self, row: usize) -> Option<usize> {
        self.nodes.get(row).copied()
    }

    /// Label of `row`.
    pub fn label(&self, row: usize) -> Option<&TreeLabel> {
        self.labels.get(row)
    }

    /// Resolve `local` against the labels; the target index is the row.
    pub fn resolve(&self, local: Point, has_handler: bool) -> Option<ResolvedTarget> {
        resolve_labels(&self.labels, local, has_handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(index: usize, top: f64) -> TreeLabel {
        TreeLabel {
            index,
            rect: Rect::new(16.0, top, 120.0, top + 18.0),
            is_root: index == 0,
        }
    }

    #[test]
    fn thirds_of_label_height() {
        let l = label(3, 36.0);
        let at = |y: f64| l.resolve(Point::new(20.0, y), true).unwrap().position;
        assert_eq!(at(37.0), DropPosition::Before);
        assert_eq!(at(45.0), DropPosition::Over);
        assert_eq!(at(53.0), DropPosition::After);
    }

    #[test]
    fn root_is_always_over() {
        let root = label(0, 0.0);
        for y in [0.0, 9.0, 17.9] {
            let hit = root.resolve(Point::new(20.0, y), false).unwrap();
            assert_eq!(hit.position, DropPosition::Over);
            assert_eq!(hit.affordance, Affordance::Border(root.rect));
        }
    }

    #[test]
    fn labels_are_searched_by_band() {
        let labels = [label(0, 0.0), label(1, 18.0), label(2, 36.0)];
        let hit = resolve_labels(&labels, Point::new(30.0, 20.0), true).unwrap();
        assert_eq!((hit.index, hit.position), (1, DropPosition::Before));
        assert!(resolve_labels(&labels, Point::new(30.0, 60.0), true).is_none());
        assert!(resolve_labels(&labels, Point::new(30.0, -1.0), true).is_none());
        assert!(resolve_labels(&[], Point::new(30.0, 1.0), true).is_none());
    }

    #[test]
    fn rows_map_back_to_nodes() {
        let rows = TreeRows::new(
            [
                (0, Rect::new(0.0, 0.0, 120.0, 18.0)),
                (4, Rect::new(10.0, 18.0, 120.0, 36.0)),
                (2, Rect::new(20.0, 36.0, 120.0, 54.0)),
            ],
            0,
        );
        assert_eq!(rows.len(), 3);
        assert!(rows.label(0).is_some_and(|l| l.is_root));
        let hit = rows.resolve(Point::new(30.0, 45.0), true).unwrap();
        assert_eq!((hit.index, hit.position), (2, DropPosition::Over));
        assert_eq!(rows.node(hit.index), Some(2));
        assert_eq!(rows.node(3), None);
    }
}
