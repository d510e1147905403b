// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving a set of items relative to a target.

use smallvec::SmallVec;
use thicket_event::DropPosition;

/// Move the items at `moved` before or after `target`, preserving their order.
///
/// Returns the new index of the first moved item, or `None` when nothing
/// moves: `moved` holds no valid index, `target` is out of range, or the
/// position is [`DropPosition::Over`].
///
/// ```
/// use thicket_event::DropPosition;
/// use thicket_hit::reorder;
///
/// let mut items = vec![0, 1, 2, 3, 4];
/// assert_eq!(reorder(&mut items, &[2, 3], 0, DropPosition::After), Some(1));
/// assert_eq!(items, [0, 2, 3, 1, 4]);
/// ```
pub fn reorder<T>(
    items: &mut Vec<T>,
    moved: &[usize],
    target: usize,
    position: DropPosition,
) -> Option<usize> {
    let insertion = match position {
        DropPosition::Before => target,
        DropPosition::After => target + 1,
        DropPosition::Over => return None,
    };
    if target >= items.len() {
        return None;
    }
    let mut indices: SmallVec<[usize; 8]> = moved
        .iter()
        .copied()
        .filter(|&i| i < items.len())
        .collect();
    indices.sort_unstable();
    indices.dedup();
    if indices.is_empty() {
        return None;
    }
    let shift = indices.iter().filter(|&&i| i < insertion).count();
    let at = insertion - shift;
    let mut taken: Vec<T> = indices.iter().rev().map(|&i| items.remove(i)).collect();
    taken.reverse();
    items.splice(at..at, taken);
    Some(at)
}
