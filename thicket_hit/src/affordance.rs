// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual feedback descriptors produced by resolvers.

use kurbo::{Line, Rect, Vec2};
use thicket_event::DropPosition;

/// Which way items flow in the resolved container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Items stack top to bottom; insertion lines are horizontal.
    Vertical,
    /// Items run left to right; insertion lines are vertical.
    Horizontal,
}

/// The overlay a resolver asks the controller to show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Affordance {
    /// A border box around the target (drop *onto* it).
    Border(Rect),
    /// An insertion line at the target's leading or trailing edge.
    InsertionLine(Line),
}

impl Affordance {
    /// Build the affordance for `position` relative to the item occupying `cell`.
    pub fn for_cell(cell: Rect, position: DropPosition, flow: Flow) -> Self {
        match (position, flow) {
            (DropPosition::Over, _) => Self::Border(cell),
            (DropPosition::Before, Flow::Vertical) => {
                Self::InsertionLine(Line::new((cell.x0, cell.y0), (cell.x1, cell.y0)))
            }
            (DropPosition::After, Flow::Vertical) => {
                Self::InsertionLine(Line::new((cell.x0, cell.y1), (cell.x1, cell.y1)))
            }
            (DropPosition::Before, Flow::Horizontal) => {
                Self::InsertionLine(Line::new((cell.x0, cell.y0), (cell.x0, cell.y1)))
            }
            (DropPosition::After, Flow::Horizontal) => {
                Self::InsertionLine(Line::new((cell.x1, cell.y0), (cell.x1, cell.y1)))
            }
        }
    }

    /// Returns this affordance shifted by `offset`.
    ///
    /// Resolvers working in content coordinates use this to map back into a
    /// scrolled viewport.
    #[must_use]
    pub fn translate(self, offset: Vec2) -> Self {
        match self {
            Self::Border(rect) => Self::Border(rect + offset),
            Self::InsertionLine(line) => {
                Self::InsertionLine(Line::new(line.p0 + offset, line.p1 + offset))
            }
        }
    }
}
