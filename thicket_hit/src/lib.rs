// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Hit: per-widget spatial hit resolution.
//!
//! Every resolver here is a pure function of a pointer position and the
//! geometry a widget measured at gesture start. Resolvers return a
//! [`ResolvedTarget`]: the target item, a [`DropPosition`], and the
//! [`Affordance`] to draw. They never touch widgets or overlays themselves.
//!
//! - [`ListGeometry`]: uniform-row linear lists (`floor((scroll + y) / row_height)`).
//! - [`GridMatrix`]: wrapped thumbnail grids, built by grouping rendered item rectangles into rows.
//! - [`TreeLabel`] / [`resolve_labels`]: tree labels split into thirds; the root only accepts `Over`.
//! - [`resolve_tabs`]: tab strips split into horizontal thirds.
//! - [`ColumnBoundaries`]: insertion index for table column reorder, plus resize handles.
//! - [`classify`]: 8-way edge and corner classification for resizable rectangles.
//!
//! Supporting math lives alongside: [`resize_rect`] and [`move_rect`] compute
//! proposed geometry, [`AutoScrollConfig`] and [`DwellTracker`] drive
//! auto-scroll and auto-expand, [`reorder`] applies a drop, and
//! [`WidgetFamily`] holds the per-family policy for an `Over` nobody accepted.
//!
//! Resolving against an empty collection yields `None`.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use thicket_event::DropPosition;
//! use thicket_hit::{Affordance, ListGeometry};
//!
//! // Ten rows of 20px; y = 30 falls in the middle band of row 1.
//! let list = ListGeometry::new(10, 20.0, 100.0);
//! let hit = list.resolve(Point::new(4.0, 30.0), true).unwrap();
//! assert_eq!(hit.index, 1);
//! assert_eq!(hit.position, DropPosition::Over);
//! assert!(matches!(hit.affordance, Affordance::Border(_)));
//!
//! // Without a handler the middle band is not offered.
//! let hit = list.resolve(Point::new(4.0, 30.0), false).unwrap();
//! assert_eq!(hit.position, DropPosition::Before);
//! ```

mod affordance;
mod columns;
mod edge;
mod grid;
mod list;
mod policy;
mod reorder;
mod resize;
mod scroll;
mod tabs;
mod tree;

pub use affordance::{Affordance, Flow};
pub use columns::ColumnBoundaries;
pub use edge::{EdgeConfig, EdgeMask, EdgeZone, classify};
pub use grid::{GridCell, GridMatrix, GridRow};
pub use list::ListGeometry;
pub use policy::{UnacceptedOver, WidgetFamily};
pub use reorder::reorder;
pub use resize::{SizeLimits, move_rect, resize_extent, resize_rect};
pub use scroll::{AutoScrollConfig, DwellTracker};
pub use tabs::resolve_tabs;
pub use tree::{TreeLabel, TreeRows, resolve_labels};

pub use thicket_event::DropPosition;

/// Outcome of resolving a pointer against a widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedTarget {
    /// Index of the target item, row, or tab.
    pub index: usize,
    /// Where the drop lands relative to the target.
    pub position: DropPosition,
    /// Overlay to show for this target.
    pub affordance: Affordance,
}
