// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Widgets: interaction models for the controls that share one gesture engine.
//!
//! Each model owns its domain state, registers itself with a shared
//! [`GestureController`], and turns gestures into domain operations:
//!
//! - [`ListView`]: linear or grid lists with click-vs-drag selection, drop
//!   resolution, reorder on drop, and auto-scroll.
//! - [`TreeView`]: expansion, drop resolution over labels, auto-expand on
//!   dwell, and moving nodes.
//! - [`TabStrip`]: selection and tab reorder.
//! - [`TableColumns`]: header clicks, column reorder, and column resize.
//! - [`Splitter`]: clamped splitter drags with a shaded preview.
//! - [`Dialog`]: move and resize through the edge classifier.
//!
//! Models report what happens through cancellable [`InteractionEvent`]s
//! delivered to an optional application handler installed with `on_event`.
//! Drag events also carry [`accept`](InteractionEvent::accept): the position a
//! handler accepts is the one shown and dropped.
//!
//! The host feeds presses to the widget under the pointer and every other
//! notification to the controller:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect, Size};
//! use thicket_event::PointerState;
//! use thicket_gesture::GestureController;
//! use thicket_gesture::recording::{FixedGeometry, Recorder};
//! use thicket_widgets::{ListLayout, ListView};
//!
//! let geometry = FixedGeometry::default();
//! geometry.set(1_u32, Rect::new(0.0, 0.0, 200.0, 100.0));
//! let rec = Recorder::default();
//! let gc = Rc::new(RefCell::new(GestureController::new(geometry, rec.clone(), rec)));
//!
//! let list = ListView::new(
//!     &gc,
//!     1,
//!     ListLayout::Linear { row_height: 20.0 },
//!     Size::new(200.0, 100.0),
//!     ["a", "b", "c", "d"],
//! )
//! .unwrap();
//!
//! // Drag "a" below "c".
//! let at = |y| PointerState::new(Point::new(10.0, y));
//! list.press(at(5.0)).unwrap();
//! gc.borrow_mut().pointer_move(at(55.0), Some(1));
//! gc.borrow_mut().pointer_up(at(55.0), Some(1));
//! assert_eq!(list.items(), ["b", "c", "a", "d"]);
//! ```
//!
//! Handlers run while the controller is borrowed. They may read and change
//! widgets, but must not feed input to the controller.
//!
//! ## Features
//!
//! - `tracing`: log reorders, moves, expansions, and committed resizes.

use core::cell::RefCell;
use core::fmt::Debug;
use core::hash::Hash;
use std::rc::Rc;

use kurbo::Point;
use smallvec::SmallVec;
use thicket_gesture::{GestureController, GestureStart};

mod dialog;
mod error;
mod event;
mod list;
mod splitter;
mod table;
mod tabs;
mod tree;

pub use dialog::{Dialog, DialogDetail, DialogEvent, DialogEventKind};
pub use error::{Result, WidgetError};
pub use event::{EventHandler, EventSlot, ItemDetail};
pub use list::{ListEvent, ListEventKind, ListLayout, ListView};
pub use splitter::{Splitter, SplitterDetail, SplitterEvent, SplitterEventKind};
pub use table::{ColumnDetail, TableColumns, TableEvent, TableEventKind};
pub use tabs::{TabEvent, TabEventKind, TabStrip};
pub use tree::{ROOT, TreeEvent, TreeEventKind, TreeView};

pub use thicket_event::InteractionEvent;

/// Identity of a widget registered with the controller.
pub trait WidgetId: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> WidgetId for T {}

/// The gesture controller as widgets share it.
pub type SharedController<W> = Rc<RefCell<GestureController<W, Payload<W>>>>;

/// What a drag gesture carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload<W> {
    /// Widget the drag started from.
    pub source: W,
    /// What was picked up, in the source's terms.
    pub items: DragItems,
}

/// Items picked up by a drag, in the source widget's terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragItems {
    /// List rows, in ascending order.
    Rows(SmallVec<[usize; 4]>),
    /// A tree node and its subtree.
    Node(usize),
    /// A tab.
    Tab(usize),
    /// A table column.
    Column(usize),
}

/// Translate a page point into `widget`'s local coordinates.
pub(crate) fn local_point<W: WidgetId>(
    gc: &SharedController<W>,
    widget: W,
    page: Point,
) -> Result<Point> {
    let gc = gc.try_borrow().map_err(|_| WidgetError::ControllerBusy)?;
    gc.geometry()
        .to_local(&widget, page)
        .ok_or(WidgetError::NotLaidOut)
}

/// Start a gesture on the shared controller.
pub(crate) fn start_gesture<W: WidgetId>(
    gc: &SharedController<W>,
    start: GestureStart<W, Payload<W>>,
) -> Result<()> {
    let mut gc = gc.try_borrow_mut().map_err(|_| WidgetError::ControllerBusy)?;
    gc.start_gesture(start)?;
    Ok(())
}
