// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table header interaction model: column clicks, reorder, and resize.
//!
//! A press within the resize tolerance of a column's right edge starts an
//! explicit gesture that resizes that column; any other press on a column
//! starts a drag of it. Column drops resolve to an insertion boundary
//! computed once per gesture from the rendered widths.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use kurbo::Point;
use thicket_event::press::{PressState, ReleaseOutcome};
use thicket_event::{DropPosition, InteractionEvent, PointerState};
use thicket_gesture::{
    Capabilities, CursorGlyph, DropEvent, DropKind, GestureCx, GestureStart, ListenerEvent,
    ListenerKind, WidgetKind,
};
use thicket_hit::{Affordance, ColumnBoundaries, EdgeConfig, ResolvedTarget, reorder, resize_extent};

use crate::{
    DragItems, EventSlot, Payload, Result, SharedController, WidgetError, WidgetId, local_point,
    start_gesture,
};

/// Semantic events of [`TableColumns`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableEventKind {
    /// A header was pressed and released without a drag, e.g. to sort.
    Click,
    /// A drag of the column is about to start. Cancel to refuse it.
    BeforeDrag,
    /// A column is dragged over insertion boundary `target`. Cancel to hide it.
    DragOver,
    /// A column is about to move to boundary `target`. Cancel to refuse it.
    Drop,
    /// The column moved; `column` is its new index.
    Moved,
    /// The column is about to take `width`. Cancel to keep its current width.
    Resize,
    /// A resize gesture ended with the column at `width`.
    Resized,
}

/// Detail of [`TableEvent`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnDetail {
    /// Column concerned.
    pub column: usize,
    /// Proposed or final width, for resize events.
    pub width: Option<f64>,
    /// Insertion boundary in `0..=len`, for reorder events.
    pub target: Option<usize>,
}

impl ColumnDetail {
    fn column(column: usize) -> Self {
        Self {
            column,
            width: None,
            target: None,
        }
    }

    fn resize(column: usize, width: f64) -> Self {
        Self {
            column,
            width: Some(width),
            target: None,
        }
    }

    fn reorder(column: usize, target: usize) -> Self {
        Self {
            column,
            width: None,
            target: Some(target),
        }
    }
}

/// Event emitted by [`TableColumns`].
pub type TableEvent = InteractionEvent<TableEventKind, ColumnDetail>;

type Events = EventSlot<TableEventKind, ColumnDetail>;
type Cx<'a, W> = GestureCx<'a, W, Payload<W>>;

#[derive(Debug)]
struct Column<T> {
    value: T,
    width: f64,
    min: f64,
    max: f64,
}

#[derive(Debug)]
struct TableState<T> {
    columns: Vec<Column<T>>,
    header_height: f64,
    edge: EdgeConfig,
    press: PressState<usize>,
}

impl<T> TableState<T> {
    fn boundaries(&self) -> ColumnBoundaries {
        ColumnBoundaries::from_widths(0.0, self.columns.iter().map(|c| c.width))
    }

    fn in_header(&self, local: Point) -> bool {
        local.y >= 0.0 && local.y < self.header_height
    }

    fn column_at(&self, local: Point) -> Option<usize> {
        if !self.in_header(local) || local.x < 0.0 {
            return None;
        }
        let mut right = 0.0;
        self.columns.iter().position(|c| {
            right += c.width;
            local.x < right
        })
    }

    fn resize_handle_at(&self, local: Point) -> Option<usize> {
        if !self.in_header(local) {
            return None;
        }
        self.boundaries()
            .resize_handle_at(local.x, self.edge.tolerance)
    }

    /// Target column and position for insertion boundary `boundary`.
    fn drop_slot(&self, boundary: usize) -> Option<(usize, DropPosition)> {
        let len = self.columns.len();
        if len == 0 {
            None
        } else if boundary < len {
            Some((boundary, DropPosition::Before))
        } else {
            Some((len - 1, DropPosition::After))
        }
    }
}

/// Reorderable, resizable table columns driven by a shared gesture controller.
pub struct TableColumns<W: WidgetId, T> {
    id: W,
    gc: SharedController<W>,
    state: Rc<RefCell<TableState<T>>>,
    events: Events,
}

impl<W: WidgetId, T> fmt::Debug for TableColumns<W, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TableColumns");
        s.field("id", &self.id);
        if let Ok(st) = self.state.try_borrow() {
            s.field("len", &st.columns.len())
                .field("header_height", &st.header_height);
        }
        s.finish_non_exhaustive()
    }
}

impl<W: WidgetId, T: 'static> TableColumns<W, T> {
    /// Create a header row of `header_height` and register it.
    ///
    /// `columns` pairs each value with its initial width. Columns have no
    /// width limits until [`set_limits`](Self::set_limits) sets them.
    pub fn new(
        gc: &SharedController<W>,
        id: W,
        header_height: f64,
        columns: impl IntoIterator<Item = (T, f64)>,
    ) -> Result<Self> {
        let state = Rc::new(RefCell::new(TableState {
            columns: columns
                .into_iter()
                .map(|(value, width)| Column {
                    value,
                    width: width.max(0.0),
                    min: 0.0,
                    max: f64::INFINITY,
                })
                .collect(),
            header_height,
            edge: EdgeConfig::default(),
            press: PressState::new(),
        }));
        let events = Events::new();
        {
            let mut controller = gc.try_borrow_mut().map_err(|_| WidgetError::ControllerBusy)?;
            let caps = Capabilities::DROP_TARGET | Capabilities::DRAG_SOURCE;
            controller.register_widget(id, WidgetKind::TableHeader, caps);
            let (st, ev) = (state.clone(), events.clone());
            controller.set_drop_handler(id, move |de, cx| on_drop(id, &st, &ev, de, cx))?;
        }
        Ok(Self {
            id,
            gc: gc.clone(),
            state,
            events,
        })
    }

    /// Install the application event handler.
    pub fn on_event(&self, handler: impl FnMut(&mut TableEvent) + 'static) {
        self.events.set(handler);
    }

    /// Widget identity.
    pub fn id(&self) -> W {
        self.id
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.state.borrow().columns.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column values, left to right.
    pub fn columns(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.state
            .borrow()
            .columns
            .iter()
            .map(|c| c.value.clone())
            .collect()
    }

    /// Column widths, left to right.
    pub fn widths(&self) -> Vec<f64> {
        self.state.borrow().columns.iter().map(|c| c.width).collect()
    }

    /// Width of `column`.
    pub fn width(&self, column: usize) -> Option<f64> {
        self.state.borrow().columns.get(column).map(|c| c.width)
    }

    /// Limit the width `column` may be resized to. The current width is clamped.
    pub fn set_limits(&self, column: usize, min: f64, max: f64) {
        let mut st = self.state.borrow_mut();
        if let Some(c) = st.columns.get_mut(column) {
            c.min = min.max(0.0);
            c.max = max.max(c.min);
            c.width = c.width.clamp(c.min, c.max);
        }
    }

    /// Distance from a right edge that still grabs it for resizing (default 6).
    pub fn set_edge_config(&self, edge: EdgeConfig) {
        self.state.borrow_mut().edge = edge;
    }

    /// Column under the header-local point `local`.
    pub fn column_at(&self, local: Point) -> Option<usize> {
        self.state.borrow().column_at(local)
    }

    /// Cursor to show while hovering `pointer` with no gesture active.
    pub fn hover_cursor(&self, pointer: Point) -> Option<CursorGlyph> {
        let local = local_point(&self.gc, self.id, pointer).ok()?;
        self.state
            .borrow()
            .resize_handle_at(local)
            .map(|_| CursorGlyph::ResizeHorizontal)
    }

    /// Handle a button press on the header.
    ///
    /// Returns `Ok(false)` if the press missed every column.
    pub fn press(&self, pointer: PointerState) -> Result<bool> {
        let local = local_point(&self.gc, self.id, pointer.position)?;
        let (handle, column) = {
            let st = self.state.borrow();
            (st.resize_handle_at(local), st.column_at(local))
        };
        let start = if let Some(column) = handle {
            let Some(width) = self.width(column) else {
                return Ok(false);
            };
            let listener = resize_listener(column, width, self.state.clone(), self.events.clone());
            GestureStart::explicit(pointer, listener)
        } else if let Some(column) = column {
            self.state
                .borrow_mut()
                .press
                .on_press(column, false, pointer.modifiers, local);
            let payload = Payload {
                source: self.id,
                items: DragItems::Column(column),
            };
            GestureStart::drag(pointer, payload).with_listener(press_listener(
                column,
                self.state.clone(),
                self.events.clone(),
            ))
        } else {
            return Ok(false);
        };
        if let Err(err) = start_gesture(&self.gc, start.with_source(self.id)) {
            self.state.borrow_mut().press.cancel();
            return Err(err);
        }
        Ok(true)
    }
}

fn press_listener<W: WidgetId, T: 'static>(
    pressed: usize,
    state: Rc<RefCell<TableState<T>>>,
    events: Events,
) -> impl FnMut(&mut ListenerEvent, &mut Cx<'_, W>) + 'static {
    move |le, cx| match le.kind {
        ListenerKind::BeforeDrag => {
            if events
                .emit(TableEventKind::BeforeDrag, ColumnDetail::column(pressed))
                .is_cancelled()
            {
                le.cancel();
            } else {
                state.borrow_mut().press.on_gesture_start();
            }
        }
        ListenerKind::Up => {
            let current = cx.local_pointer().and_then(|p| state.borrow().column_at(p));
            let outcome = state.borrow_mut().press.on_release(current.as_ref());
            if let ReleaseOutcome::AlreadySelected(c) | ReleaseOutcome::ApplyDeferred(c) = outcome {
                events.emit(TableEventKind::Click, ColumnDetail::column(c));
            }
        }
        ListenerKind::Cancel => {
            state.borrow_mut().press.cancel();
        }
        ListenerKind::Move | ListenerKind::End => {}
    }
}

fn resize_listener<W: WidgetId, T: 'static>(
    column: usize,
    start: f64,
    state: Rc<RefCell<TableState<T>>>,
    events: Events,
) -> impl FnMut(&mut ListenerEvent, &mut Cx<'_, W>) + 'static {
    move |le, cx| match le.kind {
        ListenerKind::Move => {
            let delta = le.detail.delta_from(cx.origin()).x;
            let (current, proposed) = {
                let st = state.borrow();
                let Some(c) = st.columns.get(column) else {
                    return;
                };
                (c.width, resize_extent(start, delta, c.min, c.max))
            };
            cx.set_cursor(Some(CursorGlyph::ResizeHorizontal));
            if proposed != current
                && !events
                    .emit(TableEventKind::Resize, ColumnDetail::resize(column, proposed))
                    .is_cancelled()
                && let Some(c) = state.borrow_mut().columns.get_mut(column)
            {
                c.width = proposed;
            }
            show_resize_guide(&state, column, cx);
        }
        ListenerKind::Up => {
            let width = state.borrow().columns.get(column).map(|c| c.width);
            if let Some(width) = width
                && width != start
            {
                #[cfg(feature = "tracing")]
                tracing::debug!(column, from = start, to = width, "column resized");
                events.emit(TableEventKind::Resized, ColumnDetail::resize(column, width));
            }
        }
        ListenerKind::Cancel => {
            if let Some(c) = state.borrow_mut().columns.get_mut(column) {
                c.width = start;
            }
        }
        ListenerKind::BeforeDrag | ListenerKind::End => {}
    }
}

/// Vertical guide at the resized column's right edge.
fn show_resize_guide<W: WidgetId, T>(
    state: &RefCell<TableState<T>>,
    column: usize,
    cx: &mut Cx<'_, W>,
) {
    let line = {
        let st = state.borrow();
        st.boundaries()
            .insertion_line(column + 1, 0.0, st.header_height)
    };
    cx.show_affordance(line.map(Affordance::InsertionLine));
}

fn on_drop<W: WidgetId, T>(
    id: W,
    state: &RefCell<TableState<T>>,
    events: &Events,
    de: &mut DropEvent<W>,
    cx: &mut Cx<'_, W>,
) {
    let dragged = match cx.payload() {
        Some(Payload {
            source,
            items: DragItems::Column(c),
        }) if *source == id => Some(*c),
        _ => None,
    };
    match de.kind {
        DropKind::Over => {
            let Some(column) = dragged else {
                return;
            };
            if let Some(position) = hover(state, events, column, cx, de.detail.local) {
                de.accept(position);
            }
        }
        DropKind::Out | DropKind::Cancel => {
            if let Some(ctx) = cx.context() {
                ctx.last_target = None;
            }
        }
        DropKind::Drop => {
            let target = cx.context().and_then(|ctx| ctx.last_target.take());
            let (Some(column), Some(target)) = (dragged, target) else {
                de.cancel();
                return;
            };
            let boundary = match target.position {
                DropPosition::After => target.index + 1,
                DropPosition::Before | DropPosition::Over => target.index,
            };
            if events
                .emit(TableEventKind::Drop, ColumnDetail::reorder(column, boundary))
                .is_cancelled()
            {
                de.cancel();
                return;
            }
            let moved_to = {
                let columns = &mut state.borrow_mut().columns;
                reorder(columns, &[column], target.index, target.position)
            };
            if let Some(at) = moved_to {
                #[cfg(feature = "tracing")]
                tracing::debug!(widget = ?id, from = column, to = at, "column moved");
                events.emit(TableEventKind::Moved, ColumnDetail::column(at));
            }
        }
    }
}

fn hover<W: WidgetId, T>(
    state: &RefCell<TableState<T>>,
    events: &Events,
    column: usize,
    cx: &mut Cx<'_, W>,
    local: Option<Point>,
) -> Option<DropPosition> {
    let resolved = local.and_then(|local| {
        let st = state.borrow();
        let height = st.header_height;
        let ctx = cx.context()?;
        let bounds = ctx.columns.get_or_insert_with(|| st.boundaries());
        let boundary = bounds.insertion_index(local.x);
        let line = bounds.insertion_line(boundary, 0.0, height)?;
        let (index, position) = st.drop_slot(boundary)?;
        Some((boundary, ResolvedTarget {
            index,
            position,
            affordance: Affordance::InsertionLine(line),
        }))
    });
    let shown = resolved.filter(|&(boundary, _)| {
        !events
            .emit(TableEventKind::DragOver, ColumnDetail::reorder(column, boundary))
            .is_cancelled()
    });
    let target = shown.map(|(_, t)| t);
    cx.show_affordance(target.map(|t| t.affordance));
    if let Some(ctx) = cx.context() {
        ctx.last_target = target;
    }
    target.map(|t| t.position)
}
