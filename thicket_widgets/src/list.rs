// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List and grid list interaction model.
//!
//! ## Selection
//!
//! Presses go through [`PressState`]: pressing an unselected item, or pressing
//! with a modifier held, selects on press; pressing an already-selected item
//! defers the selection to release so that a multi-selection can be dragged.
//! Shift extends from the anchor, Ctrl/Meta toggle.
//!
//! ## Dragging
//!
//! A press starts a drag gesture carrying the selected rows. The first move
//! emits [`ListEventKind::BeforeDrag`]; cancelling it cancels the gesture and
//! keeps the press a click. While a payload is over the list each move emits
//! [`ListEventKind::DragOver`] with the resolved target; the handler's
//! `accept`/`cancel` settle the shown position per the list's
//! [`WidgetFamily`] policy. A drop of this list's own rows reorders them.
//!
//! While the pointer sits within the auto-scroll margin of the viewport, each
//! timer tick scrolls and re-resolves the target.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;
use thicket_event::press::{PressOutcome, PressState, ReleaseOutcome};
use thicket_event::{DropPosition, InteractionEvent, Modifiers, PointerState};
use thicket_gesture::{
    Capabilities, DropEvent, DropKind, GestureCx, GestureStart, ListenerEvent, ListenerKind,
    WidgetContext, WidgetKind,
};
use thicket_hit::{
    Affordance, AutoScrollConfig, Flow, GridMatrix, ListGeometry, ResolvedTarget, WidgetFamily,
    reorder,
};

use crate::{
    DragItems, EventSlot, ItemDetail, Payload, Result, SharedController, WidgetError, WidgetId,
    local_point, start_gesture,
};

/// How a list lays out its items.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ListLayout {
    /// One item per row, all rows the same height.
    Linear {
        /// Row height.
        row_height: f64,
    },
    /// Equal cells wrapped into rows as wide as the viewport.
    Grid {
        /// Cell size.
        cell: Size,
    },
}

/// Semantic events of a [`ListView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListEventKind {
    /// Selection is about to change because `index` was pressed. Cancel to keep it.
    Select,
    /// `index` was pressed and released without a drag.
    Click,
    /// A drag of the selection is about to start. Cancel to refuse it.
    BeforeDrag,
    /// A payload is over `index` at `position`. Accept to allow the drop.
    DragOver,
    /// A payload was dropped at `index`/`position`. Cancel to refuse it.
    Drop,
    /// Rows of this list moved; `index` is the new index of the first one.
    Reordered,
}

/// Event emitted by a [`ListView`].
pub type ListEvent<W> = InteractionEvent<ListEventKind, ItemDetail<W>>;

type Events<W> = EventSlot<ListEventKind, ItemDetail<W>>;
type Cx<'a, W> = GestureCx<'a, W, Payload<W>>;

#[derive(Debug)]
struct Row<T> {
    value: T,
    selected: bool,
}

#[derive(Debug)]
struct ListState<T> {
    rows: Vec<Row<T>>,
    layout: ListLayout,
    viewport: Size,
    scroll: f64,
    anchor: Option<usize>,
    press: PressState<usize>,
    draggable: bool,
    auto_scroll: AutoScrollConfig,
}

impl<T> ListState<T> {
    fn columns(&self) -> usize {
        match self.layout {
            ListLayout::Linear { .. } => 1,
            ListLayout::Grid { cell } => {
                if cell.width <= 0.0 {
                    return 1;
                }
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Column counts are small positive integers"
                )]
                let n = (self.viewport.width / cell.width).floor() as usize;
                n.max(1)
            }
        }
    }

    fn cell_size(&self) -> Size {
        match self.layout {
            ListLayout::Linear { row_height } => Size::new(self.viewport.width, row_height),
            ListLayout::Grid { cell } => cell,
        }
    }

    /// Item rectangle in content coordinates.
    fn content_rect(&self, index: usize) -> Rect {
        let cols = self.columns();
        let cell = self.cell_size();
        let x = (index % cols) as f64 * cell.width;
        let y = (index / cols) as f64 * cell.height;
        Rect::new(x, y, x + cell.width, y + cell.height)
    }

    /// Item rectangle in viewport coordinates.
    fn viewport_rect(&self, index: usize) -> Rect {
        self.content_rect(index) - Vec2::new(0.0, self.scroll)
    }

    fn content_height(&self) -> f64 {
        let rows = self.rows.len().div_ceil(self.columns());
        rows as f64 * self.cell_size().height
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport.height).max(0.0)
    }

    fn family(&self) -> WidgetFamily {
        match self.layout {
            ListLayout::Linear { .. } => WidgetFamily::List,
            ListLayout::Grid { .. } => WidgetFamily::Grid,
        }
    }

    fn flow(&self) -> Flow {
        match self.layout {
            ListLayout::Linear { .. } => Flow::Vertical,
            ListLayout::Grid { .. } => Flow::Horizontal,
        }
    }

    /// Item whose cell contains the viewport point `local`.
    fn item_at(&self, local: Point) -> Option<usize> {
        let cell = self.cell_size();
        if cell.width <= 0.0 || cell.height <= 0.0 || local.x < 0.0 {
            return None;
        }
        let y = local.y + self.scroll;
        if y < 0.0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Row and column indices are far below the f64 integer range"
        )]
        let (col, row) = (
            (local.x / cell.width).floor() as usize,
            (y / cell.height).floor() as usize,
        );
        if col >= self.columns() {
            return None;
        }
        let index = row * self.columns() + col;
        (index < self.rows.len()).then_some(index)
    }

    /// Resolve a drop target, memoizing per-gesture geometry in `ctx`.
    fn resolve(
        &self,
        ctx: &mut WidgetContext,
        local: Point,
        has_handler: bool,
    ) -> Option<ResolvedTarget> {
        match self.layout {
            ListLayout::Linear { row_height } => {
                let row_height = *ctx.row_height.get_or_insert(row_height);
                ListGeometry::new(self.rows.len(), row_height, self.viewport.width)
                    .with_scroll(self.scroll)
                    .resolve(local, has_handler)
            }
            ListLayout::Grid { .. } => {
                let grid = ctx.grid.get_or_insert_with(|| {
                    GridMatrix::build((0..self.rows.len()).map(|i| self.content_rect(i)))
                });
                let offset = Vec2::new(0.0, self.scroll);
                let mut target = grid.resolve(local + offset, has_handler)?;
                target.affordance = target.affordance.translate(-offset);
                Some(target)
            }
        }
    }

    fn selected(&self) -> SmallVec<[usize; 4]> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.selected.then_some(i))
            .collect()
    }

    fn select_only(&mut self, index: usize) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.selected = i == index;
        }
        self.anchor = Some(index);
    }

    /// Selection after pressing `index` with `modifiers`.
    fn apply_press(&mut self, index: usize, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::SHIFT)
            && let Some(anchor) = self.anchor
        {
            let (lo, hi) = (anchor.min(index), anchor.max(index));
            for (i, row) in self.rows.iter_mut().enumerate() {
                row.selected = (lo..=hi).contains(&i);
            }
        } else if modifiers.intersects(Modifiers::CTRL | Modifiers::META) {
            if let Some(row) = self.rows.get_mut(index) {
                row.selected = !row.selected;
            }
            self.anchor = Some(index);
        } else {
            self.select_only(index);
        }
    }

    fn is_only_selection(&self, index: usize) -> bool {
        self.rows
            .iter()
            .enumerate()
            .all(|(i, r)| r.selected == (i == index))
    }
}

/// A list or grid list driven by a shared gesture controller.
///
/// `ListView` is a handle. The drop handler installed on the controller shares
/// its state, so drops keep landing for as long as the list stays registered.
pub struct ListView<W: WidgetId, T> {
    id: W,
    gc: SharedController<W>,
    state: Rc<RefCell<ListState<T>>>,
    events: Events<W>,
}

impl<W: WidgetId, T> fmt::Debug for ListView<W, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ListView");
        s.field("id", &self.id);
        if let Ok(st) = self.state.try_borrow() {
            s.field("len", &st.rows.len())
                .field("layout", &st.layout)
                .field("scroll", &st.scroll);
        }
        s.finish_non_exhaustive()
    }
}

impl<W: WidgetId, T: 'static> ListView<W, T> {
    /// Create a list, register it as a drop target and drag source, and install its drop handler.
    pub fn new(
        gc: &SharedController<W>,
        id: W,
        layout: ListLayout,
        viewport: Size,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Self> {
        let state = Rc::new(RefCell::new(ListState {
            rows: items
                .into_iter()
                .map(|value| Row {
                    value,
                    selected: false,
                })
                .collect(),
            layout,
            viewport,
            scroll: 0.0,
            anchor: None,
            press: PressState::new(),
            draggable: true,
            auto_scroll: AutoScrollConfig::default(),
        }));
        let events = Events::new();
        let kind = match layout {
            ListLayout::Linear { .. } => WidgetKind::List,
            ListLayout::Grid { .. } => WidgetKind::Grid,
        };
        {
            let mut controller = gc.try_borrow_mut().map_err(|_| WidgetError::ControllerBusy)?;
            let caps = Capabilities::DROP_TARGET | Capabilities::DRAG_SOURCE;
            controller.register_widget(id, kind, caps);
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
    pub fn on_event(&self, handler: impl FnMut(&mut ListEvent<W>) + 'static) {
        self.events.set(handler);
    }

    /// Widget identity.
    pub fn id(&self) -> W {
        self.id
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.state.borrow().rows.len()
    }

    /// Returns `true` if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an item.
    pub fn push(&self, value: T) {
        self.state.borrow_mut().rows.push(Row {
            value,
            selected: false,
        });
    }

    /// Items in display order.
    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.state
            .borrow()
            .rows
            .iter()
            .map(|r| r.value.clone())
            .collect()
    }

    /// Indices of selected items, ascending.
    pub fn selected(&self) -> Vec<usize> {
        self.state.borrow().selected().into_vec()
    }

    /// Returns `true` if `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.state
            .borrow()
            .rows
            .get(index)
            .is_some_and(|r| r.selected)
    }

    /// Select exactly `index`, without emitting events.
    pub fn select(&self, index: usize) {
        let mut st = self.state.borrow_mut();
        if index < st.rows.len() {
            st.select_only(index);
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&self) {
        let mut st = self.state.borrow_mut();
        for row in &mut st.rows {
            row.selected = false;
        }
        st.anchor = None;
    }

    /// Whether presses start drags (default `true`).
    pub fn set_draggable(&self, draggable: bool) {
        self.state.borrow_mut().draggable = draggable;
    }

    /// Replace the auto-scroll parameters.
    pub fn set_auto_scroll(&self, config: AutoScrollConfig) {
        self.state.borrow_mut().auto_scroll = config;
    }

    /// Current vertical scroll offset.
    pub fn scroll_offset(&self) -> f64 {
        self.state.borrow().scroll
    }

    /// Set the scroll offset, clamped to the content.
    pub fn set_scroll_offset(&self, offset: f64) {
        let mut st = self.state.borrow_mut();
        st.scroll = offset.clamp(0.0, st.max_scroll());
    }

    /// Largest meaningful scroll offset.
    pub fn max_scroll(&self) -> f64 {
        self.state.borrow().max_scroll()
    }

    /// Resize the viewport.
    pub fn set_viewport(&self, viewport: Size) {
        let mut st = self.state.borrow_mut();
        st.viewport = viewport;
        st.scroll = st.scroll.clamp(0.0, st.max_scroll());
    }

    /// Rectangle of `index` in list-local (viewport) coordinates.
    pub fn item_rect(&self, index: usize) -> Option<Rect> {
        let st = self.state.borrow();
        (index < st.rows.len()).then(|| st.viewport_rect(index))
    }

    /// Item under the list-local point `local`.
    pub fn item_at(&self, local: Point) -> Option<usize> {
        self.state.borrow().item_at(local)
    }

    /// Handle a button press on the list.
    ///
    /// Returns `Ok(false)` if the press missed every item. Otherwise applies
    /// immediate selection and starts a gesture: a drag of the selection, or
    /// a plain press-and-release when the list is not draggable.
    pub fn press(&self, pointer: PointerState) -> Result<bool> {
        let local = local_point(&self.gc, self.id, pointer.position)?;
        let (index, outcome) = {
            let mut st = self.state.borrow_mut();
            let Some(index) = st.item_at(local) else {
                return Ok(false);
            };
            let selected = st.rows[index].selected;
            (index, st.press.on_press(index, selected, pointer.modifiers, local))
        };
        if let PressOutcome::SelectNow(i) = outcome
            && !self
                .events
                .emit(ListEventKind::Select, ItemDetail::item(i))
                .is_cancelled()
        {
            self.state.borrow_mut().apply_press(i, pointer.modifiers);
        }

        let (draggable, rows) = {
            let st = self.state.borrow();
            let mut rows = st.selected();
            if !rows.contains(&index) {
                rows = SmallVec::from_slice(&[index]);
            }
            (st.draggable, rows)
        };
        let listener = press_listener(index, self.state.clone(), self.events.clone());
        let start = if draggable {
            let payload = Payload {
                source: self.id,
                items: DragItems::Rows(rows),
            };
            GestureStart::drag(pointer, payload).with_listener(listener)
        } else {
            GestureStart::explicit(pointer, listener)
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
    state: Rc<RefCell<ListState<T>>>,
    events: Events<W>,
) -> impl FnMut(&mut ListenerEvent, &mut Cx<'_, W>) + 'static {
    move |le, cx| on_listener(pressed, &state, &events, le, cx)
}

fn on_listener<W: WidgetId, T>(
    pressed: usize,
    state: &RefCell<ListState<T>>,
    events: &Events<W>,
    le: &mut ListenerEvent,
    cx: &mut Cx<'_, W>,
) {
    match le.kind {
        ListenerKind::BeforeDrag => {
            let detail = ItemDetail::drag(Some(pressed), None, cx.payload().cloned());
            if events.emit(ListEventKind::BeforeDrag, detail).is_cancelled() {
                le.cancel();
            } else {
                state.borrow_mut().press.on_gesture_start();
            }
        }
        ListenerKind::Up => {
            let current = cx.local_pointer().and_then(|p| state.borrow().item_at(p));
            let outcome = state.borrow_mut().press.on_release(current.as_ref());
            match outcome {
                ReleaseOutcome::ApplyDeferred(i) => {
                    let changes = !state.borrow().is_only_selection(i);
                    if changes
                        && !events
                            .emit(ListEventKind::Select, ItemDetail::item(i))
                            .is_cancelled()
                    {
                        state.borrow_mut().select_only(i);
                    }
                    events.emit(ListEventKind::Click, ItemDetail::item(i));
                }
                ReleaseOutcome::AlreadySelected(i) => {
                    events.emit(ListEventKind::Click, ItemDetail::item(i));
                }
                ReleaseOutcome::DragEnded | ReleaseOutcome::Suppressed(_) => {}
            }
        }
        ListenerKind::Cancel => {
            state.borrow_mut().press.cancel();
        }
        ListenerKind::Move | ListenerKind::End => {}
    }
}

fn on_drop<W: WidgetId, T: 'static>(
    id: W,
    state: &Rc<RefCell<ListState<T>>>,
    events: &Events<W>,
    de: &mut DropEvent<W>,
    cx: &mut Cx<'_, W>,
) {
    match de.kind {
        DropKind::Over => {
            if let Some(position) = hover(state, events, cx, de.detail.local) {
                de.accept(position);
            }
            if !cx.has_timer_listener() {
                let (st, ev) = (state.clone(), events.clone());
                cx.add_timer_listener(move |cx| auto_scroll(&st, &ev, cx));
            }
        }
        DropKind::Out | DropKind::Cancel => {
            if let Some(ctx) = cx.context() {
                ctx.last_target = None;
            }
        }
        DropKind::Drop => {
            let Some(target) = cx.context().and_then(|ctx| ctx.last_target.take()) else {
                de.cancel();
                return;
            };
            let payload = cx.payload().cloned();
            let detail = ItemDetail::target(target, payload.clone());
            if events.emit(ListEventKind::Drop, detail).is_cancelled() {
                de.cancel();
                return;
            }
            let Some(Payload {
                source,
                items: DragItems::Rows(moved),
            }) = payload
            else {
                return;
            };
            if source != id {
                return;
            }
            let moved_to = {
                let mut st = state.borrow_mut();
                let at = reorder(&mut st.rows, &moved, target.index, target.position);
                if let Some(at) = at {
                    st.anchor = Some(at);
                }
                at
            };
            match moved_to {
                Some(at) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        widget = ?id,
                        rows = moved.len(),
                        to = at,
                        "list rows reordered"
                    );
                    events.emit(ListEventKind::Reordered, ItemDetail::item(at));
                }
                // An accepted `Over` is the handler's drop to perform.
                None if target.position != DropPosition::Over => de.cancel(),
                None => {}
            }
        }
    }
}

/// Resolve and show the drop target under `local`; returns the settled position.
fn hover<W: WidgetId, T>(
    state: &RefCell<ListState<T>>,
    events: &Events<W>,
    cx: &mut Cx<'_, W>,
    local: Option<Point>,
) -> Option<DropPosition> {
    let has_handler = events.is_set();
    let resolved = local.and_then(|local| {
        let st = state.borrow();
        let ctx = cx.context()?;
        Some((st.resolve(ctx, local, has_handler)?, st.family(), st.flow()))
    });
    let Some((target, family, flow)) = resolved else {
        clear_target(cx);
        return None;
    };
    let detail = ItemDetail::target(target, cx.payload().cloned());
    let ev = events.emit(ListEventKind::DragOver, detail);
    let settled = family.settle(
        target.position,
        has_handler,
        ev.accept_position(),
        ev.is_cancelled(),
    );
    let Some(position) = settled else {
        clear_target(cx);
        return None;
    };
    let cell = state.borrow().viewport_rect(target.index);
    let shown = ResolvedTarget {
        index: target.index,
        position,
        affordance: Affordance::for_cell(cell, position, flow),
    };
    cx.show_affordance(Some(shown.affordance));
    if let Some(ctx) = cx.context() {
        ctx.last_target = Some(shown);
    }
    Some(position)
}

fn clear_target<W: WidgetId>(cx: &mut Cx<'_, W>) {
    cx.show_affordance(None);
    if let Some(ctx) = cx.context() {
        ctx.last_target = None;
    }
}

fn auto_scroll<W: WidgetId, T>(
    state: &RefCell<ListState<T>>,
    events: &Events<W>,
    cx: &mut Cx<'_, W>,
) {
    let Some(local) = cx.local_pointer() else {
        return;
    };
    let scrolled = {
        let mut st = state.borrow_mut();
        let viewport = Rect::from_origin_size(Point::ZERO, st.viewport);
        if !viewport.contains(local) {
            return;
        }
        let next = st
            .auto_scroll
            .step_offset(viewport, local, Flow::Vertical, st.scroll, st.max_scroll());
        if let Some(next) = next {
            st.scroll = next;
        }
        next.is_some()
    };
    // Only re-resolve while this list is the target.
    let hovered = cx.context().is_some_and(|ctx| ctx.last_target.is_some());
    if scrolled && hovered {
        hover(state, events, cx, Some(local));
    }
}
