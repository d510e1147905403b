// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tab strip interaction model: selection and reorder by drag.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect};
use thicket_event::press::{PressState, ReleaseOutcome};
use thicket_event::{DropPosition, InteractionEvent, PointerState};
use thicket_gesture::{
    Capabilities, DropEvent, DropKind, GestureCx, GestureStart, ListenerEvent, ListenerKind,
    WidgetKind,
};
use thicket_hit::{Affordance, Flow, ResolvedTarget, WidgetFamily, reorder, resolve_tabs};

use crate::{
    DragItems, EventSlot, ItemDetail, Payload, Result, SharedController, WidgetError, WidgetId,
    local_point, start_gesture,
};

/// Semantic events of a [`TabStrip`]. `index` is a tab index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TabEventKind {
    /// The tab is about to become selected. Cancel to keep the current tab.
    Select,
    /// The tab was pressed and released without a drag.
    Click,
    /// A drag of the tab is about to start. Cancel to refuse it.
    BeforeDrag,
    /// A payload is over the tab at `position`. Accept to allow the drop.
    DragOver,
    /// A payload was dropped at the tab. Cancel to refuse it.
    Drop,
    /// A tab moved; `index` is its new index.
    Reordered,
}

/// Event emitted by a [`TabStrip`].
pub type TabEvent<W> = InteractionEvent<TabEventKind, ItemDetail<W>>;

type Events<W> = EventSlot<TabEventKind, ItemDetail<W>>;
type Cx<'a, W> = GestureCx<'a, W, Payload<W>>;

#[derive(Debug)]
struct Tab<T> {
    value: T,
    width: f64,
}

#[derive(Debug)]
struct TabState<T> {
    tabs: Vec<Tab<T>>,
    height: f64,
    selected: Option<usize>,
    press: PressState<usize>,
}

impl<T> TabState<T> {
    /// Tab rectangles, left to right, in strip-local coordinates.
    fn rects(&self) -> Vec<Rect> {
        let mut x = 0.0;
        self.tabs
            .iter()
            .map(|t| {
                let r = Rect::new(x, 0.0, x + t.width, self.height);
                x += t.width;
                r
            })
            .collect()
    }

    fn tab_at(&self, local: Point) -> Option<usize> {
        if local.y < 0.0 || local.y >= self.height {
            return None;
        }
        self.rects()
            .iter()
            .position(|r| local.x >= r.x0 && local.x < r.x1)
    }

    /// Move the tab `from` relative to `target`, keeping the selection on the same tab.
    fn move_tab(&mut self, from: usize, target: usize, position: DropPosition) -> Option<usize> {
        let selected = self.selected;
        let at = reorder(&mut self.tabs, &[from], target, position)?;
        self.selected = selected.map(|s| {
            if s == from {
                at
            } else if from < s && s <= at {
                s - 1
            } else if at <= s && s < from {
                s + 1
            } else {
                s
            }
        });
        Some(at)
    }
}

/// A horizontal strip of tabs driven by a shared gesture controller.
pub struct TabStrip<W: WidgetId, T> {
    id: W,
    gc: SharedController<W>,
    state: Rc<RefCell<TabState<T>>>,
    events: Events<W>,
}

impl<W: WidgetId, T> fmt::Debug for TabStrip<W, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TabStrip");
        s.field("id", &self.id);
        if let Ok(st) = self.state.try_borrow() {
            s.field("len", &st.tabs.len())
                .field("selected", &st.selected);
        }
        s.finish_non_exhaustive()
    }
}

impl<W: WidgetId, T: 'static> TabStrip<W, T> {
    /// Create a tab strip of `height` and register it.
    ///
    /// `tabs` pairs each value with its tab width.
    pub fn new(
        gc: &SharedController<W>,
        id: W,
        height: f64,
        tabs: impl IntoIterator<Item = (T, f64)>,
    ) -> Result<Self> {
        let tabs: Vec<_> = tabs
            .into_iter()
            .map(|(value, width)| Tab {
                value,
                width: width.max(0.0),
            })
            .collect();
        let state = Rc::new(RefCell::new(TabState {
            selected: (!tabs.is_empty()).then_some(0),
            tabs,
            height,
            press: PressState::new(),
        }));
        let events = Events::new();
        {
            let mut controller = gc.try_borrow_mut().map_err(|_| WidgetError::ControllerBusy)?;
            let caps = Capabilities::DROP_TARGET | Capabilities::DRAG_SOURCE;
            controller.register_widget(id, WidgetKind::TabStrip, caps);
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
    pub fn on_event(&self, handler: impl FnMut(&mut TabEvent<W>) + 'static) {
        self.events.set(handler);
    }

    /// Widget identity.
    pub fn id(&self) -> W {
        self.id
    }

    /// Number of tabs.
    pub fn len(&self) -> usize {
        self.state.borrow().tabs.len()
    }

    /// Returns `true` if the strip has no tabs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tab values, left to right.
    pub fn tabs(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.state
            .borrow()
            .tabs
            .iter()
            .map(|t| t.value.clone())
            .collect()
    }

    /// Index of the selected tab.
    pub fn selected(&self) -> Option<usize> {
        self.state.borrow().selected
    }

    /// Select `index` without emitting events.
    pub fn select(&self, index: usize) {
        let mut st = self.state.borrow_mut();
        if index < st.tabs.len() {
            st.selected = Some(index);
        }
    }

    /// Rectangle of tab `index` in strip-local coordinates.
    pub fn tab_rect(&self, index: usize) -> Option<Rect> {
        self.state.borrow().rects().get(index).copied()
    }

    /// Handle a button press on the strip.
    ///
    /// Pressing a tab selects it at once and starts a drag of it. Returns
    /// `Ok(false)` if the press missed every tab.
    pub fn press(&self, pointer: PointerState) -> Result<bool> {
        let local = local_point(&self.gc, self.id, pointer.position)?;
        let index = {
            let mut st = self.state.borrow_mut();
            let Some(index) = st.tab_at(local) else {
                return Ok(false);
            };
            // Tabs select on press, so the press is never deferred.
            st.press.on_press(index, false, pointer.modifiers, local);
            index
        };
        let changes = self.state.borrow().selected != Some(index);
        if changes
            && !self
                .events
                .emit(TabEventKind::Select, ItemDetail::item(index))
                .is_cancelled()
        {
            self.state.borrow_mut().selected = Some(index);
        }
        let payload = Payload {
            source: self.id,
            items: DragItems::Tab(index),
        };
        let listener = press_listener(index, self.state.clone(), self.events.clone());
        let start = GestureStart::drag(pointer, payload)
            .with_listener(listener)
            .with_source(self.id);
        if let Err(err) = start_gesture(&self.gc, start) {
            self.state.borrow_mut().press.cancel();
            return Err(err);
        }
        Ok(true)
    }
}

fn press_listener<W: WidgetId, T: 'static>(
    pressed: usize,
    state: Rc<RefCell<TabState<T>>>,
    events: Events<W>,
) -> impl FnMut(&mut ListenerEvent, &mut Cx<'_, W>) + 'static {
    move |le, cx| match le.kind {
        ListenerKind::BeforeDrag => {
            let detail = ItemDetail::drag(Some(pressed), None, cx.payload().cloned());
            if events.emit(TabEventKind::BeforeDrag, detail).is_cancelled() {
                le.cancel();
            } else {
                state.borrow_mut().press.on_gesture_start();
            }
        }
        ListenerKind::Up => {
            let current = cx.local_pointer().and_then(|p| state.borrow().tab_at(p));
            let outcome = state.borrow_mut().press.on_release(current.as_ref());
            if let ReleaseOutcome::AlreadySelected(i) | ReleaseOutcome::ApplyDeferred(i) = outcome {
                events.emit(TabEventKind::Click, ItemDetail::item(i));
            }
        }
        ListenerKind::Cancel => {
            state.borrow_mut().press.cancel();
        }
        ListenerKind::Move | ListenerKind::End => {}
    }
}

fn on_drop<W: WidgetId, T>(
    id: W,
    state: &RefCell<TabState<T>>,
    events: &Events<W>,
    de: &mut DropEvent<W>,
    cx: &mut Cx<'_, W>,
) {
    match de.kind {
        DropKind::Over => {
            if let Some(position) = hover(state, events, cx, de.detail.local) {
                de.accept(position);
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
            if events.emit(TabEventKind::Drop, detail).is_cancelled() {
                de.cancel();
                return;
            }
            let Some(Payload {
                source,
                items: DragItems::Tab(from),
            }) = payload
            else {
                return;
            };
            if source != id {
                return;
            }
            let moved_to = state.borrow_mut().move_tab(from, target.index, target.position);
            if let Some(at) = moved_to {
                #[cfg(feature = "tracing")]
                tracing::debug!(widget = ?id, from, to = at, "tab reordered");
                events.emit(TabEventKind::Reordered, ItemDetail::item(at));
            }
        }
    }
}

fn hover<W: WidgetId, T>(
    state: &RefCell<TabState<T>>,
    events: &Events<W>,
    cx: &mut Cx<'_, W>,
    local: Option<Point>,
) -> Option<DropPosition> {
    let has_handler = events.is_set();
    let rects = state.borrow().rects();
    let resolved = local.and_then(|local| resolve_tabs(&rects, local, has_handler));
    let settled = resolved.and_then(|target| {
        let detail = ItemDetail::target(target, cx.payload().cloned());
        let ev = events.emit(TabEventKind::DragOver, detail);
        let position = WidgetFamily::TabStrip.settle(
            target.position,
            has_handler,
            ev.accept_position(),
            ev.is_cancelled(),
        )?;
        Some(ResolvedTarget {
            index: target.index,
            position,
            affordance: Affordance::for_cell(rects[target.index], position, Flow::Horizontal),
        })
    });
    cx.show_affordance(settled.map(|t| t.affordance));
    if let Some(ctx) = cx.context() {
        ctx.last_target = settled;
    }
    settled.map(|t| t.position)
}
