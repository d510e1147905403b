// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movable, resizable dialog interaction model.
//!
//! A dialog's rectangle is kept in page coordinates. Pressing within the edge
//! tolerance of a side honoured by its [`EdgeMask`] resizes it; pressing its
//! title bar moves it. Either way the proposed rectangle is previewed as a
//! shade overlay and committed on release.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect};
use thicket_event::{InteractionEvent, PointerState};
use thicket_gesture::{
    Capabilities, CursorGlyph, GestureCx, GestureStart, ListenerEvent, ListenerKind, WidgetKind,
};
use thicket_hit::{EdgeConfig, EdgeMask, EdgeZone, SizeLimits, classify, move_rect, resize_rect};

use crate::{EventSlot, Payload, Result, SharedController, WidgetError, WidgetId, start_gesture};

/// Semantic events of a [`Dialog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogEventKind {
    /// The dialog is about to be previewed at `rect`. Cancel to keep the last preview.
    Move,
    /// A move ended with the dialog at `rect`.
    Moved,
    /// The dialog is about to be previewed resized to `rect`. Cancel to keep the last preview.
    Resize,
    /// A resize ended with the dialog at `rect`.
    Resized,
}

/// Detail of [`DialogEvent`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DialogDetail {
    /// Edge being dragged; [`EdgeZone::None`] for moves.
    pub zone: EdgeZone,
    /// Proposed or final rectangle, in page coordinates.
    pub rect: Rect,
}

/// Event emitted by a [`Dialog`].
pub type DialogEvent = InteractionEvent<DialogEventKind, DialogDetail>;

type Events = EventSlot<DialogEventKind, DialogDetail>;
type Cx<'a, W> = GestureCx<'a, W, Payload<W>>;

#[derive(Debug)]
struct DialogState {
    rect: Rect,
    mask: EdgeMask,
    edge: EdgeConfig,
    limits: SizeLimits,
    bounds: Option<Rect>,
    title_height: f64,
    preview: Option<Rect>,
}

/// What a press on the dialog grabbed.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Grab {
    Resize(EdgeZone),
    Move,
}

impl DialogState {
    fn grab_at(&self, page: Point) -> Option<Grab> {
        match classify(self.rect, page, self.mask, self.edge) {
            EdgeZone::None => {
                let r = self.rect;
                let title = Rect::new(r.x0, r.y0, r.x1, r.y0 + self.title_height);
                title.contains(page).then_some(Grab::Move)
            }
            zone => Some(Grab::Resize(zone)),
        }
    }

    fn propose(
        &self,
        start: Rect,
        grab: Grab,
        pointer: &PointerState,
        origin: &PointerState,
    ) -> Rect {
        let delta = pointer.delta_from(origin);
        match grab {
            Grab::Resize(zone) => resize_rect(start, zone, delta, self.limits),
            Grab::Move => move_rect(start, delta, self.bounds),
        }
    }
}

/// A dialog driven by a shared gesture controller.
pub struct Dialog<W: WidgetId> {
    id: W,
    gc: SharedController<W>,
    state: Rc<RefCell<DialogState>>,
    events: Events,
}

impl<W: WidgetId> fmt::Debug for Dialog<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Dialog");
        s.field("id", &self.id);
        if let Ok(st) = self.state.try_borrow() {
            s.field("rect", &st.rect).field("mask", &st.mask);
        }
        s.finish_non_exhaustive()
    }
}

impl<W: WidgetId> Dialog<W> {
    /// Create a dialog at `rect` (page coordinates) and register it.
    ///
    /// Only the sides in `mask` can be dragged to resize. The title bar is 24
    /// high, sizes are unlimited, and moves are unconstrained until configured.
    pub fn new(gc: &SharedController<W>, id: W, rect: Rect, mask: EdgeMask) -> Result<Self> {
        gc.try_borrow_mut()
            .map_err(|_| WidgetError::ControllerBusy)?
            .register_widget(id, WidgetKind::Dialog, Capabilities::empty());
        Ok(Self {
            id,
            gc: gc.clone(),
            state: Rc::new(RefCell::new(DialogState {
                rect,
                mask,
                edge: EdgeConfig::default(),
                limits: SizeLimits::default(),
                bounds: None,
                title_height: 24.0,
                preview: None,
            })),
            events: Events::new(),
        })
    }

    /// Install the application event handler.
    pub fn on_event(&self, handler: impl FnMut(&mut DialogEvent) + 'static) {
        self.events.set(handler);
    }

    /// Widget identity.
    pub fn id(&self) -> W {
        self.id
    }

    /// Committed rectangle, in page coordinates.
    pub fn rect(&self) -> Rect {
        self.state.borrow().rect
    }

    /// Rectangle being previewed by an active gesture.
    pub fn preview(&self) -> Option<Rect> {
        self.state.borrow().preview
    }

    /// Place the dialog without emitting events.
    pub fn set_rect(&self, rect: Rect) {
        self.state.borrow_mut().rect = rect;
    }

    /// Size limits applied while resizing.
    pub fn set_limits(&self, limits: SizeLimits) {
        self.state.borrow_mut().limits = limits;
    }

    /// Area moves must stay inside, in page coordinates.
    pub fn set_bounds(&self, bounds: Option<Rect>) {
        self.state.borrow_mut().bounds = bounds;
    }

    /// Height of the strip along the top edge that moves the dialog.
    pub fn set_title_height(&self, height: f64) {
        self.state.borrow_mut().title_height = height.max(0.0);
    }

    /// Edge tolerance for resize grabs.
    pub fn set_edge_config(&self, edge: EdgeConfig) {
        self.state.borrow_mut().edge = edge;
    }

    /// Resize zone under the page point `pointer`.
    pub fn zone_at(&self, pointer: Point) -> EdgeZone {
        let st = self.state.borrow();
        classify(st.rect, pointer, st.mask, st.edge)
    }

    /// Cursor to show while hovering `pointer` with no gesture active.
    pub fn hover_cursor(&self, pointer: Point) -> Option<CursorGlyph> {
        CursorGlyph::for_zone(self.zone_at(pointer))
    }

    /// Handle a button press. Returns `Ok(false)` if it grabbed neither an edge nor the title bar.
    pub fn press(&self, pointer: PointerState) -> Result<bool> {
        let (grab, start) = {
            let st = self.state.borrow();
            let Some(grab) = st.grab_at(pointer.position) else {
                return Ok(false);
            };
            (grab, st.rect)
        };
        let listener = drag_listener(grab, start, self.state.clone(), self.events.clone());
        start_gesture(&self.gc, GestureStart::explicit(pointer, listener).with_source(self.id))?;
        Ok(true)
    }
}

fn drag_listener<W: WidgetId>(
    grab: Grab,
    start: Rect,
    state: Rc<RefCell<DialogState>>,
    events: Events,
) -> impl FnMut(&mut ListenerEvent, &mut Cx<'_, W>) + 'static {
    let (zone, preview_kind, commit_kind, cursor) = match grab {
        Grab::Resize(zone) => (
            zone,
            DialogEventKind::Resize,
            DialogEventKind::Resized,
            CursorGlyph::for_zone(zone),
        ),
        Grab::Move => (
            EdgeZone::None,
            DialogEventKind::Move,
            DialogEventKind::Moved,
            Some(CursorGlyph::Grabbing),
        ),
    };
    move |le, cx| match le.kind {
        ListenerKind::Move => {
            let (proposed, shown) = {
                let st = state.borrow();
                (st.propose(start, grab, &le.detail, cx.origin()), st.preview.unwrap_or(st.rect))
            };
            cx.set_cursor(cursor);
            if proposed != shown
                && !events
                    .emit(preview_kind, DialogDetail { zone, rect: proposed })
                    .is_cancelled()
            {
                state.borrow_mut().preview = Some(proposed);
            }
            let shade = state.borrow().preview;
            cx.overlays().show_shade(shade);
        }
        ListenerKind::Up => {
            let committed = {
                let mut st = state.borrow_mut();
                match st.preview.take() {
                    Some(r) if r != st.rect => {
                        st.rect = r;
                        Some(r)
                    }
                    _ => None,
                }
            };
            if let Some(rect) = committed {
                #[cfg(feature = "tracing")]
                tracing::debug!(?zone, ?rect, "dialog geometry committed");
                events.emit(commit_kind, DialogDetail { zone, rect });
            }
        }
        ListenerKind::Cancel => {
            state.borrow_mut().preview = None;
        }
        ListenerKind::BeforeDrag | ListenerKind::End => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog(mask: EdgeMask) -> DialogState {
        DialogState {
            rect: Rect::new(100.0, 100.0, 300.0, 250.0),
            mask,
            edge: EdgeConfig::default(),
            limits: SizeLimits {
                min: kurbo::Size::new(120.0, 80.0),
                max: kurbo::Size::new(400.0, 300.0),
            },
            bounds: Some(Rect::new(0.0, 0.0, 500.0, 400.0)),
            title_height: 24.0,
            preview: None,
        }
    }

    #[test]
    fn edges_win_over_title_bar() {
        let st = dialog(EdgeMask::all());
        assert_eq!(st.grab_at(Point::new(102.0, 103.0)), Some(Grab::Resize(EdgeZone::TopLeft)));
        assert_eq!(st.grab_at(Point::new(200.0, 110.0)), Some(Grab::Move));
        assert_eq!(st.grab_at(Point::new(200.0, 200.0)), None);
        assert_eq!(st.grab_at(Point::new(299.0, 200.0)), Some(Grab::Resize(EdgeZone::Right)));
    }

    #[test]
    fn masked_edges_fall_back_to_title() {
        let st = dialog(EdgeMask::RIGHT | EdgeMask::BOTTOM);
        assert_eq!(st.grab_at(Point::new(150.0, 101.0)), Some(Grab::Move));
        assert_eq!(st.grab_at(Point::new(101.0, 200.0)), None);
    }

    #[test]
    fn proposals_respect_limits_and_bounds() {
        let st = dialog(EdgeMask::all());
        let origin = PointerState::new(Point::new(300.0, 250.0));
        let far = PointerState::new(Point::new(900.0, 251.0));
        let grown = st.propose(st.rect, Grab::Resize(EdgeZone::BottomRight), &far, &origin);
        assert_eq!(grown, Rect::new(100.0, 100.0, 500.0, 251.0));
        let moved = st.propose(st.rect, Grab::Move, &far, &origin);
        assert_eq!(moved, Rect::new(300.0, 101.0, 500.0, 251.0));
    }
}
