// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitter bar interaction model.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect};
use thicket_event::{InteractionEvent, PointerState};
use thicket_gesture::{
    Capabilities, CursorGlyph, GestureCx, GestureStart, ListenerEvent, ListenerKind, WidgetKind,
};
use thicket_hit::{Flow, resize_extent};

use crate::{
    EventSlot, Payload, Result, SharedController, WidgetError, WidgetId, local_point, start_gesture,
};

/// Semantic events of a [`Splitter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitterEventKind {
    /// The bar is about to be previewed at `position`. Cancel to keep the last preview.
    Move,
    /// A drag ended and the bar now sits at `position`.
    Resized,
}

/// Detail of [`SplitterEvent`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitterDetail {
    /// Bar offset along the split axis.
    pub position: f64,
}

/// Event emitted by a [`Splitter`].
pub type SplitterEvent = InteractionEvent<SplitterEventKind, SplitterDetail>;

type Events = EventSlot<SplitterEventKind, SplitterDetail>;
type Cx<'a, W> = GestureCx<'a, W, Payload<W>>;

#[derive(Debug)]
struct SplitterState {
    flow: Flow,
    extent: f64,
    thickness: f64,
    position: f64,
    min: f64,
    max: Option<f64>,
    preview: Option<f64>,
}

impl SplitterState {
    /// Bar rectangle at `position`, in splitter-local coordinates.
    fn bar_at(&self, position: f64) -> Rect {
        match self.flow {
            Flow::Horizontal => Rect::new(position, 0.0, position + self.thickness, self.extent),
            Flow::Vertical => Rect::new(0.0, position, self.extent, position + self.thickness),
        }
    }

    fn axis(&self, p: Point) -> f64 {
        match self.flow {
            Flow::Horizontal => p.x,
            Flow::Vertical => p.y,
        }
    }

    /// Upper limit for the bar; without one, the bar stops at the far edge of `bounds`.
    fn max_in(&self, bounds: Option<Rect>) -> f64 {
        let fit = bounds.map_or(f64::INFINITY, |b| {
            let length = match self.flow {
                Flow::Horizontal => b.width(),
                Flow::Vertical => b.height(),
            };
            (length - self.thickness).max(self.min)
        });
        self.max.unwrap_or(fit)
    }

    fn cursor(&self) -> CursorGlyph {
        match self.flow {
            Flow::Horizontal => CursorGlyph::ResizeHorizontal,
            Flow::Vertical => CursorGlyph::ResizeVertical,
        }
    }
}

/// A splitter bar dividing two panes, driven by a shared gesture controller.
///
/// With [`Flow::Horizontal`] the panes sit side by side and the bar moves
/// along x; with [`Flow::Vertical`] they stack and it moves along y. The
/// position is the bar's offset from the splitter's origin, clamped to
/// `[min, max]`; with no upper limit set, a drag stops where the bar meets
/// the far edge of the splitter's bounds. While dragging, the bar is
/// previewed as a shade overlay and only committed on release.
pub struct Splitter<W: WidgetId> {
    id: W,
    gc: SharedController<W>,
    state: Rc<RefCell<SplitterState>>,
    events: Events,
}

impl<W: WidgetId> fmt::Debug for Splitter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Splitter");
        s.field("id", &self.id);
        if let Ok(st) = self.state.try_borrow() {
            s.field("flow", &st.flow).field("position", &st.position);
        }
        s.finish_non_exhaustive()
    }
}

impl<W: WidgetId> Splitter<W> {
    /// Create a splitter and register it.
    ///
    /// `extent` is the splitter's size across the split axis. The bar starts at
    /// `position` and is 4 wide. Until [`set_limits`](Self::set_limits) sets an
    /// upper limit, drags are bounded by the splitter's own bounds.
    pub fn new(
        gc: &SharedController<W>,
        id: W,
        flow: Flow,
        extent: f64,
        position: f64,
    ) -> Result<Self> {
        gc.try_borrow_mut()
            .map_err(|_| WidgetError::ControllerBusy)?
            .register_widget(id, WidgetKind::Splitter, Capabilities::empty());
        Ok(Self {
            id,
            gc: gc.clone(),
            state: Rc::new(RefCell::new(SplitterState {
                flow,
                extent,
                thickness: 4.0,
                position: position.max(0.0),
                min: 0.0,
                max: None,
                preview: None,
            })),
            events: Events::new(),
        })
    }

    /// Install the application event handler.
    pub fn on_event(&self, handler: impl FnMut(&mut SplitterEvent) + 'static) {
        self.events.set(handler);
    }

    /// Widget identity.
    pub fn id(&self) -> W {
        self.id
    }

    /// Committed bar position.
    pub fn position(&self) -> f64 {
        self.state.borrow().position
    }

    /// Position being previewed by an active drag.
    pub fn preview(&self) -> Option<f64> {
        self.state.borrow().preview
    }

    /// Move the bar, clamped to the limits, without emitting events.
    pub fn set_position(&self, position: f64) {
        let mut st = self.state.borrow_mut();
        let max = st.max.unwrap_or(f64::INFINITY);
        st.position = position.clamp(st.min, max);
    }

    /// Restrict the bar to `[min, max]`. The current position is clamped.
    pub fn set_limits(&self, min: f64, max: f64) {
        let mut st = self.state.borrow_mut();
        st.min = min.max(0.0);
        let max = max.max(st.min);
        st.max = Some(max);
        st.position = st.position.clamp(st.min, max);
    }

    /// Bar thickness along the split axis.
    pub fn set_thickness(&self, thickness: f64) {
        self.state.borrow_mut().thickness = thickness.max(0.0);
    }

    /// Committed bar rectangle in splitter-local coordinates.
    pub fn bar_rect(&self) -> Rect {
        let st = self.state.borrow();
        st.bar_at(st.position)
    }

    /// Cursor to show while hovering `pointer` with no gesture active.
    pub fn hover_cursor(&self, pointer: Point) -> Option<CursorGlyph> {
        let local = local_point(&self.gc, self.id, pointer).ok()?;
        let st = self.state.borrow();
        st.bar_at(st.position).contains(local).then(|| st.cursor())
    }

    /// Handle a button press. Returns `Ok(false)` if the press missed the bar.
    pub fn press(&self, pointer: PointerState) -> Result<bool> {
        let local = local_point(&self.gc, self.id, pointer.position)?;
        let start = {
            let st = self.state.borrow();
            if !st.bar_at(st.position).contains(local) {
                return Ok(false);
            }
            st.position
        };
        let listener = drag_listener(start, self.state.clone(), self.events.clone());
        start_gesture(&self.gc, GestureStart::explicit(pointer, listener).with_source(self.id))?;
        Ok(true)
    }
}

fn drag_listener<W: WidgetId>(
    start: f64,
    state: Rc<RefCell<SplitterState>>,
    events: Events,
) -> impl FnMut(&mut ListenerEvent, &mut Cx<'_, W>) + 'static {
    move |le, cx| match le.kind {
        ListenerKind::Move => {
            let bounds = cx.bounds();
            let (proposed, shown, cursor) = {
                let st = state.borrow();
                let delta = st.axis(le.detail.position) - st.axis(cx.origin().position);
                let proposed = resize_extent(start, delta, st.min, st.max_in(bounds));
                (proposed, st.preview.unwrap_or(st.position), st.cursor())
            };
            cx.set_cursor(Some(cursor));
            if proposed != shown
                && !events
                    .emit(SplitterEventKind::Move, SplitterDetail { position: proposed })
                    .is_cancelled()
            {
                state.borrow_mut().preview = Some(proposed);
            }
            let shade = {
                let st = state.borrow();
                st.preview.map(|p| st.bar_at(p))
            };
            if let Some(bar) = shade {
                let page = cx
                    .to_page(Point::new(bar.x0, bar.y0))
                    .zip(cx.to_page(Point::new(bar.x1, bar.y1)))
                    .map(|(p0, p1)| Rect::from_points(p0, p1));
                cx.overlays().show_shade(page);
            }
        }
        ListenerKind::Up => {
            let committed = {
                let mut st = state.borrow_mut();
                match st.preview.take() {
                    Some(p) if p != st.position => {
                        st.position = p;
                        Some(p)
                    }
                    _ => None,
                }
            };
            if let Some(position) = committed {
                #[cfg(feature = "tracing")]
                tracing::debug!(from = start, to = position, "splitter moved");
                events.emit(SplitterEventKind::Resized, SplitterDetail { position });
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

    fn splitter(flow: Flow) -> SplitterState {
        SplitterState {
            flow,
            extent: 300.0,
            thickness: 4.0,
            position: 100.0,
            min: 50.0,
            max: Some(250.0),
            preview: None,
        }
    }

    #[test]
    fn bar_follows_flow() {
        let h = splitter(Flow::Horizontal);
        assert_eq!(h.bar_at(100.0), Rect::new(100.0, 0.0, 104.0, 300.0));
        assert_eq!(h.axis(Point::new(7.0, 9.0)), 7.0);
        let v = splitter(Flow::Vertical);
        assert_eq!(v.bar_at(100.0), Rect::new(0.0, 100.0, 300.0, 104.0));
        assert_eq!(v.cursor(), CursorGlyph::ResizeVertical);
    }

    #[test]
    fn unlimited_bar_stops_at_the_far_edge() {
        let mut st = splitter(Flow::Horizontal);
        st.max = None;
        let bounds = Some(Rect::new(20.0, 0.0, 420.0, 300.0));
        assert_eq!(st.max_in(bounds), 396.0);
        assert_eq!(st.max_in(None), f64::INFINITY);
        st.max = Some(250.0);
        assert_eq!(st.max_in(bounds), 250.0);
    }
}
