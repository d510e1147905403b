// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture widget context and the handler view of a gesture.

use core::any::Any;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Line, Point, Rect};
use thicket_event::PointerState;
use thicket_hit::{Affordance, ColumnBoundaries, DwellTracker, GridMatrix, ResolvedTarget, TreeRows};

use crate::{CursorGlyph, GeometryProvider, Overlays};

/// Geometry and tracking memoized for one widget during one gesture.
///
/// Created on first use and discarded when the gesture ends. Widgets fill in
/// whichever fields their resolver needs.
#[derive(Clone, Debug, Default)]
pub struct WidgetContext {
    /// Bounding rectangle in page coordinates.
    pub bounds: Option<Rect>,
    /// Uniform row height of a linear list.
    pub row_height: Option<f64>,
    /// Row/column matrix of a grid list.
    pub grid: Option<GridMatrix>,
    /// Column boundary ranges of a table header.
    pub columns: Option<ColumnBoundaries>,
    /// Visible rows of a tree. Cleared when a node expands mid-gesture.
    pub tree_rows: Option<TreeRows>,
    /// Auto-expand dwell tracking for trees.
    pub dwell: DwellTracker,
    /// Last target shown for this widget, after policy.
    pub last_target: Option<ResolvedTarget>,
    /// Whether this widget registered a timer listener.
    pub timer_registered: bool,
}

pub(crate) type TimerListener<W, P> = Box<dyn FnMut(&mut GestureCx<'_, W, P>)>;

pub(crate) struct TimerEntry<W, P> {
    pub(crate) widget: Option<W>,
    pub(crate) listener: TimerListener<W, P>,
}

/// A handler's view of the active gesture.
///
/// Handlers read the pointer, payload, and data bag, write their own
/// [`WidgetContext`], drive overlays, register timer listeners, and may ask
/// for the gesture to be cancelled. They cannot replace the gesture itself.
pub struct GestureCx<'a, W, P> {
    pub(crate) widget: Option<W>,
    pub(crate) origin: PointerState,
    pub(crate) pointer: PointerState,
    pub(crate) drag_started: bool,
    pub(crate) source: Option<W>,
    pub(crate) payload: Option<&'a P>,
    pub(crate) data: &'a mut Option<Box<dyn Any>>,
    pub(crate) contexts: &'a mut HashMap<W, WidgetContext>,
    pub(crate) timers: &'a mut Vec<TimerEntry<W, P>>,
    pub(crate) cancel_requested: &'a mut bool,
    pub(crate) overlays: &'a mut Overlays,
    pub(crate) geometry: &'a dyn GeometryProvider<W>,
}

impl<W, P> core::fmt::Debug for GestureCx<'_, W, P>
where
    W: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GestureCx")
            .field("widget", &self.widget)
            .field("pointer", &self.pointer)
            .field("drag_started", &self.drag_started)
            .finish_non_exhaustive()
    }
}

impl<W: Copy + Eq + Hash, P> GestureCx<'_, W, P> {
    /// The widget this handler belongs to.
    pub fn widget(&self) -> Option<W> {
        self.widget
    }

    /// The widget that started the gesture, if any.
    pub fn source(&self) -> Option<W> {
        self.source
    }

    /// Pointer state when the gesture started.
    pub fn origin(&self) -> &PointerState {
        &self.origin
    }

    /// Current pointer state.
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Whether the pointer has moved far enough for a drag to begin.
    pub fn drag_started(&self) -> bool {
        self.drag_started
    }

    /// The dragged object, for drag-and-drop gestures.
    pub fn payload(&self) -> Option<&P> {
        self.payload
    }

    /// The initiator's data bag, if it holds a `T`.
    pub fn data<T: 'static>(&self) -> Option<&T> {
        self.data.as_deref()?.downcast_ref()
    }

    /// Mutable access to the initiator's data bag, if it holds a `T`.
    pub fn data_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.data.as_deref_mut()?.downcast_mut()
    }

    /// This widget's context slot, created empty on first use.
    pub fn context(&mut self) -> Option<&mut WidgetContext> {
        let w = self.widget?;
        Some(self.contexts.entry(w).or_default())
    }

    /// This widget's context slot, created with `init` on first use.
    ///
    /// `init` runs at most once per widget per gesture.
    pub fn context_or_insert_with(
        &mut self,
        init: impl FnOnce() -> WidgetContext,
    ) -> Option<&mut WidgetContext> {
        let w = self.widget?;
        Some(self.contexts.entry(w).or_insert_with(init))
    }

    /// This widget's bounds in page coordinates, memoized in its context.
    pub fn bounds(&mut self) -> Option<Rect> {
        let w = self.widget?;
        let geometry = self.geometry;
        let ctx = self.contexts.entry(w).or_default();
        if ctx.bounds.is_none() {
            ctx.bounds = geometry.bounds(&w);
        }
        ctx.bounds
    }

    /// The current pointer position in this widget's local coordinates.
    pub fn local_pointer(&self) -> Option<Point> {
        self.to_local(self.pointer.position)
    }

    /// Translate a page point into this widget's local coordinates.
    pub fn to_local(&self, page: Point) -> Option<Point> {
        self.geometry.to_local(&self.widget?, page)
    }

    /// Translate a local point of this widget into page coordinates.
    pub fn to_page(&self, local: Point) -> Option<Point> {
        self.geometry.to_page(&self.widget?, local)
    }

    /// Show a resolver affordance given in this widget's local coordinates.
    ///
    /// `None` hides both the border box and the insertion line.
    pub fn show_affordance(&mut self, affordance: Option<Affordance>) {
        let page = affordance.and_then(|a| match a {
            Affordance::Border(r) => {
                let p0 = self.to_page(Point::new(r.x0, r.y0))?;
                let p1 = self.to_page(Point::new(r.x1, r.y1))?;
                Some(Affordance::Border(Rect::from_points(p0, p1)))
            }
            Affordance::InsertionLine(l) => Some(Affordance::InsertionLine(Line::new(
                self.to_page(l.p0)?,
                self.to_page(l.p1)?,
            ))),
        });
        self.overlays.show_affordance(page);
    }

    /// Direct access to the overlays, in page coordinates.
    pub fn overlays(&mut self) -> &mut Overlays {
        self.overlays
    }

    /// Set or restore the cursor.
    pub fn set_cursor(&mut self, glyph: Option<CursorGlyph>) {
        self.overlays.set_cursor(glyph);
    }

    /// Register a callback to run on every timer tick while the gesture lasts.
    ///
    /// The interval starts once the current dispatch returns.
    pub fn add_timer_listener(&mut self, listener: impl FnMut(&mut GestureCx<'_, W, P>) + 'static) {
        if let Some(ctx) = self.context() {
            ctx.timer_registered = true;
        }
        self.timers.push(TimerEntry {
            widget: self.widget,
            listener: Box::new(listener),
        });
    }

    /// Whether this widget already registered a timer listener.
    pub fn has_timer_listener(&self) -> bool {
        self.widget
            .and_then(|w| self.contexts.get(&w))
            .is_some_and(|ctx| ctx.timer_registered)
    }

    /// Ask for the gesture to be cancelled once this dispatch returns.
    pub fn request_cancel(&mut self) {
        *self.cancel_requested = true;
    }
}
