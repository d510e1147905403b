// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture controller.
//!
//! ## Lifecycle
//!
//! - **Idle**: no gesture. Move, release, and cancel notifications are ignored.
//! - **Active**: entered by [`GestureController::start_gesture`]. Pointer
//!   notifications are routed either to the gesture's move listener
//!   (explicit mode) or to the drop target under the pointer (drag mode).
//! - Release, or any cancellation source, dispatches the final events and runs
//!   one teardown routine that clears overlays, restores the cursor, stops the
//!   timer, releases capture, and discards per-widget contexts.
//!
//! ## Drag mode
//!
//! The hit widget reported with each move is walked up through the
//! [`ParentLookup`] until a widget registered with
//! [`Capabilities::DROP_TARGET`] is found. When the target changes, the old one
//! receives [`DropKind::Out`] and overlays are reset before the new one
//! receives [`DropKind::Over`] with [`DropDetail::entered`] set. A target that
//! [`accept`](InteractionEvent::accept)s gets the move cursor; otherwise the
//! no-drop cursor is shown.
//!
//! Until the pointer moves (beyond [`GestureConfig::drag_threshold`], when set)
//! no drag has started: the listener has not seen
//! [`ListenerKind::BeforeDrag`] and a release dispatches no drop.

use core::any::Any;
use core::fmt::Debug;
use core::hash::Hash;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::{Line, Point, Rect};
use thicket_event::{Input, InteractionEvent, Key, PointerState};

use crate::context::{GestureCx, TimerEntry, WidgetContext};
use crate::{
    Capabilities, CursorGlyph, GeometryProvider, GestureError, NoParent, OverlayRenderer, Overlays,
    ParentLookup, Platform, Result, WidgetKind,
};

/// Controller configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Period of the gesture timer.
    pub timer_period: Duration,
    /// Request pointer capture when a gesture starts.
    pub implicit_capture: bool,
    /// Distance the pointer must travel before a drag starts; `None` means any move.
    pub drag_threshold: Option<f64>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            timer_period: Duration::from_millis(100),
            implicit_capture: true,
            drag_threshold: None,
        }
    }
}

/// Notifications delivered to drop targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropKind {
    /// The pointer is over the target (first entry sets [`DropDetail::entered`]).
    Over,
    /// The pointer left the target.
    Out,
    /// The pointer was released over the target.
    Drop,
    /// The gesture was cancelled while over the target.
    Cancel,
}

/// Detail of a [`DropEvent`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropDetail<W> {
    /// The drop target.
    pub widget: W,
    /// Pointer position in the target's local coordinates, if it is laid out.
    pub local: Option<Point>,
    /// `true` for the first `Over` after the pointer entered the target.
    pub entered: bool,
}

/// Event passed to drop handlers.
///
/// Handlers call [`accept`](InteractionEvent::accept) to signal that the
/// payload can be dropped here, or [`cancel`](InteractionEvent::cancel) to
/// refuse a [`DropKind::Drop`].
pub type DropEvent<W> = InteractionEvent<DropKind, DropDetail<W>>;

/// Notifications delivered to a gesture's listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Drag mode: the first move of the gesture. Cancelling it cancels the gesture.
    BeforeDrag,
    /// Explicit mode: the pointer moved.
    Move,
    /// The pointer was released.
    Up,
    /// The gesture was cancelled.
    Cancel,
    /// The gesture is over; always the last notification.
    End,
}

/// Event passed to gesture listeners. The detail is the current pointer state.
pub type ListenerEvent = InteractionEvent<ListenerKind, PointerState>;

/// Drop handler registered per widget.
pub type DropHandler<W, P> = Box<dyn FnMut(&mut DropEvent<W>, &mut GestureCx<'_, W, P>)>;

/// Listener attached to one gesture.
pub type Listener<W, P> = Box<dyn FnMut(&mut ListenerEvent, &mut GestureCx<'_, W, P>)>;

/// How pointer moves are routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureMode {
    /// Moves go to drop targets under the pointer.
    Drag,
    /// Moves go to the gesture's listener (resize, splitter drag, dialog move).
    Explicit,
}

/// Why a gesture was cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// [`GestureController::cancel_gesture`].
    Requested,
    /// The Escape key.
    Escape,
    /// The window lost focus.
    Blur,
    /// The platform revoked pointer capture.
    CaptureLost,
    /// The pointer left the window while capture was not held.
    LeftWindow,
    /// A handler called [`GestureCx::request_cancel`].
    Handler,
    /// The listener cancelled [`ListenerKind::BeforeDrag`].
    DragRefused,
}

/// How the last gesture ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureOutcome<W> {
    /// Released over a drop target that did not refuse the drop.
    Dropped(W),
    /// Released with no drop.
    Released,
    /// Cancelled.
    Cancelled(CancelReason),
}

/// Parameters of a new gesture.
pub struct GestureStart<W, P> {
    origin: PointerState,
    mode: GestureMode,
    source: Option<W>,
    payload: Option<P>,
    data: Option<Box<dyn Any>>,
    listener: Option<Listener<W, P>>,
    suppress_capture: bool,
}

impl<W: Debug, P> Debug for GestureStart<W, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GestureStart")
            .field("origin", &self.origin)
            .field("mode", &self.mode)
            .field("source", &self.source)
            .field("suppress_capture", &self.suppress_capture)
            .finish_non_exhaustive()
    }
}

impl<W, P> GestureStart<W, P> {
    /// A drag-and-drop gesture carrying `payload`.
    pub fn drag(origin: PointerState, payload: P) -> Self {
        Self {
            origin,
            mode: GestureMode::Drag,
            source: None,
            payload: Some(payload),
            data: None,
            listener: None,
            suppress_capture: false,
        }
    }

    /// An explicit-capture gesture whose moves all go to `listener`.
    pub fn explicit(
        origin: PointerState,
        listener: impl FnMut(&mut ListenerEvent, &mut GestureCx<'_, W, P>) + 'static,
    ) -> Self {
        Self {
            origin,
            mode: GestureMode::Explicit,
            source: None,
            payload: None,
            data: None,
            listener: Some(Box::new(listener)),
            suppress_capture: false,
        }
    }

    /// Record the widget that started the gesture.
    #[must_use]
    pub fn with_source(mut self, source: W) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach a free-form data bag, readable through [`GestureCx::data`].
    #[must_use]
    pub fn with_data<T: Any>(mut self, data: T) -> Self {
        self.data = Some(Box::new(data));
        self
    }

    /// Attach (or replace) the gesture's listener.
    #[must_use]
    pub fn with_listener(
        mut self,
        listener: impl FnMut(&mut ListenerEvent, &mut GestureCx<'_, W, P>) + 'static,
    ) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Do not request pointer capture; leaving the window then cancels the gesture.
    #[must_use]
    pub fn suppress_implicit_capture(mut self) -> Self {
        self.suppress_capture = true;
        self
    }
}

struct Registration<W, P> {
    kind: WidgetKind,
    caps: Capabilities,
    drop_handler: Option<DropHandler<W, P>>,
}

struct Gesture<W, P> {
    mode: GestureMode,
    origin: PointerState,
    pointer: PointerState,
    source: Option<W>,
    payload: Option<P>,
    data: Option<Box<dyn Any>>,
    contexts: HashMap<W, WidgetContext>,
    listener: Option<Listener<W, P>>,
    hovered: Option<W>,
    drag_started: bool,
    captured: bool,
    timers: Vec<TimerEntry<W, P>>,
    cancel_requested: bool,
}

impl<W: Copy + Eq + Hash, P> Gesture<W, P> {
    fn cx<'a>(
        &'a mut self,
        widget: Option<W>,
        overlays: &'a mut Overlays,
        geometry: &'a dyn GeometryProvider<W>,
    ) -> GestureCx<'a, W, P> {
        GestureCx {
            widget,
            origin: self.origin,
            pointer: self.pointer,
            drag_started: self.drag_started,
            source: self.source,
            payload: self.payload.as_ref(),
            data: &mut self.data,
            contexts: &mut self.contexts,
            timers: &mut self.timers,
            cancel_requested: &mut self.cancel_requested,
            overlays,
            geometry,
        }
    }
}

/// Arbitrates the single in-flight pointer gesture across all widgets.
///
/// ## Usage
///
/// - Construct with [`GestureController::new`], handing over the host's
///   geometry, overlay renderer, and platform services. Add a
///   [`ParentLookup`] with [`with_parent`](Self::with_parent) when hit widgets
///   can be descendants of drop targets.
/// - Register widgets with [`register_widget`](Self::register_widget) and
///   drop targets' handlers with [`set_drop_handler`](Self::set_drop_handler).
/// - Start gestures with [`start_gesture`](Self::start_gesture), then feed
///   platform notifications through [`handle`](Self::handle) (or the
///   individual entry points).
///
/// Handlers run while the controller is mutably borrowed and must not call
/// back into it; they act through [`GestureCx`].
pub struct GestureController<W, P> {
    config: GestureConfig,
    registry: HashMap<W, Registration<W, P>>,
    parent: Box<dyn ParentLookup<W>>,
    geometry: Box<dyn GeometryProvider<W>>,
    overlays: Overlays,
    platform: Box<dyn Platform>,
    gesture: Option<Gesture<W, P>>,
    timer_running: bool,
    outcome: Option<GestureOutcome<W>>,
}

impl<W: Debug, P> Debug for GestureController<W, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GestureController")
            .field("config", &self.config)
            .field("widgets", &self.registry.len())
            .field("active", &self.gesture.is_some())
            .field("timer_running", &self.timer_running)
            .field("overlays", &self.overlays)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl<W, P> GestureController<W, P>
where
    W: Copy + Eq + Hash + Debug + 'static,
    P: 'static,
{
    /// Create an idle controller with the default configuration.
    pub fn new(
        geometry: impl GeometryProvider<W> + 'static,
        overlays: impl OverlayRenderer + 'static,
        platform: impl Platform + 'static,
    ) -> Self {
        Self {
            config: GestureConfig::default(),
            registry: HashMap::new(),
            parent: Box::new(NoParent),
            geometry: Box::new(geometry),
            overlays: Overlays::new(Box::new(overlays)),
            platform: Box::new(platform),
            gesture: None,
            timer_running: false,
            outcome: None,
        }
    }

    /// Use `parent` to walk from hit widgets up to drop targets.
    #[must_use]
    pub fn with_parent(mut self, parent: impl ParentLookup<W> + 'static) -> Self {
        self.parent = Box::new(parent);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GestureConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    // --- Registration ---

    /// Register `widget`, replacing any earlier registration and its handler.
    pub fn register_widget(&mut self, widget: W, kind: WidgetKind, caps: Capabilities) {
        self.registry.insert(
            widget,
            Registration {
                kind,
                caps,
                drop_handler: None,
            },
        );
    }

    /// Install the drop handler of a registered drop target.
    pub fn set_drop_handler(
        &mut self,
        widget: W,
        handler: impl FnMut(&mut DropEvent<W>, &mut GestureCx<'_, W, P>) + 'static,
    ) -> Result<()> {
        let reg = self
            .registry
            .get_mut(&widget)
            .ok_or(GestureError::UnknownWidget)?;
        if !reg.caps.contains(Capabilities::DROP_TARGET) {
            return Err(GestureError::NotDropTarget);
        }
        reg.drop_handler = Some(Box::new(handler));
        Ok(())
    }

    /// Forget `widget`. Returns `false` if it was not registered.
    ///
    /// If the active gesture is over the widget, it stops tracking it without
    /// sending `Out`.
    pub fn unregister_widget(&mut self, widget: W) -> bool {
        if let Some(g) = self.gesture.as_mut() {
            if g.hovered == Some(widget) {
                g.hovered = None;
            }
            g.contexts.remove(&widget);
        }
        self.registry.remove(&widget).is_some()
    }

    /// Capabilities of `widget`; empty if unregistered.
    pub fn capabilities(&self, widget: &W) -> Capabilities {
        self.registry
            .get(widget)
            .map_or(Capabilities::empty(), |r| r.caps)
    }

    /// Kind of `widget`, if registered.
    pub fn kind(&self, widget: &W) -> Option<WidgetKind> {
        self.registry.get(widget).map(|r| r.kind)
    }

    /// Whether `widget` is a registered drop target.
    pub fn is_drop_target(&self, widget: &W) -> bool {
        self.capabilities(widget).contains(Capabilities::DROP_TARGET)
    }

    /// Whether `widget` is a registered command item.
    pub fn is_command_item(&self, widget: &W) -> bool {
        self.capabilities(widget).contains(Capabilities::COMMAND_ITEM)
    }

    /// Whether `widget` has a drop handler installed.
    pub fn has_drop_handler(&self, widget: &W) -> bool {
        self.registry
            .get(widget)
            .is_some_and(|r| r.drop_handler.is_some())
    }

    /// Walk up from `hit` to the nearest drop target.
    ///
    /// Command items stop the walk: dragging over a menu entry does not target
    /// the menu's container.
    pub fn drop_target_for(&self, hit: Option<W>) -> Option<W> {
        let mut current = hit;
        while let Some(w) = current {
            let caps = self.capabilities(&w);
            if caps.contains(Capabilities::COMMAND_ITEM) {
                return None;
            }
            if caps.contains(Capabilities::DROP_TARGET) {
                return Some(w);
            }
            current = self.parent.parent_of(&w);
        }
        None
    }

    // --- Lifecycle ---

    /// Start a gesture.
    ///
    /// Fails with [`GestureError::AlreadyActive`] if one is in flight; the
    /// active gesture is left untouched.
    pub fn start_gesture(&mut self, start: GestureStart<W, P>) -> Result<()> {
        if self.gesture.is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!("gesture refused: another gesture is active");
            return Err(GestureError::AlreadyActive);
        }
        let captured = !start.suppress_capture
            && self.config.implicit_capture
            && self.platform.capture_pointer();
        #[cfg(feature = "tracing")]
        tracing::info!(mode = ?start.mode, source = ?start.source, captured, "gesture started");
        self.gesture = Some(Gesture {
            mode: start.mode,
            origin: start.origin,
            pointer: start.origin,
            source: start.source,
            payload: start.payload,
            data: start.data,
            contexts: HashMap::new(),
            listener: start.listener,
            hovered: None,
            drag_started: start.mode == GestureMode::Explicit,
            captured,
            timers: Vec::new(),
            cancel_requested: false,
        });
        self.outcome = None;
        Ok(())
    }

    /// Route a normalized platform notification.
    ///
    /// Returns `true` if an active gesture consumed it. Presses are never
    /// consumed; widgets handle them and decide whether to start a gesture.
    pub fn handle(&mut self, input: Input<W>) -> bool {
        match input {
            Input::Press(_) => false,
            Input::Move { pointer, hit } => self.pointer_move(pointer, hit),
            Input::Release { pointer, hit } => self.pointer_up(pointer, hit),
            Input::KeyDown(key) => self.key_down(key),
            Input::Blur => self.window_blur(),
            Input::CaptureLost => self.capture_lost(),
            Input::LeaveWindow => self.pointer_left_window(),
            Input::Tick => self.tick(),
        }
    }

    /// The pointer moved; `hit` is the innermost widget under it.
    pub fn pointer_move(&mut self, pointer: PointerState, hit: Option<W>) -> bool {
        let threshold = self.config.drag_threshold;
        let Some(g) = self.gesture.as_mut() else {
            return false;
        };
        g.pointer = pointer;
        let mode = g.mode;
        if !g.drag_started {
            if let Some(t) = threshold
                && pointer.delta_from(&g.origin).hypot() <= t
            {
                return true;
            }
            g.drag_started = true;
            #[cfg(feature = "tracing")]
            tracing::debug!("drag started");
            if self.notify_listener(ListenerKind::BeforeDrag) {
                self.cancel_with(CancelReason::DragRefused);
                return true;
            }
        }
        match mode {
            GestureMode::Explicit => {
                self.notify_listener(ListenerKind::Move);
            }
            GestureMode::Drag => {
                let target = self.drop_target_for(hit);
                self.track_target(target);
            }
        }
        self.finish_dispatch();
        true
    }

    /// The pointer was released; `hit` is the innermost widget under it.
    pub fn pointer_up(&mut self, pointer: PointerState, hit: Option<W>) -> bool {
        let Some(g) = self.gesture.as_mut() else {
            return false;
        };
        g.pointer = pointer;
        let mut outcome = GestureOutcome::Released;
        if g.mode == GestureMode::Drag && g.drag_started {
            let target = self.drop_target_for(hit);
            self.leave_for(target);
            if let Some(w) = target
                && let Some(ev) = self.dispatch_drop(w, DropKind::Drop, false)
                && !ev.is_cancelled()
            {
                outcome = GestureOutcome::Dropped(w);
            }
        }
        self.notify_listener(ListenerKind::Up);
        self.notify_listener(ListenerKind::End);
        #[cfg(feature = "tracing")]
        tracing::info!(?outcome, "gesture released");
        self.outcome = Some(outcome);
        self.teardown();
        true
    }

    /// A key went down. Escape cancels the active gesture.
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => self.cancel_with(CancelReason::Escape),
            Key::Other => false,
        }
    }

    /// The window lost focus; cancels the active gesture.
    pub fn window_blur(&mut self) -> bool {
        self.cancel_with(CancelReason::Blur)
    }

    /// The platform revoked pointer capture; cancels the active gesture.
    ///
    /// Capture is already gone, so teardown does not release it again.
    pub fn capture_lost(&mut self) -> bool {
        if let Some(g) = self.gesture.as_mut() {
            g.captured = false;
        }
        self.cancel_with(CancelReason::CaptureLost)
    }

    /// The pointer left the window.
    ///
    /// Cancels the active gesture only when it does not hold pointer capture.
    pub fn pointer_left_window(&mut self) -> bool {
        let uncaptured = self.gesture.as_ref().is_some_and(|g| !g.captured);
        uncaptured && self.cancel_with(CancelReason::LeftWindow)
    }

    /// Cancel the active gesture. Returns `false` if there was none.
    pub fn cancel_gesture(&mut self) -> bool {
        self.cancel_with(CancelReason::Requested)
    }

    /// Interval notification from the platform.
    ///
    /// Runs every timer listener once. Returns `false` when no timer is running.
    pub fn tick(&mut self) -> bool {
        if !self.timer_running {
            return false;
        }
        let Self {
            gesture,
            overlays,
            geometry,
            ..
        } = self;
        let Some(g) = gesture.as_mut() else {
            return false;
        };
        let mut listeners = core::mem::take(&mut g.timers);
        for entry in &mut listeners {
            let mut cx = g.cx(entry.widget, overlays, &**geometry);
            (entry.listener)(&mut cx);
        }
        // Listeners registered during the tick run from the next one on.
        listeners.append(&mut g.timers);
        g.timers = listeners;
        self.finish_dispatch();
        true
    }

    /// Register a timer listener for the active gesture, on behalf of `widget`.
    ///
    /// The interval starts with the first listener and stops at teardown,
    /// which also drops every listener.
    pub fn add_timer_listener(
        &mut self,
        widget: Option<W>,
        listener: impl FnMut(&mut GestureCx<'_, W, P>) + 'static,
    ) -> Result<()> {
        let g = self.gesture.as_mut().ok_or(GestureError::Inactive)?;
        if let Some(w) = widget {
            g.contexts.entry(w).or_default().timer_registered = true;
        }
        g.timers.push(TimerEntry {
            widget,
            listener: Box::new(listener),
        });
        self.finish_dispatch();
        Ok(())
    }

    // --- Overlays ---

    /// Show or hide the border box overlay (page coordinates).
    pub fn show_border_overlay(&mut self, rect: Option<Rect>) {
        self.overlays.show_border(rect);
    }

    /// Show or hide the insertion line overlay (page coordinates).
    pub fn show_insertion_line_overlay(&mut self, line: Option<Line>) {
        self.overlays.show_insertion_line(line);
    }

    /// Show or hide the shade box overlay (page coordinates).
    pub fn show_shade_overlay(&mut self, rect: Option<Rect>) {
        self.overlays.show_shade(rect);
    }

    /// Override the cursor.
    pub fn set_cursor_overlay(&mut self, glyph: CursorGlyph) {
        self.overlays.set_cursor(Some(glyph));
    }

    /// Restore the normal cursor.
    pub fn restore_cursor(&mut self) {
        self.overlays.set_cursor(None);
    }

    /// Overlay state.
    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// The host geometry this controller resolves against.
    pub fn geometry(&self) -> &dyn GeometryProvider<W> {
        &*self.geometry
    }

    // --- Inspection ---

    /// Whether a gesture is in flight.
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Current pointer state of the active gesture.
    pub fn pointer(&self) -> Option<&PointerState> {
        self.gesture.as_ref().map(|g| &g.pointer)
    }

    /// Pointer state the active gesture started with.
    pub fn origin(&self) -> Option<&PointerState> {
        self.gesture.as_ref().map(|g| &g.origin)
    }

    /// Drop target currently under the pointer.
    pub fn hovered_widget(&self) -> Option<W> {
        self.gesture.as_ref().and_then(|g| g.hovered)
    }

    /// Payload of the active gesture.
    pub fn payload(&self) -> Option<&P> {
        self.gesture.as_ref().and_then(|g| g.payload.as_ref())
    }

    /// Widget that started the active gesture.
    pub fn source(&self) -> Option<W> {
        self.gesture.as_ref().and_then(|g| g.source)
    }

    /// Mode of the active gesture.
    pub fn mode(&self) -> Option<GestureMode> {
        self.gesture.as_ref().map(|g| g.mode)
    }

    /// Whether the active gesture has started dragging.
    pub fn drag_started(&self) -> bool {
        self.gesture.as_ref().is_some_and(|g| g.drag_started)
    }

    /// Whether the active gesture holds pointer capture.
    pub fn is_captured(&self) -> bool {
        self.gesture.as_ref().is_some_and(|g| g.captured)
    }

    /// Whether the gesture timer is running.
    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    /// Context of `widget` in the active gesture, if one was created.
    pub fn context(&self, widget: &W) -> Option<&WidgetContext> {
        self.gesture.as_ref()?.contexts.get(widget)
    }

    /// How the most recent gesture ended; `None` while one is active or before the first.
    pub fn last_outcome(&self) -> Option<GestureOutcome<W>> {
        self.outcome
    }

    // --- Internals ---

    /// Dispatch `kind` to the drop handler of `widget`.
    ///
    /// Returns `None` if there is no gesture or no handler.
    fn dispatch_drop(&mut self, widget: W, kind: DropKind, entered: bool) -> Option<DropEvent<W>> {
        let Self {
            registry,
            gesture,
            overlays,
            geometry,
            ..
        } = self;
        let g = gesture.as_mut()?;
        let handler = registry.get_mut(&widget)?.drop_handler.as_mut()?;
        let local = geometry.to_local(&widget, g.pointer.position);
        let mut ev = DropEvent::new(
            kind,
            DropDetail {
                widget,
                local,
                entered,
            },
        );
        let mut cx = g.cx(Some(widget), overlays, &**geometry);
        handler(&mut ev, &mut cx);
        Some(ev)
    }

    /// Dispatch `kind` to the gesture's listener. Returns `true` if it cancelled the event.
    fn notify_listener(&mut self, kind: ListenerKind) -> bool {
        let Self {
            gesture,
            overlays,
            geometry,
            ..
        } = self;
        let Some(g) = gesture.as_mut() else {
            return false;
        };
        let Some(mut listener) = g.listener.take() else {
            return false;
        };
        let mut ev = ListenerEvent::new(kind, g.pointer);
        let source = g.source;
        {
            let mut cx = g.cx(source, overlays, &**geometry);
            listener(&mut ev, &mut cx);
        }
        g.listener = Some(listener);
        ev.is_cancelled()
    }

    /// Send `Out` to the tracked target if `target` differs from it, then track `target`.
    ///
    /// Returns `true` if the tracked target changed.
    fn leave_for(&mut self, target: Option<W>) -> bool {
        let Some(previous) = self.gesture.as_ref().map(|g| g.hovered) else {
            return false;
        };
        if previous == target {
            return false;
        }
        if let Some(old) = previous {
            self.dispatch_drop(old, DropKind::Out, false);
            self.overlays.reset();
        }
        if let Some(g) = self.gesture.as_mut() {
            g.hovered = target;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?previous, ?target, "drop target changed");
        true
    }

    fn track_target(&mut self, target: Option<W>) {
        let entered = self.leave_for(target);
        let accepted = target
            .and_then(|w| self.dispatch_drop(w, DropKind::Over, entered))
            .is_some_and(|ev| ev.accept_position().is_some() && !ev.is_cancelled());
        let glyph = if accepted {
            CursorGlyph::Move
        } else {
            CursorGlyph::NoDrop
        };
        self.overlays.set_cursor(Some(glyph));
    }

    /// Honour a cancellation request and start the timer if listeners appeared.
    fn finish_dispatch(&mut self) {
        let Some(g) = self.gesture.as_mut() else {
            return;
        };
        if core::mem::take(&mut g.cancel_requested) {
            self.cancel_with(CancelReason::Handler);
            return;
        }
        let wants_timer = !g.timers.is_empty();
        if wants_timer && !self.timer_running {
            self.timer_running = true;
            self.platform.start_interval(self.config.timer_period);
            #[cfg(feature = "tracing")]
            tracing::debug!(period = ?self.config.timer_period, "gesture timer started");
        }
    }

    fn cancel_with(&mut self, reason: CancelReason) -> bool {
        let Some(hovered) = self.gesture.as_ref().map(|g| g.hovered) else {
            return false;
        };
        #[cfg(feature = "tracing")]
        tracing::info!(?reason, "gesture cancelled");
        if let Some(w) = hovered {
            self.dispatch_drop(w, DropKind::Cancel, false);
        }
        self.notify_listener(ListenerKind::Cancel);
        self.notify_listener(ListenerKind::End);
        self.outcome = Some(GestureOutcome::Cancelled(reason));
        self.teardown();
        true
    }

    /// Clear overlays, stop the timer, release capture, and drop the gesture.
    ///
    /// Safe to call repeatedly; only the first call after a gesture has effects.
    fn teardown(&mut self) {
        let gesture = self.gesture.take();
        self.overlays.clear();
        if self.timer_running {
            self.timer_running = false;
            self.platform.stop_interval();
            #[cfg(feature = "tracing")]
            tracing::debug!("gesture timer stopped");
        }
        if gesture.is_some_and(|g| g.captured) {
            self.platform.release_pointer();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("gesture torn down");
    }
}
