// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical tree interaction model.
//!
//! Nodes live in an arena and are identified by `usize` ids; [`ROOT`] is
//! always present and always visible. Rows are the depth-first walk of
//! expanded nodes, one uniform-height label per row.
//!
//! Dropping resolves against the label under the pointer (thirds of its
//! height; the root only takes drops onto itself). A node cannot be dropped
//! into its own subtree. While a drag hovers a collapsed node with children
//! for the configured number of timer ticks, the node expands.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use thicket_event::press::{PressOutcome, PressState, ReleaseOutcome};
use thicket_event::{DropPosition, InteractionEvent, PointerState};
use thicket_gesture::{
    Capabilities, DropEvent, DropKind, GestureCx, GestureStart, ListenerEvent, ListenerKind,
    WidgetKind,
};
use thicket_hit::{Affordance, AutoScrollConfig, Flow, ResolvedTarget, TreeRows, WidgetFamily};

use crate::{
    DragItems, EventSlot, ItemDetail, Payload, Result, SharedController, WidgetError, WidgetId,
    local_point, start_gesture,
};

/// Id of the root node.
pub const ROOT: usize = 0;

/// Semantic events of a [`TreeView`]. `index` is a node id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeEventKind {
    /// The node is about to become selected. Cancel to keep the old selection.
    Select,
    /// The node was pressed and released without a drag.
    Click,
    /// The node is about to expand. Cancel to keep it collapsed.
    Expand,
    /// The node collapsed.
    Collapse,
    /// A drag of the node is about to start. Cancel to refuse it.
    BeforeDrag,
    /// A payload is over the node at `position`. Accept to allow the drop.
    DragOver,
    /// A payload was dropped at the node. Cancel to refuse it.
    Drop,
    /// The dragged node moved; `index` is its id.
    Moved,
}

/// Event emitted by a [`TreeView`].
pub type TreeEvent<W> = InteractionEvent<TreeEventKind, ItemDetail<W>>;

type Events<W> = EventSlot<TreeEventKind, ItemDetail<W>>;
type Cx<'a, W> = GestureCx<'a, W, Payload<W>>;

#[derive(Debug)]
struct Node<T> {
    value: T,
    parent: Option<usize>,
    children: Vec<usize>,
    expanded: bool,
}

#[derive(Debug)]
struct TreeState<T> {
    nodes: Vec<Node<T>>,
    row_height: f64,
    indent: f64,
    viewport: Size,
    scroll: f64,
    selected: Option<usize>,
    press: PressState<usize>,
    auto_scroll: AutoScrollConfig,
}

impl<T> TreeState<T> {
    /// Visible nodes in row order, with their depth.
    fn visible(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(ROOT, 0)];
        while let Some((node, depth)) = stack.pop() {
            out.push((node, depth));
            let n = &self.nodes[node];
            if n.expanded {
                stack.extend(n.children.iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        out
    }

    /// Visible rows with label rectangles in content coordinates.
    fn rows(&self) -> TreeRows {
        let visible = self.visible();
        TreeRows::new(
            visible
                .into_iter()
                .enumerate()
                .map(|(row, (node, depth))| (node, self.row_rect(row, depth))),
            ROOT,
        )
    }

    fn row_rect(&self, row: usize, depth: usize) -> Rect {
        let top = row as f64 * self.row_height;
        let left = (depth as f64 * self.indent).min(self.viewport.width);
        Rect::new(left, top, self.viewport.width, top + self.row_height)
    }

    fn max_scroll(&self, rows: usize) -> f64 {
        let content = rows as f64 * self.row_height;
        (content - self.viewport.height).max(0.0)
    }

    /// Row containing the viewport point `local`, if it lies inside the viewport width.
    fn row_at(&self, local: Point) -> Option<usize> {
        if self.row_height <= 0.0 {
            return None;
        }
        let y = local.y + self.scroll;
        if y < 0.0 || local.x < 0.0 || local.x >= self.viewport.width {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Row indices are far below the f64 integer range"
        )]
        let row = (y / self.row_height).floor() as usize;
        Some(row)
    }

    /// Node whose row contains the viewport point `local`.
    fn node_at(&self, local: Point) -> Option<usize> {
        let row = self.row_at(local)?;
        self.visible().get(row).map(|&(node, _)| node)
    }

    fn is_expandable(&self, node: usize) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| !n.expanded && !n.children.is_empty())
    }

    /// Returns `true` if `node` is `ancestor` or lies in its subtree.
    fn is_within(&self, node: usize, ancestor: usize) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes.get(n).and_then(|n| n.parent);
        }
        false
    }

    /// Move `node` relative to `target`. Returns `false` if the move is not allowed.
    fn move_node(&mut self, node: usize, target: usize, position: DropPosition) -> bool {
        if node == ROOT
            || node >= self.nodes.len()
            || target >= self.nodes.len()
            || self.is_within(target, node)
        {
            return false;
        }
        let new_parent = match position {
            DropPosition::Over => target,
            DropPosition::Before | DropPosition::After => match self.nodes[target].parent {
                Some(p) => p,
                None => return false,
            },
        };
        if let Some(old) = self.nodes[node].parent {
            self.nodes[old].children.retain(|&c| c != node);
        }
        let siblings = &mut self.nodes[new_parent].children;
        let at = match position {
            DropPosition::Over => siblings.len(),
            DropPosition::Before => siblings.iter().position(|&c| c == target).unwrap_or(0),
            DropPosition::After => siblings
                .iter()
                .position(|&c| c == target)
                .map_or(siblings.len(), |i| i + 1),
        };
        siblings.insert(at, node);
        self.nodes[node].parent = Some(new_parent);
        true
    }
}

/// A tree driven by a shared gesture controller.
pub struct TreeView<W: WidgetId, T> {
    id: W,
    gc: SharedController<W>,
    state: Rc<RefCell<TreeState<T>>>,
    events: Events<W>,
}

impl<W: WidgetId, T> fmt::Debug for TreeView<W, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TreeView");
        s.field("id", &self.id);
        if let Ok(st) = self.state.try_borrow() {
            s.field("nodes", &st.nodes.len())
                .field("selected", &st.selected);
        }
        s.finish_non_exhaustive()
    }
}

impl<W: WidgetId, T: 'static> TreeView<W, T> {
    /// Create a tree holding only `root`, register it, and install its drop handler.
    pub fn new(
        gc: &SharedController<W>,
        id: W,
        root: T,
        row_height: f64,
        viewport: Size,
    ) -> Result<Self> {
        let state = Rc::new(RefCell::new(TreeState {
            nodes: vec![Node {
                value: root,
                parent: None,
                children: Vec::new(),
                expanded: true,
            }],
            row_height,
            indent: 16.0,
            viewport,
            scroll: 0.0,
            selected: None,
            press: PressState::new(),
            auto_scroll: AutoScrollConfig::default(),
        }));
        let events = Events::new();
        {
            let mut controller = gc.try_borrow_mut().map_err(|_| WidgetError::ControllerBusy)?;
            let caps = Capabilities::DROP_TARGET | Capabilities::DRAG_SOURCE;
            controller.register_widget(id, WidgetKind::Tree, caps);
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
    pub fn on_event(&self, handler: impl FnMut(&mut TreeEvent<W>) + 'static) {
        self.events.set(handler);
    }

    /// Widget identity.
    pub fn id(&self) -> W {
        self.id
    }

    /// Add a collapsed child under `parent`. Returns its id.
    pub fn add_child(&self, parent: usize, value: T) -> Option<usize> {
        let mut st = self.state.borrow_mut();
        if parent >= st.nodes.len() {
            return None;
        }
        let id = st.nodes.len();
        st.nodes.push(Node {
            value,
            parent: Some(parent),
            children: Vec::new(),
            expanded: false,
        });
        st.nodes[parent].children.push(id);
        Some(id)
    }

    /// Value of `node`.
    pub fn value(&self, node: usize) -> Option<T>
    where
        T: Clone,
    {
        self.state.borrow().nodes.get(node).map(|n| n.value.clone())
    }

    /// Parent of `node`.
    pub fn parent(&self, node: usize) -> Option<usize> {
        self.state.borrow().nodes.get(node)?.parent
    }

    /// Children of `node`, in order.
    pub fn children(&self, node: usize) -> Vec<usize> {
        self.state
            .borrow()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Visible node ids in row order.
    pub fn visible_nodes(&self) -> Vec<usize> {
        self.state
            .borrow()
            .visible()
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// Returns `true` if `node` is expanded.
    pub fn is_expanded(&self, node: usize) -> bool {
        self.state
            .borrow()
            .nodes
            .get(node)
            .is_some_and(|n| n.expanded)
    }

    /// Expand `node`, emitting a cancellable [`TreeEventKind::Expand`].
    ///
    /// Returns `true` if the node expanded.
    pub fn expand(&self, node: usize) -> bool {
        expand(&self.state, &self.events, node)
    }

    /// Collapse `node`. Returns `true` if it was expanded.
    pub fn collapse(&self, node: usize) -> bool {
        let collapsed = {
            let mut st = self.state.borrow_mut();
            match st.nodes.get_mut(node) {
                Some(n) if n.expanded && node != ROOT => {
                    n.expanded = false;
                    true
                }
                _ => false,
            }
        };
        if collapsed {
            self.events.emit(TreeEventKind::Collapse, ItemDetail::item(node));
        }
        collapsed
    }

    /// Currently selected node.
    pub fn selected(&self) -> Option<usize> {
        self.state.borrow().selected
    }

    /// Select `node` without emitting events.
    pub fn select(&self, node: usize) {
        let mut st = self.state.borrow_mut();
        if node < st.nodes.len() {
            st.selected = Some(node);
        }
    }

    /// Move `node` relative to `target`, as a drop would.
    ///
    /// Refuses to move the root or to move a node into its own subtree.
    pub fn move_node(&self, node: usize, target: usize, position: DropPosition) -> bool {
        self.state.borrow_mut().move_node(node, target, position)
    }

    /// Set the indentation per depth level (default 16).
    pub fn set_indent(&self, indent: f64) {
        self.state.borrow_mut().indent = indent.max(0.0);
    }

    /// Replace the auto-scroll and auto-expand parameters.
    pub fn set_auto_scroll(&self, config: AutoScrollConfig) {
        self.state.borrow_mut().auto_scroll = config;
    }

    /// Current vertical scroll offset.
    pub fn scroll_offset(&self) -> f64 {
        self.state.borrow().scroll
    }

    /// Node under the tree-local point `local`.
    pub fn node_at(&self, local: Point) -> Option<usize> {
        self.state.borrow().node_at(local)
    }

    /// Handle a button press on the tree.
    ///
    /// Returns `Ok(false)` if the press missed every row. Otherwise applies
    /// immediate selection and starts a drag of the pressed node (the root
    /// cannot be dragged; pressing it only selects).
    pub fn press(&self, pointer: PointerState) -> Result<bool> {
        let local = local_point(&self.gc, self.id, pointer.position)?;
        let (node, outcome) = {
            let mut st = self.state.borrow_mut();
            let Some(node) = st.node_at(local) else {
                return Ok(false);
            };
            let selected = st.selected == Some(node);
            (node, st.press.on_press(node, selected, pointer.modifiers, local))
        };
        if let PressOutcome::SelectNow(n) = outcome
            && !self
                .events
                .emit(TreeEventKind::Select, ItemDetail::item(n))
                .is_cancelled()
        {
            self.state.borrow_mut().selected = Some(n);
        }
        let listener = press_listener(node, self.state.clone(), self.events.clone());
        let start = if node == ROOT {
            GestureStart::explicit(pointer, listener)
        } else {
            let payload = Payload {
                source: self.id,
                items: DragItems::Node(node),
            };
            GestureStart::drag(pointer, payload).with_listener(listener)
        };
        if let Err(err) = start_gesture(&self.gc, start.with_source(self.id)) {
            self.state.borrow_mut().press.cancel();
            return Err(err);
        }
        Ok(true)
    }
}

fn expand<W: WidgetId, T>(state: &RefCell<TreeState<T>>, events: &Events<W>, node: usize) -> bool {
    if !state.borrow().is_expandable(node) {
        return false;
    }
    if events
        .emit(TreeEventKind::Expand, ItemDetail::item(node))
        .is_cancelled()
    {
        return false;
    }
    if let Some(n) = state.borrow_mut().nodes.get_mut(node) {
        n.expanded = true;
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(node, "tree node expanded");
    true
}

fn press_listener<W: WidgetId, T: 'static>(
    pressed: usize,
    state: Rc<RefCell<TreeState<T>>>,
    events: Events<W>,
) -> impl FnMut(&mut ListenerEvent, &mut Cx<'_, W>) + 'static {
    move |le, cx| match le.kind {
        ListenerKind::BeforeDrag => {
            let detail = ItemDetail::drag(Some(pressed), None, cx.payload().cloned());
            if events.emit(TreeEventKind::BeforeDrag, detail).is_cancelled() {
                le.cancel();
            } else {
                state.borrow_mut().press.on_gesture_start();
            }
        }
        ListenerKind::Up => {
            let current = cx.local_pointer().and_then(|p| state.borrow().node_at(p));
            let outcome = state.borrow_mut().press.on_release(current.as_ref());
            match outcome {
                ReleaseOutcome::ApplyDeferred(n) | ReleaseOutcome::AlreadySelected(n) => {
                    events.emit(TreeEventKind::Click, ItemDetail::item(n));
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
    state: &Rc<RefCell<TreeState<T>>>,
    events: &Events<W>,
    de: &mut DropEvent<W>,
    cx: &mut Cx<'_, W>,
) {
    match de.kind {
        DropKind::Over => {
            if let Some(position) = hover(id, state, events, cx, de.detail.local) {
                de.accept(position);
            }
            if !cx.has_timer_listener() {
                let (st, ev) = (state.clone(), events.clone());
                cx.add_timer_listener(move |cx| on_tick(id, &st, &ev, cx));
            }
        }
        DropKind::Out | DropKind::Cancel => {
            if let Some(ctx) = cx.context() {
                ctx.last_target = None;
                ctx.dwell = Default::default();
            }
        }
        DropKind::Drop => {
            let Some(target) = cx.context().and_then(|ctx| ctx.last_target.take()) else {
                de.cancel();
                return;
            };
            let payload = cx.payload().cloned();
            let detail = ItemDetail::target(target, payload.clone());
            if events.emit(TreeEventKind::Drop, detail).is_cancelled() {
                de.cancel();
                return;
            }
            let Some(Payload {
                source,
                items: DragItems::Node(node),
            }) = payload
            else {
                return;
            };
            let moved = source == id
                && state.borrow_mut().move_node(node, target.index, target.position);
            if moved {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    node,
                    target = target.index,
                    position = ?target.position,
                    "tree node moved"
                );
                events.emit(TreeEventKind::Moved, ItemDetail::item(node));
            }
        }
    }
}

/// Resolve and show the drop target under `local`; returns the settled position.
fn hover<W: WidgetId, T>(
    id: W,
    state: &RefCell<TreeState<T>>,
    events: &Events<W>,
    cx: &mut Cx<'_, W>,
    local: Option<Point>,
) -> Option<DropPosition> {
    let has_handler = events.is_set();
    let dragged = match cx.payload() {
        Some(Payload {
            source,
            items: DragItems::Node(node),
        }) if *source == id => Some(*node),
        _ => None,
    };
    let resolved = local.and_then(|local| {
        let st = state.borrow();
        let rows = cached_rows(&st, cx)?;
        let offset = Vec2::new(0.0, st.scroll);
        let target = rows.resolve(local + offset, has_handler)?;
        let node = rows.node(target.index)?;
        if dragged.is_some_and(|d| st.is_within(node, d)) {
            return None;
        }
        Some((node, target.position, rows.label(target.index)?.rect - offset))
    });
    let Some((node, proposed, rect)) = resolved else {
        clear_target(cx);
        return None;
    };
    let detail = ItemDetail::drag(Some(node), Some(proposed), cx.payload().cloned());
    let ev = events.emit(TreeEventKind::DragOver, detail);
    let settled = WidgetFamily::Tree.settle(
        proposed,
        has_handler,
        ev.accept_position(),
        ev.is_cancelled(),
    );
    // The root has no siblings, whatever the handler accepted.
    let settled = settled.filter(|&p| node != ROOT || p == DropPosition::Over);
    let Some(position) = settled else {
        clear_target(cx);
        return None;
    };
    let shown = ResolvedTarget {
        index: node,
        position,
        affordance: Affordance::for_cell(rect, position, Flow::Vertical),
    };
    cx.show_affordance(Some(shown.affordance));
    if let Some(ctx) = cx.context() {
        ctx.last_target = Some(shown);
    }
    Some(position)
}

/// This gesture's visible rows of the tree, built on first use.
fn cached_rows<'c, W: WidgetId, T>(
    st: &TreeState<T>,
    cx: &'c mut Cx<'_, W>,
) -> Option<&'c TreeRows> {
    let ctx = cx.context()?;
    Some(ctx.tree_rows.get_or_insert_with(|| st.rows()))
}

fn clear_target<W: WidgetId>(cx: &mut Cx<'_, W>) {
    cx.show_affordance(None);
    if let Some(ctx) = cx.context() {
        ctx.last_target = None;
    }
}

/// Auto-scroll near the viewport edges and auto-expand on dwell.
fn on_tick<W: WidgetId, T>(
    id: W,
    state: &RefCell<TreeState<T>>,
    events: &Events<W>,
    cx: &mut Cx<'_, W>,
) {
    let Some(local) = cx.local_pointer() else {
        return;
    };
    let (scrolled, node, expandable, config) = {
        let mut st = state.borrow_mut();
        let viewport = Rect::from_origin_size(Point::ZERO, st.viewport);
        if !viewport.contains(local) {
            return;
        }
        let Some(rows) = cached_rows(&st, cx) else {
            return;
        };
        let max = st.max_scroll(rows.len());
        let next = st
            .auto_scroll
            .step_offset(viewport, local, Flow::Vertical, st.scroll, max);
        if let Some(next) = next {
            st.scroll = next;
        }
        let node = st.row_at(local).and_then(|row| rows.node(row));
        let expandable = node.is_some_and(|n| st.is_expandable(n));
        (next.is_some(), node, expandable, st.auto_scroll)
    };
    let due = cx
        .context()
        .and_then(|ctx| ctx.dwell.tick(node, expandable, scrolled, &config));
    let expanded = due.is_some_and(|n| expand(state, events, n));
    if expanded && let Some(ctx) = cx.context() {
        ctx.tree_rows = None;
    }
    let hovered = cx.context().is_some_and(|ctx| ctx.last_target.is_some());
    if (scrolled || expanded) && hovered {
        hover(id, state, events, cx, Some(local));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root ─ a ─ a1
    ///      └ b
    fn sample() -> TreeState<&'static str> {
        let mut st = TreeState {
            nodes: vec![Node {
                value: "root",
                parent: None,
                children: vec![1, 3],
                expanded: true,
            }],
            row_height: 20.0,
            indent: 10.0,
            viewport: Size::new(200.0, 100.0),
            scroll: 0.0,
            selected: None,
            press: PressState::new(),
            auto_scroll: AutoScrollConfig::default(),
        };
        st.nodes.push(Node {
            value: "a",
            parent: Some(ROOT),
            children: vec![2],
            expanded: false,
        });
        st.nodes.push(Node {
            value: "a1",
            parent: Some(1),
            children: Vec::new(),
            expanded: false,
        });
        st.nodes.push(Node {
            value: "b",
            parent: Some(ROOT),
            children: Vec::new(),
            expanded: false,
        });
        st
    }

    #[test]
    fn visible_rows_follow_expansion() {
        let mut st = sample();
        assert_eq!(st.visible(), [(0, 0), (1, 1), (3, 1)]);
        st.nodes[1].expanded = true;
        assert_eq!(st.visible(), [(0, 0), (1, 1), (2, 2), (3, 1)]);
        assert_eq!(st.node_at(Point::new(5.0, 45.0)), Some(2));
        let rows = st.rows();
        assert_eq!(rows.label(2).map(|l| l.rect), Some(Rect::new(20.0, 40.0, 200.0, 60.0)));
        assert_eq!(rows.node(2), Some(2));
    }

    #[test]
    fn subtree_moves_are_refused() {
        let mut st = sample();
        assert!(!st.move_node(1, 2, DropPosition::Over));
        assert!(!st.move_node(ROOT, 3, DropPosition::Over));
        assert!(!st.move_node(1, ROOT, DropPosition::Before));
        assert!(st.move_node(3, 1, DropPosition::Before));
        assert_eq!(st.nodes[ROOT].children, [3, 1]);
    }

    #[test]
    fn move_into_and_after() {
        let mut st = sample();
        assert!(st.move_node(3, 1, DropPosition::Over));
        assert_eq!(st.nodes[1].children, [2, 3]);
        assert_eq!(st.nodes[3].parent, Some(1));
        assert!(st.move_node(2, 1, DropPosition::After));
        assert_eq!(st.nodes[ROOT].children, [1, 2]);
        assert_eq!(st.nodes[1].children, [3]);
    }

    #[test]
    fn expandable_means_collapsed_with_children() {
        let st = sample();
        assert!(st.is_expandable(1));
        assert!(!st.is_expandable(3));
        assert!(!st.is_expandable(ROOT));
    }
}
