// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click, drag, drop, auto-scroll, and auto-expand through real widgets.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Line, Point, Rect, Size};
use thicket_event::{DropPosition, Key, Modifiers, PointerState};
use thicket_gesture::recording::{FixedGeometry, Recorded, Recorder};
use thicket_gesture::{CancelReason, GestureController, GestureOutcome};
use thicket_widgets::{
    ROOT, ListEventKind, ListLayout, ListView, SharedController, TabStrip, TableColumns,
    TableEventKind, TreeEventKind, TreeView,
};

fn setup(widgets: &[(u32, Rect)]) -> (SharedController<u32>, Recorder) {
    let geometry = FixedGeometry::default();
    for &(id, rect) in widgets {
        geometry.set(id, rect);
    }
    let rec = Recorder::default();
    let gc = Rc::new(RefCell::new(GestureController::new(geometry, rec.clone(), rec.clone())));
    (gc, rec)
}

fn at(x: f64, y: f64) -> PointerState {
    PointerState::new(Point::new(x, y))
}

fn letters(n: usize) -> Vec<char> {
    ('a'..='z').take(n).collect()
}

type Log<K> = Rc<RefCell<Vec<K>>>;

fn list(gc: &SharedController<u32>, len: usize) -> (ListView<u32, char>, Log<ListEventKind>) {
    let list = ListView::new(
        gc,
        1,
        ListLayout::Linear { row_height: 20.0 },
        Size::new(200.0, 100.0),
        letters(len),
    )
    .unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    list.on_event(move |ev| sink.borrow_mut().push(ev.kind));
    (list, log)
}

#[test]
fn click_on_selected_item_keeps_selection() {
    let (gc, _) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, log) = list(&gc, 5);
    list.select(1);

    assert!(list.press(at(10.0, 25.0)).unwrap());
    gc.borrow_mut().pointer_up(at(10.0, 25.0), Some(1));

    assert_eq!(*log.borrow(), [ListEventKind::Click]);
    assert_eq!(list.selected(), [1]);
    assert!(!gc.borrow().is_active());
}

#[test]
fn deferred_click_collapses_multi_selection() {
    let (gc, _) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, log) = list(&gc, 5);
    let click = |p: PointerState| {
        list.press(p).unwrap();
        gc.borrow_mut().pointer_up(p, Some(1));
    };

    click(at(10.0, 5.0));
    click(at(10.0, 45.0).with_modifiers(Modifiers::SHIFT));
    assert_eq!(list.selected(), [0, 1, 2]);

    click(at(10.0, 25.0));
    assert_eq!(list.selected(), [1]);
    use ListEventKind::{Click, Select};
    assert_eq!(*log.borrow(), [Select, Click, Select, Click, Select, Click]);
}

#[test]
fn dragging_a_selection_reorders_it() {
    let (gc, _) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, log) = list(&gc, 5);
    list.select(0);
    list.press(at(10.0, 25.0).with_modifiers(Modifiers::CTRL)).unwrap();
    gc.borrow_mut().pointer_up(at(10.0, 25.0), Some(1));
    assert_eq!(list.selected(), [0, 1]);
    log.borrow_mut().clear();

    // Pressing a selected row defers selection, so both rows travel.
    list.press(at(10.0, 25.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 75.0), Some(1));
    gc.borrow_mut().pointer_up(at(10.0, 75.0), Some(1));

    assert_eq!(list.items(), ['c', 'd', 'a', 'b', 'e']);
    assert_eq!(list.selected(), [2, 3]);
    use ListEventKind::{BeforeDrag, DragOver, Drop, Reordered};
    assert_eq!(*log.borrow(), [BeforeDrag, DragOver, Drop, Reordered]);
    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Dropped(1)));
}

#[test]
fn refused_drag_start_cancels_the_gesture() {
    let (gc, _) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, _) = list(&gc, 5);
    list.on_event(|ev| {
        if ev.kind == ListEventKind::BeforeDrag {
            ev.cancel();
        }
    });

    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 75.0), Some(1));

    assert!(!gc.borrow().is_active());
    assert_eq!(
        gc.borrow().last_outcome(),
        Some(GestureOutcome::Cancelled(CancelReason::DragRefused))
    );
    assert_eq!(list.items(), letters(5));
}

#[test]
fn cancelled_drag_over_blocks_the_drop() {
    let (gc, rec) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, _) = list(&gc, 5);
    list.on_event(|ev| {
        if ev.kind == ListEventKind::DragOver {
            ev.cancel();
        }
    });

    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 75.0), Some(1));
    assert_eq!(gc.borrow().overlays().border(), None);
    assert_eq!(gc.borrow().overlays().insertion_line(), None);
    gc.borrow_mut().pointer_up(at(10.0, 75.0), Some(1));

    assert_eq!(list.items(), letters(5));
    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Released));
    assert_eq!(rec.count(|c| *c == Recorded::Release), 1);
}

#[test]
fn observing_handler_turns_the_middle_band_into_an_insertion() {
    let (gc, rec) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, log) = list(&gc, 4);

    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 50.0), Some(1));
    assert_eq!(gc.borrow().overlays().border(), None);
    assert_eq!(
        gc.borrow().overlays().insertion_line(),
        Some(Line::new((0.0, 40.0), (200.0, 40.0)))
    );
    gc.borrow_mut().pointer_up(at(10.0, 50.0), Some(1));

    assert_eq!(list.items(), ['b', 'a', 'c', 'd']);
    assert!(log.borrow().contains(&ListEventKind::Reordered));
    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Dropped(1)));
    assert_eq!(rec.count(|c| matches!(c, Recorded::Border(Some(_)))), 0);
}

#[test]
fn accepted_drop_into_is_left_to_the_handler() {
    let (gc, _) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, _) = list(&gc, 4);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    list.on_event(move |ev| {
        sink.borrow_mut().push((ev.kind, ev.detail.position));
        if ev.kind == ListEventKind::DragOver {
            ev.accept(DropPosition::Over);
        }
    });

    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 50.0), Some(1));
    assert_eq!(gc.borrow().overlays().border(), Some(Rect::new(0.0, 40.0, 200.0, 60.0)));
    gc.borrow_mut().pointer_up(at(10.0, 50.0), Some(1));

    assert_eq!(list.items(), letters(4));
    let seen = seen.borrow();
    assert!(seen.contains(&(ListEventKind::Drop, Some(DropPosition::Over))));
    assert!(!seen.iter().any(|(kind, _)| *kind == ListEventKind::Reordered));
    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Dropped(1)));
}

#[test]
fn ticks_near_the_edge_scroll_and_retarget() {
    let (gc, rec) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let list = ListView::new(
        &gc,
        1,
        ListLayout::Linear { row_height: 20.0 },
        Size::new(200.0, 100.0),
        0..20,
    )
    .unwrap();
    assert_eq!(list.max_scroll(), 300.0);

    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 95.0), Some(1));
    assert!(gc.borrow().timer_running());

    gc.borrow_mut().tick();
    gc.borrow_mut().tick();
    assert_eq!(list.scroll_offset(), 20.0);
    assert_eq!(rec.count(|c| matches!(c, Recorded::StartInterval(_))), 1);

    // The tick re-resolved the target: content y 115 is the bottom of row 5.
    gc.borrow_mut().pointer_up(at(10.0, 95.0), Some(1));
    assert_eq!(list.items()[..7], [1, 2, 3, 4, 5, 0, 6]);
    assert_eq!(rec.count(|c| *c == Recorded::StopInterval), 1);
}

#[test]
fn escape_restores_list_and_overlays() {
    let (gc, rec) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, _) = list(&gc, 5);
    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 75.0), Some(1));
    gc.borrow_mut().key_down(Key::Escape);

    assert_eq!(list.items(), letters(5));
    assert!(gc.borrow().overlays().is_clear());
    assert_eq!(rec.count(|c| *c == Recorded::Release), 1);
    // The press machine is idle again: a fresh click is a click.
    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_up(at(10.0, 5.0), Some(1));
    assert_eq!(list.selected(), [0]);
}

fn tree(gc: &SharedController<u32>) -> (TreeView<u32, &'static str>, Log<TreeEventKind>) {
    let tree = TreeView::new(gc, 2, "root", 20.0, Size::new(200.0, 200.0)).unwrap();
    let a = tree.add_child(ROOT, "a").unwrap();
    tree.add_child(ROOT, "b").unwrap();
    tree.add_child(a, "a1").unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    tree.on_event(move |ev| {
        sink.borrow_mut().push(ev.kind);
        if ev.kind == TreeEventKind::DragOver
            && let Some(position) = ev.detail.position
        {
            ev.accept(position);
        }
    });
    (tree, log)
}

#[test]
fn dwelling_on_a_collapsed_node_expands_it() {
    let (gc, _) = setup(&[(2, Rect::new(0.0, 0.0, 200.0, 200.0))]);
    let (tree, log) = tree(&gc);
    assert_eq!(tree.visible_nodes(), [0, 1, 2]);

    let cached_rows = |gc: &SharedController<u32>| {
        gc.borrow()
            .context(&2)
            .and_then(|ctx| ctx.tree_rows.as_ref().map(|rows| rows.len()))
    };

    tree.press(at(10.0, 45.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 30.0), Some(2));
    assert_eq!(cached_rows(&gc), Some(3));
    for _ in 0..2 {
        gc.borrow_mut().tick();
    }
    assert!(!tree.is_expanded(1));
    gc.borrow_mut().tick();
    assert!(tree.is_expanded(1));
    assert_eq!(tree.visible_nodes(), [0, 1, 3, 2]);
    // The expansion invalidated the row cache and the re-resolve rebuilt it.
    assert_eq!(cached_rows(&gc), Some(4));

    gc.borrow_mut().pointer_up(at(10.0, 30.0), Some(2));
    assert_eq!(tree.children(1), [3, 2]);
    assert_eq!(tree.parent(2), Some(1));
    use TreeEventKind::{BeforeDrag, DragOver, Drop, Expand, Moved, Select};
    assert_eq!(
        *log.borrow(),
        [Select, BeforeDrag, DragOver, Expand, DragOver, Drop, Moved]
    );
}

#[test]
fn nodes_do_not_drop_into_their_own_subtree() {
    let (gc, _) = setup(&[(2, Rect::new(0.0, 0.0, 200.0, 200.0))]);
    let (tree, _) = tree(&gc);
    assert!(tree.expand(1));

    tree.press(at(10.0, 25.0)).unwrap();
    gc.borrow_mut().pointer_move(at(30.0, 50.0), Some(2));
    assert_eq!(gc.borrow().overlays().border(), None);
    gc.borrow_mut().pointer_up(at(30.0, 50.0), Some(2));

    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Released));
    assert_eq!(tree.children(ROOT), [1, 2]);
    assert_eq!(tree.children(1), [3]);
}

#[test]
fn tabs_reorder_and_selection_follows() {
    let (gc, _) = setup(&[(3, Rect::new(0.0, 0.0, 300.0, 24.0))]);
    let tabs = TabStrip::new(&gc, 3, 24.0, letters(4).into_iter().map(|c| (c, 50.0))).unwrap();
    assert_eq!(tabs.selected(), Some(0));

    tabs.press(at(10.0, 10.0)).unwrap();
    gc.borrow_mut().pointer_move(at(140.0, 10.0), Some(3));
    gc.borrow_mut().pointer_up(at(140.0, 10.0), Some(3));

    assert_eq!(tabs.tabs(), ['b', 'c', 'a', 'd']);
    assert_eq!(tabs.selected(), Some(2));
    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Dropped(3)));
}

#[test]
fn observed_tabs_still_reorder() {
    let (gc, _) = setup(&[(3, Rect::new(0.0, 0.0, 300.0, 24.0))]);
    let tabs = TabStrip::new(&gc, 3, 24.0, letters(4).into_iter().map(|c| (c, 50.0))).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    tabs.on_event(move |ev| sink.borrow_mut().push(ev.kind));

    tabs.press(at(10.0, 10.0)).unwrap();
    // The middle of a tab needs an accepting handler.
    gc.borrow_mut().pointer_move(at(125.0, 10.0), Some(3));
    assert_eq!(gc.borrow().overlays().border(), None);
    assert_eq!(gc.borrow().overlays().insertion_line(), None);

    gc.borrow_mut().pointer_move(at(140.0, 10.0), Some(3));
    assert_eq!(
        gc.borrow().overlays().insertion_line(),
        Some(Line::new((150.0, 0.0), (150.0, 24.0)))
    );
    gc.borrow_mut().pointer_up(at(140.0, 10.0), Some(3));

    assert_eq!(tabs.tabs(), ['b', 'c', 'a', 'd']);
    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Dropped(3)));
}

#[test]
fn observed_tree_still_moves_between_nodes() {
    let (gc, _) = setup(&[(2, Rect::new(0.0, 0.0, 200.0, 200.0))]);
    let tree = TreeView::new(&gc, 2, "root", 20.0, Size::new(200.0, 200.0)).unwrap();
    tree.add_child(ROOT, "a").unwrap();
    tree.add_child(ROOT, "b").unwrap();
    tree.on_event(|_| {});

    tree.press(at(10.0, 45.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 30.0), Some(2));
    assert_eq!(gc.borrow().overlays().border(), None);
    gc.borrow_mut().pointer_move(at(10.0, 22.0), Some(2));
    assert!(gc.borrow().overlays().insertion_line().is_some());
    gc.borrow_mut().pointer_up(at(10.0, 22.0), Some(2));

    assert_eq!(tree.children(ROOT), [2, 1]);
    assert_eq!(gc.borrow().last_outcome(), Some(GestureOutcome::Dropped(2)));
}

#[test]
fn columns_reorder_at_boundaries() {
    let (gc, rec) = setup(&[(4, Rect::new(0.0, 0.0, 150.0, 24.0))]);
    let columns = [("name", 50.0), ("size", 70.0), ("kind", 30.0)];
    let header = TableColumns::new(&gc, 4, 24.0, columns).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    header.on_event(move |ev| sink.borrow_mut().push((ev.kind, ev.detail.target)));

    header.press(at(20.0, 10.0)).unwrap();
    gc.borrow_mut().pointer_move(at(125.0, 10.0), Some(4));
    assert!(gc.borrow().context(&4).is_some_and(|ctx| ctx.columns.is_some()));
    assert!(rec.calls().contains(&Recorded::Line(Some(Line::new((120.0, 0.0), (120.0, 24.0))))));
    gc.borrow_mut().pointer_up(at(125.0, 10.0), Some(4));

    assert_eq!(header.columns(), ["size", "name", "kind"]);
    assert_eq!(header.widths(), [70.0, 50.0, 30.0]);
    assert_eq!(
        *log.borrow(),
        [
            (TableEventKind::BeforeDrag, None),
            (TableEventKind::DragOver, Some(2)),
            (TableEventKind::Drop, Some(2)),
            (TableEventKind::Moved, None),
        ]
    );
}

#[test]
fn header_click_without_drag() {
    let (gc, _) = setup(&[(4, Rect::new(0.0, 0.0, 150.0, 24.0))]);
    let header = TableColumns::new(&gc, 4, 24.0, [("name", 50.0), ("size", 70.0)]).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    header.on_event(move |ev| sink.borrow_mut().push((ev.kind, ev.detail.column)));

    header.press(at(80.0, 10.0)).unwrap();
    gc.borrow_mut().pointer_up(at(80.0, 10.0), Some(4));
    assert_eq!(*log.borrow(), [(TableEventKind::Click, 1)]);
}

#[test]
fn drops_resolve_with_the_accepted_position() {
    let (gc, _) = setup(&[(1, Rect::new(0.0, 0.0, 200.0, 100.0))]);
    let (list, _) = list(&gc, 5);
    list.on_event(|ev| {
        if ev.kind == ListEventKind::DragOver {
            ev.accept(DropPosition::Before);
        }
    });
    list.press(at(10.0, 5.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, 75.0), Some(1));
    gc.borrow_mut().pointer_up(at(10.0, 75.0), Some(1));
    assert_eq!(list.items(), ['b', 'c', 'a', 'd', 'e']);
}
