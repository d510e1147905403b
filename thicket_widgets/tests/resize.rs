// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit-capture gestures: column resize, splitter drags, dialog move and resize.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use thicket_event::{Key, PointerState};
use thicket_gesture::recording::{FixedGeometry, Recorded, Recorder};
use thicket_gesture::{CancelReason, CursorGlyph, GestureController, GestureMode, GestureOutcome};
use thicket_hit::{EdgeMask, EdgeZone, Flow, SizeLimits};
use thicket_widgets::{
    Dialog, DialogEventKind, SharedController, Splitter, SplitterEventKind, TableColumns,
    TableEventKind,
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

type HeaderLog = Rc<RefCell<Vec<(TableEventKind, Option<f64>)>>>;

fn header(gc: &SharedController<u32>) -> (TableColumns<u32, &'static str>, HeaderLog) {
    let columns = [("name", 50.0), ("size", 70.0), ("kind", 30.0)];
    let header = TableColumns::new(gc, 4, 24.0, columns).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    header.on_event(move |ev| sink.borrow_mut().push((ev.kind, ev.detail.width)));
    (header, log)
}

#[test]
fn column_resize_is_live_and_escape_restores_it() {
    let (gc, rec) = setup(&[(4, Rect::new(0.0, 0.0, 150.0, 24.0))]);
    let (header, log) = header(&gc);

    assert!(header.press(at(49.0, 10.0)).unwrap());
    assert_eq!(gc.borrow().mode(), Some(GestureMode::Explicit));
    gc.borrow_mut().pointer_move(at(79.0, 10.0), None);
    assert_eq!(header.width(0), Some(80.0));
    assert!(rec.calls().contains(&Recorded::Cursor(Some(CursorGlyph::ResizeHorizontal))));

    gc.borrow_mut().key_down(Key::Escape);
    assert_eq!(header.widths(), [50.0, 70.0, 30.0]);
    assert_eq!(*log.borrow(), [(TableEventKind::Resize, Some(80.0))]);
    assert_eq!(
        gc.borrow().last_outcome(),
        Some(GestureOutcome::Cancelled(CancelReason::Escape))
    );
}

#[test]
fn column_resize_commits_within_limits() {
    let (gc, _) = setup(&[(4, Rect::new(0.0, 0.0, 150.0, 24.0))]);
    let (header, log) = header(&gc);
    header.set_limits(0, 40.0, 60.0);

    header.press(at(51.0, 10.0)).unwrap();
    gc.borrow_mut().pointer_move(at(101.0, 10.0), None);
    gc.borrow_mut().pointer_up(at(101.0, 10.0), None);

    assert_eq!(header.width(0), Some(60.0));
    assert_eq!(
        *log.borrow(),
        [
            (TableEventKind::Resize, Some(60.0)),
            (TableEventKind::Resized, Some(60.0)),
        ]
    );
}

#[test]
fn cancelled_resize_keeps_the_width() {
    let (gc, _) = setup(&[(4, Rect::new(0.0, 0.0, 150.0, 24.0))]);
    let (header, _) = header(&gc);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    header.on_event(move |ev| {
        sink.borrow_mut().push(ev.kind);
        if ev.kind == TableEventKind::Resize {
            ev.cancel();
        }
    });

    header.press(at(120.0, 10.0)).unwrap();
    gc.borrow_mut().pointer_move(at(90.0, 10.0), None);
    gc.borrow_mut().pointer_up(at(90.0, 10.0), None);

    assert_eq!(header.width(1), Some(70.0));
    assert_eq!(*seen.borrow(), [TableEventKind::Resize]);
}

#[test]
fn splitter_is_clamped_and_committed_on_release() {
    let (gc, rec) = setup(&[(5, Rect::new(0.0, 0.0, 400.0, 300.0))]);
    let splitter = Splitter::new(&gc, 5, Flow::Horizontal, 300.0, 100.0).unwrap();
    splitter.set_limits(50.0, 250.0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    splitter.on_event(move |ev| sink.borrow_mut().push((ev.kind, ev.detail.position)));

    assert!(!splitter.press(at(200.0, 150.0)).unwrap());
    assert!(splitter.press(at(101.0, 150.0)).unwrap());
    gc.borrow_mut().pointer_move(at(400.0, 150.0), None);
    assert_eq!(splitter.preview(), Some(250.0));
    assert_eq!(splitter.position(), 100.0);
    assert_eq!(
        gc.borrow().overlays().shade(),
        Some(Rect::new(250.0, 0.0, 254.0, 300.0))
    );

    gc.borrow_mut().pointer_up(at(400.0, 150.0), None);
    assert_eq!(splitter.position(), 250.0);
    assert_eq!(splitter.preview(), None);
    assert!(gc.borrow().overlays().is_clear());
    assert_eq!(rec.count(|c| *c == Recorded::Shade(None)), 1);
    assert_eq!(
        *log.borrow(),
        [
            (SplitterEventKind::Move, 250.0),
            (SplitterEventKind::Resized, 250.0),
        ]
    );
}

#[test]
fn unlimited_splitter_stays_inside_its_bounds() {
    let (gc, _) = setup(&[(5, Rect::new(0.0, 0.0, 400.0, 300.0))]);
    let splitter = Splitter::new(&gc, 5, Flow::Horizontal, 300.0, 100.0).unwrap();

    splitter.press(at(101.0, 150.0)).unwrap();
    gc.borrow_mut().pointer_move(at(900.0, 150.0), None);
    assert_eq!(splitter.preview(), Some(396.0));
    assert_eq!(
        gc.borrow().overlays().shade(),
        Some(Rect::new(396.0, 0.0, 400.0, 300.0))
    );
    gc.borrow_mut().pointer_up(at(900.0, 150.0), None);
    assert_eq!(splitter.position(), 396.0);
}

#[test]
fn cancelled_splitter_drag_keeps_position() {
    let (gc, _) = setup(&[(5, Rect::new(0.0, 0.0, 300.0, 400.0))]);
    let splitter = Splitter::new(&gc, 5, Flow::Vertical, 300.0, 200.0).unwrap();
    splitter.set_limits(50.0, 350.0);
    assert_eq!(splitter.hover_cursor(Point::new(10.0, 202.0)), Some(CursorGlyph::ResizeVertical));

    splitter.press(at(10.0, 202.0)).unwrap();
    gc.borrow_mut().pointer_move(at(10.0, -200.0), None);
    assert_eq!(splitter.preview(), Some(50.0));
    gc.borrow_mut().window_blur();

    assert_eq!(splitter.position(), 200.0);
    assert_eq!(splitter.preview(), None);
}

fn dialog(gc: &SharedController<u32>) -> (Dialog<u32>, Rc<RefCell<Vec<(DialogEventKind, Rect)>>>) {
    let rect = Rect::new(100.0, 100.0, 300.0, 250.0);
    let dialog = Dialog::new(gc, 6, rect, EdgeMask::all()).unwrap();
    dialog.set_limits(SizeLimits {
        min: Size::new(120.0, 80.0),
        max: Size::new(400.0, 300.0),
    });
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    dialog.on_event(move |ev| sink.borrow_mut().push((ev.kind, ev.detail.rect)));
    (dialog, log)
}

#[test]
fn dialog_corner_resize() {
    let (gc, rec) = setup(&[]);
    let (dialog, log) = dialog(&gc);
    assert_eq!(dialog.zone_at(Point::new(299.0, 249.0)), EdgeZone::BottomRight);

    dialog.press(at(299.0, 249.0)).unwrap();
    gc.borrow_mut().pointer_move(at(399.0, 199.0), None);
    let resized = Rect::new(100.0, 100.0, 400.0, 200.0);
    assert_eq!(dialog.preview(), Some(resized));
    assert_eq!(dialog.rect(), Rect::new(100.0, 100.0, 300.0, 250.0));
    assert!(rec.calls().contains(&Recorded::Cursor(Some(CursorGlyph::ResizeDiagonalDown))));

    gc.borrow_mut().pointer_up(at(399.0, 199.0), None);
    assert_eq!(dialog.rect(), resized);
    assert_eq!(
        *log.borrow(),
        [(DialogEventKind::Resize, resized), (DialogEventKind::Resized, resized)]
    );
}

#[test]
fn dialog_moves_by_title_within_bounds() {
    let (gc, _) = setup(&[]);
    let (dialog, log) = dialog(&gc);
    dialog.set_bounds(Some(Rect::new(0.0, 0.0, 500.0, 400.0)));

    assert!(!dialog.press(at(200.0, 200.0)).unwrap());
    assert!(!gc.borrow().is_active());

    dialog.press(at(200.0, 110.0)).unwrap();
    gc.borrow_mut().pointer_move(at(400.0, 500.0), None);
    gc.borrow_mut().pointer_up(at(400.0, 500.0), None);

    let moved = Rect::new(300.0, 250.0, 500.0, 400.0);
    assert_eq!(dialog.rect(), moved);
    assert_eq!(
        *log.borrow(),
        [(DialogEventKind::Move, moved), (DialogEventKind::Moved, moved)]
    );
}

#[test]
fn dialog_capture_loss_discards_preview() {
    let (gc, rec) = setup(&[]);
    let (dialog, log) = dialog(&gc);

    dialog.press(at(101.0, 175.0)).unwrap();
    gc.borrow_mut().pointer_move(at(61.0, 175.0), None);
    assert_eq!(dialog.preview(), Some(Rect::new(60.0, 100.0, 300.0, 250.0)));
    gc.borrow_mut().capture_lost();

    assert_eq!(dialog.rect(), Rect::new(100.0, 100.0, 300.0, 250.0));
    assert_eq!(dialog.preview(), None);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(rec.count(|c| *c == Recorded::Release), 0);
}
