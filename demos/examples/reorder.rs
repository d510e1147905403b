// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted drags over a list and a tab strip sharing one gesture controller.
//!
//! The list is scrolled by the auto-scroll timer while the pointer rests near
//! its bottom edge, then the dragged row is dropped further down.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p thicket_demos --example reorder`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use thicket_event::{Input, PointerState};
use thicket_gesture::GestureController;
use thicket_gesture::recording::{FixedGeometry, Recorder};
use thicket_widgets::{ListEventKind, ListLayout, ListView, TabStrip};
use tracing_subscriber::EnvFilter;

const LIST: u32 = 1;
const TABS: u32 = 2;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The list sits below a 300 wide tab strip.
    let scene = [
        (TABS, Rect::new(0.0, 0.0, 300.0, 24.0)),
        (LIST, Rect::new(0.0, 30.0, 200.0, 130.0)),
    ];
    let geometry = FixedGeometry::default();
    for (id, rect) in scene {
        geometry.set(id, rect);
    }
    let hit = |p: Point| scene.iter().find(|(_, r)| r.contains(p)).map(|(id, _)| *id);
    let rec = Recorder::default();
    let gc = Rc::new(RefCell::new(GestureController::new(geometry, rec.clone(), rec.clone())));

    let list = ListView::new(
        &gc,
        LIST,
        ListLayout::Linear { row_height: 20.0 },
        Size::new(200.0, 100.0),
        (0..12).map(|i| format!("row {i}")),
    )
    .unwrap();
    list.on_event(|ev| {
        if ev.kind == ListEventKind::DragOver {
            tracing::info!(index = ?ev.detail.index, position = ?ev.detail.position, "drag over");
        }
    });

    let tabs = TabStrip::new(
        &gc,
        TABS,
        24.0,
        ["Files", "Search", "Git", "Debug"].into_iter().map(|t| (t, 60.0)),
    )
    .unwrap();

    let at = |x, y| PointerState::new(Point::new(x, y));
    let feed = |input: Input<u32>| gc.borrow_mut().handle(input);

    // Drag "row 0" to the bottom edge and let the timer scroll the list.
    list.press(at(20.0, 35.0)).unwrap();
    feed(Input::Move { pointer: at(20.0, 125.0), hit: hit(Point::new(20.0, 125.0)) });
    for _ in 0..4 {
        feed(Input::Tick);
    }
    tracing::info!(scroll = list.scroll_offset(), "auto-scrolled");
    feed(Input::Release { pointer: at(20.0, 125.0), hit: hit(Point::new(20.0, 125.0)) });
    println!("list: {:?}", list.items());

    // Drag the first tab past the third one.
    tabs.press(at(10.0, 10.0)).unwrap();
    feed(Input::Move { pointer: at(170.0, 10.0), hit: Some(TABS) });
    feed(Input::Release { pointer: at(170.0, 10.0), hit: Some(TABS) });
    println!("tabs: {:?} (selected {:?})", tabs.tabs(), tabs.selected());

    println!("overlay and platform calls: {}", rec.calls().len());
}
