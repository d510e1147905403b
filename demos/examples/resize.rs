// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted splitter and dialog gestures, with one cancelled by Escape.
//!
//! Run:
//! - `RUST_LOG=thicket_gesture=debug,thicket_widgets=debug cargo run -p thicket_demos --example resize`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use thicket_event::{Input, Key, PointerState};
use thicket_gesture::GestureController;
use thicket_gesture::recording::{FixedGeometry, Recorder};
use thicket_hit::{EdgeMask, Flow, SizeLimits};
use thicket_widgets::{Dialog, Splitter};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let geometry = FixedGeometry::default();
    geometry.set(1_u32, Rect::new(0.0, 0.0, 600.0, 400.0));
    let rec = Recorder::default();
    let gc = Rc::new(RefCell::new(GestureController::new(geometry, rec.clone(), rec)));
    let at = |x, y| PointerState::new(Point::new(x, y));
    let feed = |input: Input<u32>| gc.borrow_mut().handle(input);

    let splitter = Splitter::new(&gc, 1, Flow::Horizontal, 400.0, 200.0).unwrap();
    splitter.set_limits(120.0, 480.0);
    splitter.on_event(|ev| {
        tracing::info!(kind = ?ev.kind, position = ev.detail.position, "splitter");
    });

    // Past the upper limit, then released: the bar commits at 480.
    splitter.press(at(201.0, 50.0)).unwrap();
    feed(Input::Move { pointer: at(700.0, 50.0), hit: None });
    feed(Input::Release { pointer: at(700.0, 50.0), hit: None });
    println!("splitter at {}", splitter.position());

    // Dragged and abandoned with Escape: the bar stays put.
    splitter.press(at(481.0, 50.0)).unwrap();
    feed(Input::Move { pointer: at(300.0, 50.0), hit: None });
    feed(Input::KeyDown(Key::Escape));
    println!("splitter still at {}", splitter.position());

    let rect = Rect::new(100.0, 100.0, 340.0, 260.0);
    let dialog = Dialog::new(&gc, 2, rect, EdgeMask::all()).unwrap();
    dialog.set_limits(SizeLimits {
        min: Size::new(160.0, 100.0),
        max: Size::new(480.0, 320.0),
    });
    dialog.set_bounds(Some(Rect::new(0.0, 0.0, 600.0, 400.0)));
    dialog.on_event(|ev| {
        let detail = &ev.detail;
        tracing::info!(kind = ?ev.kind, zone = ?detail.zone, rect = ?detail.rect, "dialog");
    });

    // Shrink from the top-left corner, below the minimum size.
    dialog.press(at(101.0, 101.0)).unwrap();
    feed(Input::Move { pointer: at(300.0, 250.0), hit: None });
    feed(Input::Release { pointer: at(300.0, 250.0), hit: None });
    println!("dialog resized to {:?}", dialog.rect());

    // Move by the title bar, into the bottom-right corner.
    let title = dialog.rect().origin() + Vec2::new(20.0, 10.0);
    dialog.press(PointerState::new(title)).unwrap();
    feed(Input::Move { pointer: at(900.0, 900.0), hit: None });
    feed(Input::Release { pointer: at(900.0, 900.0), hit: None });
    println!("dialog moved to {:?}", dialog.rect());
}
