// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random press, move, and release sequences keep a list consistent.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use proptest::prelude::*;
use thicket_event::{Key, Modifiers, PointerState};
use thicket_gesture::GestureController;
use thicket_gesture::recording::{FixedGeometry, Recorder};
use thicket_widgets::{ListLayout, ListView};

#[derive(Clone, Debug)]
struct Press {
    at: f64,
    modifiers: Modifiers,
    moves: Vec<f64>,
    escape: bool,
}

fn modifiers() -> impl Strategy<Value = Modifiers> {
    prop_oneof![
        Just(Modifiers::empty()),
        Just(Modifiers::SHIFT),
        Just(Modifiers::CTRL),
    ]
}

fn press() -> impl Strategy<Value = Press> {
    (
        0.0_f64..100.0,
        modifiers(),
        prop::collection::vec(-20.0_f64..120.0, 0..4),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(at, modifiers, moves, escape)| Press {
            at,
            modifiers,
            moves,
            escape,
        })
}

fn at(y: f64) -> PointerState {
    PointerState::new(Point::new(10.0, y))
}

proptest! {
    #[test]
    fn list_stays_a_permutation_with_valid_selection(
        presses in prop::collection::vec(press(), 1..12),
        observe in any::<bool>(),
    ) {
        let geometry = FixedGeometry::default();
        geometry.set(1_u32, Rect::new(0.0, 0.0, 200.0, 100.0));
        let rec = Recorder::default();
        let gc = Rc::new(RefCell::new(GestureController::new(geometry, rec.clone(), rec)));
        let list = ListView::new(
            &gc,
            1,
            ListLayout::Linear { row_height: 20.0 },
            Size::new(200.0, 100.0),
            0..5_u32,
        )
        .unwrap();
        if observe {
            list.on_event(|_| {});
        }

        for p in presses {
            prop_assert!(list.press(at(p.at).with_modifiers(p.modifiers)).unwrap());
            let mut last = p.at;
            for y in p.moves {
                gc.borrow_mut().pointer_move(at(y), Some(1));
                last = y;
            }
            if p.escape {
                gc.borrow_mut().key_down(Key::Escape);
            } else {
                gc.borrow_mut().pointer_up(at(last), Some(1));
            }
            prop_assert!(!gc.borrow().is_active());
            prop_assert!(gc.borrow().overlays().is_clear());

            let mut items = list.items();
            items.sort_unstable();
            prop_assert_eq!(items, (0..5).collect::<Vec<_>>());
            let selected = list.selected();
            prop_assert!(selected.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(selected.iter().all(|&i| i < 5));
            // Every press lands on a row, so something stays selected.
            prop_assert!(!selected.is_empty() || p.modifiers.contains(Modifiers::CTRL));
        }
    }
}
