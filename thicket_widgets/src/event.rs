// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application-facing semantic events.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use thicket_event::{DropPosition, InteractionEvent};
use thicket_hit::ResolvedTarget;

use crate::Payload;

/// Application handler for a widget's semantic events.
pub type EventHandler<K, D> = Box<dyn FnMut(&mut InteractionEvent<K, D>)>;

/// Slot holding a widget's optional event handler.
///
/// Every emission creates a fresh [`InteractionEvent`], hands it to the
/// handler, and returns it so the widget can read back `cancel()` and
/// `accept()`. The handler is taken out of the slot while it runs, so it may
/// replace or clear itself.
pub struct EventSlot<K, D> {
    handler: Rc<RefCell<Option<EventHandler<K, D>>>>,
    // Bumped by `set` and `clear` so a running handler is not restored over them.
    generation: Rc<Cell<u64>>,
}

impl<K, D> EventSlot<K, D> {
    /// An empty slot.
    pub fn new() -> Self {
        Self {
            handler: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Install `handler`, replacing any previous one.
    pub fn set(&self, handler: impl FnMut(&mut InteractionEvent<K, D>) + 'static) {
        self.bump();
        if let Ok(mut slot) = self.handler.try_borrow_mut() {
            *slot = Some(Box::new(handler));
        }
    }

    /// Remove the handler.
    pub fn clear(&self) {
        self.bump();
        if let Ok(mut slot) = self.handler.try_borrow_mut() {
            *slot = None;
        }
    }

    fn bump(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    /// Returns `true` if a handler is installed.
    ///
    /// While the handler runs it is out of the slot; widgets query this before emitting.
    pub fn is_set(&self) -> bool {
        self.handler.try_borrow().is_ok_and(|slot| slot.is_some())
    }

    /// Emit a fresh event and return it after the handler saw it.
    pub(crate) fn emit(&self, kind: K, detail: D) -> InteractionEvent<K, D> {
        let mut ev = InteractionEvent::new(kind, detail);
        let generation = self.generation.get();
        let taken = self
            .handler
            .try_borrow_mut()
            .ok()
            .and_then(|mut slot| slot.take());
        if let Some(mut handler) = taken {
            handler(&mut ev);
            if self.generation.get() == generation
                && let Ok(mut slot) = self.handler.try_borrow_mut()
            {
                *slot = Some(handler);
            }
        }
        ev
    }
}

impl<K, D> Clone for EventSlot<K, D> {
    fn clone(&self) -> Self {
        Self {
            handler: Rc::clone(&self.handler),
            generation: Rc::clone(&self.generation),
        }
    }
}

impl<K, D> Default for EventSlot<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, D> fmt::Debug for EventSlot<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSlot")
            .field("installed", &self.is_set())
            .finish_non_exhaustive()
    }
}

/// Detail of list, tree, and tab strip events.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDetail<W> {
    /// Item concerned: list row, tab index, or tree node id.
    pub index: Option<usize>,
    /// Proposed drop position, for drag events.
    pub position: Option<DropPosition>,
    /// What is being dragged, for drag events.
    pub payload: Option<Payload<W>>,
}

impl<W> ItemDetail<W> {
    pub(crate) fn item(index: usize) -> Self {
        Self {
            index: Some(index),
            position: None,
            payload: None,
        }
    }

    pub(crate) fn drag(
        index: Option<usize>,
        position: Option<DropPosition>,
        payload: Option<Payload<W>>,
    ) -> Self {
        Self {
            index,
            position,
            payload,
        }
    }

    /// Detail naming a resolved drop target.
    pub(crate) fn target(target: ResolvedTarget, payload: Option<Payload<W>>) -> Self {
        Self::drag(Some(target.index), Some(target.position), payload)
    }
}
