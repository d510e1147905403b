// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability tags and widget hierarchy lookup.

use thicket_hit::WidgetFamily;

bitflags::bitflags! {
    /// Capabilities recorded for a widget at registration.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Receives `Over`, `Out`, `Drop`, and `Cancel` during drag gestures.
        const DROP_TARGET = 1 << 0;
        /// Starts drag gestures from its items.
        const DRAG_SOURCE = 1 << 1;
        /// Is a command item (menu entry, toolbar button); never a drop target.
        const COMMAND_ITEM = 1 << 2;
    }
}

/// What sort of control a registered widget is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Linear list.
    List,
    /// Thumbnail / grid list.
    Grid,
    /// Hierarchical tree.
    Tree,
    /// Tab strip.
    TabStrip,
    /// Table header with reorderable, resizable columns.
    TableHeader,
    /// Splitter bar.
    Splitter,
    /// Movable, resizable dialog.
    Dialog,
    /// Anything else.
    Other,
}

impl WidgetKind {
    /// Drop-position policy family, for widgets that resolve drop positions.
    pub const fn family(self) -> Option<WidgetFamily> {
        match self {
            Self::List => Some(WidgetFamily::List),
            Self::Grid => Some(WidgetFamily::Grid),
            Self::Tree => Some(WidgetFamily::Tree),
            Self::TabStrip => Some(WidgetFamily::TabStrip),
            _ => None,
        }
    }
}

/// Parent lookup used to walk from a hit widget up to its drop target.
pub trait ParentLookup<W> {
    /// Parent of `widget`, or `None` at a root.
    fn parent_of(&self, widget: &W) -> Option<W>;
}

/// A [`ParentLookup`] for flat hierarchies: nothing has a parent.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoParent;

impl<W> ParentLookup<W> for NoParent {
    fn parent_of(&self, _: &W) -> Option<W> {
        None
    }
}
