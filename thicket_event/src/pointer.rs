// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized pointer state and platform notifications.

use kurbo::{Point, Vec2};

bitflags::bitflags! {
    /// Modifier keys held while a pointer notification was produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Control key.
        const CTRL  = 0b0000_0010;
        /// Alt / Option key.
        const ALT   = 0b0000_0100;
        /// Meta / Command key.
        const META  = 0b0000_1000;
    }
}

/// Pointer button identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary (usually left) button.
    Primary,
    /// Secondary (usually right) button.
    Secondary,
    /// Auxiliary (usually middle) button.
    Auxiliary,
}

/// Key identifiers the gesture engine cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape cancels any active gesture.
    Escape,
    /// Any other key; carried so hosts can forward every key down unfiltered.
    Other,
}

/// One pointer sample in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    /// Pointer position in page space.
    pub position: Point,
    /// Modifier keys held at sample time.
    pub modifiers: Modifiers,
    /// Button currently held, if any.
    pub button: Option<PointerButton>,
}

impl PointerState {
    /// A pointer sample at `position` with no modifiers and the primary button held.
    pub const fn new(position: Point) -> Self {
        Self {
            position,
            modifiers: Modifiers::empty(),
            button: Some(PointerButton::Primary),
        }
    }

    /// Replace the held modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the held button.
    #[must_use]
    pub const fn with_button(mut self, button: Option<PointerButton>) -> Self {
        self.button = button;
        self
    }

    /// Horizontal page coordinate.
    pub const fn x(&self) -> f64 {
        self.position.x
    }

    /// Vertical page coordinate.
    pub const fn y(&self) -> f64 {
        self.position.y
    }

    /// Returns `true` if any modifier key is held.
    pub const fn has_modifiers(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Offset of this sample from `origin`.
    pub fn delta_from(&self, origin: &Self) -> Vec2 {
        self.position - origin.position
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(Point::ZERO)
    }
}

/// A platform notification, normalized.
///
/// Hosts translate whatever their windowing layer delivers into these
/// variants; the gesture controller consumes nothing else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input<W> {
    /// A button went down.
    Press(PointerState),
    /// The pointer moved. `hit` is the innermost widget under the pointer.
    Move {
        /// New pointer sample.
        pointer: PointerState,
        /// Innermost widget under the pointer, if any.
        hit: Option<W>,
    },
    /// A button was released.
    Release {
        /// Pointer sample at release.
        pointer: PointerState,
        /// Innermost widget under the pointer, if any.
        hit: Option<W>,
    },
    /// A key went down.
    KeyDown(Key),
    /// The window lost focus.
    Blur,
    /// The platform revoked pointer capture.
    CaptureLost,
    /// The pointer left the window.
    LeaveWindow,
    /// The periodic gesture timer fired.
    Tick,
}
