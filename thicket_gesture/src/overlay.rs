// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual feedback overlays.
//!
//! Overlays are pure position/visibility commands. [`Overlays`] remembers what
//! is currently shown and only forwards changes to the [`OverlayRenderer`], so
//! hiding an overlay that is already hidden produces no renderer call.

use kurbo::{Line, Rect};
use thicket_hit::{Affordance, EdgeZone};

/// Cursor glyphs the controller and widgets may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorGlyph {
    /// Dragging; the current target accepts the payload.
    Move,
    /// Dragging; nothing here accepts the payload.
    NoDrop,
    /// Moving a window or panel.
    Grabbing,
    /// Resizing along the horizontal axis.
    ResizeHorizontal,
    /// Resizing along the vertical axis.
    ResizeVertical,
    /// Resizing along the top-left / bottom-right diagonal.
    ResizeDiagonalDown,
    /// Resizing along the bottom-left / top-right diagonal.
    ResizeDiagonalUp,
}

impl CursorGlyph {
    /// Resize glyph for an edge zone.
    pub const fn for_zone(zone: EdgeZone) -> Option<Self> {
        match zone {
            EdgeZone::None => None,
            EdgeZone::Left | EdgeZone::Right => Some(Self::ResizeHorizontal),
            EdgeZone::Top | EdgeZone::Bottom => Some(Self::ResizeVertical),
            EdgeZone::TopLeft | EdgeZone::BottomRight => Some(Self::ResizeDiagonalDown),
            EdgeZone::TopRight | EdgeZone::BottomLeft => Some(Self::ResizeDiagonalUp),
        }
    }
}

/// Renderer for the overlays a gesture can show. `None` hides an overlay.
pub trait OverlayRenderer {
    /// Border box around a drop target.
    fn border(&mut self, rect: Option<Rect>);
    /// Insertion line between items.
    fn insertion_line(&mut self, line: Option<Line>);
    /// Shaded box, e.g. the outline of a dialog being resized.
    fn shade(&mut self, rect: Option<Rect>);
    /// Cursor override; `None` restores the normal cursor.
    fn cursor(&mut self, glyph: Option<CursorGlyph>);
}

/// Overlay state tracker wrapping an [`OverlayRenderer`].
pub struct Overlays {
    renderer: Box<dyn OverlayRenderer>,
    border: Option<Rect>,
    line: Option<Line>,
    shade: Option<Rect>,
    cursor: Option<CursorGlyph>,
}

impl core::fmt::Debug for Overlays {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Overlays")
            .field("border", &self.border)
            .field("line", &self.line)
            .field("shade", &self.shade)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Overlays {
    /// Wrap a renderer; every overlay starts hidden.
    pub fn new(renderer: Box<dyn OverlayRenderer>) -> Self {
        Self {
            renderer,
            border: None,
            line: None,
            shade: None,
            cursor: None,
        }
    }

    /// Show or hide the border box.
    pub fn show_border(&mut self, rect: Option<Rect>) {
        if self.border != rect {
            self.border = rect;
            self.renderer.border(rect);
        }
    }

    /// Show or hide the insertion line.
    pub fn show_insertion_line(&mut self, line: Option<Line>) {
        if self.line != line {
            self.line = line;
            self.renderer.insertion_line(line);
        }
    }

    /// Show or hide the shade box.
    pub fn show_shade(&mut self, rect: Option<Rect>) {
        if self.shade != rect {
            self.shade = rect;
            self.renderer.shade(rect);
        }
    }

    /// Set or restore the cursor.
    pub fn set_cursor(&mut self, glyph: Option<CursorGlyph>) {
        if self.cursor != glyph {
            self.cursor = glyph;
            self.renderer.cursor(glyph);
        }
    }

    /// Show exactly one of the border box or insertion line, or neither.
    pub fn show_affordance(&mut self, affordance: Option<Affordance>) {
        match affordance {
            Some(Affordance::Border(rect)) => {
                self.show_insertion_line(None);
                self.show_border(Some(rect));
            }
            Some(Affordance::InsertionLine(line)) => {
                self.show_border(None);
                self.show_insertion_line(Some(line));
            }
            None => {
                self.show_border(None);
                self.show_insertion_line(None);
            }
        }
    }

    /// Hide the border, insertion line, and shade. The cursor is left alone.
    pub fn reset(&mut self) {
        self.show_border(None);
        self.show_insertion_line(None);
        self.show_shade(None);
    }

    /// Hide every overlay and restore the cursor.
    pub fn clear(&mut self) {
        self.reset();
        self.set_cursor(None);
    }

    /// Currently shown border box.
    pub fn border(&self) -> Option<Rect> {
        self.border
    }

    /// Currently shown insertion line.
    pub fn insertion_line(&self) -> Option<Line> {
        self.line
    }

    /// Currently shown shade box.
    pub fn shade(&self) -> Option<Rect> {
        self.shade
    }

    /// Current cursor override.
    pub fn cursor(&self) -> Option<CursorGlyph> {
        self.cursor
    }

    /// Returns `true` if no overlay is shown and the cursor is normal.
    pub fn is_clear(&self) -> bool {
        self.border.is_none()
            && self.line.is_none()
            && self.shade.is_none()
            && self.cursor.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Recorded, Recorder};

    #[test]
    fn only_changes_reach_the_renderer() {
        let rec = Recorder::default();
        let mut overlays = Overlays::new(Box::new(rec.clone()));
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        overlays.show_border(Some(r));
        overlays.show_border(Some(r));
        overlays.clear();
        overlays.clear();
        assert_eq!(rec.take(), [Recorded::Border(Some(r)), Recorded::Border(None)]);
        assert!(overlays.is_clear());
    }

    #[test]
    fn affordances_are_exclusive() {
        let rec = Recorder::default();
        let mut overlays = Overlays::new(Box::new(rec.clone()));
        let line = Line::new((0.0, 20.0), (100.0, 20.0));
        let rect = Rect::new(0.0, 20.0, 100.0, 40.0);
        overlays.show_affordance(Some(Affordance::InsertionLine(line)));
        overlays.show_affordance(Some(Affordance::Border(rect)));
        assert_eq!(overlays.insertion_line(), None);
        assert_eq!(overlays.border(), Some(rect));
        assert_eq!(
            rec.take(),
            [
                Recorded::Line(Some(line)),
                Recorded::Line(None),
                Recorded::Border(Some(rect)),
            ]
        );
    }

    #[test]
    fn zone_glyphs() {
        assert_eq!(
            CursorGlyph::for_zone(EdgeZone::BottomRight),
            Some(CursorGlyph::ResizeDiagonalDown)
        );
        assert_eq!(CursorGlyph::for_zone(EdgeZone::Left), Some(CursorGlyph::ResizeHorizontal));
        assert_eq!(CursorGlyph::for_zone(EdgeZone::None), None);
    }
}
