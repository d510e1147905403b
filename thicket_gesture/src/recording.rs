// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory collaborators that record every call.
//!
//! Useful for headless hosts, scripted demos, and tests: a [`Recorder`]
//! implements both [`OverlayRenderer`] and [`Platform`] and appends each call
//! to a shared log, and [`FixedGeometry`] serves widget bounds from a map.

use core::cell::{Cell, RefCell};
use core::hash::Hash;
use core::time::Duration;
use std::rc::Rc;

use hashbrown::HashMap;
use kurbo::{Line, Rect};

use crate::{CursorGlyph, GeometryProvider, OverlayRenderer, Platform};

/// One recorded collaborator call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Recorded {
    /// [`OverlayRenderer::border`].
    Border(Option<Rect>),
    /// [`OverlayRenderer::insertion_line`].
    Line(Option<Line>),
    /// [`OverlayRenderer::shade`].
    Shade(Option<Rect>),
    /// [`OverlayRenderer::cursor`].
    Cursor(Option<CursorGlyph>),
    /// [`Platform::capture_pointer`], with the answer given.
    Capture(bool),
    /// [`Platform::release_pointer`].
    Release,
    /// [`Platform::start_interval`].
    StartInterval(Duration),
    /// [`Platform::stop_interval`].
    StopInterval,
}

/// Shared call log. Clones append to the same log.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<Recorded>>>,
    refuse_capture: Rc<Cell<bool>>,
}

impl Recorder {
    /// Make [`Platform::capture_pointer`] refuse (or grant) capture.
    pub fn set_refuse_capture(&self, refuse: bool) {
        self.refuse_capture.set(refuse);
    }

    /// Copy of the log so far.
    pub fn calls(&self) -> Vec<Recorded> {
        self.log.borrow().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<Recorded> {
        core::mem::take(&mut *self.log.borrow_mut())
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Recorded) -> bool) -> usize {
        self.log.borrow().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: Recorded) {
        self.log.borrow_mut().push(call);
    }
}

impl OverlayRenderer for Recorder {
    fn border(&mut self, rect: Option<Rect>) {
        self.push(Recorded::Border(rect));
    }

    fn insertion_line(&mut self, line: Option<Line>) {
        self.push(Recorded::Line(line));
    }

    fn shade(&mut self, rect: Option<Rect>) {
        self.push(Recorded::Shade(rect));
    }

    fn cursor(&mut self, glyph: Option<CursorGlyph>) {
        self.push(Recorded::Cursor(glyph));
    }
}

impl Platform for Recorder {
    fn capture_pointer(&mut self) -> bool {
        let granted = !self.refuse_capture.get();
        self.push(Recorded::Capture(granted));
        granted
    }

    fn release_pointer(&mut self) {
        self.push(Recorded::Release);
    }

    fn start_interval(&mut self, period: Duration) {
        self.push(Recorded::StartInterval(period));
    }

    fn stop_interval(&mut self) {
        self.push(Recorded::StopInterval);
    }
}

/// Widget bounds served from a shared map.
#[derive(Clone, Debug)]
pub struct FixedGeometry<W> {
    bounds: Rc<RefCell<HashMap<W, Rect>>>,
}

impl<W> Default for FixedGeometry<W> {
    fn default() -> Self {
        Self {
            bounds: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl<W: Eq + Hash> FixedGeometry<W> {
    /// Set (or move) the bounds of `widget`.
    pub fn set(&self, widget: W, rect: Rect) {
        self.bounds.borrow_mut().insert(widget, rect);
    }
}

impl<W: Eq + Hash> GeometryProvider<W> for FixedGeometry<W> {
    fn bounds(&self, widget: &W) -> Option<Rect> {
        self.bounds.borrow().get(widget).copied()
    }
}
