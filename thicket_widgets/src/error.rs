// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thicket_gesture::GestureError;
use thiserror::Error;

/// Result alias for widget operations.
pub type Result<T> = core::result::Result<T, WidgetError>;

/// Why a widget could not act on a press.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WidgetError {
    /// The controller refused the operation.
    #[error(transparent)]
    Gesture(#[from] GestureError),

    /// The controller is already borrowed, e.g. the press arrived from inside a handler.
    #[error("gesture controller is busy dispatching")]
    ControllerBusy,

    /// The widget has no bounds, so the press cannot be mapped to local coordinates.
    #[error("widget is not laid out")]
    NotLaidOut,
}
