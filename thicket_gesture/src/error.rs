// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Result alias for controller operations.
pub type Result<T> = core::result::Result<T, GestureError>;

/// Misuse of the [`GestureController`](crate::GestureController).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GestureError {
    /// A gesture is already in flight; the new one was refused.
    #[error("a gesture is already active")]
    AlreadyActive,

    /// The operation needs an active gesture and there is none.
    #[error("no gesture is active")]
    Inactive,

    /// The widget was never registered with the controller.
    #[error("widget is not registered")]
    UnknownWidget,

    /// The widget was registered without the drop-target capability.
    #[error("widget is not a drop target")]
    NotDropTarget,
}
