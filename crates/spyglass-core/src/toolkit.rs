#![forbid(unsafe_code)]

//! Access to the host's top-level windows.

use crate::widget::WidgetRef;

/// The host toolkit's view of its windows.
///
/// Window locations are screen coordinates; every other widget's location is
/// relative to its parent.
pub trait Toolkit {
    /// Every top-level window, in whatever order the toolkit keeps them.
    ///
    /// The order is not guaranteed to be front-to-back.
    fn windows(&self) -> Vec<WidgetRef>;

    /// The window that currently has keyboard focus, if any.
    fn focused_window(&self) -> Option<WidgetRef>;
}
