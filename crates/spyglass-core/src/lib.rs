#![forbid(unsafe_code)]

//! Core: the host contract an application implements to be inspected.
//!
//! Everything the inspector knows about a live application goes through the
//! types in this crate: [`widget::Widget`] handles with pointer identity, the
//! property model in [`value`], the explicit type hierarchy in [`types`], and
//! the single-threaded [`dispatch::Dispatcher`] used to defer work to the next
//! turn of the host's UI loop.

pub mod color;
pub mod dispatch;
pub mod event;
pub mod geometry;
pub mod listeners;
pub mod logging;
pub mod toolkit;
pub mod types;
pub mod value;
pub mod widget;

pub use color::Color;
pub use dispatch::{Dispatcher, LocalDispatcher};
pub use geometry::{Insets, Point, Rect, Size};
pub use listeners::{ListenerId, ListenerSet};
pub use toolkit::Toolkit;
pub use types::{TypeHierarchy, TypeKey};
pub use value::{Border, Font, FontStyle, PropertyChange, PropertyError, PropertyKey, PropertyValue};
pub use widget::{PropertyListener, Widget, WidgetId, WidgetRef};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
