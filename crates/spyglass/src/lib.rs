#![forbid(unsafe_code)]

//! Spyglass public facade crate.
//!
//! Re-exports the host contract from `spyglass-core` and the inspector from
//! `spyglass-inspector`, plus a prelude for hosts wiring an inspector into
//! their event loop.

// --- Core re-exports -------------------------------------------------------

pub use spyglass_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
pub use spyglass_core::{
    Border, Color, Dispatcher, Font, FontStyle, Insets, ListenerId, LocalDispatcher, Point,
    PropertyChange, PropertyError, PropertyKey, PropertyValue, Rect, Size, Toolkit, TypeHierarchy,
    TypeKey, Widget, WidgetId, WidgetRef,
};

// --- Inspector re-exports --------------------------------------------------

pub use spyglass_inspector::{
    BuildError, ConstructError, DecoratorKind, HeadlessSurface, InspectError, Inspector,
    InspectorConfig, InspectorSurface, NodeId, Panel, PanelConstructor, PanelContext, PanelRow,
    SurfaceView, TreeGuides, TriggerAction, TriggerConfig,
};

#[cfg(feature = "tracing-json")]
pub use spyglass_core::logging::init_json_subscriber;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DecoratorKind, Event, InspectError, Inspector, InspectorConfig, InspectorSurface,
        LocalDispatcher, PropertyKey, PropertyValue, Toolkit, TriggerAction, TypeHierarchy,
        Widget, WidgetRef,
    };

    pub use crate::{core, inspector};
}

pub use spyglass_core as core;
pub use spyglass_inspector as inspector;
