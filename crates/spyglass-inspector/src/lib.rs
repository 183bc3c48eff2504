#![forbid(unsafe_code)]

//! Live inspection of widget trees.
//!
//! An [`Inspector`] follows one selected widget at a time. For the selection
//! it keeps a highlight on screen ([`decorate`]), a stack of property panels
//! resolved from the widget's type chain ([`factory`], [`panels`]), editable
//! fields kept in sync with the widget in both directions ([`bridge`]) and a
//! lazily built copy of the surrounding tree ([`mirror`]).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use spyglass_core::LocalDispatcher;
//! use spyglass_harness::{fixtures, sample_app};
//! use spyglass_inspector::Inspector;
//!
//! let app = sample_app();
//! let mut inspector = Inspector::new(Rc::new(LocalDispatcher::new()), fixtures::hierarchy());
//! inspector.select(Some(app.button.widget_ref())).unwrap();
//! assert_eq!(
//!     inspector.pane().titles(),
//!     ["Object", "Component", "Container", "Widget"]
//! );
//! ```

pub mod bridge;
pub mod builtin;
pub mod config;
pub mod controller;
pub mod decorate;
pub mod diagnostics;
pub mod error;
pub mod factory;
pub mod mirror;
pub mod panel;
pub mod panels;
pub mod pick;
pub mod trigger;

pub use builtin::{builtin_registry, register_builtin_panels};
pub use config::{ConfigError, InspectorConfig, InspectorConfigParse};
pub use controller::{HeadlessSurface, Inspector, InspectorSurface, SurfaceView};
pub use decorate::{
    BackgroundDecorator, BorderDecorator, Decorator, DecoratorKind, DecoratorSet, NullDecorator,
};
pub use diagnostics::{
    DiagnosticEntry, DiagnosticEventKind, DiagnosticLog, Diagnostics, TelemetryHooks,
};
pub use error::{BuildError, ConstructError, InspectError};
pub use factory::{CapabilityProbe, FnConstructor, HierarchyProbe, PanelConstructor, PanelRegistry};
pub use mirror::{NodeId, SelectionChanged, TreeGuides, TreeMirror};
pub use panel::{InspectorPane, Panel, PanelContext, PanelRow};
pub use trigger::{KeyTrigger, MouseTrigger, TriggerAction, TriggerConfig, TriggerParseError};
