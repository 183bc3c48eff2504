#![forbid(unsafe_code)]

//! The inspection controller.
//!
//! [`Inspector`] owns the selection and everything that follows it. A
//! selection change runs these steps in order, within one call:
//!
//! 1. remove the highlight from the previous target,
//! 2. highlight the new target,
//! 3. re-root the tree mirror on the new target,
//! 4. dispose the old panel stack and build a new one,
//! 5. notify selection listeners and refresh the surface.
//!
//! Selecting the current target again clears the selection.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use spyglass_core::dispatch::Dispatcher;
use spyglass_core::event::{KeyEvent, MouseEvent};
use spyglass_core::geometry::Point;
use spyglass_core::listeners::{ListenerId, ListenerSet};
use spyglass_core::toolkit::Toolkit;
use spyglass_core::types::{TypeHierarchy, TypeKey};
use spyglass_core::widget::WidgetRef;

use crate::builtin;
use crate::config::InspectorConfig;
use crate::decorate::{Decorator, DecoratorKind, DecoratorSet};
use crate::diagnostics::{DiagnosticEntry, DiagnosticEventKind, Diagnostics, TelemetryHooks};
use crate::error::{BuildError, InspectError};
use crate::factory::{PanelConstructor, PanelRegistry};
use crate::mirror::{NodeId, SelectionChanged, TreeGuides, TreeMirror};
use crate::panel::{InspectorPane, PanelContext};
use crate::pick;
use crate::trigger::{TriggerAction, TriggerConfig};

/// What a surface is shown on each refresh.
#[derive(Clone, Copy)]
pub struct SurfaceView<'a> {
    pub selection: Option<&'a WidgetRef>,
    pub decorator: DecoratorKind,
    pub pane: &'a InspectorPane,
    pub mirror: &'a TreeMirror,
}

/// The window (or other view) that presents the inspector to a user.
///
/// Implemented by the host. The inspector opens it on the first non-empty
/// selection and closes it on shutdown.
pub trait InspectorSurface {
    fn open(&mut self);

    fn refresh(&mut self, view: SurfaceView<'_>);

    fn close(&mut self);

    fn as_any(&self) -> &dyn Any;
}

/// A surface that draws nothing and remembers what it was told.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    open: bool,
    opens: usize,
    refreshes: usize,
    closes: usize,
    tree: Vec<String>,
    titles: Vec<String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open_count(&self) -> usize {
        self.opens
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    pub fn close_count(&self) -> usize {
        self.closes
    }

    /// Tree lines from the last refresh, with ASCII guides.
    pub fn tree(&self) -> &[String] {
        &self.tree
    }

    /// Panel titles from the last refresh.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }
}

impl InspectorSurface for HeadlessSurface {
    fn open(&mut self) {
        self.open = true;
        self.opens += 1;
    }

    fn refresh(&mut self, view: SurfaceView<'_>) {
        self.refreshes += 1;
        self.tree = view.mirror.render_lines(TreeGuides::Ascii);
        self.titles = view.pane.titles();
    }

    fn close(&mut self) {
        self.open = false;
        self.closes += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The inspection controller. See the [module docs](self).
pub struct Inspector {
    registry: PanelRegistry,
    ctx: PanelContext,
    decorators: DecoratorSet,
    decorator: Rc<dyn Decorator>,
    triggers: TriggerConfig,
    selection: Option<WidgetRef>,
    mirror: TreeMirror,
    pane: InspectorPane,
    surface: Box<dyn InspectorSurface>,
    surface_open: bool,
    selection_listeners: ListenerSet<Option<WidgetRef>>,
    decorator_listeners: ListenerSet<DecoratorKind>,
    diagnostics: Diagnostics,
    shut_down: bool,
}

impl fmt::Debug for Inspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("selection", &self.selection)
            .field("decorator", &self.decorator.kind())
            .field("panels", &self.pane.titles())
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl Inspector {
    /// An inspector with the default configuration and the built-in panels.
    pub fn new(dispatcher: Rc<dyn Dispatcher>, hierarchy: TypeHierarchy) -> Self {
        Self::with_config(dispatcher, hierarchy, InspectorConfig::default())
    }

    pub fn with_config(
        dispatcher: Rc<dyn Dispatcher>,
        hierarchy: TypeHierarchy,
        config: InspectorConfig,
    ) -> Self {
        let decorators = config.decorators();
        let decorator = decorators.get(config.decorator);
        Self {
            registry: builtin::builtin_registry(),
            ctx: PanelContext::new(dispatcher, Rc::new(hierarchy))
                .with_qualified_names(config.qualified_names),
            decorators,
            decorator,
            triggers: config.triggers,
            selection: None,
            mirror: TreeMirror::new(),
            pane: InspectorPane::new(),
            surface: Box::new(HeadlessSurface::new()),
            surface_open: false,
            selection_listeners: ListenerSet::new(),
            decorator_listeners: ListenerSet::new(),
            diagnostics: config.diagnostics(),
            shut_down: false,
        }
    }

    /// Replace the panel registry, dropping the built-in panels.
    #[must_use]
    pub fn with_registry(mut self, registry: PanelRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Present the inspector on `surface`. A surface already showing a
    /// selection is closed and the new one takes over.
    #[must_use]
    pub fn with_surface(mut self, surface: impl InspectorSurface + 'static) -> Self {
        if self.surface_open {
            self.surface.close();
            self.surface_open = false;
        }
        self.surface = Box::new(surface);
        if self.selection.is_some() {
            self.surface.open();
            self.surface_open = true;
            self.refresh_surface();
        }
        self
    }

    /// Replace the highlight styles. The current highlight is moved to the
    /// matching decorator of the new set.
    #[must_use]
    pub fn with_decorators(mut self, decorators: DecoratorSet) -> Self {
        let selection = self.selection.clone();
        if let Some(target) = &selection {
            self.undecorate(target);
        }
        self.decorator = decorators.get(self.decorator.kind());
        self.decorators = decorators;
        if let Some(target) = &selection {
            self.decorate(target);
        }
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_telemetry_hooks(mut self, hooks: TelemetryHooks) -> Self {
        self.diagnostics.set_hooks(Some(hooks));
        self
    }

    /// Add a panel constructor for `ty`.
    pub fn register_panel(&mut self, ty: TypeKey, constructor: Rc<dyn PanelConstructor>) {
        self.registry.register(ty, constructor);
    }

    /// Make `candidate` the inspected widget.
    ///
    /// Selecting the current selection again clears it. When the panel stack
    /// cannot be built the selection, highlight and tree are still updated,
    /// the pane is left empty, and the build error is returned.
    pub fn select(&mut self, candidate: Option<WidgetRef>) -> Result<(), InspectError> {
        if self.shut_down {
            return Err(InspectError::ShutDown);
        }
        let span = spyglass_core::debug_span!("select");
        let _guard = span.enter();
        let candidate = if WidgetRef::same(candidate.as_ref(), self.selection.as_ref()) {
            None
        } else {
            candidate
        };

        if let Some(previous) = self.selection.take() {
            self.undecorate(&previous);
        }
        if let Some(target) = &candidate {
            self.decorate(target);
        }
        self.selection = candidate;

        let old_root = self.mirror.root();
        let SelectionChanged(selected) = self.mirror.inspect(self.selection.as_ref());
        let new_root = self.mirror.root();
        if new_root.is_some() && new_root != old_root {
            let entry = DiagnosticEntry::new(DiagnosticEventKind::MirrorRerooted)
                .with_node_count(self.mirror.node_count());
            self.diagnostics.record(entry);
        }

        let built = self
            .pane
            .inspect(selected.as_ref(), &self.registry, &self.ctx);

        spyglass_core::debug!(
            widget = %selected.as_ref().map(|w| w.label()).unwrap_or_default(),
            panels = self.pane.len(),
            "selection changed"
        );
        let mut entry = DiagnosticEntry::new(DiagnosticEventKind::SelectionChanged)
            .with_decorator(self.decorator.kind());
        if let Some(target) = &selected {
            entry = entry.with_target(target.label(), target.type_key().qualified_name());
        }
        self.diagnostics.record(entry);

        let result = match built {
            Ok(()) => {
                if selected.is_some() {
                    let entry = DiagnosticEntry::new(DiagnosticEventKind::PanelsBuilt)
                        .with_panel_count(self.pane.len());
                    self.diagnostics.record(entry);
                }
                Ok(())
            }
            Err(err) => {
                let BuildError::Construction { panel, source } = &err;
                let entry = DiagnosticEntry::new(DiagnosticEventKind::PanelsFailed)
                    .with_panel(panel.clone())
                    .with_context(source.to_string());
                self.diagnostics.record(entry);
                Err(InspectError::Panels(err))
            }
        };

        self.selection_listeners.emit(&selected);
        if selected.is_some() && !self.surface_open {
            self.surface.open();
            self.surface_open = true;
        }
        self.refresh_surface();
        result
    }

    /// Select the widget behind a tree node, as a click in the tree would.
    ///
    /// Choosing the node that is already selected does nothing.
    pub fn select_tree_node(&mut self, node: NodeId) -> Result<(), InspectError> {
        if self.shut_down {
            return Err(InspectError::ShutDown);
        }
        let Some(target) = self.mirror.target(node).cloned() else {
            return Ok(());
        };
        if WidgetRef::same(Some(&target), self.selection.as_ref()) {
            return Ok(());
        }
        self.select(Some(target))
    }

    /// Show the children of a tree node.
    pub fn expand_tree_node(&mut self, node: NodeId) -> bool {
        let expanded = self.mirror.expand(node);
        if expanded {
            self.refresh_surface();
        }
        expanded
    }

    /// Switch the highlight variant, moving the current highlight over.
    pub fn change_decorator(&mut self, kind: DecoratorKind) {
        let previous = self.decorator.kind();
        if self.shut_down || previous == kind {
            return;
        }
        if let Some(target) = self.selection.clone() {
            self.undecorate(&target);
            self.decorator = self.decorators.get(kind);
            self.decorate(&target);
        } else {
            self.decorator = self.decorators.get(kind);
        }

        spyglass_core::debug!(from = %previous, to = %kind, "decorator changed");
        let entry = DiagnosticEntry::new(DiagnosticEventKind::DecoratorChanged)
            .with_decorator(kind)
            .with_previous_decorator(previous);
        self.diagnostics.record(entry);
        self.decorator_listeners.emit(&kind);
        self.refresh_surface();
    }

    /// React to a pointer event delivered to `source`.
    ///
    /// The event position is relative to `source`. A matching press inspects
    /// the deepest widget under the pointer.
    pub fn handle_mouse(
        &mut self,
        event: &MouseEvent,
        source: &WidgetRef,
    ) -> Result<TriggerAction, InspectError> {
        let action = self
            .triggers
            .mouse
            .map_or(TriggerAction::Ignore, |t| t.classify(event));
        if action == TriggerAction::Inspect
            && let Some(target) = pick::deepest_at(source, event.position)
        {
            self.select(Some(target))?;
        }
        Ok(action)
    }

    /// React to a key event, with the pointer at `pointer` in screen
    /// coordinates.
    ///
    /// A matching press inspects the deepest widget under the pointer,
    /// searching the focused window first.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        pointer: Point,
        toolkit: &dyn Toolkit,
    ) -> Result<TriggerAction, InspectError> {
        let action = self
            .triggers
            .key
            .map_or(TriggerAction::Ignore, |t| t.classify(event));
        if action == TriggerAction::Inspect
            && let Some(target) = pick::locate(toolkit, pointer)
        {
            self.select(Some(target))?;
        }
        Ok(action)
    }

    pub fn on_selection_changed(&self, f: impl Fn(&Option<WidgetRef>) + 'static) -> ListenerId {
        self.selection_listeners.add(f)
    }

    pub fn on_decorator_changed(&self, f: impl Fn(&DecoratorKind) + 'static) -> ListenerId {
        self.decorator_listeners.add(f)
    }

    /// Remove a selection or decorator listener.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.selection_listeners.remove(id) || self.decorator_listeners.remove(id)
    }

    /// Remove the highlight, detach every listener, dispose the panels and
    /// close the surface. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Some(target) = self.selection.take() {
            self.undecorate(&target);
        }
        self.pane.clear();
        self.mirror.inspect(None);
        self.selection_listeners.clear();
        self.decorator_listeners.clear();
        if self.surface_open {
            self.surface.close();
            self.surface_open = false;
        }
        spyglass_core::debug!("inspector shut down");
        self.diagnostics
            .record(DiagnosticEntry::new(DiagnosticEventKind::Shutdown));
    }

    pub fn selection(&self) -> Option<&WidgetRef> {
        self.selection.as_ref()
    }

    pub fn decorator_kind(&self) -> DecoratorKind {
        self.decorator.kind()
    }

    pub fn decorator(&self) -> &Rc<dyn Decorator> {
        &self.decorator
    }

    pub fn decorators(&self) -> &DecoratorSet {
        &self.decorators
    }

    pub fn triggers(&self) -> TriggerConfig {
        self.triggers
    }

    pub fn mirror(&self) -> &TreeMirror {
        &self.mirror
    }

    pub fn pane(&self) -> &InspectorPane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut InspectorPane {
        &mut self.pane
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// The surface, if it is of type `S`.
    pub fn surface<S: InspectorSurface + 'static>(&self) -> Option<&S> {
        self.surface.as_any().downcast_ref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn decorate(&mut self, target: &WidgetRef) {
        if let Err(err) = self.decorator.decorate(target) {
            self.decoration_failed(target, "decorate", &err.to_string());
        }
    }

    fn undecorate(&mut self, target: &WidgetRef) {
        if let Err(err) = self.decorator.undecorate(target) {
            self.decoration_failed(target, "undecorate", &err.to_string());
        }
    }

    fn decoration_failed(&mut self, target: &WidgetRef, step: &str, error: &str) {
        spyglass_core::debug!(
            widget = %target.label(),
            step,
            error,
            "decoration failure ignored"
        );
        let entry = DiagnosticEntry::new(DiagnosticEventKind::DecorationFailed)
            .with_target(target.label(), target.type_key().qualified_name())
            .with_decorator(self.decorator.kind())
            .with_context(format!("{step}: {error}"));
        self.diagnostics.record(entry);
    }

    fn refresh_surface(&mut self) {
        if !self.surface_open {
            return;
        }
        let view = SurfaceView {
            selection: self.selection.as_ref(),
            decorator: self.decorator.kind(),
            pane: &self.pane,
            mirror: &self.mirror,
        };
        self.surface.refresh(view);
    }
}

impl Drop for Inspector {
    fn drop(&mut self) {
        self.shutdown();
    }
}
