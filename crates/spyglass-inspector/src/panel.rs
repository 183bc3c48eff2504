#![forbid(unsafe_code)]

//! Panels and the pane that owns the current panel stack.
//!
//! A [`Panel`] is built for one target by a
//! [`PanelConstructor`](crate::factory::PanelConstructor) and lives until the
//! selection changes. The [`InspectorPane`] is the only owner of a stack and
//! disposes every panel exactly once, before the stack is replaced or dropped.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use spyglass_core::dispatch::Dispatcher;
use spyglass_core::types::TypeHierarchy;
use spyglass_core::widget::WidgetRef;

use crate::error::BuildError;
use crate::factory::PanelRegistry;

/// One labelled value shown by a panel.
pub type PanelRow = (String, String);

/// A property-editing panel for one inspection target.
pub trait Panel {
    /// Heading shown above the panel.
    fn title(&self) -> String;

    /// Current label/value pairs, read from the live target.
    fn rows(&self) -> Vec<PanelRow>;

    /// Release listeners and any other hold on the target.
    ///
    /// Called exactly once, by the owning pane.
    fn dispose(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Services handed to panel constructors.
#[derive(Clone)]
pub struct PanelContext {
    /// Used by editable fields to defer focus-loss commits.
    pub dispatcher: Rc<dyn Dispatcher>,
    /// Type relation used for resolution and for the object panel's type chain.
    pub hierarchy: Rc<TypeHierarchy>,
    /// Show qualified type names instead of simple names.
    pub qualified_names: bool,
}

impl PanelContext {
    pub fn new(dispatcher: Rc<dyn Dispatcher>, hierarchy: Rc<TypeHierarchy>) -> Self {
        Self {
            dispatcher,
            hierarchy,
            qualified_names: false,
        }
    }

    #[must_use]
    pub fn with_qualified_names(mut self, qualified: bool) -> Self {
        self.qualified_names = qualified;
        self
    }
}

impl fmt::Debug for PanelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelContext")
            .field("qualified_names", &self.qualified_names)
            .finish_non_exhaustive()
    }
}

/// Owner of the current panel stack.
#[derive(Default)]
pub struct InspectorPane {
    target: Option<WidgetRef>,
    panels: Vec<Box<dyn Panel>>,
}

impl fmt::Debug for InspectorPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorPane")
            .field("target", &self.target)
            .field("panels", &self.titles())
            .finish()
    }
}

impl InspectorPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stack with panels for `target`.
    ///
    /// The previous stack is disposed first. On error the pane is left empty
    /// but still records `target`.
    pub fn inspect(
        &mut self,
        target: Option<&WidgetRef>,
        registry: &PanelRegistry,
        ctx: &PanelContext,
    ) -> Result<(), BuildError> {
        self.clear();
        self.target = target.cloned();
        if let Some(target) = target {
            self.panels = registry.build_panels(target, ctx)?;
        }
        Ok(())
    }

    /// Dispose and drop every panel.
    pub fn clear(&mut self) {
        for mut panel in self.panels.drain(..) {
            panel.dispose();
        }
    }

    /// Target the current stack was built for.
    pub fn target(&self) -> Option<&WidgetRef> {
        self.target.as_ref()
    }

    /// Panels in general-to-specific order.
    pub fn panels(&self) -> &[Box<dyn Panel>] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Titles in stack order.
    pub fn titles(&self) -> Vec<String> {
        self.panels.iter().map(|p| p.title()).collect()
    }

    /// First panel of concrete type `P`.
    pub fn panel<P: Panel + 'static>(&self) -> Option<&P> {
        self.panels.iter().find_map(|p| p.as_any().downcast_ref::<P>())
    }

    /// First panel of concrete type `P`, mutably.
    pub fn panel_mut<P: Panel + 'static>(&mut self) -> Option<&mut P> {
        self.panels
            .iter_mut()
            .find_map(|p| p.as_any_mut().downcast_mut::<P>())
    }
}

impl Drop for InspectorPane {
    fn drop(&mut self) {
        self.clear();
    }
}
