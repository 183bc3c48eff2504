#![forbid(unsafe_code)]

//! Type-driven panel resolution.
//!
//! Constructors are registered against a [`TypeKey`]. Resolving a target
//! walks its runtime type up to [`types::OBJECT`] and instantiates every
//! constructor registered for each type on the way, most general type first,
//! registration order within a type.
//!
//! ```text
//! target: demo.Button
//! walk:   Button -> Widget -> Container -> Component -> Object
//! output: [Object panels.., Component panels.., Container panels.., Widget panels.., Button panels..]
//! ```
//!
//! A constructor is only used if the [`CapabilityProbe`] agrees it can take
//! the target. A constructor that fails aborts the whole build.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use spyglass_core::types::{self, TypeHierarchy, TypeKey};
use spyglass_core::widget::WidgetRef;

use crate::error::{BuildError, ConstructError};
use crate::panel::{Panel, PanelContext};

/// Builds one panel for a target.
pub trait PanelConstructor {
    /// Name used in errors and logs.
    fn name(&self) -> &str;

    /// The type this constructor takes, or `None` if it cannot be invoked with
    /// a single target at all.
    fn accepts(&self) -> Option<TypeKey>;

    fn construct(
        &self,
        target: &WidgetRef,
        ctx: &PanelContext,
    ) -> Result<Box<dyn Panel>, ConstructError>;
}

type ConstructFn = dyn Fn(&WidgetRef, &PanelContext) -> Result<Box<dyn Panel>, ConstructError>;

/// A [`PanelConstructor`] backed by a closure.
pub struct FnConstructor {
    name: String,
    accepts: Option<TypeKey>,
    construct: Box<ConstructFn>,
}

impl FnConstructor {
    pub fn new(
        name: impl Into<String>,
        accepts: Option<TypeKey>,
        construct: impl Fn(&WidgetRef, &PanelContext) -> Result<Box<dyn Panel>, ConstructError>
        + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            accepts,
            construct: Box::new(construct),
        }
    }
}

impl fmt::Debug for FnConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConstructor")
            .field("name", &self.name)
            .field("accepts", &self.accepts)
            .finish_non_exhaustive()
    }
}

impl PanelConstructor for FnConstructor {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self) -> Option<TypeKey> {
        self.accepts
    }

    fn construct(
        &self,
        target: &WidgetRef,
        ctx: &PanelContext,
    ) -> Result<Box<dyn Panel>, ConstructError> {
        (self.construct)(target, ctx)
    }
}

/// Decides whether a constructor can take an instance of a type.
pub trait CapabilityProbe {
    fn accepts(
        &self,
        target: TypeKey,
        constructor: &dyn PanelConstructor,
        hierarchy: &TypeHierarchy,
    ) -> bool;
}

/// Accepts when the target type is the constructor's parameter type or a
/// subtype of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyProbe;

impl CapabilityProbe for HierarchyProbe {
    fn accepts(
        &self,
        target: TypeKey,
        constructor: &dyn PanelConstructor,
        hierarchy: &TypeHierarchy,
    ) -> bool {
        constructor
            .accepts()
            .is_some_and(|param| hierarchy.is_a(target, param))
    }
}

/// Type to constructor registry.
pub struct PanelRegistry {
    entries: HashMap<TypeKey, Vec<Rc<dyn PanelConstructor>>>,
    probe: Box<dyn CapabilityProbe>,
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PanelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self
            .entries
            .iter()
            .map(|(ty, ctors)| (*ty, ctors.len()))
            .collect();
        types.sort();
        f.debug_struct("PanelRegistry")
            .field("entries", &types)
            .finish_non_exhaustive()
    }
}

impl PanelRegistry {
    /// An empty registry using [`HierarchyProbe`].
    pub fn new() -> Self {
        Self::with_probe(HierarchyProbe)
    }

    /// An empty registry using a custom probe.
    pub fn with_probe(probe: impl CapabilityProbe + 'static) -> Self {
        Self {
            entries: HashMap::new(),
            probe: Box::new(probe),
        }
    }

    /// Append `constructor` to the list for `ty`.
    pub fn register(&mut self, ty: TypeKey, constructor: Rc<dyn PanelConstructor>) {
        self.entries.entry(ty).or_default().push(constructor);
    }

    /// Constructors registered for exactly `ty`, in registration order.
    pub fn constructors_for(&self, ty: TypeKey) -> &[Rc<dyn PanelConstructor>] {
        self.entries.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instantiate every applicable panel for `target`, general to specific.
    ///
    /// Constructors the probe rejects are skipped. If a constructor fails, the
    /// panels already built in this call are disposed and the error returned.
    pub fn build_panels(
        &self,
        target: &WidgetRef,
        ctx: &PanelContext,
    ) -> Result<Vec<Box<dyn Panel>>, BuildError> {
        let ty = target.type_key();
        let mut chain: Vec<TypeKey> = ctx.hierarchy.ancestors(ty).collect();
        chain.reverse();
        debug_assert_eq!(chain.first(), Some(&types::OBJECT));

        let mut panels: Vec<Box<dyn Panel>> = Vec::new();
        for step in chain {
            for constructor in self.constructors_for(step) {
                if !self.probe.accepts(ty, constructor.as_ref(), &ctx.hierarchy) {
                    spyglass_core::trace!(
                        panel = constructor.name(),
                        widget_type = %ty,
                        "constructor rejected by probe"
                    );
                    continue;
                }
                match constructor.construct(target, ctx) {
                    Ok(panel) => panels.push(panel),
                    Err(source) => {
                        for mut built in panels.drain(..) {
                            built.dispose();
                        }
                        spyglass_core::warn!(
                            panel = constructor.name(),
                            widget_type = %ty,
                            error = %source,
                            "panel construction failed"
                        );
                        return Err(BuildError::Construction {
                            panel: constructor.name().to_string(),
                            source,
                        });
                    }
                }
            }
        }
        Ok(panels)
    }
}
