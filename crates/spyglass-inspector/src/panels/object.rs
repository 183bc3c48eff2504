#![forbid(unsafe_code)]

use std::any::Any;
use std::cell::Cell;

use spyglass_core::types::TypeKey;
use spyglass_core::widget::{WidgetId, WidgetRef};

use crate::error::ConstructError;
use crate::panel::{Panel, PanelContext, PanelRow};

/// Runtime type and type ancestry of the target.
#[derive(Debug)]
pub struct ObjectPanel {
    identity: WidgetId,
    chain: Vec<TypeKey>,
    qualified: Cell<bool>,
    show_ancestors: Cell<bool>,
}

impl ObjectPanel {
    pub fn construct(target: &WidgetRef, ctx: &PanelContext) -> Result<Self, ConstructError> {
        Ok(Self {
            identity: target.id(),
            chain: ctx.hierarchy.ancestors(target.type_key()).collect(),
            qualified: Cell::new(ctx.qualified_names),
            show_ancestors: Cell::new(true),
        })
    }

    pub fn set_qualified_names(&self, qualified: bool) {
        self.qualified.set(qualified);
    }

    pub fn set_show_ancestors(&self, show: bool) {
        self.show_ancestors.set(show);
    }

    fn name(&self, ty: TypeKey) -> &'static str {
        if self.qualified.get() {
            ty.qualified_name()
        } else {
            ty.simple_name()
        }
    }

    /// Runtime type name.
    pub fn type_name(&self) -> &'static str {
        self.chain.first().map_or("", |ty| self.name(*ty))
    }

    /// Supertypes from the direct parent up to the root type.
    pub fn ancestors(&self) -> Vec<&'static str> {
        self.chain.iter().skip(1).map(|ty| self.name(*ty)).collect()
    }
}

impl Panel for ObjectPanel {
    fn title(&self) -> String {
        "Object".to_string()
    }

    fn rows(&self) -> Vec<PanelRow> {
        let mut rows = vec![
            ("type".to_string(), self.type_name().to_string()),
            ("identity".to_string(), self.identity.to_string()),
        ];
        if self.show_ancestors.get() {
            rows.push(("ancestors".to_string(), self.ancestors().join(" > ")));
        }
        rows
    }

    fn dispose(&mut self) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
