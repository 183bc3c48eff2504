#![forbid(unsafe_code)]

//! Built-in property panels.
//!
//! | Panel | Registered on | Shows |
//! |-------|---------------|-------|
//! | [`ObjectPanel`] | `core.Object` | type name, ancestor types |
//! | [`ComponentPanel`] | `core.Component` | geometry, font, colors, state flags |
//! | [`ContainerPanel`] | `core.Container` | layout, child count, insets |
//! | [`WidgetPanel`] | `core.Widget` | border, tooltip, alignment |
//!
//! Editable values are [`PropertyField`]s, so an edit is written straight to
//! the live widget and a change made elsewhere flows back into the panel.

mod component;
mod container;
mod object;
mod widget;

pub use component::ComponentPanel;
pub use container::ContainerPanel;
pub use object::ObjectPanel;
pub use widget::WidgetPanel;

use std::rc::Rc;

use spyglass_core::dispatch::Dispatcher;
use spyglass_core::listeners::ListenerId;
use spyglass_core::value::{PropertyChange, PropertyKey};
use spyglass_core::widget::{WeakWidgetRef, WidgetRef};

use crate::bridge::{BoundProperty, FieldCodec, PropertyField};
use crate::panel::PanelRow;

/// The editable fields of one panel.
#[derive(Default)]
pub(crate) struct BoundFields {
    fields: Vec<Box<dyn BoundProperty>>,
}

impl BoundFields {
    pub(crate) fn bind<C: FieldCodec + 'static>(
        &mut self,
        target: &WidgetRef,
        key: PropertyKey,
        codec: C,
        nullable: bool,
        dispatcher: &Rc<dyn Dispatcher>,
    ) {
        self.fields.push(Box::new(PropertyField::bind(
            target,
            key,
            codec,
            nullable,
            dispatcher.clone(),
        )));
    }

    pub(crate) fn get(&self, key: PropertyKey) -> Option<&dyn BoundProperty> {
        self.fields
            .iter()
            .find(|f| f.key() == key)
            .map(|f| f.as_ref())
    }

    pub(crate) fn typed<C: FieldCodec + 'static>(
        &self,
        key: PropertyKey,
    ) -> Option<&PropertyField<C>> {
        self.get(key)?.as_any().downcast_ref()
    }

    /// Reload fields bound to `key`, or every field when `key` is `None`.
    pub(crate) fn pull(&self, target: &WidgetRef, key: Option<PropertyKey>) {
        for field in &self.fields {
            if key.is_none_or(|k| k == field.key()) {
                field.pull(target);
            }
        }
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = PanelRow> + '_ {
        self.fields
            .iter()
            .map(|f| (f.key().as_str().to_string(), f.text()))
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }
}

/// A property listener installed on a target, removed on [`cancel`].
///
/// [`cancel`]: Subscription::cancel
pub(crate) struct Subscription {
    target: WeakWidgetRef,
    id: Option<ListenerId>,
}

impl Subscription {
    /// Call `f` with the live target after each change to `key` (or to any
    /// property when `key` is `None`).
    pub(crate) fn watch(
        target: &WidgetRef,
        key: Option<PropertyKey>,
        f: impl Fn(&WidgetRef, &PropertyChange) + 'static,
    ) -> Self {
        let weak = target.downgrade();
        let id = target.add_property_listener(
            key,
            Rc::new(move |change: &PropertyChange| {
                if let Some(target) = weak.upgrade() {
                    f(&target, change);
                }
            }),
        );
        Self {
            target: target.downgrade(),
            id: Some(id),
        }
    }

    /// Remove the listener. Later calls do nothing.
    pub(crate) fn cancel(&mut self) {
        if let Some(id) = self.id.take()
            && let Some(target) = self.target.upgrade()
        {
            target.remove_property_listener(id);
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

/// Display text for an optional property value.
pub(crate) fn show(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "null".to_string())
}
