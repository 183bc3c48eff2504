#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use spyglass_core::dispatch::Dispatcher;
use spyglass_core::value::PropertyKey;
use spyglass_core::widget::WidgetRef;

use super::{Field, FieldCodec};

/// A field whose commits are written to one property of a live widget.
///
/// The widget is held weakly: a field outliving its target commits nowhere.
/// A write the widget refuses puts the widget's current value back into the
/// field once the commit has finished.
pub struct PropertyField<C: FieldCodec> {
    key: PropertyKey,
    field: Rc<Field<C>>,
}

impl<C: FieldCodec + 'static> PropertyField<C> {
    /// Bind a new field to `key` on `target` and load its current value.
    pub fn bind(
        target: &WidgetRef,
        key: PropertyKey,
        codec: C,
        nullable: bool,
        dispatcher: Rc<dyn Dispatcher>,
    ) -> Self {
        let field = if nullable {
            Field::nullable(codec, dispatcher)
        } else {
            Field::new(codec, dispatcher)
        };

        let weak_target = target.downgrade();
        let weak_field = Rc::downgrade(&field);
        field.on_commit(move |_source, value| {
            let (Some(target), Some(field)) = (weak_target.upgrade(), weak_field.upgrade()) else {
                return;
            };
            let property = value.map(|v| field.codec().to_property(&v));
            if let Err(_err) = target.set_property(key, property) {
                spyglass_core::debug!(property = %key, error = %_err, "field write refused");
                let current = target
                    .property(key)
                    .and_then(|v| field.codec().from_property(&v));
                field.set_value_from_model(current);
            }
        });

        let bound = Self { key, field };
        bound.pull(target);
        bound
    }

    pub fn field(&self) -> &Rc<Field<C>> {
        &self.field
    }
}

impl<C: FieldCodec> fmt::Debug for PropertyField<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyField")
            .field("key", &self.key)
            .field("field", &self.field.id)
            .finish()
    }
}

/// Type-erased view of a [`PropertyField`], as held by panels.
pub trait BoundProperty {
    fn key(&self) -> PropertyKey;

    /// Reload the field from the widget without writing back.
    fn pull(&self, target: &WidgetRef);

    /// Current buffer text.
    fn text(&self) -> String;

    fn as_any(&self) -> &dyn Any;
}

impl<C: FieldCodec + 'static> BoundProperty for PropertyField<C> {
    fn key(&self) -> PropertyKey {
        self.key
    }

    fn pull(&self, target: &WidgetRef) {
        let value = target
            .property(self.key)
            .and_then(|v| self.field.codec().from_property(&v));
        self.field.set_value_from_model(value);
    }

    fn text(&self) -> String {
        self.field.text()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
