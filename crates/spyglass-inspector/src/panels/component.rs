#![forbid(unsafe_code)]

use std::any::Any;
use std::rc::Rc;

use spyglass_core::value::PropertyKey;
use spyglass_core::widget::{WeakWidgetRef, WidgetRef};

use super::{BoundFields, Subscription, show};
use crate::bridge::{
    BoolCodec, BoundProperty, ColorCodec, FieldCodec, FontCodec, PointCodec, PropertyField,
    SizeCodec, TextCodec,
};
use crate::error::ConstructError;
use crate::panel::{Panel, PanelContext, PanelRow};
use crate::pick;

/// Geometry, font, colors and state flags of any component.
///
/// Every field except the screen location and `showing` is editable and
/// written back to the target. Any property change on the target reloads
/// the matching field.
pub struct ComponentPanel {
    target: WeakWidgetRef,
    fields: Rc<BoundFields>,
    subscription: Subscription,
}

impl ComponentPanel {
    pub fn construct(target: &WidgetRef, ctx: &PanelContext) -> Result<Self, ConstructError> {
        let d = &ctx.dispatcher;
        let mut fields = BoundFields::default();
        fields.bind(target, PropertyKey::Name, TextCodec, true, d);
        fields.bind(target, PropertyKey::Location, PointCodec, false, d);
        fields.bind(target, PropertyKey::Size, SizeCodec, false, d);
        fields.bind(target, PropertyKey::MinimumSize, SizeCodec, true, d);
        fields.bind(target, PropertyKey::MaximumSize, SizeCodec, true, d);
        fields.bind(target, PropertyKey::PreferredSize, SizeCodec, true, d);
        fields.bind(target, PropertyKey::Font, FontCodec, false, d);
        fields.bind(target, PropertyKey::Foreground, ColorCodec, true, d);
        fields.bind(target, PropertyKey::Background, ColorCodec, true, d);
        for flag in [
            PropertyKey::Enabled,
            PropertyKey::Visible,
            PropertyKey::Focusable,
            PropertyKey::Opaque,
        ] {
            fields.bind(target, flag, BoolCodec, false, d);
        }
        let fields = Rc::new(fields);

        let watched = fields.clone();
        let subscription = Subscription::watch(target, None, move |target, change| {
            watched.pull(target, Some(change.key));
        });

        Ok(Self {
            target: target.downgrade(),
            fields,
            subscription,
        })
    }

    /// Field bound to `key`.
    pub fn field(&self, key: PropertyKey) -> Option<&dyn BoundProperty> {
        self.fields.get(key)
    }

    /// Field bound to `key`, with its concrete codec.
    pub fn typed_field<C: FieldCodec + 'static>(
        &self,
        key: PropertyKey,
    ) -> Option<&PropertyField<C>> {
        self.fields.typed(key)
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_active()
    }
}

impl Panel for ComponentPanel {
    fn title(&self) -> String {
        "Component".to_string()
    }

    fn rows(&self) -> Vec<PanelRow> {
        let mut rows: Vec<PanelRow> = self.fields.rows().collect();
        let target = self.target.upgrade();
        let screen = target.as_ref().map(pick::location_on_screen);
        rows.insert(
            2,
            (
                "location_on_screen".to_string(),
                show(screen.map(|p| format!("{}, {}", p.x, p.y))),
            ),
        );
        let showing = target
            .as_ref()
            .and_then(|t| t.property(PropertyKey::Showing));
        rows.push(("showing".to_string(), show(showing)));
        rows
    }

    fn dispose(&mut self) {
        self.subscription.cancel();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyglass_core::dispatch::LocalDispatcher;
    use spyglass_core::geometry::{Point, Size};
    use spyglass_core::value::PropertyValue;
    use spyglass_harness::{fixtures, sample_app};

    fn ctx() -> PanelContext {
        PanelContext::new(Rc::new(LocalDispatcher::new()), Rc::new(fixtures::hierarchy()))
    }

    #[test]
    fn fields_load_from_target() {
        let app = sample_app();
        let panel = ComponentPanel::construct(&app.button.widget_ref(), &ctx()).unwrap();
        let text = |key| panel.field(key).map(|f| f.text());
        assert_eq!(text(PropertyKey::Name).as_deref(), Some("ok"));
        assert_eq!(text(PropertyKey::Location).as_deref(), Some("10, 10"));
        assert_eq!(text(PropertyKey::MinimumSize).as_deref(), Some(", "));
        assert_eq!(text(PropertyKey::Font).as_deref(), Some("Dialog, plain, 12"));
        assert_eq!(app.button.write_count(), 0);
    }

    #[test]
    fn rows_include_read_only_values() {
        let app = sample_app();
        let panel = ComponentPanel::construct(&app.button.widget_ref(), &ctx()).unwrap();
        let rows = panel.rows();
        assert_eq!(rows[2], ("location_on_screen".to_string(), "110, 110".to_string()));
        assert_eq!(rows.last().unwrap(), &("showing".to_string(), "null".to_string()));
        assert_eq!(rows.len(), 15);
    }

    #[test]
    fn edit_reaches_widget() {
        let app = sample_app();
        let panel = ComponentPanel::construct(&app.button.widget_ref(), &ctx()).unwrap();
        let size = panel.typed_field::<SizeCodec>(PropertyKey::Size).unwrap();
        size.field().set_part(1, "25");
        assert_eq!(size.field().commit(), Ok(true));
        assert_eq!(
            app.button.get(PropertyKey::Size),
            Some(PropertyValue::Size(Size::new(80, 25)))
        );
    }

    #[test]
    fn external_change_reloads_field() {
        let app = sample_app();
        let panel = ComponentPanel::construct(&app.button.widget_ref(), &ctx()).unwrap();
        let writes = app.button.write_count();
        app.button
            .widget_ref()
            .set_property(
                PropertyKey::Location,
                Some(PropertyValue::Point(Point::new(1, 2))),
            )
            .unwrap();
        assert_eq!(
            panel.field(PropertyKey::Location).map(|f| f.text()),
            Some("1, 2".to_string())
        );
        assert_eq!(app.button.write_count(), writes + 1);
    }

    #[test]
    fn dispose_detaches_listener() {
        let app = sample_app();
        let before = app.button.listener_count();
        let mut panel = ComponentPanel::construct(&app.button.widget_ref(), &ctx()).unwrap();
        assert_eq!(app.button.listener_count(), before + 1);
        panel.dispose();
        assert!(!panel.is_listening());
        assert_eq!(app.button.listener_count(), before);
    }
}
