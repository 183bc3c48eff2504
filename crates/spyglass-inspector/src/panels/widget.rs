#![forbid(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use spyglass_core::value::{Border, PropertyKey};
use spyglass_core::widget::WidgetRef;

use super::{BoundFields, Subscription};
use crate::bridge::{BoolCodec, BoundProperty, FieldCodec, FloatCodec, PropertyField, TextCodec};
use crate::error::ConstructError;
use crate::panel::{Panel, PanelContext, PanelRow};

/// One-line description of a border, nesting compound borders.
pub fn describe_border(border: &Border) -> String {
    match border {
        Border::Empty(i) => format!("EmptyBorder[{}, {}, {}, {}]", i.top, i.left, i.bottom, i.right),
        Border::Line { color, thickness } => format!("LineBorder[{color}, {thickness}]"),
        Border::Compound { outside, inside } => match inside {
            Some(inside) => format!(
                "CompoundBorder[{}, {}]",
                describe_border(outside),
                describe_border(inside)
            ),
            None => format!("CompoundBorder[{}, null]", describe_border(outside)),
        },
        Border::Custom { kind, .. } => kind.clone(),
    }
}

fn read_border(target: &WidgetRef) -> String {
    target
        .property(PropertyKey::Border)
        .and_then(|v| v.as_border().map(describe_border))
        .unwrap_or_else(|| "null".to_string())
}

/// Border, tooltip, buffering and alignment of a lightweight widget.
pub struct WidgetPanel {
    border: Rc<RefCell<String>>,
    fields: Rc<BoundFields>,
    subscription: Subscription,
}

impl WidgetPanel {
    pub fn construct(target: &WidgetRef, ctx: &PanelContext) -> Result<Self, ConstructError> {
        let d = &ctx.dispatcher;
        let mut fields = BoundFields::default();
        fields.bind(target, PropertyKey::ToolTip, TextCodec, true, d);
        fields.bind(target, PropertyKey::DoubleBuffered, BoolCodec, false, d);
        fields.bind(target, PropertyKey::AlignmentX, FloatCodec::unit(), false, d);
        fields.bind(target, PropertyKey::AlignmentY, FloatCodec::unit(), false, d);
        let fields = Rc::new(fields);
        let border = Rc::new(RefCell::new(read_border(target)));

        let subscription = {
            let fields = fields.clone();
            let border = border.clone();
            Subscription::watch(target, None, move |target, change| {
                if change.key == PropertyKey::Border {
                    *border.borrow_mut() = read_border(target);
                } else {
                    fields.pull(target, Some(change.key));
                }
            })
        };

        Ok(Self {
            border,
            fields,
            subscription,
        })
    }

    /// Current border description, `"null"` when the widget has none.
    pub fn border(&self) -> String {
        self.border.borrow().clone()
    }

    pub fn field(&self, key: PropertyKey) -> Option<&dyn BoundProperty> {
        self.fields.get(key)
    }

    pub fn typed_field<C: FieldCodec + 'static>(
        &self,
        key: PropertyKey,
    ) -> Option<&PropertyField<C>> {
        self.fields.typed(key)
    }
}

impl Panel for WidgetPanel {
    fn title(&self) -> String {
        "Widget".to_string()
    }

    fn rows(&self) -> Vec<PanelRow> {
        let mut rows = Vec::with_capacity(self.fields.len() + 1);
        rows.push(("border".to_string(), self.border()));
        rows.extend(self.fields.rows());
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
    use crate::bridge::ParseErrorKind;
    use spyglass_core::color::Color;
    use spyglass_core::dispatch::LocalDispatcher;
    use spyglass_core::geometry::Insets;
    use spyglass_core::value::PropertyValue;
    use spyglass_harness::{fixtures, sample_app};

    fn ctx() -> PanelContext {
        PanelContext::new(Rc::new(LocalDispatcher::new()), Rc::new(fixtures::hierarchy()))
    }

    #[test]
    fn border_descriptions() {
        let line = Border::Line {
            color: Color::BLUE,
            thickness: 2,
        };
        assert_eq!(
            describe_border(&Border::compound(line, Some(Border::Empty(Insets::all(1))))),
            "CompoundBorder[LineBorder[#0000ff, 2], EmptyBorder[1, 1, 1, 1]]"
        );
    }

    #[test]
    fn border_row_follows_changes() {
        let app = sample_app();
        let panel = WidgetPanel::construct(&app.content.widget_ref(), &ctx()).unwrap();
        assert_eq!(panel.border(), "EmptyBorder[0, 0, 0, 0]");
        app.content
            .widget_ref()
            .set_property(PropertyKey::Border, None)
            .unwrap();
        assert_eq!(panel.border(), "null");
    }

    #[test]
    fn tooltip_and_alignment_are_editable() {
        let app = sample_app();
        let panel = WidgetPanel::construct(&app.button.widget_ref(), &ctx()).unwrap();
        assert_eq!(
            panel.field(PropertyKey::ToolTip).map(|f| f.text()).as_deref(),
            Some("Confirm")
        );
        let align = panel
            .typed_field::<FloatCodec>(PropertyKey::AlignmentX)
            .unwrap();
        align.field().type_text("0.25");
        assert_eq!(align.field().commit(), Ok(true));
        assert_eq!(
            app.button.get(PropertyKey::AlignmentX),
            Some(PropertyValue::Float(0.25))
        );
        align.field().type_text("2");
        assert_eq!(
            align.field().commit().unwrap_err().kind,
            ParseErrorKind::OutOfRange
        );
        assert_eq!(align.field().text(), "0.25");
    }
}
