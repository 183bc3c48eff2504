#![forbid(unsafe_code)]

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spyglass_core::geometry::Insets;
use spyglass_core::value::PropertyKey;
use spyglass_core::widget::WidgetRef;

use super::{Subscription, show};
use crate::error::ConstructError;
use crate::panel::{Panel, PanelContext, PanelRow};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Summary {
    layout: Option<String>,
    children: usize,
    insets: Option<Insets>,
}

impl Summary {
    fn read(target: &WidgetRef) -> Self {
        Self {
            layout: target
                .property(PropertyKey::Layout)
                .and_then(|v| v.as_text().map(str::to_string)),
            children: target.children().map_or(0, |c| c.len()),
            insets: target
                .property(PropertyKey::Insets)
                .and_then(|v| v.as_insets()),
        }
    }
}

/// Layout, child count and insets. Read-only.
pub struct ContainerPanel {
    summary: Rc<RefCell<Summary>>,
    refreshes: Rc<Cell<usize>>,
    subscription: Subscription,
}

impl ContainerPanel {
    pub fn construct(target: &WidgetRef, _ctx: &PanelContext) -> Result<Self, ConstructError> {
        let summary = Rc::new(RefCell::new(Summary::read(target)));
        let refreshes = Rc::new(Cell::new(0));
        let subscription = {
            let summary = summary.clone();
            let refreshes = refreshes.clone();
            Subscription::watch(target, None, move |target, _| {
                *summary.borrow_mut() = Summary::read(target);
                refreshes.set(refreshes.get() + 1);
            })
        };
        Ok(Self {
            summary,
            refreshes,
            subscription,
        })
    }

    pub fn child_count(&self) -> usize {
        self.summary.borrow().children
    }

    pub fn layout(&self) -> Option<String> {
        self.summary.borrow().layout.clone()
    }

    /// Times the summary was re-read after a change.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.get()
    }
}

impl Panel for ContainerPanel {
    fn title(&self) -> String {
        "Container".to_string()
    }

    fn rows(&self) -> Vec<PanelRow> {
        let summary = self.summary.borrow();
        vec![
            ("layout".to_string(), show(summary.layout.as_deref())),
            ("children".to_string(), summary.children.to_string()),
            (
                "insets".to_string(),
                show(
                    summary
                        .insets
                        .map(|i| format!("{}, {}, {}, {}", i.top, i.left, i.bottom, i.right)),
                ),
            ),
        ]
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
    use spyglass_core::types;
    use spyglass_core::value::PropertyValue;
    use spyglass_harness::{MockWidget, fixtures, sample_app};

    fn ctx() -> PanelContext {
        PanelContext::new(Rc::new(LocalDispatcher::new()), Rc::new(fixtures::hierarchy()))
    }

    #[test]
    fn tracks_children() {
        let app = sample_app();
        let panel = ContainerPanel::construct(&app.content.widget_ref(), &ctx()).unwrap();
        assert_eq!(panel.child_count(), 3);
        app.content.add_child(MockWidget::leaf(types::COMPONENT));
        assert_eq!(panel.child_count(), 4);
        app.content.remove_child(&app.button);
        assert_eq!(panel.child_count(), 3);
        assert_eq!(panel.refresh_count(), 2);
    }

    #[test]
    fn rows_show_missing_values_as_null() {
        let app = sample_app();
        let panel = ContainerPanel::construct(&app.list.widget_ref(), &ctx()).unwrap();
        assert_eq!(
            panel.rows(),
            [
                ("layout".to_string(), "null".to_string()),
                ("children".to_string(), "0".to_string()),
                ("insets".to_string(), "null".to_string()),
            ]
        );
    }

    #[test]
    fn layout_change_refreshes() {
        let app = sample_app();
        let panel = ContainerPanel::construct(&app.content.widget_ref(), &ctx()).unwrap();
        app.content
            .widget_ref()
            .set_property(
                PropertyKey::Layout,
                Some(PropertyValue::Text("FlowLayout".into())),
            )
            .unwrap();
        assert_eq!(panel.layout().as_deref(), Some("FlowLayout"));
    }

    #[test]
    fn dispose_stops_refreshing() {
        let app = sample_app();
        let mut panel = ContainerPanel::construct(&app.content.widget_ref(), &ctx()).unwrap();
        panel.dispose();
        app.content.remove_child(&app.label);
        assert_eq!(panel.child_count(), 3);
        assert_eq!(panel.refresh_count(), 0);
    }
}
