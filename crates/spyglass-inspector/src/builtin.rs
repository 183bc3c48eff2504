#![forbid(unsafe_code)]

//! Registration of the built-in panels.

use std::rc::Rc;

use spyglass_core::types::{self, TypeKey};
use spyglass_core::widget::WidgetRef;

use crate::error::ConstructError;
use crate::factory::{FnConstructor, PanelRegistry};
use crate::panel::{Panel, PanelContext};
use crate::panels::{ComponentPanel, ContainerPanel, ObjectPanel, WidgetPanel};

type Build<P> = fn(&WidgetRef, &PanelContext) -> Result<P, ConstructError>;

fn register<P: Panel + 'static>(
    registry: &mut PanelRegistry,
    ty: TypeKey,
    name: &str,
    build: Build<P>,
) {
    let ctor = FnConstructor::new(name, Some(ty), move |target, ctx| {
        build(target, ctx).map(|p| Box::new(p) as Box<dyn Panel>)
    });
    registry.register(ty, Rc::new(ctor));
}

/// Register the object, component, container and widget panels.
pub fn register_builtin_panels(registry: &mut PanelRegistry) {
    register(registry, types::OBJECT, "object", ObjectPanel::construct);
    register(registry, types::COMPONENT, "component", ComponentPanel::construct);
    register(registry, types::CONTAINER, "container", ContainerPanel::construct);
    register(registry, types::WIDGET, "widget", WidgetPanel::construct);
}

/// A registry holding only the built-in panels.
pub fn builtin_registry() -> PanelRegistry {
    let mut registry = PanelRegistry::new();
    register_builtin_panels(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::InspectorPane;
    use spyglass_core::dispatch::LocalDispatcher;
    use spyglass_harness::{MockWidget, fixtures, sample_app};

    fn ctx() -> PanelContext {
        PanelContext::new(Rc::new(LocalDispatcher::new()), Rc::new(fixtures::hierarchy()))
    }

    #[test]
    fn widget_gets_all_four_panels() {
        let app = sample_app();
        let mut pane = InspectorPane::new();
        pane.inspect(Some(&app.button.widget_ref()), &builtin_registry(), &ctx())
            .unwrap();
        assert_eq!(pane.titles(), ["Object", "Component", "Container", "Widget"]);
        assert!(pane.panel::<WidgetPanel>().is_some());
    }

    #[test]
    fn plain_component_gets_two() {
        let leaf = MockWidget::leaf(types::COMPONENT);
        let mut pane = InspectorPane::new();
        pane.inspect(Some(&leaf.widget_ref()), &builtin_registry(), &ctx())
            .unwrap();
        assert_eq!(pane.titles(), ["Object", "Component"]);
    }

    #[test]
    fn clearing_the_pane_removes_listeners() {
        let app = sample_app();
        let mut pane = InspectorPane::new();
        pane.inspect(Some(&app.viewport.widget_ref()), &builtin_registry(), &ctx())
            .unwrap();
        assert_eq!(app.viewport.listener_count(), 3);
        pane.clear();
        assert_eq!(app.viewport.listener_count(), 0);
    }
}
