#![forbid(unsafe_code)]

//! A small sample application used across the test suites.
//!
//! ```text
//! main (Window, 100,100 400x300)
//! └── content (Panel, 0,0 400x300)
//!     ├── ok (Button, 10,10 80x20)
//!     ├── <unnamed> (Label, 10,40 80x20)
//!     └── viewport (Viewport, 10,70 200x200, rejects border writes)
//!         └── list (Panel, 0,0 200x400)
//! ```

use std::rc::Rc;

use spyglass_core::color::Color;
use spyglass_core::types::{self, TypeHierarchy, TypeKey};
use spyglass_core::value::{Border, Font, PropertyKey, PropertyValue};

use crate::mock::{MockToolkit, MockWidget};

pub const PANEL: TypeKey = TypeKey::new("demo.Panel");
pub const BUTTON: TypeKey = TypeKey::new("demo.Button");
pub const LABEL: TypeKey = TypeKey::new("demo.Label");
pub const VIEWPORT: TypeKey = TypeKey::new("demo.Viewport");

/// The built-in hierarchy plus the demo widget types, all under `WIDGET`.
pub fn hierarchy() -> TypeHierarchy {
    TypeHierarchy::with_builtin()
        .with(PANEL, types::WIDGET)
        .with(BUTTON, types::WIDGET)
        .with(LABEL, types::WIDGET)
        .with(VIEWPORT, types::WIDGET)
}

/// Handles to every widget in the sample tree.
pub struct SampleApp {
    pub toolkit: MockToolkit,
    pub window: Rc<MockWidget>,
    pub content: Rc<MockWidget>,
    pub button: Rc<MockWidget>,
    pub label: Rc<MockWidget>,
    pub viewport: Rc<MockWidget>,
    pub list: Rc<MockWidget>,
}

fn styled(widget: Rc<MockWidget>) -> Rc<MockWidget> {
    widget
        .preset(PropertyKey::Font, PropertyValue::Font(Font::new("Dialog", 12)))
        .preset(PropertyKey::Foreground, PropertyValue::Color(Color::BLACK))
        .preset(PropertyKey::Background, PropertyValue::Color(Color::rgb(238, 238, 238)))
        .preset(PropertyKey::Opaque, PropertyValue::Bool(false))
        .preset(PropertyKey::Enabled, PropertyValue::Bool(true))
        .preset(PropertyKey::Visible, PropertyValue::Bool(true))
}

/// Build the sample application and register its window with the toolkit.
pub fn sample_app() -> SampleApp {
    let window = styled(MockWidget::container(types::WINDOW))
        .named("main")
        .at(100, 100, 400, 300);
    let content = styled(MockWidget::container(PANEL))
        .named("content")
        .at(0, 0, 400, 300)
        .preset(PropertyKey::Border, PropertyValue::Border(Border::Empty(Default::default())));
    let button = styled(MockWidget::container(BUTTON))
        .named("ok")
        .at(10, 10, 80, 20)
        .preset(PropertyKey::ToolTip, PropertyValue::Text("Confirm".into()));
    let label = styled(MockWidget::container(LABEL)).at(10, 40, 80, 20);
    let viewport = styled(MockWidget::container(VIEWPORT))
        .named("viewport")
        .at(10, 70, 200, 200)
        .reject(PropertyKey::Border);
    let list = styled(MockWidget::container(PANEL))
        .named("list")
        .at(0, 0, 200, 400);

    viewport.add_child(list.clone());
    content.add_child(button.clone());
    content.add_child(label.clone());
    content.add_child(viewport.clone());
    window.add_child(content.clone());

    let toolkit = MockToolkit::new();
    toolkit.add_window(window.clone());

    SampleApp {
        toolkit,
        window,
        content,
        button,
        label,
        viewport,
        list,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyglass_core::widget::Widget;

    #[test]
    fn sample_tree_is_wired() {
        let app = sample_app();
        assert_eq!(app.list.parent(), Some(app.viewport.widget_ref()));
        let chain: Vec<_> = app.list.widget_ref().ancestry().map(|w| w.label()).collect();
        assert_eq!(chain, vec!["list", "viewport", "content", "main"]);
        assert_eq!(app.label.display_name(), None);
    }

    #[test]
    fn demo_types_are_widgets() {
        let h = hierarchy();
        assert!(h.is_a(BUTTON, types::COMPONENT));
        assert!(!h.is_a(types::WINDOW, types::WIDGET));
    }
}
