use std::rc::Rc;

use spyglass_core::toolkit::Toolkit;
use spyglass_core::value::{PropertyKey, PropertyValue};
use spyglass_core::widget::Widget;
use spyglass_harness::{MockWidget, sample_app};

#[test]
fn toolkit_reports_windows_and_focus() {
    let app = sample_app();
    assert_eq!(app.toolkit.windows(), vec![app.window.widget_ref()]);
    assert_eq!(app.toolkit.focused_window(), None);

    app.toolkit.focus(Some(app.window.clone()));
    assert_eq!(app.toolkit.focused_window(), Some(app.window.widget_ref()));
}

#[test]
fn removing_a_listener_stops_notifications() {
    let app = sample_app();
    let count = Rc::new(std::cell::Cell::new(0));
    let c = count.clone();
    let id = app
        .button
        .add_property_listener(None, Rc::new(move |_| c.set(c.get() + 1)));
    assert_eq!(app.button.listener_count(), 1);

    app.button
        .set_property(PropertyKey::Opaque, Some(PropertyValue::Bool(true)))
        .unwrap();
    assert!(app.button.remove_property_listener(id));
    app.button
        .set_property(PropertyKey::Opaque, Some(PropertyValue::Bool(false)))
        .unwrap();

    assert_eq!(count.get(), 1);
    assert_eq!(app.button.listener_count(), 0);
}

#[test]
fn child_changes_notify_the_container() {
    let app = sample_app();
    let fired = Rc::new(std::cell::Cell::new(false));
    let f = fired.clone();
    app.content.add_property_listener(
        Some(PropertyKey::Children),
        Rc::new(move |_| f.set(true)),
    );
    let extra = MockWidget::leaf(spyglass_core::types::COMPONENT).named("extra");
    app.content.add_child(extra.clone());
    assert!(fired.get());
    assert!(app.content.remove_child(&extra));
    assert_eq!(extra.parent(), None);
}
