#![forbid(unsafe_code)]

use std::rc::Rc;

use spyglass::prelude::*;
use spyglass_harness::{fixtures, sample_app};

#[test]
fn prelude_is_enough_to_inspect() {
    let app = sample_app();
    let config = InspectorConfig::default().with_decorator(DecoratorKind::Background);
    let mut inspector = Inspector::with_config(
        Rc::new(LocalDispatcher::new()),
        fixtures::hierarchy(),
        config,
    );
    inspector.select(Some(app.label.widget_ref())).unwrap();
    assert_eq!(inspector.decorator_kind(), DecoratorKind::Background);
    assert_eq!(
        app.label.get(PropertyKey::Opaque),
        Some(PropertyValue::Bool(true))
    );
    inspector.shutdown();
    assert_eq!(
        app.label.get(PropertyKey::Opaque),
        Some(PropertyValue::Bool(false))
    );
    assert_eq!(inspector.select(None), Err(InspectError::ShutDown));
}
