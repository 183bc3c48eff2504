#![forbid(unsafe_code)]

//! Property-based invariant tests for the inspector.
//!
//! 1. Any sequence of selections and decorator switches leaves at most one
//!    widget decorated, and clearing the selection restores every widget.
//! 2. Model pushes into bridged fields never write back to the widget.
//! 3. Re-rooting the mirror never creates a node for a widget it already has.

use std::rc::Rc;

use proptest::prelude::*;
use spyglass_core::dispatch::LocalDispatcher;
use spyglass_core::geometry::Point;
use spyglass_core::value::{PropertyKey, PropertyValue};
use spyglass_harness::{MockWidget, SampleApp, fixtures, sample_app};
use spyglass_inspector::bridge::PointCodec;
use spyglass_inspector::panels::ComponentPanel;
use spyglass_inspector::{DecoratorKind, Inspector};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Select(usize),
    Clear,
    Switch(DecoratorKind),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..6).prop_map(Op::Select),
        1 => Just(Op::Clear),
        1 => prop::sample::select(DecoratorKind::ALL.to_vec()).prop_map(Op::Switch),
    ]
}

fn widgets(app: &SampleApp) -> [Rc<MockWidget>; 6] {
    [
        app.window.clone(),
        app.content.clone(),
        app.button.clone(),
        app.label.clone(),
        app.viewport.clone(),
        app.list.clone(),
    ]
}

const WATCHED: [PropertyKey; 3] = [
    PropertyKey::Border,
    PropertyKey::Background,
    PropertyKey::Opaque,
];

fn snapshot(widgets: &[Rc<MockWidget>]) -> Vec<Vec<Option<PropertyValue>>> {
    widgets
        .iter()
        .map(|w| WATCHED.iter().map(|k| w.get(*k)).collect())
        .collect()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn at_most_one_decoration_and_full_restore(ops in prop::collection::vec(op(), 1..40)) {
        let app = sample_app();
        let all = widgets(&app);
        let before = snapshot(&all);
        let mut insp = Inspector::new(Rc::new(LocalDispatcher::new()), fixtures::hierarchy());

        for op in ops {
            match op {
                Op::Select(i) => {
                    let _ = insp.select(Some(all[i].widget_ref()));
                }
                Op::Clear => {
                    let _ = insp.select(None);
                }
                Op::Switch(kind) => insp.change_decorator(kind),
            }
            let decorated = insp
                .decorators()
                .kinds()
                .into_iter()
                .map(|kind| {
                    let d = insp.decorators().get(kind);
                    all.iter()
                        .filter(|w| d.is_decorating(&w.widget_ref()))
                        .count()
                })
                .sum::<usize>();
            prop_assert!(decorated <= 1, "{decorated} widgets decorated");
        }

        if insp.selection().is_some() {
            let _ = insp.select(None);
        }
        prop_assert_eq!(snapshot(&all), before);
        for w in &all {
            prop_assert_eq!(w.listener_count(), 0);
        }
    }

    #[test]
    fn model_pushes_never_echo(points in prop::collection::vec((-500i32..500, -500i32..500), 1..20)) {
        let app = sample_app();
        let mut insp = Inspector::new(Rc::new(LocalDispatcher::new()), fixtures::hierarchy());
        insp.select(Some(app.button.widget_ref())).unwrap();
        let writes = app.button.write_count();

        for (i, (x, y)) in points.iter().enumerate() {
            app.button
                .widget_ref()
                .set_property(PropertyKey::Location, Some(PropertyValue::Point(Point::new(*x, *y))))
                .unwrap();
            prop_assert_eq!(app.button.write_count(), writes + i + 1);
        }

        let (x, y) = points[points.len() - 1];
        let panel = insp.pane().panel::<ComponentPanel>().unwrap();
        let field = panel.typed_field::<PointCodec>(PropertyKey::Location).unwrap();
        prop_assert_eq!(field.field().value(), Some(Point::new(x, y)));
        prop_assert_eq!(field.field().text(), format!("{x}, {y}"));
    }

    #[test]
    fn reroot_reuses_known_nodes(order in prop::collection::vec(0usize..6, 1..30)) {
        let app = sample_app();
        let all = widgets(&app);
        let mut insp = Inspector::new(Rc::new(LocalDispatcher::new()), fixtures::hierarchy());
        // Every sample widget lives under one window, so after the first
        // selection of the deepest node all six nodes exist.
        insp.select(Some(app.list.widget_ref())).unwrap();
        let created = insp.mirror().created();
        for i in order {
            if insp.selection().is_some_and(|s| s.ptr_eq(&all[i].widget_ref())) {
                continue;
            }
            insp.select(Some(all[i].widget_ref())).unwrap();
            prop_assert_eq!(insp.mirror().created(), created);
            prop_assert!(insp.mirror().node_for(&all[i].widget_ref()).is_some());
        }
    }
}
