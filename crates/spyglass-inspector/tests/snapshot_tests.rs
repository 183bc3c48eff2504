#![forbid(unsafe_code)]

//! Text snapshots of the tree mirror.
//!
//! Update with `BLESS=1 cargo test -p spyglass-inspector --test snapshot_tests`.

use std::rc::Rc;

use spyglass_core::dispatch::LocalDispatcher;
use spyglass_harness::{assert_snapshot, fixtures, sample_app};
use spyglass_inspector::{HeadlessSurface, Inspector, TreeGuides};

#[test]
fn mirror_list_selected() {
    let app = sample_app();
    let mut insp = Inspector::new(Rc::new(LocalDispatcher::new()), fixtures::hierarchy());
    insp.select(Some(app.list.widget_ref())).unwrap();
    let lines = insp.mirror().render_lines(TreeGuides::Unicode);
    assert_snapshot!("mirror_list_selected", &lines.join("\n"));
}

#[test]
fn mirror_button_selected_ascii() {
    let app = sample_app();
    let mut insp = Inspector::new(Rc::new(LocalDispatcher::new()), fixtures::hierarchy());
    insp.select(Some(app.button.widget_ref())).unwrap();
    let surface = insp.surface::<HeadlessSurface>().unwrap();
    assert_snapshot!("mirror_button_selected_ascii", &surface.tree().join("\n"));
}
