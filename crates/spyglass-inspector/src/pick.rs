#![forbid(unsafe_code)]

//! Hit testing against the live widget tree.

use spyglass_core::geometry::{Point, Rect};
use spyglass_core::toolkit::Toolkit;
use spyglass_core::value::PropertyKey;
use spyglass_core::widget::WidgetRef;

fn is_visible(widget: &WidgetRef) -> bool {
    widget.flag(PropertyKey::Visible, true)
}

fn local_bounds(widget: &WidgetRef) -> Option<Rect> {
    let size = widget.size()?;
    Some(Rect::new(0, 0, size.width, size.height))
}

/// Deepest visible widget under `point`, given relative to `root`'s origin.
///
/// Children are tried in child order and the first hit wins. Returns `root`
/// itself when no child is hit, and `None` when `root` is hidden or the
/// point lies outside it.
pub fn deepest_at(root: &WidgetRef, point: Point) -> Option<WidgetRef> {
    if !is_visible(root) || !local_bounds(root).is_some_and(|b| b.contains(point)) {
        return None;
    }
    for child in root.children().unwrap_or_default() {
        let Some(origin) = child.location() else {
            continue;
        };
        if let Some(hit) = deepest_at(&child, point.relative_to(origin)) {
            return Some(hit);
        }
    }
    Some(root.clone())
}

/// Deepest widget under a screen position.
///
/// The focused window is searched first. The remaining windows are searched
/// in the order the toolkit reports them, which is not necessarily
/// front-to-back, so overlapping windows may resolve to the one behind.
pub fn locate(toolkit: &dyn Toolkit, screen: Point) -> Option<WidgetRef> {
    let focused = toolkit.focused_window();
    let others = toolkit
        .windows()
        .into_iter()
        .filter(|w| focused.as_ref().is_none_or(|f| !f.ptr_eq(w)));
    focused.clone().into_iter().chain(others).find_map(|window| {
        let origin = window.location().unwrap_or_default();
        deepest_at(&window, screen.relative_to(origin))
    })
}

/// Screen position of `widget`'s origin: the sum of its own location and
/// every ancestor's. Missing locations count as the origin.
pub fn location_on_screen(widget: &WidgetRef) -> Point {
    widget
        .ancestry()
        .map(|w| w.location().unwrap_or_default())
        .fold(Point::default(), Point::translate)
}
