#![forbid(unsafe_code)]

//! Reversible highlighting of the selected widget.
//!
//! A decorator overrides one or more visual properties of a target. For each
//! property it saves the baseline value, writes the highlight, and installs a
//! property listener. When anyone else writes the property while the
//! decoration is active, the listener takes the written value as the new
//! baseline and puts the highlight back on top of it. Undecorating removes the
//! listeners and restores the latest baseline.
//!
//! Widgets may refuse some writes (a scroll viewport refuses borders). Those
//! failures are returned to the caller, which logs and discards them; a
//! property that could not be overridden is simply left alone.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use spyglass_core::color::Color;
use spyglass_core::listeners::ListenerId;
use spyglass_core::value::{Border, PropertyChange, PropertyError, PropertyKey, PropertyValue};
use spyglass_core::widget::{WidgetId, WidgetRef};

/// Which decorator variant is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecoratorKind {
    /// No highlight.
    None,
    /// Line border drawn around the existing border.
    #[default]
    Border,
    /// Opaque background fill.
    Background,
}

impl DecoratorKind {
    pub const ALL: [DecoratorKind; 3] = [Self::None, Self::Border, Self::Background];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Border => "border",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for DecoratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Border => "Border",
            Self::Background => "Background",
        })
    }
}

impl FromStr for DecoratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "border" => Ok(Self::Border),
            "background" | "bg" => Ok(Self::Background),
            other => Err(format!("unknown decorator `{other}`")),
        }
    }
}

/// Temporarily overrides visual properties of a widget.
pub trait Decorator {
    fn kind(&self) -> DecoratorKind;

    /// Apply the highlight and start watching for foreign writes.
    ///
    /// Returns the first write the widget refused. Properties that were
    /// written successfully stay decorated.
    fn decorate(&self, target: &WidgetRef) -> Result<(), PropertyError>;

    /// Stop watching and restore every saved baseline.
    fn undecorate(&self, target: &WidgetRef) -> Result<(), PropertyError>;

    /// Whether `target` currently carries this decoration.
    fn is_decorating(&self, target: &WidgetRef) -> bool;
}

/// Leaves widgets untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDecorator;

impl Decorator for NullDecorator {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::None
    }

    fn decorate(&self, _target: &WidgetRef) -> Result<(), PropertyError> {
        Ok(())
    }

    fn undecorate(&self, _target: &WidgetRef) -> Result<(), PropertyError> {
        Ok(())
    }

    fn is_decorating(&self, _target: &WidgetRef) -> bool {
        false
    }
}

type Highlight = Rc<dyn Fn(Option<&PropertyValue>) -> PropertyValue>;

/// Saved state for one overridden property.
struct Override {
    key: PropertyKey,
    baseline: Rc<RefCell<Option<PropertyValue>>>,
    listener: ListenerId,
}

/// Shared machinery: per-target saved baselines and listener ids.
struct OverrideEngine {
    properties: Vec<(PropertyKey, Highlight)>,
    active: RefCell<HashMap<WidgetId, Vec<Override>>>,
}

impl OverrideEngine {
    fn new(properties: Vec<(PropertyKey, Highlight)>) -> Self {
        Self {
            properties,
            active: RefCell::new(HashMap::new()),
        }
    }

    fn decorate(&self, target: &WidgetRef) -> Result<(), PropertyError> {
        if self.active.borrow().contains_key(&target.id()) {
            return Ok(());
        }
        let mut saved = Vec::new();
        let mut first_error = None;
        for (key, highlight) in &self.properties {
            match Self::apply(target, *key, highlight.clone()) {
                Ok(entry) => saved.push(entry),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        if !saved.is_empty() {
            self.active.borrow_mut().insert(target.id(), saved);
        }
        first_error.map_or(Ok(()), Err)
    }

    fn apply(
        target: &WidgetRef,
        key: PropertyKey,
        highlight: Highlight,
    ) -> Result<Override, PropertyError> {
        let baseline = target.property(key);
        target.set_property(key, Some(highlight(baseline.as_ref())))?;

        let baseline = Rc::new(RefCell::new(baseline));
        let applying = Rc::new(Cell::new(false));
        let weak = target.downgrade();
        let hook_baseline = baseline.clone();
        let listener = target.add_property_listener(
            Some(key),
            Rc::new(move |change: &PropertyChange| {
                if applying.get() {
                    return;
                }
                let Some(widget) = weak.upgrade() else {
                    return;
                };
                *hook_baseline.borrow_mut() = change.new.clone();
                let value = highlight(change.new.as_ref());
                applying.set(true);
                let result = widget.set_property(key, Some(value));
                applying.set(false);
                if let Err(_err) = result {
                    spyglass_core::debug!(
                        property = %key,
                        error = %_err,
                        "could not re-apply decoration"
                    );
                }
            }),
        );
        Ok(Override {
            key,
            baseline,
            listener,
        })
    }

    fn undecorate(&self, target: &WidgetRef) -> Result<(), PropertyError> {
        let Some(saved) = self.active.borrow_mut().remove(&target.id()) else {
            return Ok(());
        };
        let mut first_error = None;
        for entry in saved {
            target.remove_property_listener(entry.listener);
            let baseline = entry.baseline.borrow().clone();
            if let Err(err) = target.set_property(entry.key, baseline) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn is_decorating(&self, target: &WidgetRef) -> bool {
        self.active.borrow().contains_key(&target.id())
    }

    fn baseline(&self, target: &WidgetRef, key: PropertyKey) -> Option<Option<PropertyValue>> {
        self.active
            .borrow()
            .get(&target.id())?
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.baseline.borrow().clone())
    }
}

/// Draws a line border outside the widget's own border.
pub struct BorderDecorator {
    color: Color,
    thickness: u16,
    engine: OverrideEngine,
}

impl BorderDecorator {
    pub fn new(color: Color, thickness: u16) -> Self {
        let highlight: Highlight = Rc::new(move |baseline: Option<&PropertyValue>| {
            let inside = baseline.and_then(PropertyValue::as_border).cloned();
            PropertyValue::Border(Border::compound(Border::Line { color, thickness }, inside))
        });
        Self {
            color,
            thickness,
            engine: OverrideEngine::new(vec![(PropertyKey::Border, highlight)]),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn thickness(&self) -> u16 {
        self.thickness
    }

    /// The border the widget would have without the decoration.
    pub fn saved_border(&self, target: &WidgetRef) -> Option<Option<PropertyValue>> {
        self.engine.baseline(target, PropertyKey::Border)
    }
}

impl fmt::Debug for BorderDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BorderDecorator")
            .field("color", &self.color)
            .field("thickness", &self.thickness)
            .finish_non_exhaustive()
    }
}

impl Decorator for BorderDecorator {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::Border
    }

    fn decorate(&self, target: &WidgetRef) -> Result<(), PropertyError> {
        self.engine.decorate(target)
    }

    fn undecorate(&self, target: &WidgetRef) -> Result<(), PropertyError> {
        self.engine.undecorate(target)
    }

    fn is_decorating(&self, target: &WidgetRef) -> bool {
        self.engine.is_decorating(target)
    }
}

/// Fills the background with a solid color and forces the widget opaque.
pub struct BackgroundDecorator {
    color: Color,
    engine: OverrideEngine,
}

impl BackgroundDecorator {
    pub fn new(color: Color) -> Self {
        let fill: Highlight = Rc::new(move |_: Option<&PropertyValue>| PropertyValue::Color(color));
        let opaque: Highlight = Rc::new(|_: Option<&PropertyValue>| PropertyValue::Bool(true));
        Self {
            color,
            engine: OverrideEngine::new(vec![
                (PropertyKey::Background, fill),
                (PropertyKey::Opaque, opaque),
            ]),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Saved value of `Background` or `Opaque` while decorated.
    pub fn saved(&self, target: &WidgetRef, key: PropertyKey) -> Option<Option<PropertyValue>> {
        self.engine.baseline(target, key)
    }
}

impl fmt::Debug for BackgroundDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundDecorator")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Decorator for BackgroundDecorator {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::Background
    }

    fn decorate(&self, target: &WidgetRef) -> Result<(), PropertyError> {
        self.engine.decorate(target)
    }

    fn undecorate(&self, target: &WidgetRef) -> Result<(), PropertyError> {
        self.engine.undecorate(target)
    }

    fn is_decorating(&self, target: &WidgetRef) -> bool {
        self.engine.is_decorating(target)
    }
}

/// The selectable decorators, one per [`DecoratorKind`].
pub struct DecoratorSet {
    decorators: Vec<Rc<dyn Decorator>>,
}

impl DecoratorSet {
    /// `None`, a border of `border_color`/`thickness`, and a `background` fill.
    pub fn new(border_color: Color, thickness: u16, background: Color) -> Self {
        Self {
            decorators: vec![
                Rc::new(NullDecorator),
                Rc::new(BorderDecorator::new(border_color, thickness)),
                Rc::new(BackgroundDecorator::new(background)),
            ],
        }
    }

    /// Replace the decorator for its kind.
    pub fn replace(&mut self, decorator: Rc<dyn Decorator>) {
        let kind = decorator.kind();
        self.decorators.retain(|d| d.kind() != kind);
        self.decorators.push(decorator);
    }

    pub fn get(&self, kind: DecoratorKind) -> Rc<dyn Decorator> {
        self.decorators
            .iter()
            .find(|d| d.kind() == kind)
            .cloned()
            .unwrap_or_else(|| Rc::new(NullDecorator))
    }

    pub fn kinds(&self) -> Vec<DecoratorKind> {
        self.decorators.iter().map(|d| d.kind()).collect()
    }
}

impl Default for DecoratorSet {
    fn default() -> Self {
        Self::new(Color::BLUE, 2, Color::CYAN)
    }
}

impl fmt::Debug for DecoratorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorSet")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyglass_core::geometry::Insets;
    use spyglass_core::types;
    use spyglass_harness::MockWidget;
    use spyglass_core::Widget;

    fn line() -> Border {
        Border::Line {
            color: Color::BLUE,
            thickness: 2,
        }
    }

    #[test]
    fn border_wraps_existing_border_and_restores_it() {
        let original = Border::Empty(Insets::all(3));
        let w = MockWidget::container(types::WIDGET)
            .preset(PropertyKey::Border, PropertyValue::Border(original.clone()));
        let target = w.widget_ref();
        let deco = BorderDecorator::new(Color::BLUE, 2);

        deco.decorate(&target).unwrap();
        assert_eq!(
            w.get(PropertyKey::Border),
            Some(PropertyValue::Border(Border::compound(line(), Some(original.clone()))))
        );
        assert_eq!(w.listener_count(), 1);

        deco.undecorate(&target).unwrap();
        assert_eq!(w.get(PropertyKey::Border), Some(PropertyValue::Border(original)));
        assert_eq!(w.listener_count(), 0);
        assert!(!deco.is_decorating(&target));
    }

    #[test]
    fn border_on_borderless_widget_restores_none() {
        let w = MockWidget::container(types::WIDGET);
        let target = w.widget_ref();
        let deco = BorderDecorator::new(Color::BLUE, 2);
        deco.decorate(&target).unwrap();
        assert_eq!(
            w.get(PropertyKey::Border),
            Some(PropertyValue::Border(Border::compound(line(), None)))
        );
        deco.undecorate(&target).unwrap();
        assert_eq!(w.get(PropertyKey::Border), None);
    }

    #[test]
    fn foreign_write_becomes_new_baseline() {
        let w = MockWidget::container(types::WIDGET);
        let target = w.widget_ref();
        let deco = BorderDecorator::new(Color::BLUE, 2);
        deco.decorate(&target).unwrap();

        let replacement = Border::Empty(Insets::all(5));
        w.set_property(
            PropertyKey::Border,
            Some(PropertyValue::Border(replacement.clone())),
        )
        .unwrap();

        assert_eq!(
            w.get(PropertyKey::Border),
            Some(PropertyValue::Border(Border::compound(line(), Some(replacement.clone()))))
        );
        assert_eq!(
            deco.saved_border(&target),
            Some(Some(PropertyValue::Border(replacement.clone())))
        );

        deco.undecorate(&target).unwrap();
        assert_eq!(w.get(PropertyKey::Border), Some(PropertyValue::Border(replacement)));
    }

    #[test]
    fn refused_write_is_reported_and_leaves_no_hooks() {
        let w = MockWidget::container(types::WIDGET).reject(PropertyKey::Border);
        let target = w.widget_ref();
        let deco = BorderDecorator::new(Color::BLUE, 2);
        let err = deco.decorate(&target).unwrap_err();
        assert_eq!(err.key(), PropertyKey::Border);
        assert_eq!(w.listener_count(), 0);
        assert!(!deco.is_decorating(&target));
        assert!(deco.undecorate(&target).is_ok());
    }

    #[test]
    fn background_forces_opaque_and_restores_both() {
        let w = MockWidget::leaf(types::COMPONENT)
            .preset(PropertyKey::Background, PropertyValue::Color(Color::WHITE))
            .preset(PropertyKey::Opaque, PropertyValue::Bool(false));
        let target = w.widget_ref();
        let deco = BackgroundDecorator::new(Color::CYAN);

        deco.decorate(&target).unwrap();
        assert_eq!(w.get(PropertyKey::Background), Some(PropertyValue::Color(Color::CYAN)));
        assert_eq!(w.get(PropertyKey::Opaque), Some(PropertyValue::Bool(true)));
        assert_eq!(w.listener_count(), 2);

        w.set_property(PropertyKey::Opaque, Some(PropertyValue::Bool(false)))
            .unwrap();
        assert_eq!(w.get(PropertyKey::Opaque), Some(PropertyValue::Bool(true)));
        assert_eq!(
            deco.saved(&target, PropertyKey::Opaque),
            Some(Some(PropertyValue::Bool(false)))
        );

        deco.undecorate(&target).unwrap();
        assert_eq!(w.get(PropertyKey::Background), Some(PropertyValue::Color(Color::WHITE)));
        assert_eq!(w.get(PropertyKey::Opaque), Some(PropertyValue::Bool(false)));
        assert_eq!(w.listener_count(), 0);
    }

    #[test]
    fn partial_failure_keeps_what_succeeded() {
        let w = MockWidget::leaf(types::COMPONENT)
            .preset(PropertyKey::Background, PropertyValue::Color(Color::WHITE))
            .reject(PropertyKey::Opaque);
        let target = w.widget_ref();
        let deco = BackgroundDecorator::new(Color::CYAN);
        assert!(deco.decorate(&target).is_err());
        assert_eq!(w.get(PropertyKey::Background), Some(PropertyValue::Color(Color::CYAN)));
        assert_eq!(w.listener_count(), 1);
        deco.undecorate(&target).unwrap();
        assert_eq!(w.get(PropertyKey::Background), Some(PropertyValue::Color(Color::WHITE)));
        assert_eq!(w.listener_count(), 0);
    }

    #[test]
    fn decorating_twice_is_a_no_op() {
        let w = MockWidget::container(types::WIDGET);
        let target = w.widget_ref();
        let deco = BorderDecorator::new(Color::BLUE, 2);
        deco.decorate(&target).unwrap();
        deco.decorate(&target).unwrap();
        assert_eq!(w.listener_count(), 1);
        deco.undecorate(&target).unwrap();
        assert_eq!(w.get(PropertyKey::Border), None);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Border".parse::<DecoratorKind>(), Ok(DecoratorKind::Border));
        assert_eq!(" bg ".parse::<DecoratorKind>(), Ok(DecoratorKind::Background));
        assert_eq!("off".parse::<DecoratorKind>(), Ok(DecoratorKind::None));
        assert!("glow".parse::<DecoratorKind>().is_err());
    }

    #[test]
    fn set_lookup_by_kind() {
        let set = DecoratorSet::default();
        for kind in DecoratorKind::ALL {
            assert_eq!(set.get(kind).kind(), kind);
        }
    }
}
