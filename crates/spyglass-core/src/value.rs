#![forbid(unsafe_code)]

//! The property model shared by host widgets and the inspector.
//!
//! A widget exposes a set of [`PropertyKey`]s. Reading one yields an optional
//! [`PropertyValue`] (`None` means "unset", which toolkits distinguish from any
//! zero value). Writing may fail with a [`PropertyError`]; some widget types
//! reject writes to properties they otherwise report.

use std::fmt;

use bitflags::bitflags;

use crate::color::Color;
use crate::geometry::{Insets, Point, Size};
use crate::widget::WidgetId;

bitflags! {
    /// Font style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u8 {
        const BOLD      = 0b001;
        const ITALIC    = 0b010;
        const UNDERLINE = 0b100;
    }
}

/// A font description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: String,
    pub style: FontStyle,
    pub size: u16,
}

impl Font {
    /// Create a plain font.
    pub fn new(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            style: FontStyle::empty(),
            size,
        }
    }

    /// Same font with the given style flags.
    #[must_use]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Same font in a different family.
    #[must_use]
    pub fn derive_family(&self, family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            ..self.clone()
        }
    }

    /// Same font at a different size.
    #[must_use]
    pub fn derive_size(&self, size: u16) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    /// Same font with one style flag switched on or off.
    #[must_use]
    pub fn derive_flag(&self, flag: FontStyle, on: bool) -> Self {
        let mut style = self.style;
        style.set(flag, on);
        Self {
            style,
            ..self.clone()
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.size)?;
        if self.style.contains(FontStyle::BOLD) {
            f.write_str(" bold")?;
        }
        if self.style.contains(FontStyle::ITALIC) {
            f.write_str(" italic")?;
        }
        if self.style.contains(FontStyle::UNDERLINE) {
            f.write_str(" underline")?;
        }
        Ok(())
    }
}

/// A widget border.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Border {
    /// Transparent spacing.
    Empty(Insets),
    /// Solid line of the given color and thickness.
    Line { color: Color, thickness: u16 },
    /// One border drawn outside another.
    Compound {
        outside: Box<Border>,
        inside: Option<Box<Border>>,
    },
    /// A host-specific border the inspector only knows by name.
    Custom { kind: String, insets: Insets },
}

impl Border {
    /// Wrap `inside` (which may be absent) in `outside`.
    pub fn compound(outside: Border, inside: Option<Border>) -> Self {
        Self::Compound {
            outside: Box::new(outside),
            inside: inside.map(Box::new),
        }
    }

    /// Space the border occupies on each side.
    pub fn insets(&self) -> Insets {
        match self {
            Self::Empty(insets) | Self::Custom { insets, .. } => *insets,
            Self::Line { thickness, .. } => Insets::all(i32::from(*thickness)),
            Self::Compound { outside, inside } => {
                let inner = inside.as_ref().map(|b| b.insets()).unwrap_or_default();
                outside.insets().add(inner)
            }
        }
    }

    /// Short type name for display.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Empty(_) => "EmptyBorder",
            Self::Line { .. } => "LineBorder",
            Self::Compound { .. } => "CompoundBorder",
            Self::Custom { kind, .. } => kind,
        }
    }
}

/// Identifies one observable property of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Name,
    Location,
    Size,
    MinimumSize,
    MaximumSize,
    PreferredSize,
    Font,
    Foreground,
    Background,
    Opaque,
    Border,
    Enabled,
    Visible,
    Focusable,
    Focused,
    Showing,
    AlignmentX,
    AlignmentY,
    ToolTip,
    DoubleBuffered,
    Layout,
    Insets,
    /// Fired when the structural children of a container change.
    Children,
    /// Toolkit-specific property.
    Custom(&'static str),
}

impl PropertyKey {
    /// Stable string form for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Location => "location",
            Self::Size => "size",
            Self::MinimumSize => "minimum_size",
            Self::MaximumSize => "maximum_size",
            Self::PreferredSize => "preferred_size",
            Self::Font => "font",
            Self::Foreground => "foreground",
            Self::Background => "background",
            Self::Opaque => "opaque",
            Self::Border => "border",
            Self::Enabled => "enabled",
            Self::Visible => "visible",
            Self::Focusable => "focusable",
            Self::Focused => "focused",
            Self::Showing => "showing",
            Self::AlignmentX => "alignment_x",
            Self::AlignmentY => "alignment_y",
            Self::ToolTip => "tool_tip",
            Self::DoubleBuffered => "double_buffered",
            Self::Layout => "layout",
            Self::Insets => "insets",
            Self::Children => "children",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Point(Point),
    Size(Size),
    Insets(Insets),
    Color(Color),
    Font(Font),
    Border(Border),
}

impl PropertyValue {
    /// Name of the variant, used in type-mismatch errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Point(_) => "point",
            Self::Size(_) => "size",
            Self::Insets(_) => "insets",
            Self::Color(_) => "color",
            Self::Font(_) => "font",
            Self::Border(_) => "border",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            Self::Size(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_insets(&self) -> Option<Insets> {
        match self {
            Self::Insets(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match self {
            Self::Font(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_border(&self) -> Option<&Border> {
        match self {
            Self::Border(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Point(p) => write!(f, "({}, {})", p.x, p.y),
            Self::Size(s) => write!(f, "({}, {})", s.width, s.height),
            Self::Insets(i) => write!(f, "[{}, {}, {}, {}]", i.top, i.left, i.bottom, i.right),
            Self::Color(c) => write!(f, "{c}"),
            Self::Font(v) => write!(f, "{v}"),
            Self::Border(b) => f.write_str(b.kind_name()),
        }
    }
}

/// Notification delivered to property listeners after a write.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// Widget whose property changed.
    pub source: WidgetId,
    pub key: PropertyKey,
    pub old: Option<PropertyValue>,
    pub new: Option<PropertyValue>,
}

/// Failure reported by a widget when a property cannot be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The widget type has no such property.
    Unsupported { key: PropertyKey },
    /// The widget refused the write.
    Rejected { key: PropertyKey, reason: String },
    /// The value has the wrong shape for this property.
    TypeMismatch {
        key: PropertyKey,
        expected: &'static str,
        found: &'static str,
    },
}

impl PropertyError {
    /// The property the failed write targeted.
    pub fn key(&self) -> PropertyKey {
        match self {
            Self::Unsupported { key }
            | Self::Rejected { key, .. }
            | Self::TypeMismatch { key, .. } => *key,
        }
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { key } => write!(f, "property `{key}` is not supported"),
            Self::Rejected { key, reason } => write!(f, "write to `{key}` rejected: {reason}"),
            Self::TypeMismatch {
                key,
                expected,
                found,
            } => write!(f, "property `{key}` expects {expected}, got {found}"),
        }
    }
}

impl std::error::Error for PropertyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_border_insets_accumulate() {
        let border = Border::compound(
            Border::Line {
                color: Color::BLUE,
                thickness: 2,
            },
            Some(Border::Empty(Insets::new(1, 2, 3, 4))),
        );
        assert_eq!(border.insets(), Insets::new(3, 4, 5, 6));
        assert_eq!(border.kind_name(), "CompoundBorder");
    }

    #[test]
    fn compound_without_inside() {
        let border = Border::compound(
            Border::Line {
                color: Color::BLUE,
                thickness: 1,
            },
            None,
        );
        assert_eq!(border.insets(), Insets::all(1));
    }

    #[test]
    fn font_derivations_leave_original_untouched() {
        let base = Font::new("Dialog", 12);
        let bold = base.derive_flag(FontStyle::BOLD, true);
        assert!(bold.style.contains(FontStyle::BOLD));
        assert!(base.style.is_empty());
        assert_eq!(bold.derive_flag(FontStyle::BOLD, false), base);
        assert_eq!(base.derive_size(14).size, 14);
        assert_eq!(base.derive_family("Serif").family, "Serif");
    }

    #[test]
    fn font_display() {
        let f = Font::new("Mono", 10).with_style(FontStyle::BOLD | FontStyle::ITALIC);
        assert_eq!(f.to_string(), "Mono 10 bold italic");
    }

    #[test]
    fn value_accessors_match_variant_only() {
        let v = PropertyValue::Point(Point::new(1, 2));
        assert_eq!(v.as_point(), Some(Point::new(1, 2)));
        assert_eq!(v.as_size(), None);
        assert_eq!(v.kind(), "point");
    }

    #[test]
    fn error_display_names_the_property() {
        let err = PropertyError::Rejected {
            key: PropertyKey::Border,
            reason: "viewport".into(),
        };
        assert_eq!(err.to_string(), "write to `border` rejected: viewport");
        assert_eq!(err.key(), PropertyKey::Border);
    }
}
