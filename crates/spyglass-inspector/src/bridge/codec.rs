#![forbid(unsafe_code)]

//! Text encodings for field values.

use std::fmt;

use spyglass_core::color::Color;
use spyglass_core::geometry::{Insets, Point, Size};
use spyglass_core::value::{Font, FontStyle, PropertyValue};

/// Why a buffer could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Empty,
    Malformed,
    OutOfRange,
}

/// An edit buffer that does not hold a valid value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Index of the offending buffer.
    pub part: usize,
    pub input: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn new(part: usize, input: &str, kind: ParseErrorKind) -> Self {
        Self {
            part,
            input: input.to_string(),
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::Empty => write!(f, "field {} is empty", self.part),
            ParseErrorKind::Malformed => {
                write!(f, "field {}: `{}` is not valid", self.part, self.input)
            }
            ParseErrorKind::OutOfRange => {
                write!(f, "field {}: `{}` is out of range", self.part, self.input)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Converts between a value, its edit buffers, and the widget property.
pub trait FieldCodec {
    type Value: Clone + PartialEq + 'static;

    /// Number of edit buffers.
    fn parts(&self) -> usize;

    fn format(&self, value: &Self::Value) -> Vec<String>;

    fn parse(&self, parts: &[String]) -> Result<Self::Value, ParseError>;

    fn to_property(&self, value: &Self::Value) -> PropertyValue;

    fn from_property(&self, value: &PropertyValue) -> Option<Self::Value>;
}

fn part(parts: &[String], index: usize) -> Result<&str, ParseError> {
    let text = parts.get(index).map(|s| s.trim()).unwrap_or("");
    if text.is_empty() {
        Err(ParseError::new(index, text, ParseErrorKind::Empty))
    } else {
        Ok(text)
    }
}

fn int_part(parts: &[String], index: usize) -> Result<i32, ParseError> {
    let text = part(parts, index)?;
    text.parse::<i32>()
        .map_err(|_| ParseError::new(index, text, ParseErrorKind::Malformed))
}

fn non_negative_part(parts: &[String], index: usize) -> Result<i32, ParseError> {
    let value = int_part(parts, index)?;
    if value < 0 {
        return Err(ParseError::new(
            index,
            parts[index].trim(),
            ParseErrorKind::OutOfRange,
        ));
    }
    Ok(value)
}

/// `x`, `y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointCodec;

impl FieldCodec for PointCodec {
    type Value = Point;

    fn parts(&self) -> usize {
        2
    }

    fn format(&self, value: &Point) -> Vec<String> {
        vec![value.x.to_string(), value.y.to_string()]
    }

    fn parse(&self, parts: &[String]) -> Result<Point, ParseError> {
        Ok(Point::new(int_part(parts, 0)?, int_part(parts, 1)?))
    }

    fn to_property(&self, value: &Point) -> PropertyValue {
        PropertyValue::Point(*value)
    }

    fn from_property(&self, value: &PropertyValue) -> Option<Point> {
        value.as_point()
    }
}

/// `width`, `height`; both non-negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeCodec;

impl FieldCodec for SizeCodec {
    type Value = Size;

    fn parts(&self) -> usize {
        2
    }

    fn format(&self, value: &Size) -> Vec<String> {
        vec![value.width.to_string(), value.height.to_string()]
    }

    fn parse(&self, parts: &[String]) -> Result<Size, ParseError> {
        Ok(Size::new(
            non_negative_part(parts, 0)?,
            non_negative_part(parts, 1)?,
        ))
    }

    fn to_property(&self, value: &Size) -> PropertyValue {
        PropertyValue::Size(*value)
    }

    fn from_property(&self, value: &PropertyValue) -> Option<Size> {
        value.as_size()
    }
}

/// `top`, `left`, `bottom`, `right`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsetsCodec;

impl FieldCodec for InsetsCodec {
    type Value = Insets;

    fn parts(&self) -> usize {
        4
    }

    fn format(&self, value: &Insets) -> Vec<String> {
        [value.top, value.left, value.bottom, value.right]
            .iter()
            .map(i32::to_string)
            .collect()
    }

    fn parse(&self, parts: &[String]) -> Result<Insets, ParseError> {
        Ok(Insets::new(
            int_part(parts, 0)?,
            int_part(parts, 1)?,
            int_part(parts, 2)?,
            int_part(parts, 3)?,
        ))
    }

    fn to_property(&self, value: &Insets) -> PropertyValue {
        PropertyValue::Insets(*value)
    }

    fn from_property(&self, value: &PropertyValue) -> Option<Insets> {
        value.as_insets()
    }
}

/// `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCodec;

impl FieldCodec for ColorCodec {
    type Value = Color;

    fn parts(&self) -> usize {
        1
    }

    fn format(&self, value: &Color) -> Vec<String> {
        vec![value.to_hex()]
    }

    fn parse(&self, parts: &[String]) -> Result<Color, ParseError> {
        let text = part(parts, 0)?;
        Color::from_hex(text).ok_or_else(|| ParseError::new(0, text, ParseErrorKind::Malformed))
    }

    fn to_property(&self, value: &Color) -> PropertyValue {
        PropertyValue::Color(*value)
    }

    fn from_property(&self, value: &PropertyValue) -> Option<Color> {
        value.as_color()
    }
}

/// `family`, `style`, `size`.
///
/// The style buffer holds `plain` or any of `bold`, `italic` and `underline`
/// separated by spaces, commas or `+`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontCodec;

impl FontCodec {
    fn style_text(style: FontStyle) -> String {
        let mut words = Vec::new();
        if style.contains(FontStyle::BOLD) {
            words.push("bold");
        }
        if style.contains(FontStyle::ITALIC) {
            words.push("italic");
        }
        if style.contains(FontStyle::UNDERLINE) {
            words.push("underline");
        }
        if words.is_empty() {
            "plain".to_string()
        } else {
            words.join(" ")
        }
    }

    fn parse_style(text: &str) -> Option<FontStyle> {
        let mut style = FontStyle::empty();
        for word in text
            .split(|c: char| c.is_whitespace() || c == ',' || c == '+')
            .filter(|w| !w.is_empty())
        {
            match word.to_ascii_lowercase().as_str() {
                "plain" => {}
                "bold" => style |= FontStyle::BOLD,
                "italic" => style |= FontStyle::ITALIC,
                "underline" => style |= FontStyle::UNDERLINE,
                _ => return None,
            }
        }
        Some(style)
    }
}

impl FieldCodec for FontCodec {
    type Value = Font;

    fn parts(&self) -> usize {
        3
    }

    fn format(&self, value: &Font) -> Vec<String> {
        vec![
            value.family.clone(),
            Self::style_text(value.style),
            value.size.to_string(),
        ]
    }

    fn parse(&self, parts: &[String]) -> Result<Font, ParseError> {
        let family = part(parts, 0)?;
        let style_text = parts.get(1).map(|s| s.trim()).unwrap_or("");
        let style = Self::parse_style(style_text)
            .ok_or_else(|| ParseError::new(1, style_text, ParseErrorKind::Malformed))?;
        let size_text = part(parts, 2)?;
        let size = size_text
            .parse::<u16>()
            .map_err(|_| ParseError::new(2, size_text, ParseErrorKind::Malformed))?;
        if size == 0 {
            return Err(ParseError::new(2, size_text, ParseErrorKind::OutOfRange));
        }
        Ok(Font::new(family, size).with_style(style))
    }

    fn to_property(&self, value: &Font) -> PropertyValue {
        PropertyValue::Font(value.clone())
    }

    fn from_property(&self, value: &PropertyValue) -> Option<Font> {
        value.as_font().cloned()
    }
}

/// An integer within `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct IntCodec {
    pub min: i64,
    pub max: i64,
}

impl IntCodec {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl FieldCodec for IntCodec {
    type Value = i64;

    fn parts(&self) -> usize {
        1
    }

    fn format(&self, value: &i64) -> Vec<String> {
        vec![value.to_string()]
    }

    fn parse(&self, parts: &[String]) -> Result<i64, ParseError> {
        let text = part(parts, 0)?;
        let value = text
            .parse::<i64>()
            .map_err(|_| ParseError::new(0, text, ParseErrorKind::Malformed))?;
        if !(self.min..=self.max).contains(&value) {
            return Err(ParseError::new(0, text, ParseErrorKind::OutOfRange));
        }
        Ok(value)
    }

    fn to_property(&self, value: &i64) -> PropertyValue {
        PropertyValue::Int(*value)
    }

    fn from_property(&self, value: &PropertyValue) -> Option<i64> {
        match value {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// A finite float within `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct FloatCodec {
    pub min: f32,
    pub max: f32,
}

impl FloatCodec {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `0.0..=1.0`, the range of alignment values.
    pub const fn unit() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl FieldCodec for FloatCodec {
    type Value = f32;

    fn parts(&self) -> usize {
        1
    }

    fn format(&self, value: &f32) -> Vec<String> {
        vec![value.to_string()]
    }

    fn parse(&self, parts: &[String]) -> Result<f32, ParseError> {
        let text = part(parts, 0)?;
        let value = text
            .parse::<f32>()
            .map_err(|_| ParseError::new(0, text, ParseErrorKind::Malformed))?;
        if !value.is_finite() {
            return Err(ParseError::new(0, text, ParseErrorKind::Malformed));
        }
        if value < self.min || value > self.max {
            return Err(ParseError::new(0, text, ParseErrorKind::OutOfRange));
        }
        Ok(value)
    }

    fn to_property(&self, value: &f32) -> PropertyValue {
        PropertyValue::Float(*value)
    }

    fn from_property(&self, value: &PropertyValue) -> Option<f32> {
        value.as_float()
    }
}

/// `true`/`false`, also accepting `yes`/`no`, `on`/`off` and `1`/`0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl FieldCodec for BoolCodec {
    type Value = bool;

    fn parts(&self) -> usize {
        1
    }

    fn format(&self, value: &bool) -> Vec<String> {
        vec![value.to_string()]
    }

    fn parse(&self, parts: &[String]) -> Result<bool, ParseError> {
        let text = part(parts, 0)?;
        match text.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ParseError::new(0, text, ParseErrorKind::Malformed)),
        }
    }

    fn to_property(&self, value: &bool) -> PropertyValue {
        PropertyValue::Bool(*value)
    }

    fn from_property(&self, value: &PropertyValue) -> Option<bool> {
        value.as_bool()
    }
}

/// Free text. An empty buffer is a valid empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl FieldCodec for TextCodec {
    type Value = String;

    fn parts(&self) -> usize {
        1
    }

    fn format(&self, value: &String) -> Vec<String> {
        vec![value.clone()]
    }

    fn parse(&self, parts: &[String]) -> Result<String, ParseError> {
        Ok(parts.first().cloned().unwrap_or_default())
    }

    fn to_property(&self, value: &String) -> PropertyValue {
        PropertyValue::Text(value.clone())
    }

    fn from_property(&self, value: &PropertyValue) -> Option<String> {
        value.as_text().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn point_tolerates_whitespace() {
        assert_eq!(
            PointCodec.parse(&strings(&[" 4 ", "-2"])),
            Ok(Point::new(4, -2))
        );
    }

    #[test]
    fn size_rejects_negative() {
        let err = SizeCodec.parse(&strings(&["10", "-1"])).unwrap_err();
        assert_eq!(err.part, 1);
        assert_eq!(err.kind, ParseErrorKind::OutOfRange);
    }

    #[test]
    fn empty_part_is_reported() {
        let err = InsetsCodec.parse(&strings(&["1", "", "1", "1"])).unwrap_err();
        assert_eq!((err.part, err.kind), (1, ParseErrorKind::Empty));
    }

    #[test]
    fn color_accepts_hex_forms() {
        assert_eq!(
            ColorCodec.parse(&strings(&["#00ff00"])),
            Ok(Color::rgb(0, 255, 0))
        );
        assert_eq!(
            ColorCodec.parse(&strings(&["ff000080"])),
            Ok(Color::rgba(255, 0, 0, 128))
        );
        assert!(ColorCodec.parse(&strings(&["#zzzzzz"])).is_err());
    }

    #[test]
    fn font_style_words() {
        let font = FontCodec
            .parse(&strings(&["Serif", "Italic + bold", "14"]))
            .unwrap();
        assert_eq!(font.style, FontStyle::BOLD | FontStyle::ITALIC);
        assert_eq!(
            FontCodec.format(&font),
            strings(&["Serif", "bold italic", "14"])
        );
        assert_eq!(
            FontCodec.parse(&strings(&["Serif", "", "9"])).map(|f| f.style),
            Ok(FontStyle::empty())
        );
        assert_eq!(
            FontCodec.parse(&strings(&["Serif", "wavy", "9"])).unwrap_err().part,
            1
        );
        assert_eq!(
            FontCodec.parse(&strings(&["Serif", "plain", "0"])).unwrap_err().kind,
            ParseErrorKind::OutOfRange
        );
    }

    #[test]
    fn bounded_numbers() {
        let ints = IntCodec::new(0, 10);
        assert_eq!(ints.parse(&strings(&["10"])), Ok(10));
        assert_eq!(
            ints.parse(&strings(&["11"])).unwrap_err().kind,
            ParseErrorKind::OutOfRange
        );
        let unit = FloatCodec::unit();
        assert_eq!(unit.parse(&strings(&["0.5"])), Ok(0.5));
        assert!(unit.parse(&strings(&["NaN"])).is_err());
        assert!(unit.parse(&strings(&["1.5"])).is_err());
    }

    #[test]
    fn bool_words() {
        assert_eq!(BoolCodec.parse(&strings(&["Yes"])), Ok(true));
        assert_eq!(BoolCodec.parse(&strings(&["0"])), Ok(false));
        assert!(BoolCodec.parse(&strings(&["maybe"])).is_err());
    }

    #[test]
    fn text_allows_empty() {
        assert_eq!(TextCodec.parse(&strings(&[""])), Ok(String::new()));
    }

    #[test]
    fn property_conversion_matches_variant() {
        assert_eq!(
            PointCodec.from_property(&PropertyValue::Point(Point::new(1, 2))),
            Some(Point::new(1, 2))
        );
        assert_eq!(PointCodec.from_property(&PropertyValue::Bool(true)), None);
        assert_eq!(
            IntCodec::new(0, 1).to_property(&1),
            PropertyValue::Int(1)
        );
    }
}
