#![forbid(unsafe_code)]

//! Inspector configuration.
//!
//! # Environment
//!
//! | Variable | Values |
//! |----------|--------|
//! | `SPYGLASS_DECORATOR` | `none`, `border`, `background` |
//! | `SPYGLASS_BORDER_COLOR` | `#rrggbb` |
//! | `SPYGLASS_BORDER_THICKNESS` | positive integer |
//! | `SPYGLASS_BACKGROUND_COLOR` | `#rrggbb` |
//! | `SPYGLASS_MOUSE_TRIGGER` | e.g. `ctrl+shift+right`, or `off` |
//! | `SPYGLASS_KEY_TRIGGER` | e.g. `ctrl+shift+f12`, or `off` |
//! | `SPYGLASS_QUALIFIED_NAMES` | bool |
//! | `SPYGLASS_INSPECTOR_DIAGNOSTICS` | bool |
//! | `SPYGLASS_INSPECTOR_DETERMINISTIC` | bool |
//!
//! Bools accept `1/0`, `true/false`, `yes/no` and `on/off`. A value that
//! does not parse leaves the default in place and is reported in
//! [`InspectorConfigParse::errors`].

use std::env;
use std::fmt;

use spyglass_core::color::Color;

use crate::decorate::{DecoratorKind, DecoratorSet};
use crate::diagnostics::{DiagnosticLog, Diagnostics};
use crate::trigger::{KeyTrigger, MouseTrigger, TriggerConfig};

pub const ENV_DECORATOR: &str = "SPYGLASS_DECORATOR";
pub const ENV_BORDER_COLOR: &str = "SPYGLASS_BORDER_COLOR";
pub const ENV_BORDER_THICKNESS: &str = "SPYGLASS_BORDER_THICKNESS";
pub const ENV_BACKGROUND_COLOR: &str = "SPYGLASS_BACKGROUND_COLOR";
pub const ENV_MOUSE_TRIGGER: &str = "SPYGLASS_MOUSE_TRIGGER";
pub const ENV_KEY_TRIGGER: &str = "SPYGLASS_KEY_TRIGGER";
pub const ENV_QUALIFIED_NAMES: &str = "SPYGLASS_QUALIFIED_NAMES";
pub const ENV_DIAGNOSTICS: &str = "SPYGLASS_INSPECTOR_DIAGNOSTICS";
pub const ENV_DETERMINISTIC: &str = "SPYGLASS_INSPECTOR_DETERMINISTIC";

/// Everything an [`Inspector`](crate::Inspector) can be tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorConfig {
    /// Decorator active when the inspector starts.
    pub decorator: DecoratorKind,
    pub border_color: Color,
    pub border_thickness: u16,
    pub background_color: Color,
    pub triggers: TriggerConfig,
    /// Show qualified type names in the object panel.
    pub qualified_names: bool,
    /// Keep a JSONL diagnostic log.
    pub diagnostics: bool,
    /// Deterministic diagnostic timestamps.
    pub deterministic: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            decorator: DecoratorKind::Border,
            border_color: Color::BLUE,
            border_thickness: 2,
            background_color: Color::CYAN,
            triggers: TriggerConfig::default(),
            qualified_names: false,
            diagnostics: false,
            deterministic: false,
        }
    }
}

/// A configuration value that was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: &'static str,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: &'static str) -> Self {
        Self {
            field,
            value: value.into(),
            message,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Parsed configuration plus whatever could not be parsed.
#[derive(Debug, Clone)]
pub struct InspectorConfigParse {
    pub config: InspectorConfig,
    pub errors: Vec<ConfigError>,
}

impl InspectorConfig {
    #[must_use]
    pub fn with_decorator(mut self, kind: DecoratorKind) -> Self {
        self.decorator = kind;
        self
    }

    #[must_use]
    pub fn with_border(mut self, color: Color, thickness: u16) -> Self {
        self.border_color = color;
        self.border_thickness = thickness;
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    #[must_use]
    pub fn with_triggers(mut self, triggers: TriggerConfig) -> Self {
        self.triggers = triggers;
        self
    }

    #[must_use]
    pub fn with_qualified_names(mut self, qualified: bool) -> Self {
        self.qualified_names = qualified;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    #[must_use]
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Read the process environment, ignoring values that do not parse.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Read the process environment and report values that do not parse.
    #[must_use]
    pub fn from_env_with_diagnostics() -> InspectorConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Read configuration through `get`, which maps a variable name to its
    /// value.
    pub fn from_env_with<F>(get: F) -> InspectorConfigParse
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_DECORATOR) {
            match value.parse::<DecoratorKind>() {
                Ok(kind) => config.decorator = kind,
                Err(_) => errors.push(ConfigError::new(
                    "decorator",
                    value,
                    "expected none|border|background",
                )),
            }
        }

        if let Some(value) = get(ENV_BORDER_COLOR) {
            match Color::from_hex(&value) {
                Some(color) => config.border_color = color,
                None => errors.push(ConfigError::new("border_color", value, "expected #rrggbb")),
            }
        }

        if let Some(value) = get(ENV_BORDER_THICKNESS) {
            match value.trim().parse::<u16>() {
                Ok(n) if n > 0 => config.border_thickness = n,
                _ => errors.push(ConfigError::new(
                    "border_thickness",
                    value,
                    "expected positive integer",
                )),
            }
        }

        if let Some(value) = get(ENV_BACKGROUND_COLOR) {
            match Color::from_hex(&value) {
                Some(color) => config.background_color = color,
                None => errors.push(ConfigError::new(
                    "background_color",
                    value,
                    "expected #rrggbb",
                )),
            }
        }

        if let Some(value) = get(ENV_MOUSE_TRIGGER) {
            match parse_optional::<MouseTrigger>(&value) {
                Some(trigger) => config.triggers.mouse = trigger,
                None => errors.push(ConfigError::new(
                    "mouse_trigger",
                    value,
                    "expected modifiers+left|right|middle or off",
                )),
            }
        }

        if let Some(value) = get(ENV_KEY_TRIGGER) {
            match parse_optional::<KeyTrigger>(&value) {
                Some(trigger) => config.triggers.key = trigger,
                None => errors.push(ConfigError::new(
                    "key_trigger",
                    value,
                    "expected modifiers+key or off",
                )),
            }
        }

        for (key, field, slot) in [
            (ENV_QUALIFIED_NAMES, "qualified_names", &mut config.qualified_names),
            (ENV_DIAGNOSTICS, "diagnostics", &mut config.diagnostics),
            (ENV_DETERMINISTIC, "deterministic", &mut config.deterministic),
        ] {
            if let Some(value) = get(key) {
                match parse_bool(&value) {
                    Some(parsed) => *slot = parsed,
                    None => errors.push(ConfigError::new(
                        field,
                        value,
                        "expected bool (1/0/true/false)",
                    )),
                }
            }
        }

        InspectorConfigParse { config, errors }
    }

    /// The decorator variants this configuration describes.
    pub fn decorators(&self) -> DecoratorSet {
        DecoratorSet::new(
            self.border_color,
            self.border_thickness,
            self.background_color,
        )
    }

    /// Diagnostics recorder: a log when enabled, inert otherwise.
    pub fn diagnostics(&self) -> Diagnostics {
        let recorder = Diagnostics::disabled().deterministic(self.deterministic);
        if self.diagnostics {
            recorder.with_log(DiagnosticLog::new())
        } else {
            recorder
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `off`/`none` disables; anything else must parse.
fn parse_optional<T: std::str::FromStr>(value: &str) -> Option<Option<T>> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("off") || trimmed.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    trimmed.parse().ok().map(Some)
}
