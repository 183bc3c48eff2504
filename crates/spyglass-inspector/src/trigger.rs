#![forbid(unsafe_code)]

//! Input gestures that start an inspection.
//!
//! A trigger matches one mouse button or key together with an exact set of
//! modifiers. Only the four named modifier flags take part in the match;
//! any other bits a host sets are ignored. A matching press inspects, and
//! the other events of the same gesture are consumed so the application
//! never sees half of it.
//!
//! Triggers parse from `+`-separated text such as `ctrl+shift+right` or
//! `ctrl+shift+f12`.

use std::fmt;
use std::str::FromStr;

use spyglass_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What to do with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    /// Not a trigger event; deliver normally.
    Ignore,
    /// Part of a trigger gesture; swallow it.
    Consume,
    /// The trigger fired.
    Inspect,
}

/// Text that does not describe a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerParseError(String);

impl fmt::Display for TriggerParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid trigger `{}`", self.0)
    }
}

impl std::error::Error for TriggerParseError {}

fn modifiers_match(held: Modifiers, wanted: Modifiers) -> bool {
    (held & Modifiers::ALL) == wanted
}

/// Split `ctrl+shift+x` into modifiers and the final token.
fn split_modifiers(text: &str) -> Result<(Modifiers, String), TriggerParseError> {
    let err = || TriggerParseError(text.to_string());
    let mut tokens: Vec<String> = text
        .split('+')
        .map(|t| t.trim().to_ascii_lowercase())
        .collect();
    let last = tokens.pop().filter(|t| !t.is_empty()).ok_or_else(err)?;
    let mut modifiers = Modifiers::NONE;
    for token in tokens {
        modifiers |= match token.as_str() {
            "ctrl" | "control" => Modifiers::CTRL,
            "shift" => Modifiers::SHIFT,
            "alt" => Modifiers::ALT,
            "super" | "meta" | "cmd" => Modifiers::SUPER,
            _ => return Err(err()),
        };
    }
    Ok((modifiers, last))
}

fn modifier_prefix(f: &mut fmt::Formatter<'_>, modifiers: Modifiers) -> fmt::Result {
    for (flag, name) in [
        (Modifiers::CTRL, "ctrl"),
        (Modifiers::SHIFT, "shift"),
        (Modifiers::ALT, "alt"),
        (Modifiers::SUPER, "super"),
    ] {
        if modifiers.contains(flag) {
            write!(f, "{name}+")?;
        }
    }
    Ok(())
}

/// Mouse button plus exact modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseTrigger {
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl MouseTrigger {
    pub const fn new(button: MouseButton, modifiers: Modifiers) -> Self {
        Self { button, modifiers }
    }

    pub fn classify(&self, event: &MouseEvent) -> TriggerAction {
        if event.button() != Some(self.button) || !modifiers_match(event.modifiers, self.modifiers)
        {
            return TriggerAction::Ignore;
        }
        match event.kind {
            MouseEventKind::Down(_) => TriggerAction::Inspect,
            _ => TriggerAction::Consume,
        }
    }
}

impl Default for MouseTrigger {
    fn default() -> Self {
        Self::new(MouseButton::Right, Modifiers::CTRL | Modifiers::SHIFT)
    }
}

impl FromStr for MouseTrigger {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, last) = split_modifiers(s)?;
        let button = match last.as_str() {
            "left" => MouseButton::Left,
            "right" => MouseButton::Right,
            "middle" => MouseButton::Middle,
            _ => return Err(TriggerParseError(s.to_string())),
        };
        Ok(Self::new(button, modifiers))
    }
}

impl fmt::Display for MouseTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        modifier_prefix(f, self.modifiers)?;
        f.write_str(match self.button {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        })
    }
}

/// Key plus exact modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTrigger {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyTrigger {
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn classify(&self, event: &KeyEvent) -> TriggerAction {
        if event.code != self.code || !modifiers_match(event.modifiers, self.modifiers) {
            return TriggerAction::Ignore;
        }
        match event.kind {
            KeyEventKind::Press => TriggerAction::Inspect,
            KeyEventKind::Repeat | KeyEventKind::Release => TriggerAction::Consume,
        }
    }
}

impl Default for KeyTrigger {
    fn default() -> Self {
        Self::new(KeyCode::F(12), Modifiers::CTRL | Modifiers::SHIFT)
    }
}

impl FromStr for KeyTrigger {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, last) = split_modifiers(s)?;
        let err = || TriggerParseError(s.to_string());
        let code = match last.as_str() {
            "enter" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "insert" => KeyCode::Insert,
            "delete" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            other => match other.strip_prefix('f').map(str::parse::<u8>) {
                Some(Ok(n @ 1..=24)) => KeyCode::F(n),
                Some(_) if other.len() > 1 => return Err(err()),
                _ => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => KeyCode::Char(c),
                        _ => return Err(err()),
                    }
                }
            },
        };
        Ok(Self::new(code, modifiers))
    }
}

impl fmt::Display for KeyTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        modifier_prefix(f, self.modifiers)?;
        match self.code {
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{}", format!("{other:?}").to_ascii_lowercase()),
        }
    }
}

/// The gestures an inspector responds to. Either may be disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    pub mouse: Option<MouseTrigger>,
    pub key: Option<KeyTrigger>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            mouse: Some(MouseTrigger::default()),
            key: Some(KeyTrigger::default()),
        }
    }
}

impl TriggerConfig {
    /// No triggers; the host selects targets itself.
    pub const fn disabled() -> Self {
        Self {
            mouse: None,
            key: None,
        }
    }

    pub fn classify(&self, event: &Event) -> TriggerAction {
        match event {
            Event::Mouse(m) => self
                .mouse
                .map_or(TriggerAction::Ignore, |t| t.classify(m)),
            Event::Key(k) => self.key.map_or(TriggerAction::Ignore, |t| t.classify(k)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyglass_core::geometry::Point;

    fn mouse(kind: MouseEventKind, modifiers: Modifiers) -> MouseEvent {
        MouseEvent::new(kind, Point::new(0, 0)).with_modifiers(modifiers)
    }

    #[test]
    fn mouse_gesture_is_inspected_then_consumed() {
        let trigger = MouseTrigger::default();
        let held = Modifiers::CTRL | Modifiers::SHIFT;
        let right = MouseButton::Right;
        assert_eq!(
            trigger.classify(&mouse(MouseEventKind::Down(right), held)),
            TriggerAction::Inspect
        );
        assert_eq!(
            trigger.classify(&mouse(MouseEventKind::Up(right), held)),
            TriggerAction::Consume
        );
        assert_eq!(
            trigger.classify(&mouse(MouseEventKind::Click(right), held)),
            TriggerAction::Consume
        );
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let trigger = MouseTrigger::default();
        let down = MouseEventKind::Down(MouseButton::Right);
        assert_eq!(
            trigger.classify(&mouse(down, Modifiers::CTRL)),
            TriggerAction::Ignore
        );
        assert_eq!(
            trigger.classify(&mouse(down, Modifiers::CTRL | Modifiers::SHIFT | Modifiers::ALT)),
            TriggerAction::Ignore
        );
        let extra_bits = Modifiers::from_bits_retain(0b1_0000) | Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(
            trigger.classify(&mouse(down, extra_bits)),
            TriggerAction::Inspect
        );
    }

    #[test]
    fn other_buttons_and_moves_pass_through() {
        let trigger = MouseTrigger::default();
        let held = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(
            trigger.classify(&mouse(MouseEventKind::Down(MouseButton::Left), held)),
            TriggerAction::Ignore
        );
        assert_eq!(
            trigger.classify(&mouse(MouseEventKind::Moved, held)),
            TriggerAction::Ignore
        );
    }

    #[test]
    fn key_press_inspects() {
        let config = TriggerConfig::default();
        let press = KeyEvent::new(KeyCode::F(12)).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(config.classify(&Event::Key(press)), TriggerAction::Inspect);
        let release = press.with_kind(KeyEventKind::Release);
        assert_eq!(config.classify(&Event::Key(release)), TriggerAction::Consume);
        let plain = KeyEvent::new(KeyCode::F(12));
        assert_eq!(config.classify(&Event::Key(plain)), TriggerAction::Ignore);
    }

    #[test]
    fn disabled_config_ignores_everything() {
        let config = TriggerConfig::disabled();
        let press = KeyEvent::new(KeyCode::F(12)).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(config.classify(&Event::Key(press)), TriggerAction::Ignore);
    }

    #[test]
    fn parse_and_display() {
        let mouse: MouseTrigger = "Ctrl+Alt+middle".parse().unwrap();
        assert_eq!(mouse, MouseTrigger::new(MouseButton::Middle, Modifiers::CTRL | Modifiers::ALT));
        assert_eq!(mouse.to_string(), "ctrl+alt+middle");

        let key: KeyTrigger = "shift+f3".parse().unwrap();
        assert_eq!(key, KeyTrigger::new(KeyCode::F(3), Modifiers::SHIFT));
        assert_eq!(KeyTrigger::default().to_string(), "ctrl+shift+f12");
        assert_eq!("ctrl+i".parse::<KeyTrigger>().unwrap().code, KeyCode::Char('i'));
        assert_eq!("f".parse::<KeyTrigger>().unwrap().code, KeyCode::Char('f'));

        assert!("hyper+left".parse::<MouseTrigger>().is_err());
        assert!("ctrl+".parse::<KeyTrigger>().is_err());
        assert!("f99".parse::<KeyTrigger>().is_err());
    }
}
