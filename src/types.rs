//! Domain types for console-menu.
//!
//! Key events, menu items and the screen identifier bound. Pure data,
//! no terminal access.

use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// SCREEN IDENTITY
// ============================================================================

/// Host-supplied identifier for a registered screen.
///
/// Any comparable, hashable, cloneable type qualifies. `Debug` output is
/// used when a screen has to be named to the user (missing action message)
/// or in errors. A plain fieldless enum is the intended shape.
pub trait ScreenId: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> ScreenId for T {}

// ============================================================================
// KEYS
// ============================================================================

/// The logical keys screens react to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Up,
    Down,
    Enter,
    Other,
}

/// One key press as seen by a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: LogicalKey,
    /// Printable character, if the key produced one.
    pub ch: Option<char>,
}

impl KeyEvent {
    pub const UP: KeyEvent = KeyEvent { key: LogicalKey::Up, ch: None };
    pub const DOWN: KeyEvent = KeyEvent { key: LogicalKey::Down, ch: None };
    pub const ENTER: KeyEvent = KeyEvent { key: LogicalKey::Enter, ch: None };

    /// A non-navigation key that produced `c`.
    pub fn char(c: char) -> Self {
        KeyEvent {
            key: LogicalKey::Other,
            ch: Some(c),
        }
    }

    /// A key with no logical meaning and no character (F-keys, Esc, ...).
    pub fn other() -> Self {
        KeyEvent {
            key: LogicalKey::Other,
            ch: None,
        }
    }
}

/// Textual key names: `up`, `down`, `enter`, `other`, or a single
/// printable character.
impl FromStr for KeyEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(KeyEvent::UP),
            "down" => Ok(KeyEvent::DOWN),
            "enter" => Ok(KeyEvent::ENTER),
            "other" => Ok(KeyEvent::other()),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Ok(KeyEvent::char(c)),
                    _ => Err(format!("Unknown key name: {:?}", s)),
                }
            }
        }
    }
}

impl Serialize for KeyEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let name = match (self.key, self.ch) {
            (LogicalKey::Up, _) => "up".to_string(),
            (LogicalKey::Down, _) => "down".to_string(),
            (LogicalKey::Enter, _) => "enter".to_string(),
            (LogicalKey::Other, Some(c)) => c.to_string(),
            (LogicalKey::Other, None) => "other".to_string(),
        };
        serializer.serialize_str(&name)
    }
}

impl<'de> Deserialize<'de> for KeyEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// MENU ITEMS
// ============================================================================

/// One line of a menu.
///
/// An item without a target is a termination item: choosing it ends the
/// run loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<Id> {
    /// Direct-select shortcut.
    pub key: Option<char>,
    /// Label shown to the user.
    pub text: String,
    /// Screen to switch to when chosen.
    pub target: Option<Id>,
}

impl<Id> MenuItem<Id> {
    pub fn is_termination(&self) -> bool {
        self.target.is_none()
    }
}

// ============================================================================
// TESTS
// ============================================================================
