//! Hotkey descriptor parsing.
//!
//! Descriptors are space-separated, modifiers first and one key last, e.g.
//! `"Ctrl Shift A"`. Registration with the OS happens outside this crate; the
//! parsed descriptor is what a registrar binds to the hotkey trigger.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Super,
}

impl Modifier {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "shift" => Some(Modifier::Shift),
            "alt" | "option" => Some(Modifier::Alt),
            "super" | "win" | "cmd" | "meta" => Some(Modifier::Super),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
            Modifier::Super => "Super",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `A`-`Z`
    Letter(char),
    /// `0`-`9`
    Digit(char),
    Space,
    /// `F1`-`F12`
    Function(u8),
}

impl Key {
    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("space") {
            return Some(Key::Space);
        }

        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                return Some(Key::Letter(c.to_ascii_uppercase()));
            }
            if c.is_ascii_digit() {
                return Some(Key::Digit(c));
            }
            return None;
        }

        let number = token
            .strip_prefix('F')
            .or_else(|| token.strip_prefix('f'))?
            .parse::<u8>()
            .ok()?;
        (1..=12).contains(&number).then_some(Key::Function(number))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Letter(c) | Key::Digit(c) => write!(f, "{}", c),
            Key::Space => f.write_str("Space"),
            Key::Function(n) => write!(f, "F{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyParseError {
    #[error("hotkey descriptor is empty")]
    Empty,
    #[error("hotkey {0:?} needs at least one modifier before the key")]
    MissingModifier(String),
    #[error("unknown modifier {0:?}")]
    UnknownModifier(String),
    #[error("unknown key {0:?}")]
    UnknownKey(String),
}

/// A parsed global hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    /// Sorted and de-duplicated
    pub modifiers: Vec<Modifier>,
    pub key: Key,
}

impl FromStr for Hotkey {
    type Err = HotkeyParseError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = descriptor.split_whitespace().collect();
        let (key_token, modifier_tokens) = tokens.split_last().ok_or(HotkeyParseError::Empty)?;

        if modifier_tokens.is_empty() {
            return Err(HotkeyParseError::MissingModifier(descriptor.trim().to_string()));
        }

        let mut modifiers = modifier_tokens
            .iter()
            .map(|token| {
                Modifier::parse(token)
                    .ok_or_else(|| HotkeyParseError::UnknownModifier(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        modifiers.sort();
        modifiers.dedup();

        let key = Key::parse(key_token)
            .ok_or_else(|| HotkeyParseError::UnknownKey(key_token.to_string()))?;

        Ok(Hotkey { modifiers, key })
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{} ", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}
