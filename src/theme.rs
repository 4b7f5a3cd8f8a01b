//! The closed set of selectable appearance preferences.
//!
//! `ThemeChoice` is what the user picks and what gets persisted. `Appearance`
//! is the concrete light/dark mode a renderer ends up applying.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Concrete rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    /// Capitalized label used when annotating `system`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

/// User-selectable theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Light,
    Dark,
    /// Follow the platform's ambient light/dark setting.
    #[default]
    System,
}

impl ThemeChoice {
    /// Every choice, in picker order.
    pub const ALL: [ThemeChoice; 3] = [Self::Light, Self::Dark, Self::System];

    /// Stable identifier used for persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Exact match against the persisted identifier set.
    ///
    /// This is the storage-boundary decoder: callers apply their own default
    /// to `None`.
    pub fn from_identifier(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.as_str() == raw)
    }

    /// Identifier with its first letter capitalized (`"Light"`).
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::System => "System",
        }
    }

    /// Fixed appearance for this choice, or `None` to defer to the platform.
    pub fn appearance(self) -> Option<Appearance> {
        match self {
            Self::Light => Some(Appearance::Light),
            Self::Dark => Some(Appearance::Dark),
            Self::System => None,
        }
    }

    /// Effective appearance given the platform's current ambient mode.
    pub fn resolve(self, ambient: Appearance) -> Appearance {
        self.appearance().unwrap_or(ambient)
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected user input for a theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError {
    input: String,
}

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = ThemeChoice::ALL
            .iter()
            .map(|choice| choice.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "unknown theme `{}`; expected one of: {names}", self.input)
    }
}

impl std::error::Error for ParseThemeError {}

/// Lenient parse for user input: trims and ignores ASCII case.
impl FromStr for ThemeChoice {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::from_identifier(&normalized).ok_or_else(|| ParseThemeError {
            input: s.trim().to_string(),
        })
    }
}
