//! Enumerated configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Position
// ============================================================================

/// Which bottom corner of the viewport the launcher and panel anchor to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    #[default]
    Right,
}

impl Position {
    /// CSS class / attribute value for the host container
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Concrete colour scheme applied to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme (used by `toggle_theme`)
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_dark_flag(is_dark: bool) -> Self {
        if is_dark { Theme::Dark } else { Theme::Light }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// Theme as declared by the host: a fixed scheme or `auto`, which follows
/// the OS-level colour-scheme signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    #[default]
    Light,
    Dark,
    Auto,
}

impl ThemeSetting {
    /// Resolve to a concrete theme given the current system preference.
    pub fn resolve(&self, system_prefers_dark: bool) -> Theme {
        match self {
            ThemeSetting::Light => Theme::Light,
            ThemeSetting::Dark => Theme::Dark,
            ThemeSetting::Auto => Theme::from_dark_flag(system_prefers_dark),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, ThemeSetting::Auto)
    }
}

impl From<Theme> for ThemeSetting {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => ThemeSetting::Light,
            Theme::Dark => ThemeSetting::Dark,
        }
    }
}

// ============================================================================
// Timings
// ============================================================================

/// Delays driving the simulated reply sequence and panel transitions, in
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Delay between a user send and the typing indicator appearing
    #[serde(default = "crate::defaults::typing_delay_ms")]
    pub typing_delay_ms: u64,
    /// Delay between the typing indicator and the canned bot reply
    #[serde(default = "crate::defaults::reply_delay_ms")]
    pub reply_delay_ms: u64,
    /// Delay between a bot message and its quick-reply suggestions
    #[serde(default = "crate::defaults::quick_replies_delay_ms")]
    pub quick_replies_delay_ms: u64,
    /// Typing duration for externally injected bot messages
    #[serde(default = "crate::defaults::injected_reply_delay_ms")]
    pub injected_reply_delay_ms: u64,
    /// Length of the panel open animation
    #[serde(default = "crate::defaults::open_transition_ms")]
    pub open_transition_ms: u64,
    /// Length of the panel close animation
    #[serde(default = "crate::defaults::close_transition_ms")]
    pub close_transition_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            typing_delay_ms: crate::defaults::typing_delay_ms(),
            reply_delay_ms: crate::defaults::reply_delay_ms(),
            quick_replies_delay_ms: crate::defaults::quick_replies_delay_ms(),
            injected_reply_delay_ms: crate::defaults::injected_reply_delay_ms(),
            open_transition_ms: crate::defaults::open_transition_ms(),
            close_transition_ms: crate::defaults::close_transition_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_setting_resolve() {
        assert_eq!(ThemeSetting::Light.resolve(true), Theme::Light);
        assert_eq!(ThemeSetting::Dark.resolve(false), Theme::Dark);
        assert_eq!(ThemeSetting::Auto.resolve(true), Theme::Dark);
        assert_eq!(ThemeSetting::Auto.resolve(false), Theme::Light);
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("auto".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_position_yaml() {
        let pos: Position = serde_yaml_ng::from_str("left").unwrap();
        assert_eq!(pos, Position::Left);
        assert_eq!(Position::default().as_str(), "right");
    }
}
