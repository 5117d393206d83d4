//! Accent colour parsing and derived palette.
//!
//! The widget is themed from a single host-supplied hex colour. Hue,
//! saturation and lightness are exposed separately so the stylesheet can
//! derive hover/pressed variants, and a foreground text colour is picked
//! from the lightness so labels stay legible on the accent background.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lightness (percent) above which accent-coloured surfaces get black text.
pub const ACCENT_TEXT_LIGHTNESS_THRESHOLD: u8 = 60;

/// A color in RGB format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (leading `#` optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::Validation(format!(
                "accent_color '{hex}' contains non-hex characters"
            )));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => {
                return Err(ConfigError::Validation(format!(
                    "accent_color '{hex}' must be a #RRGGBB or #RGB hex colour"
                )));
            }
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16).map_err(|_| {
                ConfigError::Validation(format!(
                    "accent_color '{hex}' contains non-hex characters"
                ))
            })
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to HSL with hue in whole degrees and saturation/lightness in
    /// whole percent.
    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        Hsl {
            h: (h * 360.0).round() as u16,
            s: (s * 100.0).round() as u8,
            l: (l * 100.0).round() as u8,
        }
    }
}

/// Hue (0-360), saturation and lightness (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// Everything the stylesheet needs to theme the widget from one colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentPalette {
    pub base: Rgb,
    pub hsl: Hsl,
    /// Foreground colour for text drawn on the accent colour
    pub text: Rgb,
}

impl AccentPalette {
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let base = Rgb::from_hex(hex)?;
        let hsl = base.to_hsl();
        let text = if hsl.l > ACCENT_TEXT_LIGHTNESS_THRESHOLD {
            Rgb::new(0, 0, 0)
        } else {
            Rgb::new(255, 255, 255)
        };
        Ok(Self { base, hsl, text })
    }

    /// CSS custom properties as `(name, value)` pairs
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--accent-h", self.hsl.h.to_string()),
            ("--accent-s", format!("{}%", self.hsl.s)),
            ("--accent-l", format!("{}%", self.hsl.l)),
            ("--accent-text", self.text.to_hex()),
        ]
    }
}
