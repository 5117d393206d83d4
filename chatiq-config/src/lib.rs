//! Configuration system for the ChatIQ chat widget.
//!
//! This crate provides the host-facing configuration object and the pure
//! data types derived from it:
//!
//! - Widget options (site id, accent colour, position, agent name, theme)
//! - Theme and position enums, including `auto` theme resolution
//! - Accent colour parsing and derived HSL palette
//! - Reply-sequence and animation timings
//! - Default values

pub mod accent;
pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use accent::{ACCENT_TEXT_LIGHTNESS_THRESHOLD, AccentPalette, Hsl, Rgb};
pub use config::WidgetConfig;
pub use error::ConfigError;
pub use types::{Position, Theme, ThemeSetting, Timings};
