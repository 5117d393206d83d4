//! Host configuration object for the chat widget.
//!
//! Mirrors the options a host page declares before the widget script runs.
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields a usable configuration apart from the mandatory `site_id`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::accent::AccentPalette;
use crate::error::ConfigError;
use crate::types::{Position, ThemeSetting, Timings};

/// Widget configuration as declared by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Host-declared site identifier. Mounting without one is refused.
    #[serde(default)]
    pub site_id: Option<String>,

    /// Accent colour as a hex string
    #[serde(default = "crate::defaults::accent_color")]
    pub accent_color: String,

    /// Viewport corner the launcher anchors to
    #[serde(default)]
    pub position: Position,

    /// Display name shown on bot messages and the typing indicator
    #[serde(default = "crate::defaults::agent_name")]
    pub agent_name: String,

    /// Avatar URL (declared but not rendered yet)
    #[serde(default)]
    pub agent_avatar: Option<String>,

    /// `light`, `dark`, or `auto` (follow the OS colour scheme)
    #[serde(default)]
    pub theme: ThemeSetting,

    /// Reject attachments outside `accepted_file_types` instead of treating
    /// the list as a picker hint only
    #[serde(default = "crate::defaults::bool_false")]
    pub enforce_file_types: bool,

    /// Accepted attachment types: MIME patterns (`image/*`, `application/pdf`)
    /// or file extensions (`.txt`)
    #[serde(default = "crate::defaults::accepted_file_types")]
    pub accepted_file_types: Vec<String>,

    /// Largest attachment that can be staged
    #[serde(default = "crate::defaults::max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Delays for the simulated reply sequence and panel animations
    #[serde(default)]
    pub timings: Timings,

    /// Canned bot reply for the simulated conversation
    #[serde(default = "crate::defaults::canned_reply")]
    pub canned_reply: String,

    /// Quick replies offered after the canned bot reply
    #[serde(default = "crate::defaults::canned_quick_replies")]
    pub canned_quick_replies: Vec<String>,

    /// Message text used when the user sends an attachment without text
    #[serde(default = "crate::defaults::attachment_placeholder")]
    pub attachment_placeholder: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            site_id: None,
            accent_color: crate::defaults::accent_color(),
            position: Position::default(),
            agent_name: crate::defaults::agent_name(),
            agent_avatar: None,
            theme: ThemeSetting::default(),
            enforce_file_types: crate::defaults::bool_false(),
            accepted_file_types: crate::defaults::accepted_file_types(),
            max_file_size_bytes: crate::defaults::max_file_size_bytes(),
            timings: Timings::default(),
            canned_reply: crate::defaults::canned_reply(),
            canned_quick_replies: crate::defaults::canned_quick_replies(),
            attachment_placeholder: crate::defaults::attachment_placeholder(),
        }
    }
}

impl WidgetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document and validate it
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: WidgetConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("[config] Loading widget config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            log::info!("[config] No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Get the configuration file path (using XDG convention)
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("widget.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join("chatiq"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join("chatiq"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    /// Check field-level invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        AccentPalette::from_hex(&self.accent_color)?;

        if let Some(site_id) = &self.site_id
            && site_id.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "site_id may not be blank".to_string(),
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(ConfigError::Validation(
                "max_file_size_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// The site identifier, treating a blank string as absent
    pub fn site_id(&self) -> Option<&str> {
        self.site_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Derived palette for the configured accent colour
    pub fn accent_palette(&self) -> Result<AccentPalette, ConfigError> {
        AccentPalette::from_hex(&self.accent_color)
    }

    pub fn with_site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn with_theme(mut self, theme: ThemeSetting) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_accent_color(mut self, hex: impl Into<String>) -> Self {
        self.accent_color = hex.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }
}
