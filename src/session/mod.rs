//! Session state store: visitor identity and persisted preferences.
//!
//! Every preference is persisted under its own key and is last-write-wins.
//! Values are loaded once at mount and kept in memory; each local mutation
//! writes through to the [`KeyValueStore`]. When a write fails the store
//! stops writing for the rest of the session and stays silent apart from a
//! single warning in the log. Reads are independent: a key that cannot be
//! read falls back to its default, and readable keys keep being served
//! after writes have stopped.
//!
//! Key layout:
//!
//! | Key                       | Scope  | Value                     |
//! |---------------------------|--------|---------------------------|
//! | `chatiq_visitor_id`       | global | opaque visitor identifier |
//! | `chatiq_sound_enabled`    | global | `"true"` / `"false"`      |
//! | `chatiq_theme`            | global | `"light"` / `"dark"`      |
//! | `chatiq_draft_<site_id>`  | site   | unsent composer text      |

pub mod storage;
mod visitor;

use chatiq_config::Theme;
use serde::{Deserialize, Serialize};

use crate::error::WidgetError;
use crate::traits::KeyValueStore;
use storage::StorageError;

pub use visitor::generate_visitor_id;

pub const VISITOR_ID_KEY: &str = "chatiq_visitor_id";
pub const SOUND_ENABLED_KEY: &str = "chatiq_sound_enabled";
pub const THEME_KEY: &str = "chatiq_theme";
const DRAFT_KEY_PREFIX: &str = "chatiq_draft_";

/// Draft key for a site; scoped so multiple embeds sharing storage don't collide
pub fn draft_key(site_id: &str) -> String {
    format!("{DRAFT_KEY_PREFIX}{site_id}")
}

/// Persisted per-profile preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrefs {
    pub sound_enabled: bool,
    pub theme: Theme,
    pub draft_text: String,
}

impl Default for SessionPrefs {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            theme: Theme::Light,
            draft_text: String::new(),
        }
    }
}

/// Owns visitor identity and preferences for one mounted widget
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
    site_id: String,
    visitor_id: Option<String>,
    prefs: SessionPrefs,
    /// Set after the first failed write; durable storage is no longer written
    degraded: bool,
    /// Most recent storage failure
    last_error: Option<WidgetError>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>, site_id: impl Into<String>) -> Self {
        Self {
            store,
            site_id: site_id.into(),
            visitor_id: None,
            prefs: SessionPrefs::default(),
            degraded: false,
            last_error: None,
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn draft_key(&self) -> String {
        draft_key(&self.site_id)
    }

    /// Whether a write has failed and changes are now kept in memory only
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The last storage failure, if any
    pub fn last_error(&self) -> Option<&WidgetError> {
        self.last_error.as_ref()
    }

    /// Current in-memory preferences
    pub fn prefs(&self) -> &SessionPrefs {
        &self.prefs
    }

    /// Return the persisted visitor id, generating and persisting a new one
    /// on first use. Repeated calls return the same value.
    pub fn get_or_create_visitor_id(&mut self) -> String {
        if let Some(id) = &self.visitor_id {
            return id.clone();
        }

        let id = match self.read(VISITOR_ID_KEY) {
            Some(existing) if !existing.is_empty() => existing,
            _ => {
                let fresh = generate_visitor_id();
                log::debug!("[session] Generated visitor id {}", fresh);
                self.write(VISITOR_ID_KEY, Some(&fresh));
                fresh
            }
        };

        self.visitor_id = Some(id.clone());
        id
    }

    /// Load each preference independently, falling back to defaults for
    /// missing or unreadable keys. `default_theme` comes from the host
    /// configuration.
    pub fn load_prefs(&mut self, default_theme: Theme) -> SessionPrefs {
        // Anything other than an explicit "false" counts as enabled
        let sound_enabled = self
            .read(SOUND_ENABLED_KEY)
            .is_none_or(|value| value != "false");

        let theme = match self.read(THEME_KEY) {
            Some(value) => value.parse::<Theme>().unwrap_or_else(|e| {
                log::warn!("[session] Ignoring stored theme: {}", e);
                default_theme
            }),
            None => default_theme,
        };

        let key = self.draft_key();
        let draft_text = self.read(&key).unwrap_or_default();

        self.prefs = SessionPrefs {
            sound_enabled,
            theme,
            draft_text,
        };
        self.prefs.clone()
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.prefs.sound_enabled = enabled;
        self.write(SOUND_ENABLED_KEY, Some(if enabled { "true" } else { "false" }));
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.prefs.theme = theme;
        self.write(THEME_KEY, Some(theme.as_str()));
    }

    /// Persist composer text; an empty draft removes the key
    pub fn save_draft(&mut self, text: &str) {
        if text.is_empty() {
            self.clear_draft();
            return;
        }
        self.prefs.draft_text = text.to_string();
        let key = self.draft_key();
        self.write(&key, Some(text));
    }

    pub fn clear_draft(&mut self) {
        self.prefs.draft_text.clear();
        let key = self.draft_key();
        self.write(&key, None);
    }

    /// Saved draft text (empty when none)
    pub fn draft(&self) -> &str {
        &self.prefs.draft_text
    }

    /// Release the underlying store (used on teardown so a host can remount
    /// against the same storage)
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn read(&mut self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                let error = WidgetError::StorageUnavailable(e);
                if self.last_error.is_none() {
                    log::warn!("[session] Could not read {}: {}", key, error);
                } else {
                    log::debug!("[session] Could not read {}: {}", key, error);
                }
                self.last_error = Some(error);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: Option<&str>) {
        if self.degraded {
            return;
        }
        let result = match value {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        if let Err(e) = result {
            self.degrade(e);
        }
    }

    fn degrade(&mut self, error: StorageError) {
        let error = WidgetError::StorageUnavailable(error);
        log::warn!("[session] {}; continuing in memory only", error);
        self.degraded = true;
        self.last_error = Some(error);
    }
}
