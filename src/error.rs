//! Typed error types for the chat widget.
//!
//! Only [`WidgetError::ConfigMissing`] is fatal: it prevents the widget from
//! mounting at all. Every other variant is handled inside the widget by
//! degrading gracefully (memory-only storage, silent sound, a user-visible
//! alert for rejected attachments) and is returned to callers purely so they
//! can observe what happened.

use chatiq_config::ConfigError;
use thiserror::Error;

use crate::session::storage::StorageError;
use crate::sound::SoundError;

/// Top-level error type for the chat widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The host did not declare a site identifier; the widget does not mount.
    #[error("missing site identifier: set `site_id` in the widget configuration")]
    ConfigMissing,

    /// Durable storage rejected a read or write; state is kept in memory only.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// The attachment exceeds the configured size cap.
    #[error("file '{name}' is {size_bytes} bytes; the limit is {max_bytes} bytes")]
    FileTooLarge {
        name: String,
        size_bytes: u64,
        max_bytes: u64,
    },

    /// The attachment type is not accepted and type enforcement is on.
    #[error("file '{name}' has unsupported type '{mime_type}'")]
    UnsupportedFileType { name: String, mime_type: String },

    /// The sound subsystem failed to play a tone.
    #[error("audio unavailable: {0}")]
    AudioUnavailable(#[from] SoundError),

    /// A message author other than `user` or `bot` was supplied.
    #[error("invalid message sender '{0}' (expected user or bot)")]
    InvalidSender(String),

    /// The configuration (or a runtime override such as an accent colour)
    /// failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WidgetError {
    /// Whether this error prevents the widget from mounting
    pub fn is_fatal(&self) -> bool {
        matches!(self, WidgetError::ConfigMissing)
    }
}

/// Convenience alias used across the crate.
pub type WidgetResult<T> = Result<T, WidgetError>;
