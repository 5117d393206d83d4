//! Capability traits for the host services the widget depends on.
//!
//! The widget core never touches browser storage, audio hardware, or
//! drag-and-drop plumbing directly. Each of those is reached through one of
//! the narrow traits below so the state machines in [`crate::widget`] can be
//! unit-tested with in-memory doubles (see `tests/common/mod.rs`).
//!
//! All methods are synchronous: the widget runs on a single cooperative
//! event loop and treats storage and audio as fire-and-forget.

use crate::attachment::DropEvent;
use crate::session::storage::StorageError;
use crate::sound::{SoundError, ToneSpec};

// ── KeyValueStore ────────────────────────────────────────────────────────────

/// Durable string key-value storage scoped to a browser profile.
///
/// Implemented by [`crate::session::storage::MemoryStore`] and
/// [`crate::session::storage::FileStore`]. Every write is last-write-wins.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// ── ToneEmitter ──────────────────────────────────────────────────────────────

/// Plays short synthesized notification tones.
///
/// Implemented by `RodioToneEmitter` (feature `audio`) and
/// [`crate::sound::SilentToneEmitter`]. Errors are reported per call; the
/// caller logs and drops them.
pub trait ToneEmitter {
    fn emit(&mut self, tone: &ToneSpec) -> Result<(), SoundError>;
}

// ── FileDropSource ───────────────────────────────────────────────────────────

/// Source of drag-and-drop events over the chat panel.
///
/// The host adapts its native drag events (enter/leave pairs, including the
/// ones fired by nested child elements, and the final drop) into
/// [`DropEvent`]s; the widget pulls them with `next_event` until it returns
/// `None`.
pub trait FileDropSource {
    fn next_event(&mut self) -> Option<DropEvent>;
}

impl<T: FileDropSource + ?Sized> FileDropSource for &mut T {
    fn next_event(&mut self) -> Option<DropEvent> {
        (**self).next_event()
    }
}

impl FileDropSource for std::collections::VecDeque<DropEvent> {
    fn next_event(&mut self) -> Option<DropEvent> {
        self.pop_front()
    }
}
