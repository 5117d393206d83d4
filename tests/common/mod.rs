//! Shared integration test helpers for chatiq.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{TestWidget, ms};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chatiq::config::WidgetConfig;
use chatiq::session::storage::{MemoryStore, StorageError};
use chatiq::sound::{SoundError, ToneSpec};
use chatiq::traits::{KeyValueStore, ToneEmitter};
use chatiq::{ChatWidget, WidgetEvent};

pub const SITE_ID: &str = "test-site";

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Config with a site id and default everything else
pub fn site_config() -> WidgetConfig {
    WidgetConfig::new().with_site_id(SITE_ID)
}

/// Key-value store whose contents survive the widget that owns it, so a
/// test can "reload the page" by mounting again on the same handle
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Rc<RefCell<MemoryStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, bypassing error handling
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).ok().flatten()
    }

    /// Simulate the user clearing site data
    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().remove(key)
    }
}

/// Store that rejects every operation (private browsing, quota exhausted)
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }
}

/// Store whose existing contents stay readable while every write is
/// rejected (quota exhausted)
pub struct ReadOnlyStore(pub SharedStore);

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }
}

/// Records every tone handed to it
#[derive(Clone, Default)]
pub struct RecordingToneEmitter {
    played: Rc<RefCell<Vec<ToneSpec>>>,
    fail: bool,
}

impl RecordingToneEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitter that fails every call (no audio device)
    pub fn failing() -> Self {
        Self {
            played: Rc::default(),
            fail: true,
        }
    }

    /// Frequencies of every tone played, in order
    pub fn frequencies(&self) -> Vec<Vec<f32>> {
        self.played
            .borrow()
            .iter()
            .map(|t| t.frequencies_hz.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.played.borrow().len()
    }
}

impl ToneEmitter for RecordingToneEmitter {
    fn emit(&mut self, tone: &ToneSpec) -> Result<(), SoundError> {
        if self.fail {
            return Err(SoundError::DeviceUnavailable("no audio device".into()));
        }
        self.played.borrow_mut().push(tone.clone());
        Ok(())
    }
}

/// A mounted widget plus handles on its collaborators
pub struct TestWidget {
    pub widget: ChatWidget,
    pub store: SharedStore,
    pub tones: RecordingToneEmitter,
}

impl TestWidget {
    pub fn mount() -> Self {
        Self::mount_with(site_config(), SharedStore::new())
    }

    pub fn mount_with(config: WidgetConfig, store: SharedStore) -> Self {
        let tones = RecordingToneEmitter::new();
        let widget = ChatWidget::mount(
            config,
            Box::new(store.clone()),
            Box::new(tones.clone()),
            false,
        )
        .expect("widget should mount");
        Self {
            widget,
            store,
            tones,
        }
    }

    /// Open the panel and let the animation finish
    pub fn open_settled(&mut self) {
        self.widget.open();
        self.widget.advance(ms(self.widget.config().timings.open_transition_ms));
    }

    /// Close the panel and let the animation finish
    pub fn close_settled(&mut self) {
        self.widget.close();
        self.widget
            .advance(ms(self.widget.config().timings.close_transition_ms));
    }

    /// Type `text` into the composer and send it
    pub fn type_and_send(&mut self, text: &str) -> bool {
        self.widget.set_composer_text(text);
        self.widget.send()
    }

    /// Drain events, keeping only those matching `pred`
    pub fn events_where(&mut self, pred: impl Fn(&WidgetEvent) -> bool) -> Vec<WidgetEvent> {
        self.widget
            .drain_events()
            .into_iter()
            .filter(|e| pred(e))
            .collect()
    }
}
