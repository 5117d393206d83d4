//! Visible effects reported to the host.
//!
//! The widget core never draws anything. Each state change that a host
//! would reflect in its UI is queued as a [`WidgetEvent`]; the host drains
//! the queue after every call (or every timer advance) and renders.

use std::collections::VecDeque;

use chatiq_config::{AccentPalette, Theme};
use serde::Serialize;

use crate::attachment::Attachment;
use crate::badge::BadgeView;
use crate::conversation::MessageEntry;
use crate::lifecycle::PanelState;
use crate::sound::SoundKind;

/// A UI-visible state change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    Mounted {
        version: String,
        site_id: String,
        visitor_id: String,
    },
    PanelStateChanged {
        state: PanelState,
    },
    BadgeChanged {
        badge: BadgeView,
    },
    TypingChanged {
        typing: bool,
    },
    MessageAppended {
        entry: MessageEntry,
    },
    QuickRepliesShown {
        replies: Vec<String>,
    },
    QuickRepliesCleared,
    ThemeChanged {
        theme: Theme,
    },
    AccentChanged {
        /// CSS custom properties, in declaration order
        variables: Vec<(String, String)>,
    },
    SoundToggled {
        enabled: bool,
    },
    SoundPlayed {
        kind: SoundKind,
    },
    DropOverlayChanged {
        visible: bool,
    },
    AttachmentStaged {
        attachment: Attachment,
    },
    AttachmentCleared,
    /// Blocking user-facing message (oversized attachment, rejected type)
    Alert {
        message: String,
    },
    EmojiPickerChanged {
        visible: bool,
    },
    ComposerChanged {
        text: String,
        can_send: bool,
    },
    ScrollToLatest {
        smooth: bool,
    },
    WelcomeDismissed,
    TornDown,
}

impl WidgetEvent {
    pub fn accent(palette: &AccentPalette) -> Self {
        WidgetEvent::AccentChanged {
            variables: palette
                .css_variables()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Event name as it appears in the JSON `type` field
    pub fn name(&self) -> &'static str {
        match self {
            WidgetEvent::Mounted { .. } => "mounted",
            WidgetEvent::PanelStateChanged { .. } => "panel_state_changed",
            WidgetEvent::BadgeChanged { .. } => "badge_changed",
            WidgetEvent::TypingChanged { .. } => "typing_changed",
            WidgetEvent::MessageAppended { .. } => "message_appended",
            WidgetEvent::QuickRepliesShown { .. } => "quick_replies_shown",
            WidgetEvent::QuickRepliesCleared => "quick_replies_cleared",
            WidgetEvent::ThemeChanged { .. } => "theme_changed",
            WidgetEvent::AccentChanged { .. } => "accent_changed",
            WidgetEvent::SoundToggled { .. } => "sound_toggled",
            WidgetEvent::SoundPlayed { .. } => "sound_played",
            WidgetEvent::DropOverlayChanged { .. } => "drop_overlay_changed",
            WidgetEvent::AttachmentStaged { .. } => "attachment_staged",
            WidgetEvent::AttachmentCleared => "attachment_cleared",
            WidgetEvent::Alert { .. } => "alert",
            WidgetEvent::EmojiPickerChanged { .. } => "emoji_picker_changed",
            WidgetEvent::ComposerChanged { .. } => "composer_changed",
            WidgetEvent::ScrollToLatest { .. } => "scroll_to_latest",
            WidgetEvent::WelcomeDismissed => "welcome_dismissed",
            WidgetEvent::TornDown => "torn_down",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// FIFO of pending events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<WidgetEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: WidgetEvent) {
        log::trace!("[events] {}", event.name());
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<WidgetEvent> {
        self.events.drain(..).collect()
    }
}
