//! The mounted chat widget.
//!
//! [`ChatWidget`] ties the session store, panel lifecycle, conversation log,
//! attachment staging and timer queue together behind the runtime API a
//! host page calls (`open`, `send_message`, `simulate_message`, ...).
//!
//! Everything runs on the caller's thread. Delayed work is queued on a
//! virtual clock; the host calls [`ChatWidget::advance`] from its event
//! loop and drains [`WidgetEvent`]s to render.

use std::time::Duration;

use chatiq_config::{AccentPalette, Theme, WidgetConfig};

use crate::attachment::{
    Attachment, AttachmentStaging, DropEvent, DropTracker, FileDescriptor, format_file_size,
};
use crate::badge::{BadgeView, UnreadBadge};
use crate::composer::{Composer, ComposerKey};
use crate::conversation::{ConversationLog, MessageEntry, QuickReplyTray, Sender};
use crate::emoji::EmojiPicker;
use crate::error::{WidgetError, WidgetResult};
use crate::events::{EventQueue, WidgetEvent};
use crate::lifecycle::{LifecycleController, PanelIntent, PanelState, Transition};
use crate::scheduler::{Fired, Scheduler, TaskGroup};
use crate::session::SessionStore;
use crate::sound::{SoundKind, SoundPlayer};
use crate::traits::{FileDropSource, KeyValueStore, ToneEmitter};

/// Realtime endpoint reserved for a future backend connection
pub const API_URL: &str = "wss://api.chatiq.io";

/// Deferred work queued on the widget's scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
enum WidgetAction {
    ShowTyping,
    DeliverBotReply {
        text: String,
        quick_replies: Option<Vec<String>>,
    },
    ShowQuickReplies(Vec<String>),
    SettleTransition,
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

pub struct ChatWidget {
    config: WidgetConfig,
    session: SessionStore,
    visitor_id: String,
    sound: SoundPlayer,

    lifecycle: LifecycleController,
    badge: UnreadBadge,

    log: ConversationLog,
    quick_replies: QuickReplyTray,
    typing: bool,
    welcome_visible: bool,

    staging: AttachmentStaging,
    drop_tracker: DropTracker,
    composer: Composer,
    emoji_picker: EmojiPicker,

    theme: Theme,
    accent: AccentPalette,

    scheduler: Scheduler<WidgetAction>,
    /// Group of the most recent canned reply sequence
    reply_group: Option<TaskGroup>,
    /// Group whose `ShowTyping` put the indicator up
    typing_group: Option<TaskGroup>,

    events: EventQueue,
    torn_down: bool,
}

impl ChatWidget {
    /// Mount a widget.
    ///
    /// Fails with [`WidgetError::ConfigMissing`] when the configuration has
    /// no site identifier; nothing is created in that case. `system_prefers_dark`
    /// is the OS colour-scheme signal used to resolve an `auto` theme.
    pub fn mount(
        config: WidgetConfig,
        store: Box<dyn KeyValueStore>,
        emitter: Box<dyn ToneEmitter>,
        system_prefers_dark: bool,
    ) -> WidgetResult<Self> {
        let Some(site_id) = config.site_id().map(str::to_string) else {
            log::warn!("[chatiq] Missing site identifier; widget not mounted");
            return Err(WidgetError::ConfigMissing);
        };
        config.validate()?;
        let accent = config.accent_palette()?;

        let mut session = SessionStore::new(store, site_id.clone());
        let visitor_id = session.get_or_create_visitor_id();
        let prefs = session.load_prefs(config.theme.resolve(system_prefers_dark));

        log::info!("[chatiq] Widget v{} initialized", crate::VERSION);
        log::info!("[chatiq] Site ID: {}", site_id);
        log::info!("[chatiq] Visitor ID: {}", visitor_id);

        let mut widget = Self {
            staging: AttachmentStaging::from_config(&config),
            config,
            session,
            visitor_id: visitor_id.clone(),
            sound: SoundPlayer::new(emitter, prefs.sound_enabled),
            lifecycle: LifecycleController::new(),
            badge: UnreadBadge::new(),
            log: ConversationLog::new(),
            quick_replies: QuickReplyTray::new(),
            typing: false,
            welcome_visible: true,
            drop_tracker: DropTracker::new(),
            composer: Composer::new(),
            emoji_picker: EmojiPicker::new(),
            theme: prefs.theme,
            accent,
            scheduler: Scheduler::new(),
            reply_group: None,
            typing_group: None,
            events: EventQueue::new(),
            torn_down: false,
        };

        widget.events.push(WidgetEvent::Mounted {
            version: crate::VERSION.to_string(),
            site_id,
            visitor_id,
        });
        widget.events.push(WidgetEvent::ThemeChanged {
            theme: widget.theme,
        });
        widget.events.push(WidgetEvent::accent(&widget.accent));
        Ok(widget)
    }

    /// Stop all timers and reset the panel, queueing
    /// [`WidgetEvent::TornDown`] for the host. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let cancelled = self.scheduler.cancel_all();
        self.reply_group = None;
        self.set_typing(false);
        self.lifecycle.reset();
        log::info!(
            "[chatiq] Widget torn down ({} pending timers cancelled)",
            cancelled
        );
        self.events.push(WidgetEvent::TornDown);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Shut down and hand back the storage so a host can remount
    pub fn teardown(mut self) -> Box<dyn KeyValueStore> {
        self.shutdown();
        self.session.into_store()
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn version(&self) -> &'static str {
        crate::VERSION
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn site_id(&self) -> &str {
        self.session.site_id()
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    pub fn panel_state(&self) -> PanelState {
        self.lifecycle.state()
    }

    /// Open or opening
    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn unread_count(&self) -> u32 {
        self.badge.count()
    }

    pub fn badge(&self) -> BadgeView {
        self.badge.view(self.is_open())
    }

    pub fn messages(&self) -> &[MessageEntry] {
        self.log.entries()
    }

    pub fn quick_replies(&self) -> Option<&[String]> {
        self.quick_replies.active()
    }

    pub fn staged_attachment(&self) -> Option<&Attachment> {
        self.staging.staged()
    }

    /// Accept-filter string for the host's file picker
    pub fn file_accept_filter(&self) -> String {
        self.staging.accept_filter()
    }

    pub fn drop_overlay_visible(&self) -> bool {
        self.drop_tracker.overlay_visible()
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn emoji_picker(&self) -> &EmojiPicker {
        &self.emoji_picker
    }

    pub fn welcome_visible(&self) -> bool {
        self.welcome_visible
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn accent(&self) -> &AccentPalette {
        &self.accent
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound.is_enabled()
    }

    /// Saved draft for this site
    pub fn draft(&self) -> &str {
        self.session.draft()
    }

    pub fn storage_degraded(&self) -> bool {
        self.session.is_degraded()
    }

    /// Last storage failure swallowed by the session store
    pub fn storage_error(&self) -> Option<&WidgetError> {
        self.session.last_error()
    }

    // ── Panel lifecycle ──────────────────────────────────────────────────

    pub fn open(&mut self) {
        self.request_panel(PanelIntent::Open);
    }

    pub fn close(&mut self) {
        self.request_panel(PanelIntent::Close);
    }

    pub fn toggle(&mut self) {
        self.request_panel(PanelIntent::Toggle);
    }

    fn request_panel(&mut self, intent: PanelIntent) {
        if let Some(transition) = self.lifecycle.request(intent) {
            self.begin_transition(transition);
        }
    }

    fn begin_transition(&mut self, transition: Transition) {
        self.events.push(WidgetEvent::PanelStateChanged {
            state: transition.state(),
        });

        let delay = match transition {
            Transition::Opening => {
                self.badge.clear();
                self.push_badge();

                let draft = self.session.draft().to_string();
                if !draft.is_empty() {
                    self.composer.set_text(draft);
                    self.push_composer();
                }
                self.events.push(WidgetEvent::ScrollToLatest { smooth: false });
                self.config.timings.open_transition_ms
            }
            Transition::Closing => {
                self.hide_emoji_picker();
                if self.composer.can_send() {
                    let text = self.composer.text().to_string();
                    self.session.save_draft(&text);
                }
                self.push_badge();
                self.config.timings.close_transition_ms
            }
        };

        let group = self.scheduler.new_group();
        self.scheduler
            .schedule(group, millis(delay), WidgetAction::SettleTransition);
    }

    fn settle_transition(&mut self) {
        let follow_up = self.lifecycle.settle();
        crate::debug_log!(
            "LIFECYCLE",
            "Settled {} at {}ms{}",
            self.lifecycle.state().as_str(),
            self.scheduler.now().as_millis(),
            if follow_up.is_some() {
                " (deferred request pending)"
            } else {
                ""
            }
        );
        self.events.push(WidgetEvent::PanelStateChanged {
            state: self.lifecycle.state(),
        });
        if let Some(transition) = follow_up {
            self.begin_transition(transition);
        }
    }

    // ── Badge ────────────────────────────────────────────────────────────

    pub fn set_unread_count(&mut self, count: u32) {
        self.badge.set(count);
        self.push_badge();
    }

    fn push_badge(&mut self) {
        self.events.push(WidgetEvent::BadgeChanged {
            badge: self.badge(),
        });
    }

    // ── Conversation ─────────────────────────────────────────────────────

    /// Append a message from `from` (`"user"` or `"bot"`) with the usual
    /// badge and sound side effects. Blank text without an attachment is
    /// ignored and yields `Ok(None)`.
    pub fn append_message(
        &mut self,
        text: &str,
        from: &str,
        attachment: Option<Attachment>,
    ) -> WidgetResult<Option<MessageEntry>> {
        let from: Sender = from.parse()?;
        Ok(self.push_message(text, from, attachment))
    }

    fn push_message(
        &mut self,
        text: &str,
        from: Sender,
        attachment: Option<Attachment>,
    ) -> Option<MessageEntry> {
        let entry = self.log.append(text, from, attachment)?.clone();

        self.set_typing(false);
        self.dismiss_welcome();
        self.events.push(WidgetEvent::MessageAppended {
            entry: entry.clone(),
        });
        self.events.push(WidgetEvent::ScrollToLatest { smooth: true });

        match from {
            Sender::Bot if !self.is_open() => {
                self.badge.increment();
                self.push_badge();
                self.play_sound(SoundKind::Notification);
            }
            Sender::Bot => {
                self.play_sound(SoundKind::Receive);
            }
            Sender::User => {
                self.play_sound(SoundKind::Send);
            }
        }

        log::debug!(
            "[conversation] #{} from {} ({} chars{})",
            entry.index,
            entry.from,
            entry.text.chars().count(),
            if entry.attachment.is_some() {
                ", with attachment"
            } else {
                ""
            }
        );
        Some(entry)
    }

    /// Send the composer contents and any staged attachment, then start the
    /// simulated reply. Returns `false` (and does nothing) when there is
    /// nothing to send.
    pub fn send(&mut self) -> bool {
        let text = self.composer.trimmed().to_string();
        if text.is_empty() && self.staging.staged().is_none() {
            return false;
        }

        let attachment = self.staging.take();
        let attachment_name = attachment.as_ref().map(|a| a.name.clone());
        let label = if text.is_empty() {
            self.config.attachment_placeholder.clone()
        } else {
            text
        };

        if self.push_message(&label, Sender::User, attachment).is_none() {
            return false;
        }

        // Input is cleared only once the entry is in the log
        self.composer.clear();
        self.push_composer();
        self.session.clear_draft();
        if attachment_name.is_some() {
            self.events.push(WidgetEvent::AttachmentCleared);
        }

        log::info!(
            "[conversation] Message sent (site={}, visitor={}, attachment={:?})",
            self.session.site_id(),
            self.visitor_id,
            attachment_name
        );

        self.start_canned_reply();
        true
    }

    /// Append a user-authored message without touching the composer and
    /// without a simulated reply
    pub fn send_message(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Option<MessageEntry> {
        self.push_message(text, Sender::User, attachment)
    }

    fn start_canned_reply(&mut self) {
        if let Some(previous) = self.reply_group.take() {
            let cancelled = self.scheduler.cancel_group(previous);
            if cancelled > 0 {
                log::debug!(
                    "[conversation] Superseded reply sequence {} ({} timers)",
                    previous.epoch(),
                    cancelled
                );
            }
            if self.typing_group == Some(previous) {
                self.set_typing(false);
            }
        }

        let timings = self.config.timings;
        let group = self.scheduler.new_group();
        self.reply_group = Some(group);
        self.scheduler.schedule(
            group,
            millis(timings.typing_delay_ms),
            WidgetAction::ShowTyping,
        );
        self.scheduler.schedule(
            group,
            millis(timings.typing_delay_ms.saturating_add(timings.reply_delay_ms)),
            WidgetAction::DeliverBotReply {
                text: self.config.canned_reply.clone(),
                quick_replies: Some(self.config.canned_quick_replies.clone()),
            },
        );
    }

    /// Push a bot message through the typing sequence: typing shows now,
    /// the message follows after the injected-reply delay, then the quick
    /// replies if any
    pub fn simulate_message(&mut self, text: &str, quick_replies: Option<Vec<String>>) {
        let group = self.scheduler.new_group();
        self.show_typing(group);
        self.scheduler.schedule(
            group,
            millis(self.config.timings.injected_reply_delay_ms),
            WidgetAction::DeliverBotReply {
                text: text.to_string(),
                quick_replies,
            },
        );
    }

    /// Replace the active quick-reply set
    pub fn show_quick_replies(&mut self, replies: Vec<String>) {
        let was_active = self.quick_replies.is_active();
        match self.quick_replies.show(replies) {
            Some(shown) => {
                let replies = shown.to_vec();
                self.events.push(WidgetEvent::QuickRepliesShown { replies });
                self.events.push(WidgetEvent::ScrollToLatest { smooth: true });
            }
            None if was_active => self.events.push(WidgetEvent::QuickRepliesCleared),
            None => {}
        }
    }

    /// Send `text` as if typed. The active suggestions are retired only
    /// once the message is actually sent.
    pub fn select_quick_reply(&mut self, text: &str) -> bool {
        self.set_composer_text(text);
        let sent = self.send();
        if sent && self.quick_replies.clear() {
            self.events.push(WidgetEvent::QuickRepliesCleared);
        }
        sent
    }

    fn show_typing(&mut self, group: TaskGroup) {
        self.typing_group = Some(group);
        self.dismiss_welcome();
        if !self.typing {
            self.set_typing(true);
            self.events.push(WidgetEvent::ScrollToLatest { smooth: true });
        }
    }

    fn set_typing(&mut self, typing: bool) {
        if self.typing == typing {
            return;
        }
        self.typing = typing;
        if !typing {
            self.typing_group = None;
        }
        self.events.push(WidgetEvent::TypingChanged { typing });
    }

    // ── Timers ───────────────────────────────────────────────────────────

    /// Run every timer due within `delta`, including follow-ups scheduled
    /// by those timers. Returns how many fired.
    pub fn advance(&mut self, delta: Duration) -> usize {
        let until = self.scheduler.now().saturating_add(delta);
        let mut fired = 0;
        while let Some(timer) = self.scheduler.pop_due(until) {
            self.run_action(timer);
            fired += 1;
        }
        self.scheduler.settle(until);
        fired
    }

    /// Run timers until none remain
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            fired += self.advance(due.saturating_sub(self.scheduler.now()));
        }
        fired
    }

    /// Time until the next timer fires
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.scheduler.now()))
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Virtual time since mount
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    fn run_action(&mut self, timer: Fired<WidgetAction>) {
        crate::debug_trace!(
            "SCHEDULER",
            "t={}ms group={} {:?}",
            timer.at.as_millis(),
            timer.group.epoch(),
            timer.action
        );
        match timer.action {
            WidgetAction::ShowTyping => self.show_typing(timer.group),
            WidgetAction::DeliverBotReply {
                text,
                quick_replies,
            } => {
                self.push_message(&text, Sender::Bot, None);
                if let Some(replies) = quick_replies {
                    self.scheduler.schedule(
                        timer.group,
                        millis(self.config.timings.quick_replies_delay_ms),
                        WidgetAction::ShowQuickReplies(replies),
                    );
                }
            }
            WidgetAction::ShowQuickReplies(replies) => self.show_quick_replies(replies),
            WidgetAction::SettleTransition => self.settle_transition(),
        }
    }

    // ── Preferences ──────────────────────────────────────────────────────

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.session.set_theme(theme);
        self.events.push(WidgetEvent::ThemeChanged { theme });
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.toggled();
        self.set_theme(theme);
        theme
    }

    /// OS colour-scheme change; only honoured when the configured theme is
    /// `auto`. Returns whether the theme was applied.
    pub fn system_theme_changed(&mut self, prefers_dark: bool) -> bool {
        if !self.config.theme.is_auto() {
            return false;
        }
        self.set_theme(Theme::from_dark_flag(prefers_dark));
        true
    }

    /// Flip the sound preference; turning it on plays the notification
    /// chime as confirmation. Returns the new state.
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = !self.sound.is_enabled();
        self.sound.set_enabled(enabled);
        self.session.set_sound_enabled(enabled);
        self.events.push(WidgetEvent::SoundToggled { enabled });
        if enabled {
            self.play_sound(SoundKind::Notification);
        }
        enabled
    }

    /// Play a tone if sound is enabled; returns whether it played
    pub fn play_sound(&mut self, kind: SoundKind) -> bool {
        let played = self.sound.play(kind);
        if played {
            self.events.push(WidgetEvent::SoundPlayed { kind });
        }
        played
    }

    /// Recompute the accent palette. An invalid colour leaves the current
    /// palette in place.
    pub fn set_accent_color(&mut self, hex: &str) -> WidgetResult<&AccentPalette> {
        let palette = AccentPalette::from_hex(hex)?;
        self.config.accent_color = palette.base.to_hex();
        self.events.push(WidgetEvent::accent(&palette));
        self.accent = palette;
        Ok(&self.accent)
    }

    // ── Attachments ──────────────────────────────────────────────────────

    /// Stage a file from the picker or a drop. Rejections surface as an
    /// [`WidgetEvent::Alert`] and leave the previous attachment staged.
    pub fn stage_file(&mut self, file: &FileDescriptor) -> WidgetResult<Attachment> {
        match self.staging.stage(file) {
            Ok(attachment) => {
                let attachment = attachment.clone();
                log::debug!(
                    "[attachment] Staged '{}' ({})",
                    attachment.name,
                    attachment.size_label
                );
                self.events.push(WidgetEvent::AttachmentStaged {
                    attachment: attachment.clone(),
                });
                Ok(attachment)
            }
            Err(e) => {
                log::warn!("[attachment] Rejected '{}': {}", file.name, e);
                self.events.push(WidgetEvent::Alert {
                    message: alert_message(&e),
                });
                Err(e)
            }
        }
    }

    /// Discard the staged attachment
    pub fn clear_attachment(&mut self) {
        if self.staging.clear() {
            self.events.push(WidgetEvent::AttachmentCleared);
        }
    }

    /// Apply one drag-and-drop event. A drop stages its first file.
    pub fn handle_drop_event(&mut self, event: DropEvent) -> WidgetResult<Option<Attachment>> {
        match event {
            DropEvent::Enter => {
                if self.drop_tracker.enter() {
                    self.events
                        .push(WidgetEvent::DropOverlayChanged { visible: true });
                }
            }
            DropEvent::Leave => {
                if self.drop_tracker.leave() {
                    self.events
                        .push(WidgetEvent::DropOverlayChanged { visible: false });
                }
            }
            DropEvent::Over => {}
            DropEvent::Drop(files) => {
                if self.drop_tracker.drop_files() {
                    self.events
                        .push(WidgetEvent::DropOverlayChanged { visible: false });
                }
                if let Some(file) = files.first() {
                    return self.stage_file(file).map(Some);
                }
            }
        }
        Ok(None)
    }

    /// Drain `source`, applying each event. Rejected drops are already
    /// reported as alerts, so errors are not returned. Returns the number of
    /// events handled.
    pub fn pump_drops(&mut self, source: &mut impl FileDropSource) -> usize {
        let mut handled = 0;
        while let Some(event) = source.next_event() {
            // Rejections were already surfaced as an Alert
            let _ = self.handle_drop_event(event);
            handled += 1;
        }
        handled
    }

    // ── Composer ─────────────────────────────────────────────────────────

    /// Replace the composer text (user typing); the draft is saved on every
    /// change
    pub fn set_composer_text(&mut self, text: &str) {
        self.composer.set_text(text);
        self.session.save_draft(text);
        self.push_composer();
    }

    /// Move the composer selection (byte offsets)
    pub fn select_composer_range(&mut self, range: std::ops::Range<usize>) {
        self.composer.select(range);
    }

    pub fn handle_key(&mut self, key: ComposerKey) -> bool {
        match key {
            ComposerKey::Enter { shift: false } => self.send(),
            ComposerKey::Enter { shift: true } => {
                self.composer.insert("\n");
                self.after_composer_edit();
                true
            }
            ComposerKey::Escape => {
                if !self.is_open() {
                    return false;
                }
                self.close();
                self.hide_emoji_picker();
                true
            }
        }
    }

    fn after_composer_edit(&mut self) {
        let text = self.composer.text().to_string();
        self.session.save_draft(&text);
        self.push_composer();
    }

    fn push_composer(&mut self) {
        self.events.push(WidgetEvent::ComposerChanged {
            text: self.composer.text().to_string(),
            can_send: self.composer.can_send(),
        });
    }

    // ── Emoji picker ─────────────────────────────────────────────────────

    pub fn toggle_emoji_picker(&mut self) -> bool {
        let visible = self.emoji_picker.toggle();
        self.events.push(WidgetEvent::EmojiPickerChanged { visible });
        visible
    }

    pub fn set_emoji_filter(&mut self, filter: &str) -> Vec<&'static str> {
        self.emoji_picker.set_filter(filter);
        self.emoji_picker.visible_emojis()
    }

    /// Insert `emoji` at the composer caret and close the picker
    pub fn insert_emoji(&mut self, emoji: &str) {
        self.composer.insert(emoji);
        self.after_composer_edit();
        self.hide_emoji_picker();
    }

    /// Click outside the picker
    pub fn outside_click(&mut self) {
        self.hide_emoji_picker();
    }

    fn hide_emoji_picker(&mut self) {
        if self.emoji_picker.hide() {
            self.events
                .push(WidgetEvent::EmojiPickerChanged { visible: false });
        }
    }

    // ── Welcome ──────────────────────────────────────────────────────────

    /// "Start a conversation" on the welcome card
    pub fn start(&mut self) {
        self.dismiss_welcome();
    }

    fn dismiss_welcome(&mut self) {
        if self.welcome_visible {
            self.welcome_visible = false;
            self.events.push(WidgetEvent::WelcomeDismissed);
        }
    }

    // ── Events ───────────────────────────────────────────────────────────

    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

fn alert_message(error: &WidgetError) -> String {
    match error {
        WidgetError::FileTooLarge { max_bytes, .. } => {
            format!("File size must be less than {}", format_file_size(*max_bytes))
        }
        WidgetError::UnsupportedFileType { name, .. } => {
            format!("'{name}' is not a supported file type")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStore;
    use crate::sound::SilentToneEmitter;

    fn mount() -> ChatWidget {
        ChatWidget::mount(
            WidgetConfig::new().with_site_id("unit"),
            Box::new(MemoryStore::new()),
            Box::new(SilentToneEmitter),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_mount_requires_site_id() {
        let result = ChatWidget::mount(
            WidgetConfig::new(),
            Box::new(MemoryStore::new()),
            Box::new(SilentToneEmitter),
            false,
        );
        assert!(matches!(result, Err(WidgetError::ConfigMissing)));
    }

    #[test]
    fn test_mount_emits_initial_state() {
        let mut widget = mount();
        let events = widget.drain_events();
        assert!(matches!(events[0], WidgetEvent::Mounted { .. }));
        assert!(events.contains(&WidgetEvent::ThemeChanged { theme: Theme::Light }));
        assert_eq!(widget.panel_state(), PanelState::Closed);
        assert!(widget.welcome_visible());
    }

    #[test]
    fn test_alert_messages() {
        let too_large = WidgetError::FileTooLarge {
            name: "x".into(),
            size_bytes: 11,
            max_bytes: 10 * 1024 * 1024,
        };
        assert_eq!(alert_message(&too_large), "File size must be less than 10.0 MB");
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut widget = mount();
        widget.set_composer_text("line");
        assert!(widget.handle_key(ComposerKey::Enter { shift: true }));
        assert_eq!(widget.composer().text(), "line\n");
        assert!(widget.messages().is_empty());
        assert_eq!(widget.draft(), "line\n");
    }

    #[test]
    fn test_escape_only_when_open() {
        let mut widget = mount();
        assert!(!widget.handle_key(ComposerKey::Escape));
        widget.open();
        widget.advance(Duration::from_millis(300));
        widget.toggle_emoji_picker();
        assert!(widget.handle_key(ComposerKey::Escape));
        assert_eq!(widget.panel_state(), PanelState::Closing);
        assert!(!widget.emoji_picker().is_visible());
    }

    #[test]
    fn test_welcome_dismissed_by_start() {
        let mut widget = mount();
        widget.drain_events();
        widget.start();
        widget.start();
        assert_eq!(widget.drain_events(), vec![WidgetEvent::WelcomeDismissed]);
    }

    #[test]
    fn test_run_until_idle_drains_reply_sequence() {
        let mut widget = mount();
        widget.set_composer_text("hi");
        widget.send();
        // typing, bot reply, quick replies
        assert_eq!(widget.run_until_idle(), 3);
        assert_eq!(widget.elapsed(), Duration::from_millis(2400));
        assert!(widget.quick_replies().is_some());
        assert_eq!(widget.next_timer_in(), None);
    }
}
