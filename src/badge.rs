//! Unread badge on the launcher.
//!
//! The badge shows how many bot messages arrived while the panel was not
//! open. Counts above [`BADGE_DISPLAY_CAP`] render as `"9+"`. While the panel
//! is not open a non-zero badge also pulses to draw attention.

use serde::Serialize;

/// Largest count rendered verbatim
pub const BADGE_DISPLAY_CAP: u32 = 9;

/// Render an unread count for display; `None` when the badge is hidden
pub fn format_badge_count(count: u32) -> Option<String> {
    match count {
        0 => None,
        n if n > BADGE_DISPLAY_CAP => Some(format!("{BADGE_DISPLAY_CAP}+")),
        n => Some(n.to_string()),
    }
}

/// What the host should draw on the launcher
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BadgeView {
    pub count: u32,
    /// Rendered count, `None` when the badge is hidden
    pub text: Option<String>,
    /// Attention animation
    pub pulse: bool,
}

impl BadgeView {
    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }
}

/// Unread counter owned by the lifecycle controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadBadge {
    count: u32,
}

impl UnreadBadge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn set(&mut self, count: u32) {
        self.count = count;
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Badge appearance given whether the panel is (becoming) open
    pub fn view(&self, panel_open: bool) -> BadgeView {
        BadgeView {
            count: self.count,
            text: format_badge_count(self.count),
            pulse: self.count > 0 && !panel_open,
        }
    }
}
