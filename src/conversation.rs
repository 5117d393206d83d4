//! Conversation log and quick-reply suggestions.
//!
//! The log is append-only: entries are displayed in insertion order and are
//! never edited or removed. Timestamps are captured at append time for
//! display only and play no part in ordering.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::error::WidgetError;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(WidgetError::InvalidSender(other.to_string())),
        }
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// Position in the log, starting at 0
    pub index: usize,
    pub text: String,
    pub from: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl MessageEntry {
    /// Display time in the viewer's local zone
    pub fn display_time(&self) -> String {
        format_time(&self.timestamp.with_timezone(&Local))
    }

    /// Text escaped for hosts that render markup
    pub fn html_text(&self) -> String {
        escape_html(&self.text)
    }
}

/// Ordered, append-only message history
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<MessageEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current time. Returns `None` (and
    /// appends nothing) when both the text and the attachment are empty.
    pub fn append(
        &mut self,
        text: &str,
        from: Sender,
        attachment: Option<Attachment>,
    ) -> Option<&MessageEntry> {
        self.append_at(text, from, attachment, Utc::now())
    }

    pub fn append_at(
        &mut self,
        text: &str,
        from: Sender,
        attachment: Option<Attachment>,
        timestamp: DateTime<Utc>,
    ) -> Option<&MessageEntry> {
        if text.trim().is_empty() && attachment.is_none() {
            return None;
        }

        let index = self.entries.len();
        self.entries.push(MessageEntry {
            index,
            text: text.to_string(),
            from,
            timestamp,
            attachment,
        });
        self.entries.last()
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_from(&self, from: Sender) -> usize {
        self.entries.iter().filter(|e| e.from == from).count()
    }
}

/// The single active set of quick-reply suggestions
#[derive(Debug, Clone, Default)]
pub struct QuickReplyTray {
    active: Option<Vec<String>>,
}

impl QuickReplyTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `replies`, replacing any active set. Blank entries are dropped;
    /// an empty list clears the tray. Returns the set now shown.
    pub fn show(&mut self, replies: Vec<String>) -> Option<&[String]> {
        let replies: Vec<String> = replies
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        self.active = if replies.is_empty() {
            None
        } else {
            Some(replies)
        };
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&[String]> {
        self.active.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Clear the tray; returns whether a set was showing
    pub fn clear(&mut self) -> bool {
        self.active.take().is_some()
    }
}

/// `h:mm AM/PM`, as shown under each message bubble
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("%-I:%M %p").to_string()
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_sender_parse() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!("bot".parse::<Sender>().unwrap(), Sender::Bot);
        let err = "agent".parse::<Sender>().unwrap_err();
        assert!(matches!(err, WidgetError::InvalidSender(ref s) if s == "agent"));
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new();
        log.append("one", Sender::User, None);
        log.append("two", Sender::Bot, None);
        log.append("three", Sender::User, None);

        let texts: Vec<_> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        let indices: Vec<_> = log.entries().iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(log.count_from(Sender::User), 2);
    }

    #[test]
    fn test_timestamps_do_not_reorder() {
        let mut log = ConversationLog::new();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        log.append_at("first", Sender::User, None, later);
        log.append_at("second", Sender::Bot, None, earlier);
        assert_eq!(log.entries()[0].text, "first");
        assert_eq!(log.last().map(|e| e.text.as_str()), Some("second"));
    }

    #[test]
    fn test_empty_append_rejected() {
        let mut log = ConversationLog::new();
        assert!(log.append("   ", Sender::User, None).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_quick_reply_tray() {
        let mut tray = QuickReplyTray::new();
        assert!(!tray.clear());
        tray.show(vec!["A".into(), "B".into()]);
        tray.show(vec!["C".into(), "  ".into()]);
        assert_eq!(tray.active(), Some(&["C".to_string()][..]));
        assert!(tray.show(Vec::new()).is_none());
        assert!(!tray.is_active());
    }

    #[test]
    fn test_format_time() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let morning = tz.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap();
        let evening = tz.with_ymd_and_hms(2024, 3, 5, 21, 30, 0).unwrap();
        let midnight = tz.with_ymd_and_hms(2024, 3, 5, 0, 5, 0).unwrap();
        assert_eq!(format_time(&morning), "9:07 AM");
        assert_eq!(format_time(&evening), "9:30 PM");
        assert_eq!(format_time(&midnight), "12:05 AM");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain 😀"), "plain 😀");
    }
}
