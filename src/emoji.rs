//! Emoji picker state.

/// Emoji offered by the picker, in display order
pub const EMOJIS: &[&str] = &[
    "😀", "😃", "😄", "😁", "😅", "😂", "🤣", "😊", "😇", "🙂", "🙃", "😉", "😌", "😍", "🥰", "😘",
    "😋", "😛", "😜", "🤪", "🤨", "🧐", "🤓", "😎", "🤩", "🥳", "😏", "😒", "😞", "😔", "😟", "😕",
    "🙁", "😣", "😖", "😫", "😩", "🥺", "😢", "😭", "😤", "😠", "😡", "🤯", "😳", "😱", "😨", "😰",
    "🤗", "🤔", "🤭", "🤫", "😶", "😐", "😑", "😬", "🙄", "😯", "😮", "😲", "🥱", "😴", "🤤", "😷",
    "👍", "👎", "👌", "✌️", "🤞", "🤟", "🤘", "🤙", "👈", "👉", "👆", "👇", "☝️", "✋", "👋", "🤝",
    "💪", "🙏", "✍️", "🔥", "⭐", "✨", "💫", "💥", "💯", "💬", "👀", "❤️", "🧡", "💛", "💚", "💙",
    "💜", "🖤", "🤍", "💔", "🎉", "🎊", "🎈", "🎁", "🏆", "🥇", "⚽", "🏀",
];

/// Emoji whose text contains `filter`. An empty filter matches everything.
pub fn filter_emojis(filter: &str) -> Vec<&'static str> {
    let filter = filter.trim().to_lowercase();
    EMOJIS
        .iter()
        .copied()
        .filter(|emoji| filter.is_empty() || emoji.contains(filter.as_str()))
        .collect()
}

/// Visibility and search state of the picker popover
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiPicker {
    visible: bool,
    filter: String,
}

impl EmojiPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility; returns the new state
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Hide the picker; returns whether it was visible
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Grid contents for the current filter
    pub fn visible_emojis(&self) -> Vec<&'static str> {
        filter_emojis(&self.filter)
    }
}
