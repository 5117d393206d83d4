//! Composer input buffer.
//!
//! Holds the text the user is drafting together with a selection range
//! (a collapsed range is the caret). Offsets are byte indices that always
//! sit on `char` boundaries.

use std::ops::Range;

/// Keys the composer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerKey {
    Enter { shift: bool },
    Escape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    text: String,
    selection: Range<usize>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text as it would be sent
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Send affordance state: enabled only for non-blank text
    pub fn can_send(&self) -> bool {
        !self.trimmed().is_empty()
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    /// Replace the whole buffer; the caret moves to the end
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let end = self.text.len();
        self.selection = end..end;
    }

    /// Select `range`, clamped to the buffer and snapped back to `char`
    /// boundaries
    pub fn select(&mut self, range: Range<usize>) {
        let start = self.floor_boundary(range.start);
        let end = self.floor_boundary(range.end).max(start);
        self.selection = start..end;
    }

    /// Insert at the caret, replacing the selection, and leave the caret
    /// after the inserted text
    pub fn insert(&mut self, s: &str) {
        let Range { start, end } = self.selection.clone();
        self.text.replace_range(start..end, s);
        let caret = start + s.len();
        self.selection = caret..caret;
    }

    /// Empty the buffer, returning what it held
    pub fn clear(&mut self) -> String {
        self.selection = 0..0;
        std::mem::take(&mut self.text)
    }

    fn floor_boundary(&self, index: usize) -> usize {
        let mut index = index.min(self.text.len());
        while !self.text.is_char_boundary(index) {
            index -= 1;
        }
        index
    }
}
