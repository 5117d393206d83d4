//! Attachment staging.
//!
//! At most one file is staged at a time. It rides along with the next send
//! and is then cleared. Files reach staging from the file picker or from a
//! drop on the panel; both paths go through the same validation.

use base64::Engine as _;
use chatiq_config::WidgetConfig;
use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};

/// A file offered by the host (picker selection or drop)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    /// File contents when the host has read them; used for image previews
    pub contents: Vec<u8>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: contents.len() as u64,
            contents,
        }
    }

    /// Descriptor known only by its metadata
    pub fn metadata_only(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            contents: Vec::new(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Lower-cased extension including the dot (`.pdf`)
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(format!(".{}", ext.to_ascii_lowercase()))
    }
}

/// Coarse kind of an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentCategory {
    Image,
    File,
}

/// Thumbnail shown in the composer and in the sent message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttachmentPreview {
    /// Inline image rendered locally from the file contents
    Image { data_url: String },
    /// Generic document glyph
    FileGlyph,
}

/// A validated, staged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size_bytes: u64,
    pub category: AttachmentCategory,
    pub preview: AttachmentPreview,
    /// Human readable size (`"3.4 KB"`)
    pub size_label: String,
}

impl Attachment {
    pub fn from_file(file: &FileDescriptor) -> Self {
        let category = if file.is_image() {
            AttachmentCategory::Image
        } else {
            AttachmentCategory::File
        };

        let preview = if file.is_image() && !file.contents.is_empty() {
            AttachmentPreview::Image {
                data_url: data_url(&file.mime_type, &file.contents),
            }
        } else {
            AttachmentPreview::FileGlyph
        };

        Self {
            name: file.name.clone(),
            size_bytes: file.size_bytes,
            category,
            preview,
            size_label: format_file_size(file.size_bytes),
        }
    }
}

fn data_url(mime_type: &str, contents: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(contents);
    format!("data:{mime_type};base64,{encoded}")
}

/// Format a byte count for display (B, KB with one decimal, MB with one decimal)
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Whether `file` matches one accept pattern: a MIME wildcard (`image/*`),
/// an exact MIME type, or an extension (`.txt`)
pub fn matches_accept_pattern(file: &FileDescriptor, pattern: &str) -> bool {
    let pattern = pattern.trim().to_ascii_lowercase();
    let mime = file.mime_type.to_ascii_lowercase();

    if pattern.starts_with('.') {
        file.extension().is_some_and(|ext| ext == pattern)
    } else if let Some(prefix) = pattern.strip_suffix("/*") {
        mime.split_once('/').is_some_and(|(kind, _)| kind == prefix)
    } else {
        mime == pattern
    }
}

/// Holds the single pending attachment
#[derive(Debug, Clone)]
pub struct AttachmentStaging {
    staged: Option<Attachment>,
    max_file_size_bytes: u64,
    accepted_file_types: Vec<String>,
    enforce_file_types: bool,
}

impl AttachmentStaging {
    pub fn new(max_file_size_bytes: u64) -> Self {
        Self {
            staged: None,
            max_file_size_bytes,
            accepted_file_types: Vec::new(),
            enforce_file_types: false,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            staged: None,
            max_file_size_bytes: config.max_file_size_bytes,
            accepted_file_types: config.accepted_file_types.clone(),
            enforce_file_types: config.enforce_file_types,
        }
    }

    /// Accept-filter string for the host's file picker
    pub fn accept_filter(&self) -> String {
        self.accepted_file_types.join(",")
    }

    pub fn is_accepted(&self, file: &FileDescriptor) -> bool {
        self.accepted_file_types
            .iter()
            .any(|pattern| matches_accept_pattern(file, pattern))
    }

    /// Validate and stage `file`, replacing any staged attachment. On error
    /// the previously staged attachment is left untouched.
    pub fn stage(&mut self, file: &FileDescriptor) -> WidgetResult<&Attachment> {
        if file.size_bytes > self.max_file_size_bytes {
            return Err(WidgetError::FileTooLarge {
                name: file.name.clone(),
                size_bytes: file.size_bytes,
                max_bytes: self.max_file_size_bytes,
            });
        }

        if !self.is_accepted(file) {
            if self.enforce_file_types {
                return Err(WidgetError::UnsupportedFileType {
                    name: file.name.clone(),
                    mime_type: file.mime_type.clone(),
                });
            }
            log::debug!(
                "[attachment] Staging '{}' ({}) outside the accept list",
                file.name,
                file.mime_type
            );
        }

        Ok(&*self.staged.insert(Attachment::from_file(file)))
    }

    pub fn staged(&self) -> Option<&Attachment> {
        self.staged.as_ref()
    }

    /// Remove and return the staged attachment (on send)
    pub fn take(&mut self) -> Option<Attachment> {
        self.staged.take()
    }

    /// Discard the staged attachment; returns whether one was staged
    pub fn clear(&mut self) -> bool {
        self.staged.take().is_some()
    }
}

// ── Drag and drop ───────────────────────────────────────────────────────────

/// Drag-and-drop events over the panel, as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEvent {
    /// Pointer entered the panel or one of its children
    Enter,
    /// Pointer left the panel or one of its children
    Leave,
    /// Pointer moved over the panel
    Over,
    /// Files released over the panel
    Drop(Vec<FileDescriptor>),
}

/// Counts nested enter/leave pairs so moving across child elements doesn't
/// flicker the drop overlay
#[derive(Debug, Clone, Copy, Default)]
pub struct DropTracker {
    depth: u32,
}

impl DropTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn overlay_visible(&self) -> bool {
        self.depth > 0
    }

    /// Returns `true` when the overlay should appear
    pub fn enter(&mut self) -> bool {
        self.depth += 1;
        self.depth == 1
    }

    /// Returns `true` when the overlay should disappear
    pub fn leave(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        self.depth -= 1;
        self.depth == 0
    }

    /// Drop ends the drag regardless of depth; returns whether the overlay
    /// was visible
    pub fn drop_files(&mut self) -> bool {
        let was_visible = self.overlay_visible();
        self.depth = 0;
        was_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn staging() -> AttachmentStaging {
        AttachmentStaging::from_config(&WidgetConfig::default())
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(MIB), "1.0 MB");
        assert_eq!(format_file_size(10 * MIB), "10.0 MB");
    }

    #[test]
    fn test_accept_patterns() {
        let png = FileDescriptor::metadata_only("cat.PNG", "image/png", 10);
        let doc = FileDescriptor::metadata_only("report.DOCX", "", 10);
        let pdf = FileDescriptor::metadata_only("a.pdf", "application/pdf", 10);
        let exe = FileDescriptor::metadata_only("setup.exe", "application/x-msdownload", 10);

        assert!(matches_accept_pattern(&png, "image/*"));
        assert!(matches_accept_pattern(&doc, ".docx"));
        assert!(!matches_accept_pattern(&doc, ".doc"));
        assert!(matches_accept_pattern(&pdf, "application/pdf"));

        let staging = staging();
        assert!(staging.is_accepted(&png));
        assert!(!staging.is_accepted(&exe));
        assert_eq!(
            staging.accept_filter(),
            "image/*,application/pdf,.doc,.docx,.txt"
        );
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(FileDescriptor::metadata_only(".bashrc", "", 1).extension(), None);
        assert_eq!(FileDescriptor::metadata_only("noext", "", 1).extension(), None);
        assert_eq!(
            FileDescriptor::metadata_only("a.tar.GZ", "", 1).extension().as_deref(),
            Some(".gz")
        );
    }

    #[test]
    fn test_image_preview_is_data_url() {
        let file = FileDescriptor::new("dot.png", "image/png", vec![1, 2, 3]);
        let attachment = Attachment::from_file(&file);
        assert_eq!(attachment.category, AttachmentCategory::Image);
        assert_eq!(
            attachment.preview,
            AttachmentPreview::Image {
                data_url: "data:image/png;base64,AQID".to_string()
            }
        );
        assert_eq!(attachment.size_label, "3 B");
    }

    #[test]
    fn test_document_gets_glyph() {
        let file = FileDescriptor::metadata_only("notes.txt", "text/plain", 2048);
        let attachment = Attachment::from_file(&file);
        assert_eq!(attachment.category, AttachmentCategory::File);
        assert_eq!(attachment.preview, AttachmentPreview::FileGlyph);
        assert_eq!(attachment.size_label, "2.0 KB");
    }

    #[test]
    fn test_too_large_keeps_previous() {
        let mut staging = staging();
        let small = FileDescriptor::metadata_only("small.txt", "text/plain", 10);
        staging.stage(&small).unwrap();

        let huge = FileDescriptor::metadata_only("huge.pdf", "application/pdf", 10 * MIB + 1);
        let err = staging.stage(&huge).unwrap_err();
        assert!(matches!(err, WidgetError::FileTooLarge { max_bytes, .. } if max_bytes == 10 * MIB));
        assert_eq!(staging.staged().map(|a| a.name.as_str()), Some("small.txt"));

        // Exactly at the cap is fine
        let edge = FileDescriptor::metadata_only("edge.pdf", "application/pdf", 10 * MIB);
        assert!(staging.stage(&edge).is_ok());
    }

    #[test]
    fn test_type_filter_advisory_unless_enforced() {
        let exe = FileDescriptor::metadata_only("setup.exe", "application/x-msdownload", 10);

        let mut advisory = staging();
        assert!(advisory.stage(&exe).is_ok());

        let mut config = WidgetConfig::default();
        config.enforce_file_types = true;
        let mut strict = AttachmentStaging::from_config(&config);
        let err = strict.stage(&exe).unwrap_err();
        assert!(matches!(err, WidgetError::UnsupportedFileType { .. }));
        assert!(strict.staged().is_none());
    }

    #[test]
    fn test_take_and_clear() {
        let mut staging = AttachmentStaging::new(100);
        assert!(!staging.clear());
        staging
            .stage(&FileDescriptor::metadata_only("a.txt", "text/plain", 1))
            .unwrap();
        assert!(staging.take().is_some());
        assert!(staging.staged().is_none());
    }

    #[test]
    fn test_drop_tracker_nesting() {
        let mut tracker = DropTracker::new();
        assert!(tracker.enter()); // panel
        assert!(!tracker.enter()); // child
        assert!(!tracker.leave()); // child -> panel
        assert!(tracker.overlay_visible());
        assert!(tracker.leave());
        assert!(!tracker.overlay_visible());
        assert!(!tracker.leave()); // spurious leave stays at zero
        assert_eq!(tracker.depth(), 0);

        tracker.enter();
        tracker.enter();
        assert!(tracker.drop_files());
        assert_eq!(tracker.depth(), 0);
    }
}
