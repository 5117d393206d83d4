//! Attachment staging, validation and drag-and-drop.

mod common;

use std::collections::VecDeque;

use chatiq::attachment::AttachmentPreview;
use chatiq::{AttachmentCategory, DropEvent, FileDescriptor, WidgetError, WidgetEvent};
use common::{SharedStore, TestWidget, site_config};

const MB: u64 = 1024 * 1024;

fn pdf(name: &str, size: u64) -> FileDescriptor {
    FileDescriptor::metadata_only(name, "application/pdf", size)
}

#[test]
fn test_stage_file_reports_size_label() {
    let mut t = TestWidget::mount();
    let attachment = t.widget.stage_file(&pdf("report.pdf", 1536)).unwrap();
    assert_eq!(attachment.size_label, "1.5 KB");
    assert_eq!(attachment.category, AttachmentCategory::File);
    assert_eq!(
        t.widget.staged_attachment().map(|a| a.name.as_str()),
        Some("report.pdf")
    );
}

#[test]
fn test_image_gets_inline_preview() {
    let mut t = TestWidget::mount();
    let attachment = t
        .widget
        .stage_file(&FileDescriptor::new("pixel.png", "image/png", vec![1, 2, 3]))
        .unwrap();
    match attachment.preview {
        AttachmentPreview::Image { data_url } => {
            assert_eq!(data_url, "data:image/png;base64,AQID");
        }
        other => panic!("expected image preview, got {other:?}"),
    }
}

#[test]
fn test_oversized_file_rejected_and_previous_kept() {
    let mut t = TestWidget::mount();
    t.widget.stage_file(&pdf("small.pdf", 1000)).unwrap();
    t.widget.drain_events();

    let err = t.widget.stage_file(&pdf("huge.pdf", 11 * MB)).unwrap_err();
    assert!(matches!(err, WidgetError::FileTooLarge { .. }));
    assert_eq!(
        t.widget.staged_attachment().map(|a| a.name.as_str()),
        Some("small.pdf")
    );

    let alerts = t.events_where(|e| matches!(e, WidgetEvent::Alert { .. }));
    assert_eq!(alerts.len(), 1);
    if let WidgetEvent::Alert { message } = &alerts[0] {
        assert_eq!(message, "File size must be less than 10.0 MB");
    }
}

#[test]
fn test_limit_is_inclusive() {
    let mut t = TestWidget::mount();
    assert!(t.widget.stage_file(&pdf("exact.pdf", 10 * MB)).is_ok());
    assert!(t.widget.stage_file(&pdf("over.pdf", 10 * MB + 1)).is_err());
}

#[test]
fn test_unlisted_type_is_staged_by_default() {
    let mut t = TestWidget::mount();
    let exe = FileDescriptor::metadata_only("setup.exe", "application/x-msdownload", 100);
    assert!(t.widget.stage_file(&exe).is_ok());
}

#[test]
fn test_enforced_types_reject_unlisted_file() {
    let mut config = site_config();
    config.enforce_file_types = true;
    let mut t = TestWidget::mount_with(config, SharedStore::new());

    let exe = FileDescriptor::metadata_only("setup.exe", "application/x-msdownload", 100);
    let err = t.widget.stage_file(&exe).unwrap_err();
    assert!(matches!(err, WidgetError::UnsupportedFileType { .. }));
    assert!(t.widget.staged_attachment().is_none());

    // Extension and wildcard patterns still pass
    assert!(
        t.widget
            .stage_file(&FileDescriptor::metadata_only("notes.txt", "text/plain", 10))
            .is_ok()
    );
    assert!(
        t.widget
            .stage_file(&FileDescriptor::metadata_only("cat.webp", "image/webp", 10))
            .is_ok()
    );
}

#[test]
fn test_accept_filter_lists_configured_types() {
    let t = TestWidget::mount();
    let filter = t.widget.file_accept_filter();
    assert!(filter.contains("image/*"));
    assert!(filter.contains("application/pdf"));
    assert!(filter.contains(".txt"));
}

#[test]
fn test_clear_attachment() {
    let mut t = TestWidget::mount();
    t.widget.stage_file(&pdf("a.pdf", 10)).unwrap();
    t.widget.drain_events();
    t.widget.clear_attachment();
    assert!(t.widget.staged_attachment().is_none());
    assert_eq!(
        t.events_where(|e| matches!(e, WidgetEvent::AttachmentCleared))
            .len(),
        1
    );

    // Nothing staged: no event
    t.widget.clear_attachment();
    assert!(!t.widget.has_events());
}

#[test]
fn test_nested_drag_keeps_overlay_visible() {
    let mut t = TestWidget::mount();
    t.widget.drain_events();

    t.widget.handle_drop_event(DropEvent::Enter).unwrap();
    t.widget.handle_drop_event(DropEvent::Enter).unwrap();
    t.widget.handle_drop_event(DropEvent::Over).unwrap();
    t.widget.handle_drop_event(DropEvent::Leave).unwrap();
    assert!(t.widget.drop_overlay_visible());

    t.widget.handle_drop_event(DropEvent::Leave).unwrap();
    assert!(!t.widget.drop_overlay_visible());

    let changes = t.events_where(|e| matches!(e, WidgetEvent::DropOverlayChanged { .. }));
    assert_eq!(changes.len(), 2);
}

#[test]
fn test_unbalanced_leave_is_ignored() {
    let mut t = TestWidget::mount();
    t.widget.handle_drop_event(DropEvent::Leave).unwrap();
    assert!(!t.widget.drop_overlay_visible());
    t.widget.handle_drop_event(DropEvent::Enter).unwrap();
    assert!(t.widget.drop_overlay_visible());
}

#[test]
fn test_drop_stages_first_file_and_hides_overlay() {
    let mut t = TestWidget::mount();
    t.widget.handle_drop_event(DropEvent::Enter).unwrap();
    t.widget.handle_drop_event(DropEvent::Enter).unwrap();

    let staged = t
        .widget
        .handle_drop_event(DropEvent::Drop(vec![pdf("first.pdf", 10), pdf("second.pdf", 10)]))
        .unwrap();
    assert_eq!(staged.map(|a| a.name), Some("first.pdf".to_string()));
    assert!(!t.widget.drop_overlay_visible());

    // The counter was reset, a fresh drag shows the overlay again
    t.widget.handle_drop_event(DropEvent::Enter).unwrap();
    assert!(t.widget.drop_overlay_visible());
}

#[test]
fn test_drop_of_oversized_file_alerts() {
    let mut t = TestWidget::mount();
    t.widget.handle_drop_event(DropEvent::Enter).unwrap();
    let result = t
        .widget
        .handle_drop_event(DropEvent::Drop(vec![pdf("huge.pdf", 20 * MB)]));
    assert!(result.is_err());
    assert!(!t.widget.drop_overlay_visible());
    assert!(t.widget.staged_attachment().is_none());
}

#[test]
fn test_empty_drop_stages_nothing() {
    let mut t = TestWidget::mount();
    t.widget.handle_drop_event(DropEvent::Enter).unwrap();
    assert!(t.widget.handle_drop_event(DropEvent::Drop(Vec::new())).unwrap().is_none());
    assert!(!t.widget.drop_overlay_visible());
}

#[test]
fn test_pump_drops_drains_source() {
    let mut t = TestWidget::mount();
    let mut source: VecDeque<DropEvent> = VecDeque::from(vec![
        DropEvent::Enter,
        DropEvent::Over,
        DropEvent::Drop(vec![pdf("huge.pdf", 20 * MB)]),
        DropEvent::Enter,
        DropEvent::Drop(vec![pdf("ok.pdf", 20)]),
    ]);

    assert_eq!(t.widget.pump_drops(&mut source), 5);
    assert!(source.is_empty());
    assert_eq!(
        t.widget.staged_attachment().map(|a| a.name.as_str()),
        Some("ok.pdf")
    );
}
