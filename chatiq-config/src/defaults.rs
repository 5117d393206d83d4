//! Default value functions for configuration.
//!
//! Each function is used as a `#[serde(default = "crate::defaults::...")]`
//! attribute on a config field and by the matching `Default` impl.

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_false() -> bool {
    false
}

// ── Appearance ─────────────────────────────────────────────────────────────

pub fn accent_color() -> String {
    "#B6FF00".to_string()
}

pub fn agent_name() -> String {
    "Support Team".to_string()
}

// ── Attachments ────────────────────────────────────────────────────────────

/// 10 MiB
pub fn max_file_size_bytes() -> u64 {
    10 * 1024 * 1024
}

pub fn accepted_file_types() -> Vec<String> {
    vec![
        "image/*".to_string(),
        "application/pdf".to_string(),
        ".doc".to_string(),
        ".docx".to_string(),
        ".txt".to_string(),
    ]
}

// ── Simulated conversation ─────────────────────────────────────────────────

pub fn canned_reply() -> String {
    "Thanks for your message! Our team will get back to you shortly.".to_string()
}

pub fn canned_quick_replies() -> Vec<String> {
    vec![
        "I need help with my order".to_string(),
        "Technical support".to_string(),
        "Billing question".to_string(),
        "Other".to_string(),
    ]
}

pub fn attachment_placeholder() -> String {
    "📎 File attached".to_string()
}

// ── Timings (milliseconds) ─────────────────────────────────────────────────

pub fn typing_delay_ms() -> u64 {
    400
}

pub fn reply_delay_ms() -> u64 {
    1500
}

pub fn quick_replies_delay_ms() -> u64 {
    500
}

pub fn injected_reply_delay_ms() -> u64 {
    1000
}

pub fn open_transition_ms() -> u64 {
    300
}

pub fn close_transition_ms() -> u64 {
    200
}
