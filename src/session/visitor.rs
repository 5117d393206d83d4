//! Visitor identifier generation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Length of the random part of a visitor id
const RANDOM_PART_LEN: usize = 13;

/// Generate a probabilistically unique visitor id: `v_` followed by a random
/// base-36 segment and the current time in milliseconds, also in base 36.
pub fn generate_visitor_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let random = to_base36(uuid::Uuid::new_v4().as_u128());
    let random: String = random.chars().take(RANDOM_PART_LEN).collect();
    format!("v_{}{}", random, to_base36(millis))
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
