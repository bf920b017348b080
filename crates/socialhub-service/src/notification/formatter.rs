//! Precomputed notification text.

use socialhub_entity::NotificationKind;

/// The human-readable sentence stored with a notification.
pub fn message_text(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::PostLike => "liked your post",
        NotificationKind::ReelLike => "liked your reel",
        NotificationKind::Message => "sent you a message",
    }
}

/// Shorten content to at most `max_chars` characters, appending `...` when
/// anything was cut. Counts characters, not bytes.
pub fn preview(content: &str, max_chars: usize) -> String {
    let content = content.trim();
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
