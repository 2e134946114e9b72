use std::time::Duration;

/// Timeout for loading one page. Longer URLs get a little extra time since
/// they tend to be deep, heavier pages.
pub fn calculate_timeout(base_secs: u64, url_length: usize) -> Duration {
    let additional_ms = (url_length / 20) as u64 * 100;
    Duration::from_secs(base_secs) + Duration::from_millis(additional_ms)
}

/// Number of characters (not bytes) in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `limit` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
