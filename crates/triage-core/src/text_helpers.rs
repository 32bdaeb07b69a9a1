/// Truncates `text` to `max_chars` characters, appending `...` when trimmed.
///
/// Used for the notification description excerpt and anywhere user-supplied
/// text flows into a bounded message surface.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Bounds a remote error body before it is embedded in an error message.
pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    truncate_with_ellipsis(text, max_chars)
}
