/// Body entries are newline-terminated `sender: text` lines; hosts scrape the
/// log region as plain text.
pub fn compose_line(name: &str, message: &str) -> String {
    format!("{name}: {message}\n")
}

/// Empty submissions are silently rejected, not errors. Whitespace is kept
/// as typed.
pub fn is_sendable(message: &str) -> bool {
    !message.is_empty()
}
