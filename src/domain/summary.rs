/// Tag message used when there is nothing between HEAD and the previous tag
pub const NOTHING_NEW: &str = "Nothing new, just for tagging.";

/// Build an annotated-tag message from commit messages, one `* ` bullet each.
///
/// Messages are used verbatim, so a trailing newline in a commit message
/// separates it from the next bullet.
pub fn summarize<S: AsRef<str>>(messages: &[S]) -> String {
    if messages.is_empty() {
        return NOTHING_NEW.to_string();
    }

    messages
        .iter()
        .map(|message| format!("* {}", message.as_ref()))
        .collect()
}

/// Message used when the commit log could not be read
pub fn fallback_message(reason: &str) -> String {
    format!("Failed to summarize commit messages: {}", reason)
}
