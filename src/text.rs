//! Reply post-processing for display and speech output.

use std::sync::LazyLock;

use regex::Regex;

static MARKDOWN_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\*•]+").expect("valid regex"));
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a model reply for display.
pub fn format_reply(text: &str) -> String {
    text.trim().to_string()
}

/// Flatten a reply for a text-to-speech engine: markdown emphasis and bullet
/// marks removed, line breaks turned into sentence breaks, whitespace runs
/// collapsed.
pub fn clean_for_speech(text: &str) -> String {
    let stripped = MARKDOWN_MARKS.replace_all(text, "");
    let sentences = NEWLINE_RUNS.replace_all(&stripped, ". ");
    let collapsed = WHITESPACE_RUNS.replace_all(&sentences, " ");
    collapsed.trim().to_string()
}
