//! Text normalization shared by the PDF and web extractors.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Collapse every whitespace run (spaces, tabs, newlines, Unicode spaces) to
/// a single space and trim both ends.
///
/// Line and paragraph breaks are not preserved. The function is idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}
