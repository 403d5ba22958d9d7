use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static TOP_ATX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^##? ").unwrap());
static UNDERLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^(?:=+|-+)$").unwrap());
static SETEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^(.+)\s+^(?:=+|-+)$").unwrap());

/// Rewrite underlined headings as `## ` headings, but only for documents
/// that carry no level-1/level-2 ATX heading at all. `=` and `-` underlines
/// both become level 2.
pub fn normalize(text: &str) -> Cow<'_, str> {
    if TOP_ATX_RE.is_match(text) || !UNDERLINE_RE.is_match(text) {
        return Cow::Borrowed(text);
    }
    SETEXT_RE.replace_all(text, "## ${1}")
}
