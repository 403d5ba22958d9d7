use std::sync::LazyLock;

use regex::Regex;

use crate::model::{ModificationEntry, ModificationKind};

static BULLET_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-\s|^\*\s|\n+-\s|\n+\*\s").unwrap());

/// Loose group titles seen in the wild, lower-cased.
const KIND_ALIASES: &[(&str, ModificationKind)] = &[
    ("security", ModificationKind::Secured),
    ("updated", ModificationKind::Changed),
    ("improvements", ModificationKind::Improved),
    ("new features", ModificationKind::Added),
    ("bug fixes", ModificationKind::Fixed),
    ("new", ModificationKind::Added),
    ("new!!!", ModificationKind::Added),
];

/// Leading-word heuristic for bullets under an unrecognized group title.
const KIND_PREFIXES: &[(&str, ModificationKind)] = &[
    ("add", ModificationKind::Added),
    ("fix", ModificationKind::Fixed),
    ("improve", ModificationKind::Improved),
];

/// Lower-cased, trimmed form of a group title, used for alias lookup and tags.
pub fn normalize_group_title(title: &str) -> String {
    title.trim().to_lowercase()
}

pub fn resolve_alias(normalized: &str) -> Option<ModificationKind> {
    KIND_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, kind)| *kind)
        .or_else(|| normalized.parse().ok())
}

pub fn infer_kind(bullet: &str) -> ModificationKind {
    KIND_PREFIXES
        .iter()
        .find(|(prefix, _)| {
            bullet
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
        .map(|(_, kind)| *kind)
        .unwrap_or(ModificationKind::Changed)
}

/// Split a group body on `-`/`*` list markers; trimmed, empties dropped.
pub fn split_bullets(content: &str) -> Vec<&str> {
    BULLET_SPLIT_RE
        .split(content)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Classify every bullet of one group. Known titles file everything under
/// their kind untagged; unknown titles tag each bullet and infer its kind.
pub fn classify_group(title: Option<&str>, content: &str) -> Vec<(ModificationKind, ModificationEntry)> {
    let normalized = normalize_group_title(title.unwrap_or(""));
    let known = resolve_alias(&normalized);

    split_bullets(content)
        .into_iter()
        .map(|bullet| match known {
            Some(kind) => (kind, ModificationEntry::new(bullet)),
            None => (infer_kind(bullet), ModificationEntry::tagged(bullet, normalized.clone())),
        })
        .collect()
}
