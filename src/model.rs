use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of change categories a bullet can be filed under.
///
/// Declaration order is the order buckets appear in a serialized release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationKind {
    Added,
    Changed,
    Fixed,
    Improved,
    Secured,
    Removed,
    Deprecated,
}

impl ModificationKind {
    pub const ALL: [ModificationKind; 7] = [
        ModificationKind::Added,
        ModificationKind::Changed,
        ModificationKind::Fixed,
        ModificationKind::Improved,
        ModificationKind::Secured,
        ModificationKind::Removed,
        ModificationKind::Deprecated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationKind::Added => "added",
            ModificationKind::Changed => "changed",
            ModificationKind::Fixed => "fixed",
            ModificationKind::Improved => "improved",
            ModificationKind::Secured => "secured",
            ModificationKind::Removed => "removed",
            ModificationKind::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown modification kind: {0:?}")]
pub struct UnknownModificationKind(pub String);

impl FromStr for ModificationKind {
    type Err = UnknownModificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModificationKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownModificationKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ModificationEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tags: Vec::new(),
        }
    }

    pub fn tagged(title: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tags: vec![tag.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    #[serde(default)]
    pub modifications: BTreeMap<ModificationKind, Vec<ModificationEntry>>,
}

impl Release {
    pub fn new(
        version: impl Into<String>,
        date: Option<DateTime<Utc>>,
        title: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            date,
            title,
            description: description.into(),
            modifications: BTreeMap::new(),
        }
    }

    /// Append `entry` to the bucket for `kind`, creating the bucket on first use.
    pub fn add_modification(&mut self, kind: ModificationKind, entry: ModificationEntry) {
        self.modifications.entry(kind).or_default().push(entry);
    }

    pub fn modifications_of(&self, kind: ModificationKind) -> &[ModificationEntry] {
        self.modifications.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn modification_count(&self) -> usize {
        self.modifications.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub releases: Vec<Release>,
}

impl Document {
    pub fn new(title: Option<String>, description: impl Into<String>, releases: Vec<Release>) -> Self {
        Self {
            title,
            description: description.into(),
            releases,
        }
    }

    /// First release carrying `version`. Duplicate versions are legal; later ones are skipped.
    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.version == version)
    }
}

/// `2020-01-15T00:00:00.000Z` form for release dates.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|r| {
            DateTime::parse_from_rfc3339(&r)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
