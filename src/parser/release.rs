use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

/// `[1.2.3] - 2020-01-15`, `1.2.3 (2020-01-15)`, `Unreleased`, ...
static RELEASE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[?([A-Za-z0-9_.-]+\.[A-Za-z0-9_.-]*[A-Za-z0-9]|Unreleased|Upcoming|Next)\]?(?:\s*[^A-Za-z0-9_(]+\s*(?:\((.+)\)|(.+)))?$",
    )
    .unwrap()
});
static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)(?:st|nd|rd|th)\b").unwrap());
static YEAR_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}$").unwrap());

pub const SENTINEL_VERSIONS: [&str; 3] = ["Unreleased", "Upcoming", "Next"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseHeader<'a> {
    pub version: &'a str,
    pub raw_date: Option<&'a str>,
}

impl ReleaseHeader<'_> {
    pub fn is_sentinel(&self) -> bool {
        SENTINEL_VERSIONS.contains(&self.version)
    }

    /// Sentinel versions never carry a date. Everything else gets one, with
    /// missing or unparseable text collapsing to the Unix epoch.
    pub fn resolve_date(&self) -> Option<DateTime<Utc>> {
        if self.is_sentinel() {
            return None;
        }
        let parsed = self.raw_date.and_then(parse_date);
        Some(parsed.unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
    }
}

pub fn parse_release_header(title: &str) -> Option<ReleaseHeader<'_>> {
    let caps = RELEASE_HEADER_RE.captures(title)?;
    let version = caps.get(1)?.as_str();
    let raw_date = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
    Some(ReleaseHeader { version, raw_date })
}

/// Calendar date or instant in one of the common changelog spellings, as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }

    if YEAR_MONTH_RE.is_match(raw) {
        return midnight(NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok()?);
    }

    let cleaned = ORDINAL_RE.replace_all(raw, "$1");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .and_then(midnight)
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Split trimmed section text into an optional `**bold**` first-line title
/// and the remaining description.
pub fn split_title(content: &str) -> (Option<String>, String) {
    let trimmed = content.trim();
    let (first, rest) = trimmed.split_once('\n').unwrap_or((trimmed, ""));
    let first = first.trim_end();

    if first.starts_with("**") && first.ends_with("**") {
        (Some(first.replace('*', "")), rest.trim().to_string())
    } else {
        (None, trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SecondsFormat, TimeZone};

    fn header(title: &str) -> Option<(&str, Option<&str>)> {
        parse_release_header(title).map(|h| (h.version, h.raw_date))
    }

    fn iso(date: Option<DateTime<Utc>>) -> Option<String> {
        date.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    #[test]
    fn plain_version() {
        assert_eq!(header("1.2.3"), Some(("1.2.3", None)));
    }

    #[test]
    fn shortest_dotted_version() {
        assert_eq!(header("2.0"), Some(("2.0", None)));
    }

    #[test]
    fn prerelease_and_prefixed_versions() {
        assert_eq!(header("2.0.0-beta.1"), Some(("2.0.0-beta.1", None)));
        assert_eq!(header("v1.4.0"), Some(("v1.4.0", None)));
    }

    #[test]
    fn bracketed_version_with_dash_date() {
        assert_eq!(header("[1.0.0] - 2020-01-01"), Some(("1.0.0", Some("2020-01-01"))));
    }

    #[test]
    fn parenthesized_date() {
        assert_eq!(header("1.2.3 (2020-01-15)"), Some(("1.2.3", Some("2020-01-15"))));
    }

    #[test]
    fn trailing_free_text_date() {
        assert_eq!(header("2.0 - not a date"), Some(("2.0", Some("not a date"))));
        assert_eq!(header("1.0.0 / March 3rd, 2019"), Some(("1.0.0", Some("March 3rd, 2019"))));
    }

    #[test]
    fn sentinels() {
        for s in SENTINEL_VERSIONS {
            assert_eq!(header(s), Some((s, None)));
        }
        assert_eq!(header("[Unreleased]"), Some(("Unreleased", None)));
        assert_eq!(header("Upcoming - soon"), Some(("Upcoming", Some("soon"))));
    }

    #[test]
    fn rejected_headers() {
        assert_eq!(header("Roadmap"), None);
        assert_eq!(header("1"), None);
        assert_eq!(header("1."), None);
        assert_eq!(header("Version 1.0.0"), None);
        assert_eq!(header("unreleased"), None);
        assert_eq!(header(""), None);
    }

    #[test]
    fn iso_date_resolves_to_midnight_utc() {
        let h = parse_release_header("1.2.3 (2020-01-15)").unwrap();
        assert_eq!(iso(h.resolve_date()).as_deref(), Some("2020-01-15T00:00:00.000Z"));
    }

    #[test]
    fn sentinel_never_dated() {
        let h = parse_release_header("Unreleased - 2020-01-15").unwrap();
        assert_eq!(h.resolve_date(), None);
        let h = parse_release_header("Next").unwrap();
        assert_eq!(h.resolve_date(), None);
    }

    #[test]
    fn unparseable_date_falls_back_to_epoch() {
        let h = parse_release_header("2.0 - not a date").unwrap();
        assert_eq!(iso(h.resolve_date()).as_deref(), Some("1970-01-01T00:00:00.000Z"));
    }

    #[test]
    fn missing_date_falls_back_to_epoch() {
        let h = parse_release_header("1.0.0").unwrap();
        assert_eq!(h.resolve_date(), Some(DateTime::<Utc>::UNIX_EPOCH));
    }

    #[test]
    fn date_spellings() {
        let expected = Utc.with_ymd_and_hms(2019, 3, 3, 0, 0, 0).unwrap();
        for raw in [
            "2019-03-03",
            "2019/03/03",
            "2019.03.03",
            "03/03/2019",
            "March 3, 2019",
            "Mar 3, 2019",
            "March 3rd, 2019",
            "3 March 2019",
            "3rd Mar 2019",
            "March 3 2019",
            "  2019-03-03  ",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn year_month_is_first_of_month() {
        assert_eq!(parse_date("2021-07"), Some(Utc.with_ymd_and_hms(2021, 7, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn instants_keep_time() {
        assert_eq!(
            parse_date("2020-01-15T10:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2020, 1, 15, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2020-01-15 10:30"),
            Some(Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn bad_dates() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2020-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn bold_first_line_is_title() {
        let (title, desc) = split_title("\n\n**The big one**\nSome notes\n\nMore\n");
        assert_eq!(title.as_deref(), Some("The big one"));
        assert_eq!(desc, "Some notes\n\nMore");
    }

    #[test]
    fn bold_title_alone() {
        assert_eq!(split_title("**Only**"), (Some("Only".to_string()), String::new()));
    }

    #[test]
    fn no_bold_title() {
        assert_eq!(split_title("  plain\n**later**  "), (None, "plain\n**later**".to_string()));
        assert_eq!(split_title("**half open"), (None, "**half open".to_string()));
        assert_eq!(split_title(""), (None, String::new()));
    }
}
