use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Advisory warning produced while parsing. Never aborts a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A `#`-prefixed line that is not a recognized heading; kept as content.
    UnhandledHeading { line: usize, text: String },
    /// A release candidate whose title has no recognizable version.
    UnparsedReleaseHeader { title: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnhandledHeading { line, text } => {
                write!(f, "line {}: cannot handle title line, treated as content: {:?}", line, text)
            }
            Diagnostic::UnparsedReleaseHeader { title } => {
                write!(f, "unable to parse version and date from release: {:?}", title)
            }
        }
    }
}

/// Per-parse collector. Each push is mirrored to `tracing`.
#[derive(Debug, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.0.push(diagnostic);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}
