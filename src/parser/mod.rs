pub mod diagnostics;
pub mod modifications;
pub mod release;
pub mod setext;
pub mod tree;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::model::{Document, Release};
use diagnostics::{Diagnostic, Diagnostics};
use tree::{NodeId, SectionTree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parsed {
    pub document: Document,
    pub links: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Four-stage pipeline: setext normalization → section tree → release
/// headers → modification groups.
pub fn parse(text: &str) -> Parsed {
    let mut diagnostics = Diagnostics::default();
    let text = setext::normalize(text);
    let tree = tree::build_tree(&text, &mut diagnostics);

    let section = tree.node(tree.document_section());
    let releases: Vec<Release> = section
        .children
        .iter()
        .filter_map(|&id| build_release(&tree, id, &mut diagnostics))
        .collect();
    debug!(releases = releases.len(), candidates = section.children.len(), "parsed releases");

    let document = Document::new(section.title.clone(), section.content.trim(), releases);
    Parsed {
        document,
        links: tree.links,
        diagnostics: diagnostics.into_vec(),
    }
}

fn build_release(tree: &SectionTree, id: NodeId, diagnostics: &mut Diagnostics) -> Option<Release> {
    let node = tree.node(id);
    let title = node.title.as_deref().unwrap_or("");
    let Some(header) = release::parse_release_header(title) else {
        diagnostics.push(Diagnostic::UnparsedReleaseHeader {
            title: title.to_string(),
        });
        return None;
    };

    let (short_title, description) = release::split_title(&node.content);
    let mut release = Release::new(header.version, header.resolve_date(), short_title, description);
    for group in tree.children(id) {
        for (kind, entry) in modifications::classify_group(group.title.as_deref(), &group.content) {
            release.add_modification(kind, entry);
        }
    }
    Some(release)
}

// ── Tests ──
