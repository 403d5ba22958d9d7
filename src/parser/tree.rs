use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::diagnostics::{Diagnostic, Diagnostics};

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[([^\]]+)]:\s*(.+)$").unwrap());

/// Recognized ATX markers on a trimmed line. `#### ` deliberately shares level 3.
const HEADING_MARKERS: [(&str, u8); 4] = [("# ", 1), ("## ", 2), ("### ", 3), ("#### ", 3)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub title: Option<String>,
    pub level: u8,
    pub content: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(title: Option<String>, level: u8, parent: Option<NodeId>) -> Self {
        Self {
            title,
            level,
            content: String::new(),
            children: Vec::new(),
            parent,
        }
    }
}

/// Arena of heading sections.
///
/// Slot 0 is the root; level-1 headings hang off it. Slot 1 is the synthetic
/// top context that collects text and lower-level headings seen before any
/// level-1 heading. It points at the root but is not one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTree {
    nodes: Vec<Node>,
    pub links: BTreeMap<String, String>,
}

const ROOT: NodeId = NodeId(0);
const TOP: NodeId = NodeId(1);

impl SectionTree {
    fn new() -> Self {
        Self {
            nodes: vec![Node::new(None, 0, None), Node::new(None, 0, Some(ROOT))],
            links: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn top(&self) -> NodeId {
        TOP
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes[id.0].children.iter().map(|c| &self.nodes[c.0])
    }

    /// First level-1 section, or the top context when the text has none.
    pub fn document_section(&self) -> NodeId {
        self.node(ROOT).children.first().copied().unwrap_or(TOP)
    }

    fn attach(&mut self, parent: NodeId, title: String, level: u8) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(title), level, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn append(&mut self, id: NodeId, text: &str) {
        let content = &mut self.nodes[id.0].content;
        content.push_str(text);
        content.push('\n');
    }
}

/// Walk up from `context` to the nearest ancestor whose level is below `level`.
pub fn resolve_parent(tree: &SectionTree, context: NodeId, level: u8) -> NodeId {
    let mut ctx = context;
    while let Some(parent) = tree.node(ctx).parent {
        if tree.node(ctx).level < level {
            break;
        }
        ctx = parent;
    }
    ctx
}

fn heading(trimmed: &str) -> Option<(u8, &str)> {
    HEADING_MARKERS
        .iter()
        .find_map(|(marker, level)| trimmed.strip_prefix(marker).map(|title| (*level, title)))
}

pub fn build_tree(text: &str, diagnostics: &mut Diagnostics) -> SectionTree {
    let mut tree = SectionTree::new();
    let mut context = TOP;

    for (idx, line) in text.split('\n').enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            match heading(trimmed) {
                Some((1, title)) => context = tree.attach(ROOT, title.to_string(), 1),
                Some((level, title)) => {
                    let parent = resolve_parent(&tree, context, level);
                    context = tree.attach(parent, title.to_string(), level);
                }
                None => {
                    diagnostics.push(Diagnostic::UnhandledHeading {
                        line: idx + 1,
                        text: trimmed.to_string(),
                    });
                    tree.append(context, trimmed);
                }
            }
        } else if trimmed.starts_with('[') {
            // Bracket lines that are not link definitions are dropped.
            if let Some(caps) = LINK_RE.captures(trimmed) {
                tree.links.insert(caps[1].to_string(), caps[2].to_string());
            }
        } else {
            tree.append(context, line);
        }
    }

    debug!(sections = tree.nodes.len() - 2, links = tree.links.len(), "built section tree");
    tree
}
