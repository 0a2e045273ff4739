use serde::{Deserialize, Serialize};

/// Editor-only layout hint for a node. Has no effect on the dialogue itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single Yarn node: one dialogue unit in the graph.
///
/// `title` is the primary identifier and the join key for links, document
/// ranges and renames. `links` is derived from `body` by
/// [`rebuild_links`](crate::graph::rebuild_links) and is `None` until it has
/// been computed (or when the body contains no link syntax at all).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub title: String,
    /// Space-separated tag tokens; empty means no tags.
    pub tags: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Palette index. `None` and `Some(0)` both mean the default colour.
    #[serde(rename = "colorID", default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
}

impl Node {
    /// A node with the given title, no tags and an empty body.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// The placeholder node created for "add node" and for unresolved links.
    pub fn stub(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: "\n".to_string(),
            ..Self::default()
        }
    }

    /// Whether this node's title matches `title`, ignoring surrounding whitespace.
    pub fn has_title(&self, title: &str) -> bool {
        self.title.trim() == title.trim()
    }

    /// Iterate over the individual tag tokens.
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags.split_whitespace()
    }

    /// Palette index with `None` mapped to the default colour.
    pub fn color_index(&self) -> u32 {
        self.color_id.unwrap_or(0)
    }
}

/// Find the first node whose trimmed title equals the trimmed `title`.
pub fn node_by_title<'a>(nodes: &'a [Node], title: &str) -> Option<&'a Node> {
    nodes.iter().find(|node| node.has_title(title))
}

/// Index of the first node whose trimmed title equals the trimmed `title`.
pub fn position_of_title(nodes: &[Node], title: &str) -> Option<usize> {
    nodes.iter().position(|node| node.has_title(title))
}
