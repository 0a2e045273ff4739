use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Node;

/// Link syntax delimiters: `[[Target]]` or `[[Display Text|Target]]`.
pub struct Link;

impl Link {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";
    pub const ALIAS: char = '|';
}

/// Non-greedy, single-line match of `[[...]]`.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "{}(.*?){}",
        regex::escape(Link::OPEN),
        regex::escape(Link::CLOSE)
    ))
    .expect("valid link regex")
});

/// A link occurrence in a body, as byte ranges into that body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// The whole `[[...]]` including delimiters.
    pub full: Range<usize>,
    /// The trimmed target title inside the link.
    pub target: Range<usize>,
}

/// Scans `body` for every non-overlapping `[[...]]` occurrence.
///
/// For the pipe form the target is the segment after the first `|` (up to a
/// second `|`, if any); otherwise it is the whole inner text. Targets are
/// trimmed of surrounding whitespace.
pub fn scan_links(body: &str) -> impl Iterator<Item = LinkRef> + '_ {
    LINK_PATTERN.captures_iter(body).filter_map(|caps| {
        let full = caps.get(0)?.range();
        let inner = caps.get(1)?;
        let text = inner.as_str();

        let (start, end) = match text.find(Link::ALIAS) {
            Some(pipe) => {
                let start = pipe + Link::ALIAS.len_utf8();
                let end = text[start..]
                    .find(Link::ALIAS)
                    .map_or(text.len(), |next| start + next);
                (start, end)
            }
            None => (0, text.len()),
        };

        let target = trimmed_range(text, start..end);
        Some(LinkRef {
            full,
            target: inner.start() + target.start..inner.start() + target.end,
        })
    })
}

fn trimmed_range(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trimmed_len = slice.trim().len();
    range.start + leading..range.start + leading + trimmed_len
}

/// Returns the distinct link targets of `body` in first-occurrence order.
///
/// `None` means the body contains no link syntax at all, which callers use to
/// skip link affordances entirely; `Some` is never empty unless every link was
/// blank.
pub fn extract_links(body: &str) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut any = false;

    for link in scan_links(body) {
        any = true;
        let target = &body[link.target];
        if seen.insert(target) {
            links.push(target.to_string());
        }
    }

    any.then_some(links)
}

/// Recomputes `links` for every node from its body.
///
/// With `auto_create`, every target that matches no existing title (compared
/// trimmed, including stubs created earlier in this pass) gets a stub node
/// appended to `nodes`. Each missing target is stubbed once. Stubs are not
/// themselves scanned. Returns only the newly created stubs; the caller still
/// has to write them into the backing document.
pub fn rebuild_links(nodes: &mut Vec<Node>, auto_create: bool) -> Vec<Node> {
    let mut known: HashSet<String> = nodes
        .iter()
        .map(|node| node.title.trim().to_string())
        .collect();
    let mut added = Vec::new();

    let original_len = nodes.len();
    for index in 0..original_len {
        let links = extract_links(&nodes[index].body);

        if auto_create && let Some(targets) = &links {
            for target in targets {
                if target.is_empty() || !known.insert(target.clone()) {
                    continue;
                }
                let stub = Node::stub(target.clone());
                added.push(stub.clone());
                nodes.push(stub);
            }
        }

        nodes[index].links = links;
    }

    if !added.is_empty() {
        log::debug!("created {} stub node(s) for unresolved links", added.len());
    }
    added
}
