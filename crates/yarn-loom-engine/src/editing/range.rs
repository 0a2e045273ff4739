use thiserror::Error;

use crate::parsing::{LineKind, Sentinel, classify_line, lines::split_lines};

use super::edit::{LinePosition, LineRange};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("no node titled '{0}' in the document")]
    NotFound(String),
    #[error("node '{0}' has no closing '{end}' line", end = Sentinel::BODY_END)]
    Unterminated(String),
}

/// The lines a node block occupies in the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
    /// Line holding the node's `title:` header.
    pub start_line: usize,
    /// Line holding the closing `===`.
    pub end_line: usize,
    /// Length of the closing line, so the replacement covers all of it.
    pub end_col: usize,
}

impl NodeRange {
    /// Column 0 of the title line through the end of the closing sentinel line.
    pub fn to_line_range(&self) -> LineRange {
        LineRange::new(
            LinePosition::new(self.start_line, 0),
            LinePosition::new(self.end_line, self.end_col),
        )
    }
}

/// Finds the block of the node titled `title` by a fresh scan of `text`.
///
/// The start is the first line the parser would read as a `title:` header with
/// this (trimmed) value; the end is the next trimmed `===` line after it. Ranges are never cached: call
/// this against the text the resulting edit will be applied to.
pub fn locate_node_range(text: &str, title: &str) -> Result<NodeRange, RangeError> {
    let title = title.trim();
    let mut lines = split_lines(text).enumerate();

    let start_line = lines
        .by_ref()
        .find(|(_, line)| classify_line(line) == LineKind::Title(title))
        .map(|(index, _)| index)
        .ok_or_else(|| RangeError::NotFound(title.to_string()))?;

    let (end_line, end) = lines
        .find(|(_, line)| Sentinel::is_body_end(line))
        .ok_or_else(|| RangeError::Unterminated(title.to_string()))?;

    Ok(NodeRange {
        start_line,
        end_line,
        end_col: end.len(),
    })
}
