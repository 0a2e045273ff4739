use crate::models::Node;

use super::{
    classify::{LineKind, classify_line},
    kinds::Sentinel,
    lines::split_lines,
    node_text::ParseState,
};

/// Accumulates node blocks line by line.
///
/// Holds at most one partially read node. A node is only emitted when its
/// closing `===` is seen; anything still accumulating at EOF is dropped.
pub struct DocumentBuilder {
    state: ParseState,
    current: Option<Node>,
    out: Vec<Node>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            state: ParseState::Header,
            current: None,
            out: vec![],
        }
    }

    pub fn push(&mut self, line: &str) {
        if Sentinel::is_body_end(line) {
            self.state = ParseState::Header;
            if let Some(node) = self.current.take() {
                self.out.push(node);
            }
            return;
        }

        match self.state {
            ParseState::Body => {
                let body = &mut self.current_mut().body;
                body.push_str(line);
                body.push('\n');
            }
            ParseState::Header => self.push_header(line),
        }
    }

    pub fn finish(self) -> Vec<Node> {
        self.out
    }

    fn push_header(&mut self, line: &str) {
        match classify_line(line) {
            LineKind::Title(title) => self.current_mut().title = title.to_string(),
            LineKind::Tags(tags) => self.current_mut().tags = tags.to_string(),
            LineKind::Position(position) => self.current_mut().position = position,
            LineKind::ColorId(color_id) => self.current_mut().color_id = color_id,
            LineKind::BodyStart => self.state = ParseState::Body,
            // BodyEnd is handled before dispatch
            LineKind::BodyEnd | LineKind::Unrecognized => {}
        }
    }

    /// The node being accumulated, allocated on first use so that a document
    /// starting mid-block still yields a partial node.
    fn current_mut(&mut self) -> &mut Node {
        self.current.get_or_insert_with(Node::default)
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a whole Yarn document into its nodes, in document order.
///
/// Bodies are kept as written: every body line is followed by a newline and no
/// trimming happens. Links are not computed here; see
/// [`YarnDocument::from_text`](crate::editing::YarnDocument::from_text) for
/// the parse-then-link pipeline.
pub fn parse_yarn_file(text: &str) -> Vec<Node> {
    let mut builder = DocumentBuilder::new();
    for line in split_lines(text) {
        builder.push(line);
    }
    builder.finish()
}
