use crate::models::Node;

use super::{
    classify::{LineKind, classify_line},
    kinds::{HeaderKey, Sentinel},
    lines::{split_lines, trim_blank_lines},
};

/// Parser mode while walking a node block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    /// Reading header key lines; anything unrecognised is discarded.
    Header,
    /// Between `---` and `===`; every line is body text.
    Body,
}

/// Serializes one node into its textual block.
///
/// The `title:` and `tags:` lines are always written, `position:` only when
/// present and `colorID:` only when present and non-zero. The body is trimmed
/// of surrounding blank lines and followed by exactly one newline before the
/// closing `===`. The result has no trailing newline; callers placing several
/// blocks in a document add the separators themselves.
pub fn create_node_text(node: &Node) -> String {
    let mut text = String::new();
    text.push_str(&HeaderKey::Title.line(&node.title));
    text.push('\n');
    text.push_str(&HeaderKey::Tags.line(&node.tags));
    text.push('\n');

    if let Some(position) = node.position {
        text.push_str(&HeaderKey::Position.line(&format!("{},{}", position.x, position.y)));
        text.push('\n');
    }

    if let Some(color_id) = node.color_id.filter(|id| *id != 0) {
        text.push_str(&HeaderKey::ColorId.line(&color_id.to_string()));
        text.push('\n');
    }

    text.push_str(Sentinel::BODY_START);
    text.push('\n');
    text.push_str(trim_blank_lines(&node.body));
    text.push('\n');
    text.push_str(Sentinel::BODY_END);
    text
}

/// Parses the text of a single node block back into a [`Node`].
///
/// Never fails: unrecognised header lines are dropped and unparseable numeric
/// fields stay absent. Header-looking lines are only interpreted before the
/// body starts (or after it has been closed). The stored body is trimmed of
/// surrounding blank lines and `links` is left uncomputed.
pub fn parse_node_text(text: &str) -> Node {
    let mut node = Node::default();
    let mut body = String::new();
    let mut state = ParseState::Header;

    for line in split_lines(text) {
        match state {
            ParseState::Body => {
                if Sentinel::is_body_end(line) {
                    state = ParseState::Header;
                } else {
                    body.push_str(line);
                    body.push('\n');
                }
            }
            ParseState::Header => match classify_line(line) {
                LineKind::Title(title) => node.title = title.to_string(),
                LineKind::Tags(tags) => node.tags = tags.to_string(),
                LineKind::Position(position) => node.position = position,
                LineKind::ColorId(color_id) => node.color_id = color_id,
                LineKind::BodyStart => state = ParseState::Body,
                LineKind::BodyEnd | LineKind::Unrecognized => {}
            },
        }
    }

    node.body = trim_blank_lines(&body).to_string();
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use pretty_assertions::assert_eq;

    const EXAMPLE_NODE_TEXT: &str = "title: Cool Title
tags: some tags
position: 1234,5678
colorID: 3
---
Some text.
In the body.
Of the node.
===";

    fn example_node() -> Node {
        Node {
            title: "Cool Title".to_string(),
            tags: "some tags".to_string(),
            body: "Some text.\nIn the body.\nOf the node.".to_string(),
            position: Some(Position::new(1234.0, 5678.0)),
            color_id: Some(3),
            links: None,
        }
    }

    #[test]
    fn test_create_node_text() {
        assert_eq!(create_node_text(&example_node()), EXAMPLE_NODE_TEXT);
    }

    #[test]
    fn test_parse_node_text() {
        assert_eq!(parse_node_text(EXAMPLE_NODE_TEXT), example_node());
    }

    #[test]
    fn test_create_node_text_minimal_node() {
        let mut node = Node::new("Bare");
        node.tags = "draft".to_string();
        insta::assert_snapshot!(create_node_text(&node), @r"
        title: Bare
        tags: draft
        ---

        ===
        ");
    }

    #[test]
    fn test_create_node_text_omits_default_color() {
        let mut node = Node::new("Plain");
        node.body = "Hi".to_string();
        node.color_id = Some(0);
        assert_eq!(create_node_text(&node), "title: Plain\ntags: \n---\nHi\n===");
    }

    #[test]
    fn test_create_node_text_trims_body_blank_lines() {
        let mut node = Node::new("Padded");
        node.body = "\n\n  Line one\nLine two\n\n".to_string();
        assert_eq!(
            create_node_text(&node),
            "title: Padded\ntags: \n---\n  Line one\nLine two\n==="
        );
    }

    #[test]
    fn test_create_node_text_fractional_position() {
        let mut node = Node::new("Moved");
        node.position = Some(Position::new(10.5, -3.0));
        assert!(create_node_text(&node).contains("\nposition: 10.5,-3\n"));
    }

    #[test]
    fn test_parse_node_text_with_crlf() {
        let text = EXAMPLE_NODE_TEXT.replace('\n', "\r\n");
        assert_eq!(parse_node_text(&text), example_node());
    }

    #[test]
    fn test_parse_node_text_body_may_contain_header_keywords() {
        let text = "title: Quoted\ntags: \n---\ntitle: not a header\ntags: nor this\n===";
        let node = parse_node_text(text);
        assert_eq!(node.title, "Quoted");
        assert_eq!(node.tags, "");
        assert_eq!(node.body, "title: not a header\ntags: nor this");
    }

    #[test]
    fn test_parse_node_text_malformed_numbers_are_absent() {
        let text = "title: Broken\ntags: \nposition: left,up\ncolorID: red\n---\nBody\n===";
        let node = parse_node_text(text);
        assert_eq!(node.position, None);
        assert_eq!(node.color_id, None);
        assert_eq!(node.body, "Body");
    }

    #[test]
    fn test_parse_node_text_ignores_unknown_header_lines() {
        let text = "title: Extra\nmood: grumpy\ntags: a\n---\nBody\n===";
        let node = parse_node_text(text);
        assert_eq!(node.title, "Extra");
        assert_eq!(node.tags, "a");
        assert_eq!(node.body, "Body");
    }

    #[test]
    fn test_parse_node_text_without_end_sentinel_keeps_body() {
        let node = parse_node_text("title: Open\ntags: \n---\nStill typing\n");
        assert_eq!(node.body, "Still typing");
    }

    #[test]
    fn test_round_trip_of_normalized_nodes() {
        let nodes = vec![
            example_node(),
            Node::new("Empty Body"),
            Node {
                title: "Links".to_string(),
                tags: "a b c".to_string(),
                body: "[[Somewhere]]\n<<set $x to 1>>\n\n    indented line".to_string(),
                position: Some(Position::new(-5.0, 0.5)),
                color_id: None,
                links: None,
            },
        ];

        for node in nodes {
            assert_eq!(parse_node_text(&create_node_text(&node)), node);
        }
    }
}
