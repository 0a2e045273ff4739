use thiserror::Error;

use crate::graph::{rebuild_links, rename_links};
use crate::models::{Node, Position, node_by_title, position_of_title};
use crate::parsing::{create_node_text, lines::split_lines, parse_yarn_file};

use super::edit::{EditBatch, LinePosition};
use super::range::{RangeError, locate_node_range};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no node titled '{0}'")]
    NodeNotFound(String),
    #[error("a node titled '{0}' already exists")]
    DuplicateTitle(String),
    #[error("node titles cannot be empty")]
    EmptyTitle,
    #[error("node titles cannot contain line breaks: {0:?}")]
    InvalidTitle(String),
    #[error(transparent)]
    Range(#[from] RangeError),
}

/// The in-memory node list of one Yarn document, and the only thing allowed
/// to change it.
///
/// Every mutation takes the document text it should be positioned against and
/// returns the [`EditBatch`] that brings that text in line with the new node
/// list. Mutations are all-or-nothing: if any range lookup fails the node list
/// is left untouched and the error is returned.
///
/// The list is expected to be replaced wholesale via [`reload`](Self::reload)
/// whenever the backing text changes, including right after a batch returned
/// from here has been applied.
#[derive(Debug, Clone)]
pub struct YarnDocument {
    nodes: Vec<Node>,
    auto_create_nodes: bool,
}

impl YarnDocument {
    /// Parses `text` and computes links. No stubs are created on load.
    pub fn from_text(text: &str) -> Self {
        let mut nodes = parse_yarn_file(text);
        rebuild_links(&mut nodes, false);
        Self {
            nodes,
            auto_create_nodes: true,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    /// Whether body updates create stub nodes for unresolved link targets.
    pub fn with_auto_create_nodes(mut self, enabled: bool) -> Self {
        self.auto_create_nodes = enabled;
        self
    }

    pub fn auto_create_nodes(&self) -> bool {
        self.auto_create_nodes
    }

    /// Replaces the node list with a fresh parse of `text`.
    pub fn reload(&mut self, text: &str) {
        let mut nodes = parse_yarn_file(text);
        rebuild_links(&mut nodes, false);
        log::debug!("reloaded document: {} node(s)", nodes.len());
        self.nodes = nodes;
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_by_title(&self, title: &str) -> Option<&Node> {
        node_by_title(&self.nodes, title)
    }

    /// Replaces the node titled `original_title` with `node`.
    ///
    /// If `node` carries a different title it is validated like a rename, but
    /// links pointing at the old title are not rewritten; use
    /// [`rename_node`](Self::rename_node) for that. Links are rebuilt for the whole list; with auto-creation enabled any new
    /// unresolved targets are appended as stub nodes, both to the list and to
    /// the end of the document in the same batch.
    pub fn update_node(
        &mut self,
        text: &str,
        original_title: &str,
        node: Node,
    ) -> Result<EditBatch, EditError> {
        let index = self.index_of(original_title)?;
        if !node.has_title(original_title) {
            self.check_new_title(&node.title, index)?;
        }
        let range = locate_node_range(text, original_title)?;

        let mut nodes = self.nodes.clone();
        nodes[index] = node;
        let added = rebuild_links(&mut nodes, self.auto_create_nodes);

        let mut batch = EditBatch::new();
        batch.replace(range.to_line_range(), create_node_text(&nodes[index]));
        append_nodes(&mut batch, text, &added);

        log::debug!(
            "updated node '{}' ({} stub(s) created)",
            original_title.trim(),
            added.len()
        );
        self.nodes = nodes;
        Ok(batch)
    }

    pub fn update_node_body(
        &mut self,
        text: &str,
        title: &str,
        body: impl Into<String>,
    ) -> Result<EditBatch, EditError> {
        let node = Node {
            body: body.into(),
            ..self.existing(title)?.clone()
        };
        self.update_node(text, title, node)
    }

    /// Renames a node and rewrites every link pointing at it.
    ///
    /// The batch replaces the renamed node's block plus the block of every
    /// other node whose body changed. All ranges are located in `text`, before
    /// any of the blocks are rewritten.
    pub fn rename_node(
        &mut self,
        text: &str,
        old_title: &str,
        new_title: &str,
    ) -> Result<EditBatch, EditError> {
        let index = self.index_of(old_title)?;
        let new_title = self.check_new_title(new_title, index)?;

        let mut nodes = self.nodes.clone();
        nodes[index].title = new_title.to_string();
        let changed = rename_links(&mut nodes, old_title, new_title);
        rebuild_links(&mut nodes, false);

        let mut batch = EditBatch::new();
        let range = locate_node_range(text, old_title)?;
        batch.replace(range.to_line_range(), create_node_text(&nodes[index]));

        // Ranges resolve to the first block with a title, so a later node
        // sharing an already located title has no block of its own to rewrite.
        // The renamed node's own self-links are already in its block.
        let mut located = vec![old_title.trim(), new_title];
        for node in &changed {
            let title = node.title.trim();
            if located.contains(&title) {
                log::warn!("not rewriting links in duplicate node '{title}'");
                continue;
            }
            located.push(title);
            let range = locate_node_range(text, title)?;
            batch.replace(range.to_line_range(), create_node_text(node));
        }

        log::debug!(
            "renamed '{}' to '{new_title}', rewrote links in {} node(s)",
            old_title.trim(),
            changed.len()
        );
        self.nodes = nodes;
        Ok(batch)
    }

    /// Adds space-separated `tags` to a node, keeping existing order and
    /// skipping tags it already has.
    pub fn add_tags_to_node(
        &mut self,
        text: &str,
        title: &str,
        tags: &str,
    ) -> Result<EditBatch, EditError> {
        self.replace_node(text, title, |node| {
            let mut merged: Vec<&str> = Vec::new();
            for tag in node.tag_list().chain(tags.split_whitespace()) {
                if !merged.contains(&tag) {
                    merged.push(tag);
                }
            }
            node.tags = merged.join(" ");
        })
    }

    /// Removes each of `tags` the node has and adds each it lacks.
    pub fn toggle_tags_on_node(
        &mut self,
        text: &str,
        title: &str,
        tags: &str,
    ) -> Result<EditBatch, EditError> {
        self.replace_node(text, title, |node| {
            let existing: Vec<&str> = node.tag_list().collect();
            let mut toggled: Vec<&str> = Vec::new();
            for tag in tags.split_whitespace() {
                if !toggled.contains(&tag) {
                    toggled.push(tag);
                }
            }

            let kept = existing.iter().filter(|tag| !toggled.contains(*tag));
            let added = toggled.iter().filter(|tag| !existing.contains(*tag));
            node.tags = kept.chain(added).copied().collect::<Vec<_>>().join(" ");
        })
    }

    pub fn set_node_color(
        &mut self,
        text: &str,
        title: &str,
        color_id: u32,
    ) -> Result<EditBatch, EditError> {
        self.replace_node(text, title, |node| node.color_id = Some(color_id))
    }

    pub fn set_node_position(
        &mut self,
        text: &str,
        title: &str,
        position: Position,
    ) -> Result<EditBatch, EditError> {
        self.replace_node(text, title, |node| node.position = Some(position))
    }

    /// Removes a node and its block. Links are recomputed but dangling targets
    /// are not stubbed again.
    pub fn delete_node(&mut self, text: &str, title: &str) -> Result<EditBatch, EditError> {
        let index = self.index_of(title)?;
        let range = locate_node_range(text, title)?;

        let mut nodes = self.nodes.clone();
        nodes.remove(index);
        rebuild_links(&mut nodes, false);

        let mut batch = EditBatch::new();
        batch.delete(range.to_line_range());

        log::debug!("deleted node '{}'", title.trim());
        self.nodes = nodes;
        Ok(batch)
    }

    /// Appends an empty node titled `title` to the list and the document.
    pub fn add_new_node(&mut self, text: &str, title: &str) -> Result<EditBatch, EditError> {
        let title = self.check_new_title(title, self.nodes.len())?;

        let node = Node::stub(title);
        let mut batch = EditBatch::new();
        append_nodes(&mut batch, text, std::slice::from_ref(&node));

        log::debug!("added node '{title}'");
        self.nodes.push(node);
        Ok(batch)
    }

    /// Applies `change` to a copy of the node and replaces its block. Links
    /// are left alone, so this is only for header fields.
    fn replace_node(
        &mut self,
        text: &str,
        title: &str,
        change: impl FnOnce(&mut Node),
    ) -> Result<EditBatch, EditError> {
        let index = self.index_of(title)?;
        let range = locate_node_range(text, title)?;

        let mut node = self.nodes[index].clone();
        change(&mut node);

        let mut batch = EditBatch::new();
        batch.replace(range.to_line_range(), create_node_text(&node));
        self.nodes[index] = node;
        Ok(batch)
    }

    /// Trims `title` and checks it can head a block without clashing with a
    /// node other than the one at `index`.
    fn check_new_title<'t>(&self, title: &'t str, index: usize) -> Result<&'t str, EditError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EditError::EmptyTitle);
        }
        if title.contains(['\r', '\n']) {
            return Err(EditError::InvalidTitle(title.to_string()));
        }
        match position_of_title(&self.nodes, title) {
            Some(other) if other != index => Err(EditError::DuplicateTitle(title.to_string())),
            _ => Ok(title),
        }
    }

    fn existing(&self, title: &str) -> Result<&Node, EditError> {
        self.node_by_title(title).ok_or_else(|| not_found(title))
    }

    fn index_of(&self, title: &str) -> Result<usize, EditError> {
        position_of_title(&self.nodes, title).ok_or_else(|| not_found(title))
    }
}

fn not_found(title: &str) -> EditError {
    log::warn!("no node titled '{}'", title.trim());
    EditError::NodeNotFound(title.trim().to_string())
}

/// Inserts the blocks of `nodes` after the last line of `text`.
fn append_nodes(batch: &mut EditBatch, text: &str, nodes: &[Node]) {
    if nodes.is_empty() {
        return;
    }

    let mut appended = String::new();
    if !text.is_empty() && !text.ends_with('\n') {
        appended.push('\n');
    }
    for node in nodes {
        appended.push_str(&create_node_text(node));
        appended.push('\n');
    }

    batch.insert(LinePosition::new(split_lines(text).count(), 0), appended);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::edit::{LineRange, TextEdit};
    use crate::tests::{EXAMPLE_YARN_FILE, example_nodes};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn example_document() -> YarnDocument {
        YarnDocument::from_text(EXAMPLE_YARN_FILE)
    }

    fn span(start: usize, end: usize) -> LineRange {
        LineRange::new(LinePosition::new(start, 0), LinePosition::new(end, 3))
    }

    #[test]
    fn test_from_text_links_without_stubbing() {
        let document = YarnDocument::from_text("title: A\n---\n[[Missing]]\n===\n");
        assert_eq!(document.nodes().len(), 1);
        assert_eq!(
            document.nodes()[0].links,
            Some(vec!["Missing".to_string()])
        );
    }

    #[test]
    fn test_from_text_matches_example_nodes() {
        assert_eq!(example_document().nodes(), example_nodes());
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        assert!(YarnDocument::from_bytes(&[0xFF, 0xFE]).is_err());
    }

    #[test]
    fn test_updates_node_in_place() {
        let mut document = example_document();
        let mut node = document.node_by_title("Leave").unwrap().clone();
        node.body = "A: Bye now".to_string();

        let batch = document.update_node(EXAMPLE_YARN_FILE, "Leave", node).unwrap();

        assert_eq!(
            batch.edits(),
            &[TextEdit::Replace {
                range: span(16, 23),
                text: "title: Leave\ntags: \nposition: 387,487\n---\nA: Bye now\n===".to_string(),
            }]
        );
        assert_eq!(document.nodes()[1].body, "A: Bye now");
        assert_eq!(document.nodes().len(), 3);
    }

    #[test]
    fn test_update_adds_stub_for_new_link() {
        let mut document = example_document();

        let batch = document
            .update_node_body(EXAMPLE_YARN_FILE, "LearnMore", "New Body\n[[With a new Link|New Node]]")
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.edits()[1],
            TextEdit::Insert {
                at: LinePosition::new(31, 0),
                text: "title: New Node\ntags: \n---\n\n===\n".to_string(),
            }
        );
        assert_eq!(document.nodes().len(), 4);
        assert_eq!(document.nodes()[3], Node::stub("New Node"));
        assert_eq!(
            document.nodes()[2].links,
            Some(vec!["New Node".to_string()])
        );
    }

    #[test]
    fn test_update_without_auto_create_adds_nothing() {
        let mut document = example_document().with_auto_create_nodes(false);

        let batch = document
            .update_node_body(EXAMPLE_YARN_FILE, "LearnMore", "[[Elsewhere]]")
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(document.nodes().len(), 3);
    }

    #[test]
    fn test_update_with_existing_links_adds_nothing() {
        let mut document = example_document();

        let batch = document
            .update_node_body(EXAMPLE_YARN_FILE, "Leave", "[[Start]] [[Back|LearnMore]]")
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(document.nodes().len(), 3);
    }

    #[test]
    fn test_update_unknown_node_fails_and_changes_nothing() {
        let mut document = example_document();

        let result = document.update_node(EXAMPLE_YARN_FILE, "Nope", Node::new("Nope"));

        assert_eq!(result, Err(EditError::NodeNotFound("Nope".to_string())));
        assert_eq!(document.nodes(), example_nodes());
    }

    #[test]
    fn test_stale_text_fails_and_changes_nothing() {
        let mut document = example_document();

        let result = document.update_node_body("", "Leave", "[[Brand New]]");

        assert_eq!(
            result,
            Err(EditError::Range(RangeError::NotFound("Leave".to_string())))
        );
        assert_eq!(document.nodes(), example_nodes());
    }

    #[test]
    fn test_renames_node_and_links() {
        let mut document = example_document();

        let batch = document
            .rename_node(EXAMPLE_YARN_FILE, "LearnMore", "A Whole New Node")
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.edits()[0].span(), span(24, 30));
        assert!(batch.edits()[0].new_text().starts_with("title: A Whole New Node\n"));
        assert_eq!(batch.edits()[1].span(), span(0, 15));
        assert!(
            batch.edits()[1]
                .new_text()
                .contains("[[Learn more|A Whole New Node]]")
        );

        assert!(document.node_by_title("LearnMore").is_none());
        assert_eq!(
            document.nodes()[0].links,
            Some(vec!["Leave".to_string(), "A Whole New Node".to_string()])
        );
    }

    #[test]
    fn test_rename_without_incoming_links_touches_one_block() {
        let mut document = example_document();

        let batch = document.rename_node(EXAMPLE_YARN_FILE, "Start", "Begin").unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.edits()[0].span(), span(0, 15));
    }

    #[test]
    fn test_rename_self_link_is_one_edit() {
        let text = "title: Loop\ntags: \n---\n[[Loop]]\n===\n";
        let mut document = YarnDocument::from_text(text);

        let batch = document.rename_node(text, "Loop", "Cycle").unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.edits()[0].new_text(),
            "title: Cycle\ntags: \n---\n[[Cycle]]\n==="
        );
    }

    #[test]
    fn test_rename_onto_existing_title_is_rejected() {
        let mut document = example_document();
        assert_eq!(
            document.rename_node(EXAMPLE_YARN_FILE, "Start", "Leave"),
            Err(EditError::DuplicateTitle("Leave".to_string()))
        );
        assert_eq!(
            document.rename_node(EXAMPLE_YARN_FILE, "Start", "  "),
            Err(EditError::EmptyTitle)
        );
    }

    #[test]
    fn test_rename_rewrites_first_of_duplicate_titles_only() {
        let text = "title: Target\n---\n===\n\
                    title: Dup\n---\n[[Target]]\n===\n\
                    title: Dup\n---\n[[Target]]\n===\n";
        let mut document = YarnDocument::from_text(text);

        let batch = document.rename_node(text, "Target", "Goal").unwrap();

        let spans: Vec<_> = batch.edits().iter().map(|edit| edit.span()).collect();
        assert_eq!(spans, vec![span(0, 2), span(3, 6)]);
        assert!(batch.edits()[1].new_text().contains("[[Goal]]"));
    }

    #[rstest]
    #[case("title:Tight\n---\n===\n", "Tight")]
    #[case("title:   Wide  \n---\n===\n", "Wide")]
    #[case("title: \n---\n===\n", "")]
    fn test_loosely_written_titles_can_be_edited(#[case] text: &str, #[case] title: &str) {
        let mut document = YarnDocument::from_text(text);
        assert_eq!(document.nodes()[0].title, title);

        let batch = document.set_node_color(text, title, 2).unwrap();

        assert_eq!(batch.edits()[0].span(), span(0, 2));
        assert_eq!(document.nodes()[0].color_id, Some(2));
    }

    #[rstest]
    #[case("Begin\n===\ntitle: Ghost")]
    #[case("Two\r\nLines")]
    fn test_titles_with_line_breaks_are_rejected(#[case] title: &str) {
        let mut document = example_document();
        let invalid: Result<EditBatch, EditError> = Err(EditError::InvalidTitle(title.to_string()));

        assert_eq!(document.rename_node(EXAMPLE_YARN_FILE, "Start", title), invalid);
        assert_eq!(document.add_new_node(EXAMPLE_YARN_FILE, title), invalid);

        let node = Node {
            title: title.to_string(),
            ..document.node_by_title("Leave").unwrap().clone()
        };
        assert_eq!(document.update_node(EXAMPLE_YARN_FILE, "Leave", node), invalid);

        assert_eq!(document.nodes(), example_nodes());
    }

    #[test]
    fn test_update_can_change_title() {
        let mut document = example_document();
        let node = Node {
            title: "Opening".to_string(),
            ..document.node_by_title("Start").unwrap().clone()
        };

        let batch = document.update_node(EXAMPLE_YARN_FILE, "Start", node).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.edits()[0].span(), span(0, 15));
        assert!(batch.edits()[0].new_text().starts_with("title: Opening\n"));
        assert!(document.node_by_title("Start").is_none());

        let clash = Node {
            title: "Leave".to_string(),
            ..document.node_by_title("Opening").unwrap().clone()
        };
        assert_eq!(
            document.update_node(EXAMPLE_YARN_FILE, "Opening", clash),
            Err(EditError::DuplicateTitle("Leave".to_string()))
        );
    }

    #[test]
    fn test_adds_tags_as_a_set() {
        let mut document = example_document();

        document
            .add_tags_to_node(EXAMPLE_YARN_FILE, "LearnMore", "rawText  extra extra")
            .unwrap();

        assert_eq!(document.node_by_title("LearnMore").unwrap().tags, "rawText extra");
    }

    #[test]
    fn test_toggles_tags() {
        let mut document = example_document();

        let batch = document
            .toggle_tags_on_node(EXAMPLE_YARN_FILE, "LearnMore", "rawText done")
            .unwrap();

        assert_eq!(document.node_by_title("LearnMore").unwrap().tags, "done");
        assert!(batch.edits()[0].new_text().contains("\ntags: done\n"));

        document
            .toggle_tags_on_node(EXAMPLE_YARN_FILE, "LearnMore", "done")
            .unwrap();
        assert_eq!(document.node_by_title("LearnMore").unwrap().tags, "");
    }

    #[test]
    fn test_sets_color_and_position() {
        let mut document = example_document();

        let batch = document.set_node_color(EXAMPLE_YARN_FILE, "Start", 4).unwrap();
        assert!(batch.edits()[0].new_text().contains("\ncolorID: 4\n"));

        let batch = document
            .set_node_position(EXAMPLE_YARN_FILE, "Start", Position::new(1.5, -2.0))
            .unwrap();
        assert!(batch.edits()[0].new_text().contains("\nposition: 1.5,-2\n"));

        let start = document.node_by_title("Start").unwrap();
        assert_eq!(start.color_id, Some(4));
        assert_eq!(start.position, Some(Position::new(1.5, -2.0)));
    }

    #[test]
    fn test_deletes_node_without_restubbing() {
        let mut document = example_document();

        let batch = document.delete_node(EXAMPLE_YARN_FILE, "Leave").unwrap();

        assert_eq!(batch.edits(), &[TextEdit::Delete { range: span(16, 23) }]);
        assert_eq!(document.nodes().len(), 2);
        assert!(document.node_by_title("Leave").is_none());
        // the dangling link stays, no stub comes back
        assert_eq!(
            document.nodes()[0].links,
            Some(vec!["Leave".to_string(), "LearnMore".to_string()])
        );
    }

    #[test]
    fn test_adds_new_node_at_end() {
        let mut document = example_document();

        let batch = document
            .add_new_node(EXAMPLE_YARN_FILE, "A Whole New Node")
            .unwrap();

        assert_eq!(
            batch.edits(),
            &[TextEdit::Insert {
                at: LinePosition::new(31, 0),
                text: "title: A Whole New Node\ntags: \n---\n\n===\n".to_string(),
            }]
        );
        assert_eq!(document.nodes().len(), 4);
        assert_eq!(document.nodes()[3], Node::stub("A Whole New Node"));
    }

    #[test]
    fn test_add_new_node_after_unterminated_last_line() {
        let text = "title: A\n---\n===";
        let mut document = YarnDocument::from_text(text);

        let batch = document.add_new_node(text, "B").unwrap();

        assert_eq!(
            batch.edits()[0].new_text(),
            "\ntitle: B\ntags: \n---\n\n===\n"
        );
    }

    #[test]
    fn test_add_existing_node_is_rejected() {
        let mut document = example_document();
        assert_eq!(
            document.add_new_node(EXAMPLE_YARN_FILE, " Start "),
            Err(EditError::DuplicateTitle("Start".to_string()))
        );
        assert_eq!(document.nodes().len(), 3);
    }

    #[test]
    fn test_reload_replaces_everything() {
        let mut document = example_document();
        document.reload("title: Only\n---\nx\n===\n");
        assert_eq!(document.nodes().len(), 1);
        assert_eq!(document.nodes()[0].title, "Only");
    }
}
