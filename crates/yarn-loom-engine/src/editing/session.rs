use serde::{Deserialize, Serialize};

use crate::models::{Node, Position};

use super::edit::EditBatch;
use super::host::DocumentHost;
use super::model::{EditError, YarnDocument};

/// A change requested by the editor front-end.
///
/// Serialized as `{"type": "...", "payload": {...}}` with camelCase payload
/// fields so it can travel over a message channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all_fields = "camelCase")]
pub enum NodeAction {
    /// Replaces a node. `original_title` names the node to replace when the
    /// new node carries a different title; links to the old title are not
    /// rewritten, which is what `RenameNode` is for.
    SetNode {
        node: Node,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_title: Option<String>,
    },
    DeleteNode { node_title: String },
    CreateNewNode { title: String },
    SetNodeColor { node_title: String, color_index: u32 },
    SetNodePosition { node_title: String, x: f64, y: f64 },
    RenameNode { node_title: String, new_title: String },
    ToggleTagOnNode { node_title: String, tag: String },
    AddTagToNode { node_title: String, tags: String },
}

/// Connects a [`YarnDocument`] to the host that owns its text.
///
/// All changes go through [`dispatch`](Self::dispatch), one at a time. The
/// host is expected to call [`on_document_changed`](Self::on_document_changed)
/// whenever its text changes; hosts that do not observe their own edits can
/// call [`sync`](Self::sync) after each dispatch instead.
pub struct Session<H: DocumentHost> {
    document: YarnDocument,
    host: H,
}

impl<H: DocumentHost> Session<H> {
    /// Parses the host's current text and pushes the initial node list.
    pub fn new(mut host: H, auto_create_nodes: bool) -> Self {
        let document =
            YarnDocument::from_text(&host.current_text()).with_auto_create_nodes(auto_create_nodes);
        host.nodes_changed(document.nodes());
        Self { document, host }
    }

    pub fn document(&self) -> &YarnDocument {
        &self.document
    }

    pub fn nodes(&self) -> &[Node] {
        self.document.nodes()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Runs `action` against the host's current text, applies the resulting
    /// batch and pushes the updated node list.
    pub fn dispatch(&mut self, action: NodeAction) -> Result<(), EditError> {
        let text = self.host.current_text();
        let batch = self.batch_for(&text, action)?;

        self.host.apply_edit(batch);
        self.host.nodes_changed(self.document.nodes());
        Ok(())
    }

    /// Re-parses `text`, replacing the node list wholesale, and pushes it.
    pub fn on_document_changed(&mut self, text: &str) {
        self.document.reload(text);
        self.host.nodes_changed(self.document.nodes());
    }

    /// [`on_document_changed`](Self::on_document_changed) with the host's
    /// current text.
    pub fn sync(&mut self) {
        let text = self.host.current_text();
        self.on_document_changed(&text);
    }

    fn batch_for(&mut self, text: &str, action: NodeAction) -> Result<EditBatch, EditError> {
        let document = &mut self.document;
        match action {
            NodeAction::SetNode {
                node,
                original_title,
            } => {
                let title = original_title.unwrap_or_else(|| node.title.clone());
                document.update_node(text, &title, node)
            }
            NodeAction::DeleteNode { node_title } => document.delete_node(text, &node_title),
            NodeAction::CreateNewNode { title } => document.add_new_node(text, &title),
            NodeAction::SetNodeColor {
                node_title,
                color_index,
            } => document.set_node_color(text, &node_title, color_index),
            NodeAction::SetNodePosition { node_title, x, y } => {
                document.set_node_position(text, &node_title, Position::new(x, y))
            }
            NodeAction::RenameNode {
                node_title,
                new_title,
            } => document.rename_node(text, &node_title, &new_title),
            NodeAction::ToggleTagOnNode { node_title, tag } => {
                document.toggle_tags_on_node(text, &node_title, &tag)
            }
            NodeAction::AddTagToNode { node_title, tags } => {
                document.add_tags_to_node(text, &node_title, &tags)
            }
        }
    }
}
