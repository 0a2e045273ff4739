use crate::models::Node;

use super::edit::EditBatch;

/// The editor or buffer that owns the document text.
///
/// The engine never writes text itself: it reads the current text, computes an
/// [`EditBatch`] against it and hands the batch back. Applying the batch must
/// be atomic from the engine's point of view.
pub trait DocumentHost {
    /// The full document text as it is right now.
    fn current_text(&self) -> String;

    /// Apply every edit of `batch`, each positioned against the pre-batch text.
    fn apply_edit(&mut self, batch: EditBatch);

    /// Receives the full node list after every change. Hosts without a view
    /// can ignore it.
    fn nodes_changed(&mut self, _nodes: &[Node]) {}
}
