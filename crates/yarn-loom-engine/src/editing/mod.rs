/*!
 * # Editing Core
 *
 * The document text is owned by a host (an editor buffer, a file, a rope).
 * This module keeps the in-memory node list in step with that text without
 * ever writing it directly.
 *
 * ## Edit Loop
 *
 * 1. An action arrives (`NodeAction`, or a direct `YarnDocument` call)
 * 2. The model locates the node by title and applies the field change
 * 3. Links are rebuilt, possibly creating stub nodes for new targets
 * 4. The changed nodes are serialized with `create_node_text`
 * 5. Their line ranges are located by a fresh scan of the host's text
 * 6. The host applies the resulting `EditBatch` atomically
 * 7. When the host's text changes, the node list is re-parsed wholesale
 *
 * Ranges are never cached. Every range in a batch is computed against the
 * same pre-edit text, so a batch can rename one node and rewrite the links in
 * several others in one step.
 *
 * ## Module Structure
 *
 * - **`edit`**: `LinePosition`, `LineRange`, `TextEdit` and `EditBatch`
 * - **`range`**: `locate_node_range`, the title-to-lines lookup
 * - **`model`**: `YarnDocument`, the exclusive owner of the node list
 * - **`host`**: the `DocumentHost` trait implemented by text owners
 * - **`session`**: `NodeAction` and the `Session` dispatch loop
 * - **`buffer`**: `RopeBuffer`, an in-memory host on `xi_rope`
 *
 * ## Usage Pattern
 *
 * ```rust
 * use yarn_loom_engine::editing::{NodeAction, RopeBuffer, Session};
 *
 * let text = "title: Start\ntags: \n---\nHello\n===\n";
 * let mut session = Session::new(RopeBuffer::new(text), true);
 *
 * session
 *     .dispatch(NodeAction::CreateNewNode { title: "Next".to_string() })
 *     .unwrap();
 * session.sync();
 *
 * assert_eq!(session.nodes().len(), 2);
 * assert!(session.host().text().ends_with("title: Next\ntags: \n---\n\n===\n"));
 * ```
 */

pub mod buffer;
pub mod edit;
pub mod host;
pub mod model;
pub mod range;
pub mod session;

pub use buffer::RopeBuffer;
pub use edit::{EditBatch, LinePosition, LineRange, TextEdit};
pub use host::DocumentHost;
pub use model::{EditError, YarnDocument};
pub use range::{NodeRange, RangeError, locate_node_range};
pub use session::{NodeAction, Session};
