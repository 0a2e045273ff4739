pub mod editing;
pub mod graph;
pub mod io;
pub mod models;
pub mod parsing;
pub mod search;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    DocumentHost, EditBatch, EditError, NodeAction, RangeError, RopeBuffer, Session, TextEdit,
    YarnDocument, locate_node_range,
};
pub use graph::{extract_links, rebuild_links, rename_links};
pub use io::*;
pub use models::{Node, Position, node_by_title};
pub use parsing::{create_node_text, parse_node_text, parse_yarn_file};
pub use search::{NodeFilter, SearchError, SearchQuery};
