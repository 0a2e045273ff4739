//! # Link Graph
//!
//! Links are written in node bodies as `[[Target]]` or `[[Display|Target]]`.
//! Each node's `links` list is derived from its body; nothing else stores
//! edges.
//!
//! - **`links`**: extraction, link rebuilding and stub creation
//! - **`rename`**: rewriting link targets when a node is renamed

pub mod links;
pub mod rename;

pub use links::{Link, LinkRef, extract_links, rebuild_links, scan_links};
pub use rename::rename_links;
