//! # Parsing
//!
//! Line-oriented parsing of the Yarn node format:
//!
//! ```text
//! title: <string>
//! tags: <space-separated tokens>
//! [position: <x>,<y>]
//! [colorID: <int>]
//! ---
//! <body>
//! ===
//! ```
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineKind` by literal prefix tests, without reference to context.
//! 2. **Block Construction** (`document`, `node_text`): an explicit
//!    `Header`/`Body` state machine decides which classifications count.
//!
//! ## Modules
//!
//! - **`kinds`**: header keys and body sentinels (all grammar literals)
//! - **`lines`**: line splitting and blank-line trimming
//! - **`classify`**: `classify_line` producing `LineKind`
//! - **`node_text`**: the single-node codec (`create_node_text`, `parse_node_text`)
//! - **`document`**: `DocumentBuilder` and `parse_yarn_file` for whole documents
//!
//! ## Key Invariants
//!
//! - Parsing never fails; malformed input yields partial nodes
//! - `parse_node_text(&create_node_text(n)) == n` for normalized nodes
//! - Header-looking lines inside a body are body text

pub mod classify;
pub mod document;
pub mod kinds;
pub mod lines;
pub mod node_text;

pub use classify::{LineKind, classify_line};
pub use document::{DocumentBuilder, parse_yarn_file};
pub use kinds::{HeaderKey, Sentinel};
pub use node_text::{create_node_text, parse_node_text};
