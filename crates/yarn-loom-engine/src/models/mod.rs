pub mod node;

pub use node::{Node, Position, node_by_title, position_of_title};
