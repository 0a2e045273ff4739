use crate::models::{Node, Position};

/// Three-node document shared by the unit tests; also used by `tests/`.
pub const EXAMPLE_YARN_FILE: &str = include_str!("../../tests/fixtures/example.yarn");

/// The nodes of [`EXAMPLE_YARN_FILE`] as parsed and linked.
pub fn example_nodes() -> Vec<Node> {
    vec![
        Node {
            title: "Start".to_string(),
            tags: String::new(),
            body: "A: Hey, I'm a character in a script!
B: And I am too! You are talking to me!
-> What's going on
    A: Why this is a demo of the script system!
    B: And you're in it!
-> Um ok
A: How delightful!
B: What would you prefer to do next?
[[Leave|Leave]]
[[Learn more|LearnMore]]
"
            .to_string(),
            position: Some(Position::new(592.0, 181.0)),
            color_id: Some(0),
            links: Some(vec!["Leave".to_string(), "LearnMore".to_string()]),
        },
        Node {
            title: "Leave".to_string(),
            tags: String::new(),
            body: "A: Oh, goodbye!\nB: You'll be back soon!\n".to_string(),
            position: Some(Position::new(387.0, 487.0)),
            color_id: Some(0),
            links: None,
        },
        Node {
            title: "LearnMore".to_string(),
            tags: "rawText".to_string(),
            body: "A: HAHAHA\n".to_string(),
            position: Some(Position::new(763.0, 472.0)),
            color_id: Some(0),
            links: None,
        },
    ]
}

/// A temporary directory removed when dropped.
pub fn create_test_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("create temp dir")
}

/// Writes `content` to `name` inside `dir`, creating subdirectories.
pub fn create_test_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(&path, content).expect("write test file");
    path
}
