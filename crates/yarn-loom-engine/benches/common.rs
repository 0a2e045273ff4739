// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_yarn_document(nodes: usize) -> String {
    let mut content = String::new();

    for index in 0..nodes {
        let next = (index + 1) % nodes;
        content.push_str(&format!(
            "title: Node {index}\ntags: generated bench\nposition: {},{}\n---\n",
            index * 40,
            index * 25
        ));
        content.push_str("A: Some dialogue that goes on for a while.\n");
        content.push_str("-> A choice\n    B: A nested reply.\n");
        content.push_str(&format!("[[Go on|Node {next}]]\n[[Node {index}]]\n===\n"));
    }

    content
}
