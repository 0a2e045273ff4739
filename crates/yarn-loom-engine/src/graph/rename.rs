use crate::models::Node;

use super::links::scan_links;

/// Rewrites every link whose target equals `old_title` so it points at
/// `new_title`, in place.
///
/// Only the target span of each link is replaced; display text in the pipe
/// form and all surrounding text are left alone. Titles are compared exactly
/// (after trimming `old_title`), so titles containing regex metacharacters
/// rename like any other. Returns clones of the nodes whose bodies changed, in
/// the order they appear in `nodes`. `links` is not recomputed here.
pub fn rename_links(nodes: &mut [Node], old_title: &str, new_title: &str) -> Vec<Node> {
    let old_title = old_title.trim();
    let new_title = new_title.trim();
    let mut changed = vec![];

    for node in nodes.iter_mut() {
        if let Some(body) = rename_in_body(&node.body, old_title, new_title) {
            node.body = body;
            changed.push(node.clone());
        }
    }

    changed
}

fn rename_in_body(body: &str, old_title: &str, new_title: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut copied_up_to = 0;

    for link in scan_links(body) {
        if body[link.target.clone()] != *old_title {
            continue;
        }
        out.push_str(&body[copied_up_to..link.target.start]);
        out.push_str(new_title);
        copied_up_to = link.target.end;
    }

    if copied_up_to == 0 {
        return None;
    }
    out.push_str(&body[copied_up_to..]);
    Some(out)
}
