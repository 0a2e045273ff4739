use std::ops::Range;

use xi_rope::{LinesMetric, Rope, delta::Builder};

use crate::models::Node;

use super::edit::{EditBatch, LinePosition};
use super::host::DocumentHost;

/// An in-memory [`DocumentHost`] backed by an `xi_rope::Rope`.
///
/// Batches compile to a single delta, so either every edit lands or (for a
/// malformed batch) the overlapping ones are skipped and the rest still apply
/// together.
#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
    rope: Rope,
    /// Incremented once per applied batch.
    version: u64,
    /// Last node list pushed by the session.
    nodes: Vec<Node>,
}

impl RopeBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
            ..Self::default()
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn pushed_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Applies `batch` as one delta against the current rope.
    pub fn apply(&mut self, batch: &EditBatch) {
        let mut spans: Vec<(Range<usize>, &str)> = batch
            .edits()
            .iter()
            .map(|edit| {
                let span = edit.span();
                let start = self.offset_of(span.start);
                let end = self.offset_of(span.end).max(start);
                (start..end, edit.new_text())
            })
            .collect();
        // stable, so inserts at the same offset keep batch order
        spans.sort_by_key(|(range, _)| range.start);

        let mut builder = Builder::new(self.rope.len());
        let mut last_end = 0;
        for (range, text) in spans {
            if range.start < last_end {
                log::warn!("skipping overlapping edit at byte {}", range.start);
                continue;
            }
            last_end = range.end;
            builder.replace(range, Rope::from(text));
        }

        self.rope = builder.build().apply(&self.rope);
        self.version += 1;
        log::debug!(
            "applied batch of {} edit(s), version {}",
            batch.len(),
            self.version
        );
    }

    /// Byte offset of `position`, clamped to the end of its line (before any
    /// line terminator) and to the end of the document.
    fn offset_of(&self, position: LinePosition) -> usize {
        let len = self.rope.len();
        let newlines = self.rope.measure::<LinesMetric>();
        if position.line > newlines {
            return len;
        }

        let line_start = self.rope.offset_of_line(position.line);
        let mut line_end = if position.line < newlines {
            self.rope.offset_of_line(position.line + 1) - 1
        } else {
            len
        };
        if line_end > line_start && self.rope.slice_to_cow(line_end - 1..line_end) == "\r" {
            line_end -= 1;
        }

        (line_start + position.col).min(line_end)
    }
}

impl DocumentHost for RopeBuffer {
    fn current_text(&self) -> String {
        self.text()
    }

    fn apply_edit(&mut self, batch: EditBatch) {
        self.apply(&batch);
    }

    fn nodes_changed(&mut self, nodes: &[Node]) {
        self.nodes = nodes.to_vec();
    }
}
