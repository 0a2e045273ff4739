use serde::{Deserialize, Serialize};

/// A zero-based line/column position in the document text.
///
/// Columns count bytes within the line. Hosts clamp positions past the end of
/// a line or of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinePosition {
    pub line: usize,
    pub col: usize,
}

impl LinePosition {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A half-open span of document text between two line positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: LinePosition,
    pub end: LinePosition,
}

impl LineRange {
    pub fn new(start: LinePosition, end: LinePosition) -> Self {
        Self { start, end }
    }
}

/// One text operation inside an [`EditBatch`].
///
/// Every position refers to the document text as it was *before* the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextEdit {
    Replace { range: LineRange, text: String },
    Insert { at: LinePosition, text: String },
    Delete { range: LineRange },
}

impl TextEdit {
    /// The span of pre-edit text this edit consumes (empty for inserts).
    pub fn span(&self) -> LineRange {
        match self {
            TextEdit::Replace { range, .. } | TextEdit::Delete { range } => *range,
            TextEdit::Insert { at, .. } => LineRange::new(*at, *at),
        }
    }

    /// Text written in place of [`span`](Self::span).
    pub fn new_text(&self) -> &str {
        match self {
            TextEdit::Replace { text, .. } | TextEdit::Insert { text, .. } => text,
            TextEdit::Delete { .. } => "",
        }
    }
}

/// A set of edits the host must apply as one atomic change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBatch {
    edits: Vec<TextEdit>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, range: LineRange, text: impl Into<String>) {
        self.edits.push(TextEdit::Replace {
            range,
            text: text.into(),
        });
    }

    pub fn insert(&mut self, at: LinePosition, text: impl Into<String>) {
        self.edits.push(TextEdit::Insert {
            at,
            text: text.into(),
        });
    }

    pub fn delete(&mut self, range: LineRange) {
        self.edits.push(TextEdit::Delete { range });
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl IntoIterator for EditBatch {
    type Item = TextEdit;
    type IntoIter = std::vec::IntoIter<TextEdit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}
