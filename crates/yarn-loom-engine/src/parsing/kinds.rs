//! # Block Kinds
//!
//! Every literal of the node block grammar lives here. The classifier, the
//! codec and the range locator refer to these constants; none of them
//! hardcode `title:` or `===`.

/// A header key line, in the priority order used when classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKey {
    Title,
    Tags,
    Position,
    ColorId,
}

impl HeaderKey {
    /// Keys in classification priority order; the first match wins.
    pub const ALL: [HeaderKey; 4] = [
        HeaderKey::Title,
        HeaderKey::Tags,
        HeaderKey::Position,
        HeaderKey::ColorId,
    ];

    /// The literal prefix recognised on input.
    pub fn prefix(self) -> &'static str {
        match self {
            HeaderKey::Title => "title:",
            HeaderKey::Tags => "tags:",
            HeaderKey::Position => "position:",
            HeaderKey::ColorId => "colorID:",
        }
    }

    /// The header line as written for `value`, e.g. `title: Start`.
    pub fn line(self, value: &str) -> String {
        format!("{} {value}", self.prefix())
    }
}

/// The two sentinel lines that delimit a node body.
pub struct Sentinel;

impl Sentinel {
    pub const BODY_START: &'static str = "---";
    pub const BODY_END: &'static str = "===";

    pub fn is_body_start(line: &str) -> bool {
        line.trim() == Self::BODY_START
    }

    pub fn is_body_end(line: &str) -> bool {
        line.trim() == Self::BODY_END
    }
}

/// Separator between coordinates on a `position:` line.
pub const POSITION_SEPARATOR: char = ',';
