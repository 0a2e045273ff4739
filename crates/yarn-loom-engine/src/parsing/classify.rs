use crate::models::Position;

use super::kinds::{HeaderKey, POSITION_SEPARATOR, Sentinel};

/// Classification of a single line containing only local facts.
///
/// Header values are already extracted and trimmed. Numeric fields that fail
/// to parse are `None`, so a malformed `position:` or `colorID:` line leaves
/// the field absent rather than carrying a NaN forward.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Title(&'a str),
    Tags(&'a str),
    Position(Option<Position>),
    ColorId(Option<u32>),
    BodyStart,
    BodyEnd,
    Unrecognized,
}

/// Classifies one line of header text.
///
/// Keys are tested in the fixed priority order of [`HeaderKey::ALL`], then the
/// body sentinels. Leading whitespace before a key is ignored. This is a pure
/// prefix test, not a tokenizer: callers decide whether a classification is
/// meaningful in their current state.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let text = line.trim_start();

    for key in HeaderKey::ALL {
        if let Some(rest) = text.strip_prefix(key.prefix()) {
            let value = rest.trim();
            return match key {
                HeaderKey::Title => LineKind::Title(value),
                HeaderKey::Tags => LineKind::Tags(value),
                HeaderKey::Position => LineKind::Position(parse_position(value)),
                HeaderKey::ColorId => LineKind::ColorId(parse_color_id(value)),
            };
        }
    }

    if Sentinel::is_body_start(line) {
        LineKind::BodyStart
    } else if Sentinel::is_body_end(line) {
        LineKind::BodyEnd
    } else {
        LineKind::Unrecognized
    }
}

fn parse_position(value: &str) -> Option<Position> {
    let (x, y) = value.split_once(POSITION_SEPARATOR)?;
    Some(Position::new(parse_coordinate(x)?, parse_coordinate(y)?))
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_color_id(value: &str) -> Option<u32> {
    value.parse().ok()
}
