/// Iterate over the lines of `text`, accepting both `\n` and `\r\n` endings.
///
/// Line terminators are not included in the yielded slices.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
}

/// Strips whole blank lines from both ends of `text`.
///
/// Unlike `str::trim`, indentation on the first content line and trailing
/// spaces on the last content line are kept; only lines that are empty or
/// whitespace-only are removed, together with the final line terminator.
pub fn trim_blank_lines(text: &str) -> &str {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    let rest = &text[start..];

    let content_end = rest.trim_end().len();
    if content_end == 0 {
        return "";
    }
    let end = rest[content_end..]
        .find(['\r', '\n'])
        .map_or(rest.len(), |offset| content_end + offset);
    &rest[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("\n", "")]
    #[case("  \n\t\n", "")]
    #[case("body", "body")]
    #[case("body\n", "body")]
    #[case("\n\nbody\n\n", "body")]
    #[case("\r\nbody\r\n\r\n", "body")]
    #[case("    indented\nnext\n", "    indented\nnext")]
    #[case("trailing spaces   \n\n", "trailing spaces   ")]
    #[case("a\n\nb", "a\n\nb")]
    fn test_trim_blank_lines(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(trim_blank_lines(input), expected);
    }

    #[test]
    fn test_split_lines_strips_crlf() {
        let lines: Vec<_> = split_lines("a\r\nb\nc").collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
