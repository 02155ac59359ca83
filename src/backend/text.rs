//! Line-addressed text primitives. Content is split on `\n` only, so a
//! trailing newline counts as a final empty line and `\r` stays with its line.

/// Glyph between a line number and the line's content
pub const LINE_NUMBER_SEPARATOR: char = '→';

pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// Render lines `start..=end` (1-indexed) with line-number prefixes.
///
/// Returns `None` when the range is empty, inverted, or runs past the end.
pub fn render_numbered(content: &str, range: Option<(usize, usize)>) -> Option<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let (start, end) = range.unwrap_or((1, lines.len()));

    if start == 0 || start > end || end > lines.len() {
        return None;
    }

    let rendered = lines[start - 1..end]
        .iter()
        .enumerate()
        .map(|(idx, line)| format!("{}{}{}", start + idx, LINE_NUMBER_SEPARATOR, line))
        .collect::<Vec<_>>()
        .join("\n");

    Some(rendered)
}

/// Replace the first occurrence of `old`; `None` if it does not occur
pub fn replace_first(content: &str, old: &str, new: &str) -> Option<String> {
    let at = content.find(old)?;
    let mut out = String::with_capacity(content.len() - old.len() + new.len());
    out.push_str(&content[..at]);
    out.push_str(new);
    out.push_str(&content[at + old.len()..]);
    Some(out)
}

/// Insert `text` as a new line before 1-indexed `line`.
///
/// Trailing whitespace of `text` is dropped. Valid lines are
/// `1..=line_count + 1`; anything else returns `None`.
pub fn insert_line(content: &str, line: usize, text: &str) -> Option<String> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if line == 0 || line > lines.len() + 1 {
        return None;
    }

    lines.insert(line - 1, text.trim_end());
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_line() {
        assert_eq!(
            render_numbered("TypeScript is great", None).unwrap(),
            "1→TypeScript is great"
        );
    }

    #[test]
    fn test_render_range_inclusive() {
        let content = "a\nb\nc\nd";
        assert_eq!(render_numbered(content, Some((2, 3))).unwrap(), "2→b\n3→c");
        assert_eq!(render_numbered(content, Some((4, 4))).unwrap(), "4→d");
    }

    #[test]
    fn test_render_trailing_newline_is_empty_line() {
        assert_eq!(render_numbered("a\n", None).unwrap(), "1→a\n2→");
        assert_eq!(line_count("a\n"), 2);
    }

    #[test]
    fn test_render_empty_file() {
        assert_eq!(render_numbered("", None).unwrap(), "1→");
    }

    #[test]
    fn test_render_rejects_bad_ranges() {
        let content = "a\nb\nc";
        assert!(render_numbered(content, Some((0, 2))).is_none());
        assert!(render_numbered(content, Some((3, 2))).is_none());
        assert!(render_numbered(content, Some((2, 4))).is_none());
        assert!(render_numbered(content, Some((5, 9))).is_none());
    }

    #[test]
    fn test_replace_first_only() {
        assert_eq!(replace_first("ab ab", "ab", "x").unwrap(), "x ab");
    }

    #[test]
    fn test_replace_multiline_and_unicode() {
        assert_eq!(
            replace_first("héllo\nwörld\n", "llo\nwö", "LLO WÖ").unwrap(),
            "héLLO WÖrld\n"
        );
    }

    #[test]
    fn test_replace_missing() {
        assert!(replace_first("abc", "z", "y").is_none());
    }

    #[test]
    fn test_insert_prepend() {
        assert_eq!(insert_line("a\nb\nc", 1, "top").unwrap(), "top\na\nb\nc");
    }

    #[test]
    fn test_insert_append() {
        assert_eq!(insert_line("a\nb\nc", 4, "end").unwrap(), "a\nb\nc\nend");
    }

    #[test]
    fn test_insert_middle_strips_trailing_whitespace() {
        assert_eq!(insert_line("a\nc", 2, "b  \n\n").unwrap(), "a\nb\nc");
    }

    #[test]
    fn test_insert_out_of_range() {
        assert!(insert_line("a\nb\nc", 0, "x").is_none());
        assert!(insert_line("a\nb\nc", 5, "x").is_none());
    }
}
