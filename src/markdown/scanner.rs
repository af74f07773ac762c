/// Line classification for the block parser.
///
/// Each line is classified by a leading-pattern scan. Table detection needs
/// the following line as well, so it lives in [`is_table_start`] rather than
/// in [`classify`].
use memchr::memchr;

use super::document::Alignment;

/// Width of a tab stop when measuring indentation.
const TAB_WIDTH: usize = 4;

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Blank,
    Heading {
        level: u8,
        text: &'a str,
    },
    ThematicBreak,
    /// Opening or closing code fence
    Fence {
        marker: u8,
        len: usize,
        info: &'a str,
    },
    ListItem(ListMarker<'a>),
    Quote {
        text: &'a str,
    },
    Text(&'a str),
}

/// A list marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListMarker<'a> {
    /// Leading whitespace width (tabs count as four columns)
    pub indent: usize,
    pub ordered: bool,
    /// Number written on an ordered marker
    pub number: u32,
    /// Item text after the marker
    pub text: &'a str,
}

/// Classify a line. Tables are not detected here.
pub(crate) fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if let Some((level, text)) = heading(line) {
        return LineKind::Heading { level, text };
    }
    if is_thematic_break(line) {
        return LineKind::ThematicBreak;
    }
    if let Some((marker, len, info)) = fence(line) {
        return LineKind::Fence { marker, len, info };
    }
    if let Some(marker) = list_marker(line) {
        return LineKind::ListItem(marker);
    }
    if let Some(text) = quote(line) {
        return LineKind::Quote { text };
    }
    LineKind::Text(line)
}

/// Measure leading whitespace, returning (columns, bytes).
pub(crate) fn indentation(line: &str) -> (usize, usize) {
    let mut width = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => width += 1,
            b'\t' => width += TAB_WIDTH - (width % TAB_WIDTH),
            _ => break,
        }
        bytes += 1;
    }
    (width, bytes)
}

/// Strip at most three leading spaces; lines indented further do not open blocks.
fn block_start(line: &str) -> Option<&str> {
    let (width, bytes) = indentation(line);
    if width > 3 {
        None
    } else {
        Some(&line[bytes..])
    }
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let rest = block_start(line)?;
    let hashes = rest.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let after = &rest[hashes..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }
    Some((hashes as u8, strip_closing_hashes(after.trim())))
}

/// Remove an optional closing sequence: `## Title ##` -> `Title`.
fn strip_closing_hashes(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

fn is_thematic_break(line: &str) -> bool {
    let Some(rest) = block_start(line) else {
        return false;
    };
    let rest = rest.trim_end();
    let Some(first) = rest.bytes().next() else {
        return false;
    };
    if !matches!(first, b'-' | b'*' | b'_') {
        return false;
    }
    let mut count = 0;
    for b in rest.bytes() {
        if b == first {
            count += 1;
        } else if b != b' ' && b != b'\t' {
            return false;
        }
    }
    count >= 3
}

fn fence(line: &str) -> Option<(u8, usize, &str)> {
    let rest = block_start(line)?;
    let marker = rest.bytes().next()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let len = rest.bytes().take_while(|&b| b == marker).count();
    if len < 3 {
        return None;
    }
    let info = rest[len..].trim();
    // A backtick fence's info string cannot itself contain backticks
    if marker == b'`' && memchr(b'`', info.as_bytes()).is_some() {
        return None;
    }
    Some((marker, len, info))
}

/// Whether `line` closes a fence opened with `len` copies of `marker`.
pub(crate) fn closes_fence(line: &str, marker: u8, len: usize) -> bool {
    match fence(line) {
        Some((m, l, info)) => m == marker && l >= len && info.is_empty(),
        None => false,
    }
}

/// Language tag of a fence info string: its first word.
pub(crate) fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_string)
}

fn list_marker(line: &str) -> Option<ListMarker<'_>> {
    let (indent, bytes) = indentation(line);
    let rest = &line[bytes..];
    let first = rest.bytes().next()?;

    let (ordered, number, marker_len) = match first {
        b'-' | b'*' | b'+' => (false, 1, 1),
        b'0'..=b'9' => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits > 9 {
                return None;
            }
            match rest.as_bytes().get(digits) {
                Some(b'.') | Some(b')') => {}
                _ => return None,
            }
            let number = rest[..digits].parse().ok()?;
            (true, number, digits + 1)
        },
        _ => return None,
    };

    let after = &rest[marker_len..];
    if !after.starts_with([' ', '\t']) {
        return None;
    }
    let text = after.trim();
    Some(ListMarker {
        indent,
        ordered,
        number,
        text,
    })
}

fn quote(line: &str) -> Option<&str> {
    let rest = block_start(line)?;
    let after = rest.strip_prefix('>')?;
    Some(after.strip_prefix(' ').unwrap_or(after))
}

/// Whether a line contains a cell delimiter.
#[inline]
pub(crate) fn has_pipe(line: &str) -> bool {
    memchr(b'|', line.as_bytes()).is_some()
}

/// A table starts at a `|` line directly followed by a separator row.
pub(crate) fn is_table_start(line: &str, next: Option<&str>) -> bool {
    has_pipe(line) && next.is_some_and(|next| separator_row(next).is_some())
}

/// Parse a separator row such as `| :--- | :-: | --: |`.
pub(crate) fn separator_row(line: &str) -> Option<Vec<Alignment>> {
    let trimmed = line.trim();
    if !has_pipe(trimmed)
        || !trimmed
            .bytes()
            .all(|b| matches!(b, b'-' | b':' | b'|' | b' ' | b'\t'))
    {
        return None;
    }

    let mut alignments = Vec::new();
    for cell in split_cells(trimmed) {
        let cell = cell.trim();
        if cell.is_empty() || !cell.contains('-') {
            return None;
        }
        let left = cell.starts_with(':');
        let right = cell.ends_with(':');
        alignments.push(match (left, right) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        });
    }
    Some(alignments)
}

/// Split a table row into raw cell texts.
///
/// Leading and trailing pipes are optional; `\|` stays inside a cell and
/// pipes inside code spans do not split.
pub(crate) fn split_cells(line: &str) -> Vec<&str> {
    let mut row = line.trim();
    if let Some(stripped) = row.strip_prefix('|') {
        row = stripped;
    }
    if row.ends_with('|') && !row.ends_with("\\|") {
        row = &row[..row.len() - 1];
    }

    let bytes = row.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut in_code = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            },
            b'`' => in_code = !in_code,
            b'|' if !in_code => {
                cells.push(&row[start..i]);
                start = i + 1;
            },
            _ => {},
        }
        i += 1;
    }
    cells.push(&row[start.min(row.len())..]);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let line = format!("{} Title", "#".repeat(level as usize));
            assert_eq!(
                classify(&line),
                LineKind::Heading {
                    level,
                    text: "Title"
                }
            );
        }
        assert_eq!(classify("####### seven"), LineKind::Text("####### seven"));
        assert_eq!(classify("#hashtag"), LineKind::Text("#hashtag"));
    }

    #[test]
    fn test_heading_closing_sequence() {
        assert_eq!(
            classify("## Title ##"),
            LineKind::Heading {
                level: 2,
                text: "Title"
            }
        );
        assert_eq!(
            classify("# C#"),
            LineKind::Heading {
                level: 1,
                text: "C#"
            }
        );
    }

    #[test]
    fn test_thematic_breaks() {
        assert_eq!(classify("---"), LineKind::ThematicBreak);
        assert_eq!(classify("* * *"), LineKind::ThematicBreak);
        assert_eq!(classify("_____"), LineKind::ThematicBreak);
        assert_ne!(classify("--"), LineKind::ThematicBreak);
        assert_ne!(classify("-*-"), LineKind::ThematicBreak);
    }

    #[test]
    fn test_fences() {
        assert_eq!(
            classify("```rust"),
            LineKind::Fence {
                marker: b'`',
                len: 3,
                info: "rust"
            }
        );
        assert!(closes_fence("````", b'`', 3));
        assert!(!closes_fence("``", b'`', 3));
        assert!(!closes_fence("```js", b'`', 3));
        assert!(!closes_fence("~~~", b'`', 3));
        assert_eq!(fence_language("python title=x"), Some("python".to_string()));
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn test_list_markers() {
        match classify("  - item") {
            LineKind::ListItem(m) => {
                assert_eq!(m.indent, 2);
                assert!(!m.ordered);
                assert_eq!(m.text, "item");
            },
            other => panic!("unexpected {other:?}"),
        }
        match classify("12. twelve") {
            LineKind::ListItem(m) => {
                assert!(m.ordered);
                assert_eq!(m.number, 12);
            },
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(classify("-item"), LineKind::Text("-item"));
        assert_eq!(classify("3.14 is pi"), LineKind::Text("3.14 is pi"));
    }

    #[test]
    fn test_tab_indentation() {
        assert_eq!(indentation("\t- x"), (4, 1));
        assert_eq!(indentation("  \tx"), (4, 3));
    }

    #[test]
    fn test_quote_prefix() {
        assert_eq!(classify("> quoted"), LineKind::Quote { text: "quoted" });
        assert_eq!(classify(">> deep"), LineKind::Quote { text: "> deep" });
    }

    #[test]
    fn test_separator_alignment() {
        assert_eq!(
            separator_row("| :--- | :-: | --: | --- |"),
            Some(vec![
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
                Alignment::None
            ])
        );
        assert_eq!(separator_row("---"), None);
        assert_eq!(separator_row("| a | b |"), None);
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| a | b |"), vec![" a ", " b "]);
        assert_eq!(split_cells("a | b"), vec!["a ", " b"]);
        assert_eq!(split_cells(r"| a \| b | c |"), vec![r" a \| b ", " c "]);
        assert_eq!(split_cells("| `a|b` | c |"), vec![" `a|b` ", " c "]);
    }

    #[test]
    fn test_table_start_needs_separator() {
        assert!(is_table_start("| a | b |", Some("|---|---|")));
        assert!(!is_table_start("| a | b |", Some("| c | d |")));
        assert!(!is_table_start("| a | b |", None));
    }
}
