/// Inline parser.
///
/// Scans left to right keeping a plain-text accumulator. Emphasis, code
/// spans, links and images are recognized only when their closing syntax is
/// found; otherwise the markers are kept as literal text. The parser never
/// fails and runs in linear time per nesting level: bracket, parenthesis and
/// backtick partners are indexed in one pass, and an emphasis marker whose
/// closer search came up empty is not searched for again.
use std::collections::HashMap;

use memchr::memchr;

use super::document::{Inline, MAX_NESTING_DEPTH, plain_text};

/// Parse inline content.
///
/// Line breaks inside `text` are soft breaks (rendered as a single space)
/// unless the line ends with a backslash or two spaces, which yields
/// [`Inline::LineBreak`].
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    InlineParser::new(text, 0).parse()
}

struct InlineParser<'a> {
    src: &'a str,
    pos: usize,
    text: String,
    out: Vec<Inline>,
    /// Emphasis and link nesting of `src`
    depth: usize,
    /// Emphasis closers known to be absent past `pos`, by [`closer_slot`]
    exhausted: [bool; 4],
    index: Option<DelimiterIndex>,
}

impl<'a> InlineParser<'a> {
    fn new(src: &'a str, depth: usize) -> Self {
        Self {
            src,
            pos: 0,
            text: String::new(),
            out: Vec::new(),
            depth,
            exhausted: [false; 4],
            index: None,
        }
    }

    fn parse(mut self) -> Vec<Inline> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let consumed = match bytes[self.pos] {
                b'\\' => self.escape(),
                b'\n' => self.newline(),
                b'`' => self.code_span(),
                b'*' | b'_' => self.emphasis(),
                b'!' if bytes.get(self.pos + 1) == Some(&b'[') => self.image(),
                b'[' => self.link(),
                _ => false,
            };
            if !consumed {
                self.push_literal_char();
            }
        }
        self.flush_text();
        self.out
    }

    fn index(&mut self) -> &DelimiterIndex {
        let src = self.src;
        self.index
            .get_or_insert_with(|| DelimiterIndex::build(src.as_bytes()))
    }

    /// Parse a nested span one level deeper.
    fn parse_nested(&self, range: std::ops::Range<usize>) -> Vec<Inline> {
        InlineParser::new(&self.src[range], self.depth + 1).parse()
    }

    /// Copy the character at `pos` into the text accumulator.
    fn push_literal_char(&mut self) {
        let ch = self.src[self.pos..].chars().next().unwrap_or('\u{FFFD}');
        self.text.push(ch);
        self.pos += ch.len_utf8().max(1);
    }

    /// Copy `len` bytes at `pos` into the text accumulator.
    fn push_literal(&mut self, len: usize) {
        self.text.push_str(&self.src[self.pos..self.pos + len]);
        self.pos += len;
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.out.push(Inline::Text(std::mem::take(&mut self.text)));
        }
    }

    fn push(&mut self, inline: Inline) {
        self.flush_text();
        self.out.push(inline);
    }

    fn escape(&mut self) -> bool {
        let bytes = self.src.as_bytes();
        match bytes.get(self.pos + 1) {
            Some(b'\n') => {
                self.trim_trailing_spaces();
                self.push(Inline::LineBreak);
                self.pos += 2;
                self.skip_leading_spaces();
                true
            },
            Some(b) if b.is_ascii_punctuation() => {
                self.text.push(*b as char);
                self.pos += 2;
                true
            },
            _ => false,
        }
    }

    fn newline(&mut self) -> bool {
        let hard = self.text.ends_with("  ");
        self.trim_trailing_spaces();
        if hard {
            self.push(Inline::LineBreak);
        } else {
            self.text.push(' ');
        }
        self.pos += 1;
        self.skip_leading_spaces();
        true
    }

    fn trim_trailing_spaces(&mut self) {
        let len = self.text.trim_end_matches([' ', '\t']).len();
        self.text.truncate(len);
    }

    fn skip_leading_spaces(&mut self) {
        let bytes = self.src.as_bytes();
        while matches!(bytes.get(self.pos), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    fn code_span(&mut self) -> bool {
        let bytes = self.src.as_bytes();
        let run = run_length(bytes, self.pos, b'`');
        let content_start = self.pos + run;
        match self.index().next_backtick_run(content_start, run) {
            Some(close) => {
                let code = self.src[content_start..close].to_string();
                self.push(Inline::Code(code));
                self.pos = close + run;
            },
            // Unmatched run is literal as a whole
            None => self.push_literal(run),
        }
        true
    }

    fn emphasis(&mut self) -> bool {
        let bytes = self.src.as_bytes();
        let marker = bytes[self.pos];
        let run = run_length(bytes, self.pos, marker);

        // Intraword underscores stay literal: snake_case
        let intraword = marker == b'_' && self.pos > 0 && is_word_byte(bytes[self.pos - 1]);
        if intraword || self.depth >= MAX_NESTING_DEPTH {
            self.push_literal(run);
            return true;
        }

        if run >= 2
            && let Some(close) = self.closer(marker, 2)
        {
            let children = self.parse_nested(self.pos + 2..close);
            self.push(Inline::Bold(children));
            self.pos = close + 2;
            return true;
        }

        if let Some(close) = self.closer(marker, 1) {
            let children = self.parse_nested(self.pos + 1..close);
            self.push(Inline::Italic(children));
            self.pos = close + 1;
            return true;
        }

        // No closer anywhere: the whole run is literal
        self.push_literal(run);
        true
    }

    /// Closer for an opener of `width` markers at `pos`.
    fn closer(&mut self, marker: u8, width: usize) -> Option<usize> {
        let src = self.src;
        let bytes = src.as_bytes();
        let from = self.pos + width;
        // Opener must be followed by non-whitespace
        if bytes.get(from).is_none_or(u8::is_ascii_whitespace) {
            return None;
        }
        let slot = closer_slot(marker, width);
        if self.exhausted[slot] {
            return None;
        }
        let found = find_closer(bytes, from, marker, width, self.index());
        if found.is_none() {
            self.exhausted[slot] = true;
        }
        found
    }

    fn link(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            return false;
        }
        let open = self.pos;
        match parse_link_parts(self.src, open, self.index()) {
            Some((label, url, end)) => {
                let text = plain_text(&self.parse_nested(label));
                self.push(Inline::Link { text, url });
                self.pos = end;
                true
            },
            None => false,
        }
    }

    fn image(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            return false;
        }
        let open = self.pos + 1;
        match parse_link_parts(self.src, open, self.index()) {
            Some((label, url, end)) => {
                let alt = plain_text(&self.parse_nested(label));
                self.push(Inline::Image { alt, url });
                self.pos = end;
                true
            },
            None => false,
        }
    }
}

/// Slot in [`InlineParser::exhausted`] for a marker and width.
#[inline]
fn closer_slot(marker: u8, width: usize) -> usize {
    usize::from(marker == b'_') * 2 + (width - 1)
}

#[inline]
fn run_length(bytes: &[u8], from: usize, marker: u8) -> usize {
    bytes[from..].iter().take_while(|&&b| b == marker).count()
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Delimiter partners of one source string.
#[derive(Debug, Default)]
struct DelimiterIndex {
    /// `[` to its matching `]`
    brackets: HashMap<usize, usize>,
    /// `(` to its matching `)` on the same line
    parens: HashMap<usize, usize>,
    /// Starts of backtick runs by run length, ascending
    backtick_runs: HashMap<usize, Vec<usize>>,
}

impl DelimiterIndex {
    fn build(bytes: &[u8]) -> Self {
        let mut index = Self::default();

        let mut open_brackets = Vec::new();
        let mut open_parens = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'[' => open_brackets.push(i),
                b']' => {
                    if let Some(open) = open_brackets.pop() {
                        index.brackets.insert(open, i);
                    }
                },
                b'(' => open_parens.push(i),
                b')' => {
                    if let Some(open) = open_parens.pop() {
                        index.parens.insert(open, i);
                    }
                },
                // Destinations do not span lines
                b'\n' => open_parens.clear(),
                _ => {},
            }
            i += 1;
        }

        let mut i = 0;
        while let Some(offset) = memchr(b'`', &bytes[i..]) {
            let start = i + offset;
            let run = run_length(bytes, start, b'`');
            index.backtick_runs.entry(run).or_default().push(start);
            i = start + run;
        }
        index
    }

    /// Start of the first run of exactly `len` backticks at or after `from`.
    fn next_backtick_run(&self, from: usize, len: usize) -> Option<usize> {
        let starts = self.backtick_runs.get(&len)?;
        starts.get(starts.partition_point(|&s| s < from)).copied()
    }
}

/// Find the closing delimiter for an emphasis opener.
///
/// `width` is 2 for bold and 1 for italic. Code spans and escaped characters
/// are skipped. For italic, longer runs of the marker belong to nested bold
/// and are stepped over. For bold, a run of three or more closes with its
/// last two markers so an inner italic can close first.
fn find_closer(
    bytes: &[u8],
    from: usize,
    marker: u8,
    width: usize,
    index: &DelimiterIndex,
) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            },
            b'`' => {
                let run = run_length(bytes, i, b'`');
                match index.next_backtick_run(i + run, run) {
                    Some(close) => i = close + run,
                    None => i += run,
                }
                continue;
            },
            b if b == marker => {
                let run = run_length(bytes, i, marker);
                let preceded_by_space = bytes[i - 1].is_ascii_whitespace();
                let followed_by_word =
                    marker == b'_' && bytes.get(i + run).copied().is_some_and(is_word_byte);
                let candidate = if width == 1 {
                    (run == 1).then_some(i)
                } else {
                    (run >= 2).then(|| i + run - 2)
                };
                if let Some(close) = candidate
                    && close > from
                    && !preceded_by_space
                    && !followed_by_word
                {
                    return Some(close);
                }
                i += run;
                continue;
            },
            _ => {},
        }
        i += 1;
    }
    None
}

/// Parse `[label](destination)` starting at the `[` at `open`.
///
/// Returns the label range, the destination and the index just past `)`.
fn parse_link_parts(
    src: &str,
    open: usize,
    index: &DelimiterIndex,
) -> Option<(std::ops::Range<usize>, String, usize)> {
    let label_end = *index.brackets.get(&open)?;
    let dest_open = label_end + 1;
    if src.as_bytes().get(dest_open) != Some(&b'(') {
        return None;
    }
    let dest_end = *index.parens.get(&dest_open)?;

    let url = destination(src[dest_open + 1..dest_end].trim());
    Some((open + 1..label_end, url, dest_end + 1))
}

/// Extract the URL from a link destination, dropping an optional title.
fn destination(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix('<')
        && let Some(end) = rest.find('>')
    {
        return rest[..end].to_string();
    }
    raw.split_whitespace().next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inlines("hello world"), vec![text("hello world")]);
        assert!(parse_inlines("").is_empty());
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            parse_inlines("Some **bold** text."),
            vec![
                text("Some "),
                Inline::Bold(vec![text("bold")]),
                text(" text.")
            ]
        );
        assert_eq!(
            parse_inlines("_it_ and *also*"),
            vec![
                Inline::Italic(vec![text("it")]),
                text(" and "),
                Inline::Italic(vec![text("also")])
            ]
        );
        assert_eq!(
            parse_inlines("__strong__"),
            vec![Inline::Bold(vec![text("strong")])]
        );
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            parse_inlines("***both***"),
            vec![Inline::Bold(vec![Inline::Italic(vec![text("both")])])]
        );
        assert_eq!(
            parse_inlines("*a **b** c*"),
            vec![Inline::Italic(vec![
                text("a "),
                Inline::Bold(vec![text("b")]),
                text(" c")
            ])]
        );
    }

    #[test]
    fn test_unmatched_markers_are_literal() {
        assert_eq!(parse_inlines("**bold"), vec![text("**bold")]);
        assert_eq!(parse_inlines("a * b"), vec![text("a * b")]);
        assert_eq!(parse_inlines("2*3 = 6"), vec![text("2*3 = 6")]);
        assert_eq!(parse_inlines("`open"), vec![text("`open")]);
        assert_eq!(parse_inlines("[not a link]"), vec![text("[not a link]")]);
        assert_eq!(parse_inlines("![alt] (x)"), vec![text("![alt] (x)")]);
    }

    #[test]
    fn test_intraword_underscore() {
        assert_eq!(
            parse_inlines("snake_case_name"),
            vec![text("snake_case_name")]
        );
    }

    #[test]
    fn test_code_span_is_verbatim() {
        assert_eq!(
            parse_inlines("use `**not bold**` here"),
            vec![
                text("use "),
                Inline::Code("**not bold**".to_string()),
                text(" here")
            ]
        );
        assert_eq!(
            parse_inlines("``a ` b``"),
            vec![Inline::Code("a ` b".to_string())]
        );
    }

    #[test]
    fn test_code_span_hides_closer() {
        assert_eq!(
            parse_inlines("*a `*` b*"),
            vec![Inline::Italic(vec![
                text("a "),
                Inline::Code("*".to_string()),
                text(" b")
            ])]
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            parse_inlines("see [docs](https://example.com \"Title\")!"),
            vec![
                text("see "),
                Inline::Link {
                    text: "docs".to_string(),
                    url: "https://example.com".to_string()
                },
                text("!")
            ]
        );
        assert_eq!(
            parse_inlines("![logo](img/logo.png)"),
            vec![Inline::Image {
                alt: "logo".to_string(),
                url: "img/logo.png".to_string()
            }]
        );
        assert_eq!(
            parse_inlines("[a](<with space.html>)"),
            vec![Inline::Link {
                text: "a".to_string(),
                url: "with space.html".to_string()
            }]
        );
        assert_eq!(
            parse_inlines("[wiki](https://en.wikipedia.org/wiki/Rust_(language))"),
            vec![Inline::Link {
                text: "wiki".to_string(),
                url: "https://en.wikipedia.org/wiki/Rust_(language)".to_string()
            }]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse_inlines(r"\*not italic\*"), vec![text("*not italic*")]);
        assert_eq!(parse_inlines(r"C:\path"), vec![text(r"C:\path")]);
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(parse_inlines("one\ntwo"), vec![text("one two")]);
        assert_eq!(
            parse_inlines("one  \ntwo"),
            vec![text("one"), Inline::LineBreak, text("two")]
        );
        assert_eq!(
            parse_inlines("one\\\ntwo"),
            vec![text("one"), Inline::LineBreak, text("two")]
        );
    }

    #[test]
    fn test_unicode_passthrough() {
        assert_eq!(
            parse_inlines("héllo **wörld** ✓"),
            vec![
                text("héllo "),
                Inline::Bold(vec![text("wörld")]),
                text(" ✓")
            ]
        );
    }

    #[test]
    fn test_link_label_is_inline_parsed() {
        assert_eq!(
            parse_inlines("[**bold** link](https://x.io)"),
            vec![Inline::Link {
                text: "bold link".to_string(),
                url: "https://x.io".to_string()
            }]
        );
        assert_eq!(
            parse_inlines("[`code` label](u)"),
            vec![Inline::Link {
                text: "code label".to_string(),
                url: "u".to_string()
            }]
        );
        assert_eq!(
            parse_inlines(r"![*a* \[b\]](x.png)"),
            vec![Inline::Image {
                alt: "a [b]".to_string(),
                url: "x.png".to_string()
            }]
        );
    }

    fn emphasis_depth(spans: &[Inline]) -> usize {
        spans
            .iter()
            .map(|span| match span {
                Inline::Bold(children) | Inline::Italic(children) => 1 + emphasis_depth(children),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_deep_emphasis_is_capped() {
        let src = format!("{}x{}", "**".repeat(20000), "**".repeat(20000));
        let parsed = std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || parse_inlines(&src))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(emphasis_depth(&parsed), MAX_NESTING_DEPTH);
        assert!(plain_text(&parsed).contains('x'));
    }

    #[test]
    fn test_deep_link_labels_are_capped() {
        let depth = MAX_NESTING_DEPTH + 10;
        let src = format!("{}x{}", "[".repeat(depth), "](u)".repeat(depth));
        let parsed = parse_inlines(&src);
        match parsed.as_slice() {
            [Inline::Link { text, url }] => {
                let literal = depth - MAX_NESTING_DEPTH;
                assert_eq!(url, "u");
                assert_eq!(
                    *text,
                    format!("{}x{}", "[".repeat(literal), "](u)".repeat(literal))
                );
            },
            other => panic!("expected one link, got {other:?}"),
        }
    }

    #[test]
    fn test_many_unclosed_openers_stay_literal() {
        let stars = "**a ".repeat(40000);
        assert_eq!(parse_inlines(&stars), vec![text(&stars)]);

        let underscores = "_a ".repeat(40000);
        assert_eq!(parse_inlines(&underscores), vec![text(&underscores)]);

        let brackets = "[a ".repeat(40000);
        assert_eq!(parse_inlines(&brackets), vec![text(&brackets)]);

        let ticks: String = (1..200).map(|n| format!("{} a ", "`".repeat(n))).collect();
        assert_eq!(parse_inlines(&ticks), vec![text(&ticks)]);
    }

    #[test]
    fn test_closer_search_resumes_after_failure() {
        assert_eq!(
            parse_inlines("*a **b** c"),
            vec![text("*a "), Inline::Bold(vec![text("b")]), text(" c")]
        );
        // A spaced opener does not rule out later closers
        assert_eq!(
            parse_inlines("* a *b*"),
            vec![text("* a "), Inline::Italic(vec![text("b")])]
        );
    }

    #[test]
    fn test_link_destination_stops_at_line_end() {
        assert_eq!(parse_inlines("[a](b\nc)"), vec![text("[a](b c)")]);
    }

    proptest! {
        #[test]
        fn prop_plain_words_survive(s in "[a-zA-Z0-9 ,.;:?]{0,40}") {
            let parsed = parse_inlines(&s);
            if s.is_empty() {
                prop_assert!(parsed.is_empty());
            } else {
                prop_assert_eq!(parsed, vec![Inline::Text(s.clone())]);
            }
        }

        #[test]
        fn prop_bold_word(word in "[a-zA-Z0-9]{1,12}") {
            let parsed = parse_inlines(&format!("**{word}**"));
            prop_assert_eq!(parsed, vec![Inline::Bold(vec![Inline::Text(word)])]);
        }
    }
}
