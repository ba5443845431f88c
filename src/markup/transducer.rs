//! The markup transducer.
//!
//! A single forward pass over a document's body lines turns the blog markup
//! dialect into an HTML fragment. Each line is classified first (fenced code,
//! tables, lists, blank lines, headings), then scanned character by character
//! for the inline markers. The precedence between the overlapping modes is
//! load-bearing:
//!
//! - an open fenced code block suppresses everything except its own closing
//!   delimiter; content is HTML-escaped wholesale,
//! - raw HTML passthrough (`<tag ...>`) suppresses all other character-level
//!   interpretation until the matching `>`,
//! - inline code suppresses emphasis, links, character references and table
//!   separators until closed,
//! - emphasis and inline code close anywhere once open, but only open at
//!   line start or after a space (so `snake_case_names` never italicize).
//!
//! A backslash suspends the special meaning of the marker character after it.
//! The backslash is consumed by a one-step lookahead decision at the moment
//! it is scanned — if the following character would be interpreted in the
//! current state, the backslash is simply never emitted — so the output
//! buffer is append-only and never retracted.

use crate::error::{Error, Result};
use crate::markup::escape::push_escaped;
use crate::markup::links::LinkTable;

/// The fenced code block delimiter line.
const FENCE: &str = "```\n";

/// Which emphasis markers are currently open.
#[derive(Debug, Default)]
struct Emphasis {
    bold: bool,
    italic: bool,
}

impl Emphasis {
    fn any_open(&self) -> bool {
        self.bold || self.italic
    }
}

/// Scanner state, created fresh for each document.
#[derive(Debug, Default)]
struct ParserState {
    // Line-level block modes.
    in_table: bool,
    in_list: bool,
    in_code_fence: bool,
    // Character-level modes.
    in_html_tag: bool,
    in_numeric_charref: bool,
    in_inline_code: bool,
    in_link_text: bool,
    /// Characters still to skip because they belong to a link-open token.
    link_skip: usize,
    emphasis: Emphasis,
}

/// Transduce body lines into an HTML fragment.
///
/// Each line is expected to carry its trailing `\n`. The link table resolves
/// `![id:text]` references; a reference with no matching definition is
/// [`Error::UnresolvedLink`]. The transducer never fails on marker-free
/// input and is deterministic: the same lines and table always produce the
/// same fragment.
pub fn transduce(lines: &[String], links: &LinkTable) -> Result<String> {
    Transducer::new(lines, links).run()
}

struct Transducer<'a> {
    lines: &'a [String],
    links: &'a LinkTable,
    state: ParserState,
    out: String,
}

impl<'a> Transducer<'a> {
    fn new(lines: &'a [String], links: &'a LinkTable) -> Self {
        let size_hint: usize = lines.iter().map(String::len).sum();
        Self {
            lines,
            links,
            state: ParserState::default(),
            out: String::with_capacity(size_hint + size_hint / 4),
        }
    }

    fn run(mut self) -> Result<String> {
        for linenr in 0..self.lines.len() {
            self.scan_line(linenr)?;
        }
        Ok(self.out)
    }

    /// Classify one line, then hand its characters to [`Self::scan_chars`].
    fn scan_line(&mut self, linenr: usize) -> Result<()> {
        let mut line = self.lines[linenr].as_str();

        // Fenced code blocks take precedence over every other rule: inside an
        // open fence only the closing delimiter is recognized.
        if line == FENCE {
            self.state.in_code_fence = !self.state.in_code_fence;
            self.out.push_str(if self.state.in_code_fence {
                "<pre>\n"
            } else {
                "</pre>\n"
            });
            return Ok(());
        }
        if self.state.in_code_fence {
            for c in line.chars() {
                push_escaped(&mut self.out, c);
            }
            return Ok(());
        }

        // Table wrapper lines pass through verbatim and toggle table mode.
        if line.starts_with("<table") && !self.state.in_table {
            self.state.in_table = true;
            self.out.push_str(line);
            return Ok(());
        }
        if line == "</table>\n" && self.state.in_table {
            self.state.in_table = false;
            self.out.push_str(line);
            return Ok(());
        }

        // Same for list wrappers; items inside get their `- ` prefix
        // rewritten to `<li>`, keeping the author's indentation so manually
        // indented nested lists survive untouched.
        if (line.starts_with("<ul") || line.starts_with("<ol")) && !self.state.in_list {
            self.state.in_list = true;
            self.out.push_str(line);
            return Ok(());
        }
        let rewritten;
        if self.state.in_list {
            let content = line.trim_start_matches(' ');
            if let Some(item) = content.strip_prefix("- ") {
                let indent = line.len() - content.len();
                rewritten = format!("{}<li>{}", &line[..indent], item);
                line = &rewritten;
            }
        }
        if (line == "</ul>\n" || line == "</ol>\n") && self.state.in_list {
            self.state.in_list = false;
            self.out.push_str(line);
            return Ok(());
        }

        // Runs of blank lines become an escalating gap: the first blank line
        // after content is worth two breaks, every further one adds one more.
        if line == "\n" {
            if linenr == 0 || self.lines[linenr - 1] != "\n" {
                self.out.push_str("<br>");
            }
            self.out.push_str("<br>\n");
            return Ok(());
        }

        // Headings: 1-3 leading `#` map to <h2>..<h4>. The marker run and
        // surrounding whitespace (newline included) are stripped before the
        // character scan; the closing tag is emitted after it.
        let mut heading = 0;
        if line.starts_with('#') {
            let hashes = line.bytes().take_while(|&b| b == b'#').count().min(3);
            heading = hashes + 1;
            line = line[hashes..].trim();
            self.out.push_str(&format!("<h{heading}>"));
        }

        if self.state.in_table {
            self.out.push_str("<tr><td>");
        }

        self.scan_chars(line, linenr)?;

        if heading != 0 {
            self.out.push_str(&format!("</h{heading}>\n"));
        }
        Ok(())
    }

    /// Scan one line's characters in strict precedence order.
    fn scan_chars(&mut self, line: &str, linenr: usize) -> Result<()> {
        let chars: Vec<char> = line.chars().collect();
        let len = chars.len();
        // A line ending in two spaces plus newline becomes a hard break; the
        // spaces are decided away here instead of being emitted and undone.
        let hard_break =
            len >= 3 && chars[len - 1] == '\n' && chars[len - 2] == ' ' && chars[len - 3] == ' ';

        let mut escaped = false;
        let mut i = 0;
        while i < len {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            let next2 = chars.get(i + 2).copied();

            // 1. Numeric character reference: pass through until `;`.
            if self.state.in_numeric_charref {
                self.out.push(c);
                // A reference never spans lines.
                if c == ';' || c == '\n' {
                    self.state.in_numeric_charref = false;
                }
                i += 1;
                continue;
            }

            // 2. Characters already consumed as part of a link-open token.
            if self.state.link_skip > 0 {
                self.state.link_skip -= 1;
                i += 1;
                continue;
            }

            // 3. Raw HTML passthrough: verbatim until the closing `>`.
            if self.state.in_html_tag {
                self.out.push(c);
                if c == '>' {
                    self.state.in_html_tag = false;
                }
                i += 1;
                continue;
            }

            // A backslash is consumed exactly when the character after it
            // would otherwise be interpreted in the current state.
            if c == '\\' && !escaped && next.is_some_and(|n| self.consumes_backslash(n, next2)) {
                escaped = true;
                i += 1;
                continue;
            }
            let was_escaped = std::mem::take(&mut escaped);

            // `<` opens passthrough only when it plausibly starts a tag.
            if c == '<' && next.is_some_and(|n| n == '/' || n.is_ascii_alphabetic()) {
                // Escaped: the `<` stays a literal character and no tag
                // mode opens.
                self.out.push('<');
                if !was_escaped {
                    self.state.in_html_tag = true;
                }
                i += 1;
                continue;
            }

            // 4. Hard line break: the two trailing spaces are never emitted.
            if hard_break && i >= len - 3 {
                if c == '\n' {
                    self.out.push_str("<br>\n");
                }
                i += 1;
                continue;
            }

            // 5. Inline code: closes anywhere once open, opens only at line
            // start or after a space.
            if c == '`' {
                if was_escaped {
                    self.out.push('`');
                } else if self.state.in_inline_code {
                    self.out.push_str("</code>");
                    self.state.in_inline_code = false;
                } else if i == 0 || chars[i - 1] == ' ' {
                    self.out.push_str("<code>");
                    self.state.in_inline_code = true;
                } else {
                    self.out.push('`');
                }
                i += 1;
                continue;
            }

            // 6. Everything inside inline code is data.
            if self.state.in_inline_code {
                push_escaped(&mut self.out, c);
                i += 1;
                continue;
            }

            // 7. `&#` opens a numeric character reference.
            if c == '&' && next == Some('#') {
                if was_escaped {
                    self.out.push_str("&amp;");
                } else {
                    self.out.push('&');
                    self.state.in_numeric_charref = true;
                }
                i += 1;
                continue;
            }

            // 8. Emphasis markers, same open/close asymmetry as backtick.
            if c == '*' || c == '_' {
                let tag = if c == '*' { "b" } else { "i" };
                let open = if c == '*' {
                    &mut self.state.emphasis.bold
                } else {
                    &mut self.state.emphasis.italic
                };
                if was_escaped {
                    self.out.push(c);
                } else if *open {
                    *open = false;
                    self.out.push_str(&format!("</{tag}>"));
                } else if i == 0 || chars[i - 1] == ' ' {
                    *open = true;
                    self.out.push_str(&format!("<{tag}>"));
                } else {
                    self.out.push(c);
                }
                i += 1;
                continue;
            }

            // 9. Links: `![id:display text]`, resolved against the table.
            if c == '!' && next == Some('[') && !self.state.in_link_text {
                if was_escaped {
                    self.out.push('!');
                    i += 1;
                    continue;
                }
                let mut id = String::new();
                let mut j = i + 2;
                loop {
                    match chars.get(j).copied() {
                        Some(':') => break,
                        Some(']') | Some('\n') | None => {
                            return Err(Error::MalformedLink { line: linenr + 1 });
                        }
                        Some(ch) => {
                            id.push(ch);
                            j += 1;
                        }
                    }
                }
                let href = self.links.get(&id).ok_or_else(|| Error::UnresolvedLink {
                    id: id.clone(),
                    line: linenr + 1,
                })?;
                self.out.push_str("<a href=\"");
                self.out.push_str(href);
                self.out.push_str("\">");
                self.state.in_link_text = true;
                // `[`, the identifier, and `:` are already consumed.
                self.state.link_skip = j - i;
                i += 1;
                continue;
            }
            if c == ']' && self.state.in_link_text {
                if was_escaped {
                    self.out.push(']');
                } else {
                    self.out.push_str("</a>");
                    self.state.in_link_text = false;
                }
                i += 1;
                continue;
            }

            // 10. Table cells; suppressed while emphasis is open so a `|`
            // inside bold text stays text.
            if self.state.in_table && !self.state.emphasis.any_open() {
                if c == '|' {
                    if was_escaped {
                        self.out.push('|');
                    } else {
                        self.out.push_str("</td><td>");
                    }
                    i += 1;
                    continue;
                }
                if c == '\n' {
                    self.out.push_str("</td></tr>\n");
                    i += 1;
                    continue;
                }
            }

            // 11. Plain text.
            push_escaped(&mut self.out, c);
            i += 1;
        }
        Ok(())
    }

    /// One-step lookahead: would `next` be interpreted as a marker right now?
    fn consumes_backslash(&self, next: char, next2: Option<char>) -> bool {
        let tag_open = next == '<'
            && next2.is_some_and(|n| n == '/' || n.is_ascii_alphabetic());
        if self.state.in_inline_code {
            // Only the backtick and tag-open stay live inside inline code.
            return next == '`' || tag_open;
        }
        match next {
            '`' | '*' | '_' => true,
            '<' => tag_open,
            '|' => self.state.in_table && !self.state.emphasis.any_open(),
            '&' => next2 == Some('#'),
            '!' => next2 == Some('[') && !self.state.in_link_text,
            ']' => self.state.in_link_text,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|l| format!("{l}\n")).collect()
    }

    fn convert(src: &[&str]) -> String {
        transduce(&lines(src), &LinkTable::new()).unwrap()
    }

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(convert(&["a < b & c > d"]), "a &lt; b &amp; c &gt; d\n");
    }

    #[test]
    fn test_bold() {
        assert_eq!(convert(&["*bold*"]), "<b>bold</b>\n");
    }

    #[test]
    fn test_italic() {
        assert_eq!(convert(&["_italic_"]), "<i>italic</i>\n");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(convert(&["`code`"]), "<code>code</code>\n");
    }

    #[test]
    fn test_escaped_markers_stay_literal() {
        assert_eq!(convert(&["\\*lit\\*"]), "*lit*\n");
        assert_eq!(convert(&["\\`lit\\`"]), "`lit`\n");
        assert_eq!(convert(&["\\_lit\\_"]), "_lit_\n");
    }

    #[test]
    fn test_emphasis_does_not_open_mid_word() {
        assert_eq!(convert(&["snake_case_name"]), "snake_case_name\n");
        assert_eq!(convert(&["2*3*4"]), "2*3*4\n");
    }

    #[test]
    fn test_emphasis_closes_anywhere_once_open() {
        assert_eq!(convert(&["_ital_ic"]), "<i>ital</i>ic\n");
        assert_eq!(convert(&["*bo*ld"]), "<b>bo</b>ld\n");
    }

    #[test]
    fn test_code_suppresses_other_markers() {
        assert_eq!(convert(&["`a*b`"]), "<code>a*b</code>\n");
        assert_eq!(convert(&["`a|_b_`"]), "<code>a|_b_</code>\n");
    }

    #[test]
    fn test_backtick_mid_word_is_literal() {
        assert_eq!(convert(&["don`t"]), "don`t\n");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(convert(&["# Title"]), "<h2>Title</h2>\n");
        assert_eq!(convert(&["## Sub"]), "<h3>Sub</h3>\n");
        assert_eq!(convert(&["### Sub"]), "<h4>Sub</h4>\n");
    }

    #[test]
    fn test_heading_content_is_scanned() {
        assert_eq!(convert(&["# A *b* c"]), "<h2>A <b>b</b> c</h2>\n");
    }

    #[test]
    fn test_blank_line_escalation() {
        // First blank line after content yields two breaks, each further
        // blank line one more.
        assert_eq!(convert(&["a", "", "b"]), "a\n<br><br>\nb\n");
        assert_eq!(convert(&["a", "", "", "b"]), "a\n<br><br>\n<br>\nb\n");
    }

    #[test]
    fn test_hard_break_on_trailing_spaces() {
        assert_eq!(convert(&["end  "]), "end<br>\n");
    }

    #[test]
    fn test_fenced_code_block() {
        assert_eq!(
            convert(&["```", "code&here", "```"]),
            "<pre>\ncode&amp;here\n</pre>\n"
        );
    }

    #[test]
    fn test_fence_suppresses_markers_and_blocks() {
        assert_eq!(
            convert(&["```", "*a* _b_ `c`", "# not a heading", "```"]),
            "<pre>\n*a* _b_ `c`\n# not a heading\n</pre>\n"
        );
    }

    #[test]
    fn test_html_tag_passthrough() {
        assert_eq!(
            convert(&["a <span class=\"x\">b</span> c"]),
            "a <span class=\"x\">b</span> c\n"
        );
    }

    #[test]
    fn test_stray_angle_bracket_is_escaped() {
        assert_eq!(convert(&["1 < 2 > 0"]), "1 &lt; 2 &gt; 0\n");
    }

    #[test]
    fn test_escaped_tag_stays_literal() {
        // The backslash is consumed; the `<` stays a raw character and tag
        // mode never opens, so the rest of the line is escaped normally.
        assert_eq!(convert(&["\\<b>x"]), "<b&gt;x\n");
    }

    #[test]
    fn test_numeric_charref_passthrough() {
        assert_eq!(convert(&["a &#955; b"]), "a &#955; b\n");
        assert_eq!(convert(&["\\&#955;"]), "&amp;#955;\n");
    }

    #[test]
    fn test_plain_ampersand_is_escaped() {
        assert_eq!(convert(&["fish & chips"]), "fish &amp; chips\n");
    }

    #[test]
    fn test_link_resolution() {
        let mut links = LinkTable::new();
        links.insert("1".to_string(), "http://x".to_string());
        let out = transduce(&lines(&["![1:Example]"]), &links).unwrap();
        assert_eq!(out, "<a href=\"http://x\">Example</a>\n");
    }

    #[test]
    fn test_link_display_text_is_scanned() {
        let mut links = LinkTable::new();
        links.insert("doc".to_string(), "/doc.html".to_string());
        let out = transduce(&lines(&["see ![doc:the *docs*]!"]), &links).unwrap();
        assert_eq!(out, "see <a href=\"/doc.html\">the <b>docs</b></a>!\n");
    }

    #[test]
    fn test_unresolved_link_is_an_error() {
        let err = transduce(&lines(&["![1:x]"]), &LinkTable::new()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedLink { id, line: 1 } if id == "1"));
    }

    #[test]
    fn test_link_without_colon_is_an_error() {
        let err = transduce(&lines(&["![broken]"]), &LinkTable::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedLink { line: 1 }));
    }

    #[test]
    fn test_escaped_link_open() {
        let out = transduce(&lines(&["\\![1:x]"]), &LinkTable::new()).unwrap();
        assert_eq!(out, "![1:x]\n");
    }

    #[test]
    fn test_table_rows_and_cells() {
        assert_eq!(
            convert(&["<table>", "a|b|c", "</table>"]),
            "<table>\n<tr><td>a</td><td>b</td><td>c</td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_escaped_pipe_in_table() {
        assert_eq!(
            convert(&["<table>", "a\\|b", "</table>"]),
            "<table>\n<tr><td>a|b</td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_pipe_outside_table_is_text() {
        assert_eq!(convert(&["a|b"]), "a|b\n");
    }

    #[test]
    fn test_pipe_inside_emphasis_is_text() {
        assert_eq!(
            convert(&["<table>", "*a|b*|c", "</table>"]),
            "<table>\n<tr><td><b>a|b</b></td><td>c</td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_list_items_rewritten() {
        assert_eq!(
            convert(&["<ul>", "- one", "- two", "</ul>"]),
            "<ul>\n<li>one\n<li>two\n</ul>\n"
        );
    }

    #[test]
    fn test_indented_list_item_keeps_indent() {
        assert_eq!(
            convert(&["<ul>", "- one", "  <ul>", "  - nested", "  </ul>", "</ul>"]),
            "<ul>\n<li>one\n  <ul>\n  <li>nested\n  </ul>\n</ul>\n"
        );
    }

    #[test]
    fn test_dash_outside_list_is_text() {
        assert_eq!(convert(&["- not a list"]), "- not a list\n");
    }

    #[test]
    fn test_state_does_not_leak_between_documents() {
        // An unclosed marker in one document must not affect the next.
        assert_eq!(convert(&["*unclosed"]), "<b>unclosed\n");
        assert_eq!(convert(&["plain"]), "plain\n");
    }

    #[test]
    fn test_determinism() {
        let src = lines(&["# T", "*b* _i_ `c`", "", "<table>", "a|b", "</table>"]);
        let links = LinkTable::new();
        let first = transduce(&src, &links).unwrap();
        let second = transduce(&src, &links).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_marker_free_text_round_trips_escaped(
            words in prop::collection::vec("[a-z0-9 .,:;()]{0,20}", 1..8)
        ) {
            // Trailing spaces are trimmed so no line forms a hard break.
            let src: Vec<String> = words
                .iter()
                .map(|w| w.trim_end())
                .filter(|w| !w.is_empty())
                .map(|w| format!("{w}\n"))
                .collect();
            let links = LinkTable::new();
            let out = transduce(&src, &links).unwrap();
            prop_assert_eq!(&out, &src.concat());
            // Determinism: a second pass is byte-identical.
            prop_assert_eq!(transduce(&src, &links).unwrap(), out);
        }
    }
}
