//! Front matter extraction.
//!
//! A raw document opens with a delimited header block — title line, creation
//! date, modification date — followed by a subtitle block and the markup
//! body:
//!
//! ```text
//! ---
//! A post title
//! 2024/03/21
//! 2024/03/22
//! ---
//! The subtitle, possibly
//! spanning several lines.
//! ---
//! body markup ...
//! ---
//! ```
//!
//! Extraction isolates those pieces before any markup processing happens.
//! Tab validation runs against the whole raw file first, because the
//! dialect's indentation semantics depend on space counts.

use crate::document::date::Date;
use crate::error::{Error, Result};

/// The front matter / subtitle / body delimiter line.
const DELIMITER: &str = "---\n";

/// A raw document split into front matter, subtitle and body.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub title: String,
    pub created: Date,
    pub modified: Date,
    /// Subtitle block with its trailing newline trimmed; may be empty.
    pub subtitle: String,
    /// Body lines, each terminated by `\n`.
    pub body: Vec<String>,
    /// 1-based raw-file line number of the first body line, for rebasing
    /// transducer error positions.
    pub body_offset: usize,
}

/// Reject any raw document containing a literal tab.
pub fn check_tabs(raw: &str) -> Result<()> {
    for (linenr, line) in raw.lines().enumerate() {
        if line.contains('\t') {
            return Err(Error::TabCharacter { line: linenr + 1 });
        }
    }
    Ok(())
}

/// Split `raw` into newline-terminated lines, normalizing a missing final
/// newline at EOF.
pub fn split_lines(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = raw.split_inclusive('\n').map(String::from).collect();
    if let Some(last) = lines.last_mut()
        && !last.ends_with('\n')
    {
        last.push('\n');
    }
    lines
}

/// Extract front matter, subtitle and body from a raw document.
///
/// Validates the tab rule first, then walks the delimiter structure. A
/// missing final delimiter after the body is tolerated (the body runs to
/// EOF); every other missing or malformed piece is [`Error::Format`].
pub fn extract(raw: &str) -> Result<RawDocument> {
    check_tabs(raw)?;
    let mut lines = split_lines(raw).into_iter().enumerate();

    let mut expect = |what: &str| -> Result<(usize, String)> {
        lines
            .next()
            .ok_or_else(|| Error::Format {
                reason: format!("unexpected end of file, expected {what}"),
                line: raw.lines().count() + 1,
            })
            .map(|(nr, line)| (nr + 1, line))
    };

    let (line, opener) = expect("opening `---` delimiter")?;
    if opener != DELIMITER {
        return Err(Error::Format {
            reason: "expected opening `---` delimiter".to_string(),
            line,
        });
    }

    let (_, title) = expect("title line")?;
    let title = title.trim_end_matches('\n').to_string();
    if title.is_empty() {
        return Err(Error::Format {
            reason: "title line is empty".to_string(),
            line: 2,
        });
    }

    let (line, created) = expect("creation date")?;
    let created = Date::parse(&created).ok_or_else(|| Error::Format {
        reason: "creation date must be YYYY/MM/DD".to_string(),
        line,
    })?;
    let (line, modified) = expect("modification date")?;
    let modified = Date::parse(&modified).ok_or_else(|| Error::Format {
        reason: "modification date must be YYYY/MM/DD".to_string(),
        line,
    })?;

    let (line, closer) = expect("closing `---` after the dates")?;
    if closer != DELIMITER {
        return Err(Error::Format {
            reason: "expected `---` after the modification date".to_string(),
            line,
        });
    }

    // Subtitle block runs to the next delimiter, which is required.
    let mut subtitle = String::new();
    loop {
        let (_, text) = expect("`---` terminating the subtitle")?;
        if text == DELIMITER {
            break;
        }
        subtitle.push_str(&text);
    }
    let subtitle = subtitle.trim_end_matches('\n').to_string();

    // Body runs to the final delimiter, or to EOF when it is absent.
    let mut body = Vec::new();
    let mut body_offset = 0;
    for (nr, text) in lines {
        if text == DELIMITER {
            break;
        }
        if body.is_empty() {
            body_offset = nr + 1;
        }
        body.push(text);
    }

    Ok(RawDocument {
        title,
        created,
        modified,
        subtitle,
        body,
        body_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "---\n\
        A post title\n\
        2024/03/21\n\
        2024/03/22\n\
        ---\n\
        The subtitle\n\
        ---\n\
        # Heading\n\
        body text\n\
        ---\n";

    #[test]
    fn test_extract_well_formed() {
        let doc = extract(RAW).unwrap();
        assert_eq!(doc.title, "A post title");
        assert_eq!(doc.created.to_string(), "2024/03/21");
        assert_eq!(doc.modified.to_string(), "2024/03/22");
        assert_eq!(doc.subtitle, "The subtitle");
        assert_eq!(doc.body, vec!["# Heading\n", "body text\n"]);
        assert_eq!(doc.body_offset, 8);
    }

    #[test]
    fn test_multi_line_subtitle() {
        let raw = "---\nT\n2024/01/01\n2024/01/02\n---\nfirst\nsecond\n---\nbody\n---\n";
        let doc = extract(raw).unwrap();
        assert_eq!(doc.subtitle, "first\nsecond");
    }

    #[test]
    fn test_body_may_run_to_eof() {
        let raw = "---\nT\n2024/01/01\n2024/01/02\n---\nsub\n---\nbody\n";
        let doc = extract(raw).unwrap();
        assert_eq!(doc.body, vec!["body\n"]);
    }

    #[test]
    fn test_missing_final_newline_is_normalized() {
        let raw = "---\nT\n2024/01/01\n2024/01/02\n---\nsub\n---\nbody";
        let doc = extract(raw).unwrap();
        assert_eq!(doc.body, vec!["body\n"]);
    }

    #[test]
    fn test_missing_opening_delimiter() {
        let err = extract("T\n2024/01/01\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn test_malformed_date() {
        let raw = "---\nT\nnot a date\n2024/01/02\n---\nsub\n---\n";
        let err = extract(raw).unwrap_err();
        assert!(matches!(err, Error::Format { line: 3, .. }));
    }

    #[test]
    fn test_missing_subtitle_terminator() {
        let raw = "---\nT\n2024/01/01\n2024/01/02\n---\nsubtitle without end\n";
        assert!(matches!(extract(raw), Err(Error::Format { .. })));
    }

    #[test]
    fn test_tab_reported_with_line_number() {
        let raw = "---\nT\n2024/01/01\n2024/01/02\n---\ns\n---\n\tindented\n";
        let err = extract(raw).unwrap_err();
        assert!(matches!(err, Error::TabCharacter { line: 8 }));
    }
}
