//! Index page generation.
//!
//! After a batch conversion, the index builder enumerates the generated
//! pages, reads their metadata headers back (no markup re-parsing), and
//! renders one table of title links and creation dates. Pages sort by the
//! numeric prefix of their filename, newest (largest) first — the prefix is
//! the primary key, not the embedded date. Files with prefix `0` are drafts
//! and stay out of the index.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::document::date::Date;
use crate::error::{Error, Result};
use crate::markup::escape::escape_html;

/// Characters percent-encoded in index hrefs, beyond controls.
const HREF_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'&')
    .add(b'%');

/// Metadata read back from a generated page's header comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub created: Date,
}

/// Parse the `<!-- TITLE/CREATED -->` header of a generated page.
fn parse_meta(content: &str) -> Option<PageMeta> {
    let mut lines = content.lines();
    if lines.next()? != "<!--" {
        return None;
    }
    let title = lines.next()?.strip_prefix("TITLE:")?.trim().to_string();
    let created = Date::parse(lines.next()?.strip_prefix("CREATED:")?.trim())?;
    Some(PageMeta { title, created })
}

/// The numeric filename prefix used as the sort key, e.g. `12-post.html` → 12.
fn numeric_prefix(name: &str) -> Option<u32> {
    let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Decide whether a directory entry belongs in the index.
fn indexable(name: &str) -> Option<u32> {
    if name.starts_with('.') || name == "index.html" || !name.ends_with(".html") {
        return None;
    }
    match numeric_prefix(name) {
        // Prefix 0 marks drafts; no prefix means the file is not a post.
        Some(0) | None => None,
        Some(n) => Some(n),
    }
}

/// Render the index page over the generated pages in `pages_dir`.
///
/// Fails with [`Error::Format`] if any indexable page is missing its
/// metadata header, and with [`Error::Io`] on filesystem problems.
pub fn build_index(pages_dir: &Path, blog_title: &str) -> Result<String> {
    // BTreeMap keys give the sort order; on duplicate prefixes the
    // lexicographically-last filename wins, deterministically.
    let mut pages = BTreeMap::new();
    let mut names = Vec::new();
    for entry in fs::read_dir(pages_dir)? {
        let entry = entry?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    for name in names {
        if let Some(number) = indexable(&name) {
            pages.insert(number, name);
        }
    }

    let mut rows = String::new();
    // Newest (largest prefix) first.
    for name in pages.values().rev() {
        let content = fs::read_to_string(pages_dir.join(name))?;
        let meta = parse_meta(&content).ok_or_else(|| Error::Format {
            reason: format!("{name}: missing or malformed metadata header"),
            line: 1,
        })?;
        let href = utf8_percent_encode(name, HREF_ENCODE);
        rows.push_str(&format!(
            r#"<tr>
    <td class="blog-index-name">
        <a href="{href}">{title}</a>
    </td>
    <td class="blog-index-date">
        {date}
    </td>
</tr>
"#,
            title = escape_html(&meta.title),
            date = meta.created.to_text(),
        ));
    }

    let title = escape_html(blog_title);
    Ok(format!(
        r#"<html>
    <head>
        <meta charset="utf-8"/>
        <title>{title}</title>
        <link rel="stylesheet" href="style.css" media="screen">
    </head>
    <body class="blog-index">
        <header>
            <h1 class="blog-title">{title}</h1>
        </header>
        <table class="blog-index">
<!-- Index starts here -->
{rows}<!-- Index ends here -->
        </table>
    </body>
</html>
"#
    ))
}

/// Build the index and write it as `index.html` inside `pages_dir`.
pub fn write_index(pages_dir: &Path, blog_title: &str) -> Result<PathBuf> {
    let html = build_index(pages_dir, blog_title)?;
    let path = pages_dir.join("index.html");
    fs::write(&path, html)?;
    Ok(path)
}
