//! Page assembly.
//!
//! Wraps a transduced HTML fragment in the full page template. The first
//! thing in every generated file is a machine-readable metadata header:
//!
//! ```text
//! <!--
//! TITLE: A post title
//! CREATED: 2024/03/21
//! MODIFIED: 2024/03/22
//! -->
//! ```
//!
//! The index builder reads titles and dates back out of this header instead
//! of re-parsing markup.

use crate::document::front_matter::RawDocument;
use crate::markup::escape::escape_html;

/// Wrap a transduced fragment in the full page document.
pub fn assemble(doc: &RawDocument, fragment: &str) -> String {
    let title = escape_html(&doc.title);
    let subtitle = escape_html(&doc.subtitle);
    let created = doc.created.to_text();
    let modified = doc.modified.to_text();
    format!(
        r#"<!--
TITLE: {raw_title}
CREATED: {raw_created}
MODIFIED: {raw_modified}
-->
<html>
    <head>
        <meta charset="utf-8"/>
        <title>{title}</title>
        <link rel="stylesheet" href="style.css" media="screen">
    </head>
    <body>
        <header>
            <h1 class="blog-title">{title}</h1>
        </header>
        <p class="subtitle">
{subtitle}
        </p>
        <table class="blog-date"><tr>
                <td class="blog-date">Date created</td>
                <td class="blog-date">{created}</td>
            </tr><tr>
                <td class="blog-date">Last modified</td>
                <td class="blog-date">{modified}</td>
        </tr></table>
        <main>
<!-- Blog content starts here -->
{fragment}<!-- Blog content ends here -->
        </main>
    </body>
</html>
"#,
        raw_title = doc.title,
        raw_created = doc.created,
        raw_modified = doc.modified,
    )
}
