//! # blogify
//!
//! A small static blog generator for a constrained, line-oriented plain-text
//! markup. Each source file carries front matter (title, dates, subtitle)
//! followed by a markup body; blogify converts the body in a single forward
//! pass into an HTML fragment, wraps it in the page template, and builds a
//! navigation index over the generated pages.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Convert every posts/*.blog into site/, then build site/index.html.
//! let report = blogify::convert_dir(Path::new("posts"), Path::new("site"), "blog").unwrap();
//! assert!(report.is_success());
//! blogify::write_index(Path::new("site"), "My blog").unwrap();
//! ```
//!
//! ## The dialect
//!
//! Headings via 1-3 leading `#`; lists as literal `<ul>`/`<ol>` wrappers
//! with `- ` item prefixes; tables as literal `<table>` wrappers with
//! `|`-separated cells; fenced code blocks between ```` ``` ```` lines;
//! inline `*bold*`, `_italic_` and `` `code` ``; links `![id:text]` resolved
//! against `! id: href` definition lines; raw HTML and `&#NNN;` character
//! references passed through; a backslash suspends the marker after it.
//! See [`markup::transduce`] for the precedence rules.

pub mod convert;
pub mod document;
pub mod error;
pub mod index;
pub mod markup;

pub use convert::{BatchReport, convert_dir, convert_document, convert_file, read_source};
pub use error::{Error, Result};
pub use index::{build_index, write_index};
pub use markup::{LinkTable, collect_definitions, transduce};
