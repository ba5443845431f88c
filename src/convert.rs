//! Document conversion pipeline and batch driver.
//!
//! [`convert_document`] is the pure pipeline: front matter → link
//! collection → transduction → page assembly. The file and directory
//! drivers around it take every path explicitly — nothing here depends on
//! the process working directory — and the batch driver isolates failures
//! per file so one malformed post never blocks the rest of the blog.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{assemble, extract};
use crate::error::{Error, Result};
use crate::markup::{collect_definitions, transduce};

/// Result of one batch run: what was written, and what failed.
///
/// Failures keep their source path and error side by side; the batch is a
/// success only when `failed` is empty.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert one raw document into a complete HTML page.
///
/// Pure except for the error path: the same input always produces the same
/// page. Transducer errors are rebased from body-relative to raw-file line
/// numbers before being returned.
pub fn convert_document(raw: &str) -> Result<String> {
    let mut doc = extract(raw)?;
    let links = collect_definitions(&mut doc.body);
    let offset = doc.body_offset.saturating_sub(1);
    let fragment =
        transduce(&doc.body, &links).map_err(|e| e.rebase_line(offset))?;
    Ok(assemble(&doc, &fragment))
}

/// Decode raw file bytes to text.
///
/// UTF-8 first; malformed input falls back to Windows-1252, the usual
/// culprit in sources that predate the blog.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Read and decode a source file.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_text(&bytes).into_owned())
}

/// Convert one source file, writing `<stem>.html` into `dest_dir`.
///
/// Returns the path of the generated page.
pub fn convert_file(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let raw = read_source(src)?;
    let page = convert_document(&raw)?;
    let stem = src.file_stem().unwrap_or(src.as_os_str());
    let dest = dest_dir.join(stem).with_extension("html");
    fs::write(&dest, page)?;
    Ok(dest)
}

/// Convert every `*.{ext}` file in `src_dir` into `dest_dir`.
///
/// Files are processed in filename order with a fresh parser state each, so
/// results are independent of both directory enumeration order and of each
/// other. A file that fails is recorded in the report and the batch moves
/// on.
pub fn convert_dir(src_dir: &Path, dest_dir: &Path, ext: &str) -> Result<BatchReport> {
    fs::create_dir_all(dest_dir)?;

    let mut sources = Vec::new();
    for entry in fs::read_dir(src_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some(ext) {
            sources.push(path);
        }
    }
    sources.sort();

    let mut report = BatchReport::default();
    for src in sources {
        match convert_file(&src, dest_dir) {
            Ok(dest) => report.converted.push(dest),
            Err(err) => report.failed.push((src, err)),
        }
    }
    Ok(report)
}
