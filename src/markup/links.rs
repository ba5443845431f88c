//! Link definition collection.
//!
//! A document may define link targets anywhere in its body with lines of the
//! form `! <id>: <href>`. This pre-pass strips those lines out of the body,
//! along with at most one blank line directly above each (so a deleted block
//! of definitions does not leave a double gap behind), and collects the
//! id → href pairs for the transducer to resolve `![id:...]` references
//! against.

use std::collections::HashMap;

use memchr::memchr;

/// Identifier → href lookup table built from `! id: href` definition lines.
pub type LinkTable = HashMap<String, String>;

/// Prefix that marks a link definition line.
const DEFINITION_PREFIX: &str = "! ";

/// Split a definition line into its `(id, href)` pair.
///
/// Returns `None` when the line is not a definition: no `! ` prefix, no `:`,
/// an empty identifier, or whitespace inside the identifier. Such lines stay
/// in the body untouched.
fn parse_definition(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(DEFINITION_PREFIX)?;
    let colon = memchr(b':', rest.as_bytes())?;
    let id = &rest[..colon];
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }
    Some((id, rest[colon + 1..].trim()))
}

/// Extract every link definition from `lines`, deleting each definition line
/// (and one directly-preceding blank line, if any) in place.
///
/// Duplicate identifiers resolve last-seen-wins. The scan runs from the end
/// of the body toward the start so removals never invalidate an index and
/// the result is independent of processing order.
pub fn collect_definitions(lines: &mut Vec<String>) -> LinkTable {
    let mut links = LinkTable::new();
    let mut i = lines.len();
    while i > 0 {
        i -= 1;
        let Some((id, href)) = parse_definition(&lines[i]).map(|(id, href)| {
            (id.to_string(), href.to_string())
        }) else {
            continue;
        };
        // Scanning backward visits the last definition first, so last-seen
        // wins by only inserting identifiers not yet present.
        links.entry(id).or_insert(href);
        lines.remove(i);
        if i > 0 && lines[i - 1].trim().is_empty() {
            lines.remove(i - 1);
            i -= 1;
        }
    }
    links
}
