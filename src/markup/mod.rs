//! The markup core: dialect → HTML fragment.
//!
//! This module is pure string transformation; no I/O happens here. The
//! conversion driver ([`crate::convert`]) feeds it already-separated body
//! lines:
//!
//! - [`links`]: pre-pass collecting `! id: href` definition lines into a
//!   [`LinkTable`] and deleting them from the body
//! - [`transducer`]: the stateful line/character scanner producing the HTML
//!   fragment
//! - [`escape`]: HTML text escaping shared by everything that emits output

pub mod escape;
pub mod links;
pub mod transducer;

pub use escape::{escape_html, push_escaped};
pub use links::{LinkTable, collect_definitions};
pub use transducer::transduce;
