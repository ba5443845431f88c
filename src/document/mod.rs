//! Document-level processing around the markup core.
//!
//! - [`front_matter`]: isolates title, dates and subtitle from a raw source
//!   file and hands back the body lines
//! - [`date`]: the `YYYY/MM/DD` ↔ "21st March 2024" date types
//! - [`assemble`]: wraps a transduced fragment in the full page template
//!   with its machine-readable metadata header

pub mod assemble;
pub mod date;
pub mod front_matter;

pub use assemble::assemble;
pub use date::Date;
pub use front_matter::{RawDocument, check_tabs, extract};
