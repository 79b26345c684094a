//! Data models for csvrecord.
//!
//! The field-name index built from a header row, and the record type rows are
//! converted into.

mod header;
mod record;

pub use header::{HeaderIndex, trim_trailing_space};
pub use record::Record;
