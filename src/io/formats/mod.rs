//! Row adapters.
//!
//! Each adapter implements [`RowSource`](super::RowSource) and/or
//! [`RowSink`](super::RowSink).

pub mod csv;
pub mod memory;

pub use self::csv::{CsvRowSink, CsvRowSource};
pub use memory::{MemorySink, MemorySource};
