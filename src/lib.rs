//! # csvrecord
//!
//! Header-aware reading and writing of delimited records.
//!
//! The first row of a stream names the fields; every following row is exposed
//! as a [`Record`], a map from field name to value. Writing goes the other
//! way: a [`RecordWriter`] holds a fixed field list and lays each record out
//! positionally under it.
//!
//! Tokenizing (quoting, delimiters, line endings) is delegated to a
//! [`RowSource`] / [`RowSink`]. The [`csv`](https://docs.rs/csv) crate backs
//! the default adapters.
//!
//! ## Example
//!
//! ```rust
//! use csvrecord::{RecordReader, RecordWriter};
//!
//! let input = "a,b,c\n1,2,3\n";
//! let mut reader = RecordReader::from_reader(input.as_bytes())?;
//! let record = reader.read()?.unwrap_or_default();
//! assert_eq!(record["b"], "2");
//!
//! // `b` is not in the field list, so it has to be allowed explicitly.
//! let mut writer = RecordWriter::to_writer(Vec::new(), ["c", "a"]).with_allow_unknown(true);
//! writer.write(&record)?;
//! let bytes = writer.into_inner().into_inner()?;
//! assert_eq!(bytes, b"3,1\n");
//! # Ok::<(), csvrecord::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;

pub use config::{CsvDialect, CsvRecordConfig, DuplicateFieldPolicy, ReaderConfig, WriterConfig};
pub use io::{CsvRowSink, CsvRowSource, RecordReader, RecordWriter, RowSink, RowSource};
pub use models::{HeaderIndex, Record};

/// Error type for csvrecord operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Read` | The row source fails: malformed row, empty input before the header, I/O |
/// | `Write` | The row sink fails to write or flush |
/// | `UnknownField` | A strict writer is given a key outside its field list |
/// | `DuplicateField` | A header repeats a name and duplicates are rejected |
/// | `InvalidInput` | A configuration value or argument is malformed |
/// | `OperationFailed` | Config files, log files, or logging init fail |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The underlying row source failed.
    #[error("read failed during '{operation}': {cause}")]
    Read {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The underlying row sink failed.
    #[error("write failed during '{operation}': {cause}")]
    Write {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A record key is not part of the writer's field list.
    #[error("unknown field: {field}")]
    UnknownField {
        /// The offending record key.
        field: String,
    },

    /// A field name appears more than once in a header.
    #[error("duplicate field '{field}' at positions {first} and {second}")]
    DuplicateField {
        /// The repeated field name.
        field: String,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        second: usize,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation outside the record path failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns `true` if the error came from the row source.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    /// Returns `true` if the error came from the row sink.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }

    pub(crate) fn read(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::Read {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    pub(crate) fn write(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::Write {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for csvrecord operations.
pub type Result<T> = std::result::Result<T, Error>;
