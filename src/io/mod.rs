//! Record I/O.
//!
//! # Architecture
//!
//! - **Row adapters** implement [`RowSource`] and [`RowSink`]; they own the
//!   text grammar (quoting, delimiters, line endings)
//! - [`RecordReader`] turns rows into records using the header row
//! - [`RecordWriter`] turns records into rows using a fixed field list
//!
//! Reader and writer are independent. Each instance holds cursor state and
//! must be driven by one caller at a time.
//!
//! # Examples
//!
//! ## Read records with trimming
//!
//! ```rust
//! use csvrecord::RecordReader;
//!
//! let input = "name ,city\nAda  ,London\n";
//! let mut reader = RecordReader::trimming(input.as_bytes(), false, true)?;
//! assert_eq!(reader.fields(), ["name", "city"]);
//! let record = reader.read()?.unwrap_or_default();
//! assert_eq!(record["name"], "Ada");
//! # Ok::<(), csvrecord::Error>(())
//! ```
//!
//! ## Write records leniently
//!
//! ```rust
//! use csvrecord::RecordWriter;
//!
//! let mut writer = RecordWriter::to_writer(Vec::new(), ["a", "b", "c"]).with_allow_unknown(true);
//! writer.write_header()?;
//! writer.write([("a", "2"), ("b", "3"), ("d", "4")])?;
//! let text = writer.into_inner().into_inner()?;
//! assert_eq!(text, b"a,b,c\n2,3,\n");
//! # Ok::<(), csvrecord::Error>(())
//! ```

pub mod formats;
pub mod reader;
pub mod traits;
pub mod writer;

// Re-exports for convenience
pub use formats::{CsvRowSink, CsvRowSource, MemorySink, MemorySource};
pub use reader::{RecordReader, Records};
pub use traits::{RowSink, RowSource};
pub use writer::RecordWriter;
