//! Core traits for row-level I/O.
//!
//! [`RowSource`] and [`RowSink`] are the seam between the record layer and
//! whatever tokenizes the text. Quoting, delimiters, and line endings are
//! entirely their concern.

use crate::Result;

/// Source of tokenized rows.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl RowSource for LineSource {
///     fn next_row(&mut self) -> Result<Option<Vec<String>>> {
///         // Read next line, split on the delimiter
///     }
/// }
/// ```
pub trait RowSource {
    /// Reads the next row.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Read`] if the row is malformed or I/O fails.
    fn next_row(&mut self) -> Result<Option<Vec<String>>>;

    /// Reads every remaining row.
    ///
    /// All-or-nothing: on failure no rows are returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Read`] if any row fails.
    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Sink for tokenized rows.
///
/// # Lifecycle
///
/// 1. Call `write_row()` for each row
/// 2. Call `flush()` to guarantee delivery to the destination
pub trait RowSink {
    /// Writes a single row. The row may stay buffered until [`flush`].
    ///
    /// [`flush`]: RowSink::flush
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Write`] if serialization or I/O fails.
    fn write_row(&mut self, row: &[String]) -> Result<()>;

    /// Flushes buffered rows to the destination.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Write`] if I/O fails.
    fn flush(&mut self) -> Result<()>;
}

impl<T: RowSource + ?Sized> RowSource for &mut T {
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        (**self).next_row()
    }

    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
        (**self).read_all_rows()
    }
}

impl<T: RowSink + ?Sized> RowSink for &mut T {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        (**self).write_row(row)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<T: RowSource + ?Sized> RowSource for Box<T> {
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        (**self).next_row()
    }

    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
        (**self).read_all_rows()
    }
}

impl<T: RowSink + ?Sized> RowSink for Box<T> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        (**self).write_row(row)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
