//! Field-list-driven record writer.

use crate::config::WriterConfig;
use crate::io::formats::CsvRowSink;
use crate::io::traits::RowSink;
use crate::models::HeaderIndex;
use crate::{Error, Result};
use std::io::Write;

/// Writes [`Record`](crate::Record)s to a [`RowSink`] in a fixed field order.
///
/// Every written row has exactly one column per field. Fields a record does
/// not mention are written as empty strings. Keys outside the field list
/// either fail the write (strict, the default) or are dropped (lenient, see
/// [`set_allow_unknown`](Self::set_allow_unknown)). A failed write hands
/// nothing to the sink.
///
/// Rows may sit in the sink's buffer until [`flush`](Self::flush) is called.
pub struct RecordWriter<S> {
    sink: S,
    header: HeaderIndex,
    allow_unknown: bool,
}

impl<S: RowSink> RecordWriter<S> {
    /// Creates a strict writer for `fields`.
    ///
    /// Names are used verbatim. A repeated name addresses its last position.
    pub fn new<I, F>(sink: S, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            sink,
            header: HeaderIndex::new(fields),
            allow_unknown: false,
        }
    }

    /// Creates a writer for `fields` with the given settings.
    ///
    /// Only the record-layer settings of `config` apply; its dialect is
    /// ignored because `sink` is already built.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] if `fields` repeats a name under
    /// [`DuplicateFieldPolicy::Reject`](crate::DuplicateFieldPolicy::Reject).
    pub fn with_config<I, F>(sink: S, fields: I, config: &WriterConfig) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let header = HeaderIndex::new(fields);
        header.check_duplicates(config.duplicate_fields)?;
        Ok(Self {
            sink,
            header,
            allow_unknown: config.allow_unknown,
        })
    }

    /// Writes one record laid out by the field list.
    ///
    /// Accepts anything that iterates `(name, value)` pairs: `&Record`, a
    /// `BTreeMap`, or an array of tuples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for a key outside the field list in
    /// strict mode (nothing is written), or [`Error::Write`] if the sink
    /// fails.
    pub fn write<I, K, V>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut row = vec![String::new(); self.header.len()];
        for (key, value) in record {
            let key = key.as_ref();
            match self.header.position(key) {
                Some(pos) => value.as_ref().clone_into(&mut row[pos]),
                None if self.allow_unknown => {
                    tracing::debug!(field = key, "dropping unknown field");
                },
                None => {
                    return Err(Error::UnknownField {
                        field: key.to_string(),
                    });
                },
            }
        }

        self.sink.write_row(&row)
    }

    /// Writes records in order, stopping at the first failure.
    ///
    /// Records before the failing one have already been handed to the sink.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::UnknownField`] or [`Error::Write`].
    pub fn write_all<R, I, K, V>(&mut self, records: R) -> Result<()>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Writes the field list itself as one row, verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the sink fails.
    pub fn write_header(&mut self) -> Result<()> {
        self.sink.write_row(self.header.fields())
    }

    /// Flushes the sink so written rows reach the destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the sink fails.
    pub fn flush(&mut self) -> Result<()> {
        tracing::debug!("flushing record writer");
        self.sink.flush()
    }
}

impl<S> RecordWriter<S> {
    /// Returns the output field list.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        self.header.fields()
    }

    /// Returns the header index.
    #[must_use]
    pub const fn header(&self) -> &HeaderIndex {
        &self.header
    }

    /// Returns whether unknown record keys are dropped instead of rejected.
    #[must_use]
    pub const fn allow_unknown(&self) -> bool {
        self.allow_unknown
    }

    /// Switches between strict (`false`) and lenient (`true`) handling of
    /// unknown record keys.
    pub const fn set_allow_unknown(&mut self, allow: bool) {
        self.allow_unknown = allow;
    }

    /// Sets lenient handling of unknown record keys.
    #[must_use]
    pub const fn with_allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Returns a reference to the row sink.
    pub const fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Returns a mutable reference to the row sink.
    pub const fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the writer, returning the row sink without flushing it.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<W: Write> RecordWriter<CsvRowSink<W>> {
    /// Creates a strict writer producing comma-separated text.
    pub fn to_writer<I, F>(writer: W, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self::new(CsvRowSink::new(writer), fields)
    }

    /// Creates a writer producing delimited text using `config.dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] under the reject policy.
    pub fn to_writer_with<I, F>(writer: W, fields: I, config: &WriterConfig) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self::with_config(CsvRowSink::with_dialect(writer, &config.dialect), fields, config)
    }
}
