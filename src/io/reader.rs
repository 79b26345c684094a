//! Header-aware record reader.

use crate::config::ReaderConfig;
use crate::io::formats::CsvRowSource;
use crate::io::traits::RowSource;
use crate::models::{HeaderIndex, Record, trim_trailing_space};
use crate::{Error, Result};
use std::io::Read;

/// Reads rows from a [`RowSource`] as [`Record`]s keyed by the header row.
///
/// The first row is consumed at construction and becomes the field list.
/// Every later row is mapped position by position onto that list:
///
/// - a short row yields a partial record (missing fields are absent, not
///   empty);
/// - columns past the header are never looked at (whether such rows reach
///   the reader at all is up to the source, see
///   [`CsvDialect::flexible`](crate::CsvDialect::flexible));
/// - with trailing-space trimming on, trailing spaces and tabs are stripped
///   from header names and values alike.
///
/// Tokenizer settings such as leading-space trimming belong to the source
/// and are set there before construction.
pub struct RecordReader<S> {
    source: S,
    header: HeaderIndex,
    trim_trailing_space: bool,
    rows_read: u64,
}

impl<S: RowSource> RecordReader<S> {
    /// Creates a reader with default settings, consuming the header row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the source is empty or fails before
    /// yielding a header row.
    pub fn new(source: S) -> Result<Self> {
        Self::with_config(source, &ReaderConfig::default())
    }

    /// Creates a reader, consuming the header row.
    ///
    /// Only the record-layer settings of `config` apply; its dialect is
    /// ignored because `source` is already built.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if no header row can be read, or
    /// [`Error::DuplicateField`] if the header repeats a name under
    /// [`DuplicateFieldPolicy::Reject`](crate::DuplicateFieldPolicy::Reject).
    pub fn with_config(mut source: S, config: &ReaderConfig) -> Result<Self> {
        let row = source
            .next_row()?
            .ok_or_else(|| Error::read("read_header", "input is empty, no header row"))?;

        let header = HeaderIndex::build(row, config.trim_trailing_space);
        header.check_duplicates(config.duplicate_fields)?;

        tracing::debug!(
            fields = header.len(),
            trim_trailing_space = config.trim_trailing_space,
            "read header"
        );

        Ok(Self {
            source,
            header,
            trim_trailing_space: config.trim_trailing_space,
            rows_read: 0,
        })
    }

    /// Reads the next record.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the source fails on this row.
    pub fn read(&mut self) -> Result<Option<Record>> {
        let Some(values) = self.source.next_row()? else {
            return Ok(None);
        };
        self.rows_read += 1;
        Ok(Some(self.make_record(values)))
    }

    /// Reads every remaining record, in row order.
    ///
    /// All-or-nothing: if any row fails, no records are returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the source fails on any row.
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        let rows = self.source.read_all_rows()?;
        self.rows_read += rows.len() as u64;
        tracing::debug!(rows = rows.len(), "read all rows");
        Ok(rows
            .into_iter()
            .map(|values| self.make_record(values))
            .collect())
    }

    /// Returns an iterator over the remaining records.
    pub const fn records(&mut self) -> Records<'_, S> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Builds a record from one raw row.
    fn make_record(&self, values: Vec<String>) -> Record {
        let mut record = Record::with_capacity(self.header.len().min(values.len()));
        for (field, value) in self.header.fields().iter().zip(values) {
            let value = if self.trim_trailing_space {
                trim_trailing_space(&value).to_string()
            } else {
                value
            };
            record.insert(field.clone(), value);
        }
        record
    }
}

impl<S> RecordReader<S> {
    /// Returns the current field list.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        self.header.fields()
    }

    /// Returns the header index.
    #[must_use]
    pub const fn header(&self) -> &HeaderIndex {
        &self.header
    }

    /// Returns whether values have trailing whitespace stripped.
    #[must_use]
    pub const fn trims_trailing_space(&self) -> bool {
        self.trim_trailing_space
    }

    /// Number of data rows read so far (the header excluded).
    #[must_use]
    pub const fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Returns a reference to the row source.
    pub const fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the row source.
    pub const fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the reader, returning the row source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<R: Read> RecordReader<CsvRowSource<R>> {
    /// Creates a reader over comma-separated text with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if no header row can be read.
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, &ReaderConfig::default())
    }

    /// Creates a reader over comma-separated text with the given trimming.
    ///
    /// `trim_leading` is handed to the tokenizer; `trim_trailing` is applied
    /// by the reader to header names and values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if no header row can be read.
    pub fn trimming(reader: R, trim_leading: bool, trim_trailing: bool) -> Result<Self> {
        let mut config = ReaderConfig::default().with_trim_trailing_space(trim_trailing);
        config.dialect.trim_leading_space = trim_leading;
        Self::from_reader_with(reader, &config)
    }

    /// Creates a reader over delimited text using `config.dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if no header row can be read, or
    /// [`Error::DuplicateField`] under the reject policy.
    pub fn from_reader_with(reader: R, config: &ReaderConfig) -> Result<Self> {
        let source = CsvRowSource::with_dialect(reader, &config.dialect);
        Self::with_config(source, config)
    }
}

/// Iterator over the remaining records of a [`RecordReader`].
///
/// Stops after end of input. A read error is yielded once as `Some(Err(_))`
/// and the iterator returns `None` from then on; the reader itself can still
/// be called again.
pub struct Records<'r, S> {
    reader: &'r mut RecordReader<S>,
    done: bool,
}

impl<S: RowSource> Iterator for Records<'_, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.reader.read().transpose();
        self.done = !matches!(item, Some(Ok(_)));
        item
    }
}

impl<S: RowSource> std::iter::FusedIterator for Records<'_, S> {}
