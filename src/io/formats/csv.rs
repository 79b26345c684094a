//! CSV row adapters over the `csv` crate.

use crate::config::CsvDialect;
use crate::io::traits::{RowSink, RowSource};
use crate::{Error, Result};
use std::io::{Read, Write};

/// CSV row source.
///
/// The header is an ordinary row here; [`crate::RecordReader`] decides what
/// to do with it.
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<LeadingSpaceTrim<R>>,
    record: csv::StringRecord,
}

impl<R: Read> CsvRowSource<R> {
    /// Creates a source with the default comma dialect.
    pub fn new(reader: R) -> Self {
        Self::with_dialect(reader, &CsvDialect::default())
    }

    /// Creates a source for the given dialect.
    pub fn with_dialect(reader: R, dialect: &CsvDialect) -> Self {
        let input = LeadingSpaceTrim::new(reader, dialect);
        Self {
            reader: reader_builder(dialect).from_reader(input),
            record: csv::StringRecord::new(),
        }
    }

    /// Returns a reference to the underlying I/O reader.
    pub fn get_ref(&self) -> &R {
        &self.reader.get_ref().inner
    }

    /// Returns the underlying I/O reader.
    pub fn into_inner(self) -> R {
        self.reader.into_inner().inner
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        let has_record = self
            .reader
            .read_record(&mut self.record)
            .map_err(|e| Error::read("read_row", e))?;
        if !has_record {
            return Ok(None);
        }

        Ok(Some(self.record.iter().map(String::from).collect()))
    }
}

/// Drops spaces and tabs at the start of each unquoted field.
///
/// Runs on the raw bytes before the `csv` tokenizer sees them, so a quote
/// after leading blanks still opens a quoted field and blanks inside quotes
/// are kept. Passes everything through when trimming is off.
struct LeadingSpaceTrim<R> {
    inner: R,
    enabled: bool,
    delimiter: u8,
    quote: u8,
    escape: Option<u8>,
    comment: Option<u8>,
    line_start: bool,
    field_start: bool,
    in_comment: bool,
    in_quotes: bool,
    closed_quote: bool,
    escaped: bool,
}

impl<R> LeadingSpaceTrim<R> {
    const fn new(inner: R, dialect: &CsvDialect) -> Self {
        Self {
            inner,
            enabled: dialect.trim_leading_space,
            delimiter: dialect.delimiter,
            quote: dialect.quote,
            escape: dialect.escape,
            comment: dialect.comment,
            line_start: true,
            field_start: true,
            in_comment: false,
            in_quotes: false,
            closed_quote: false,
            escaped: false,
        }
    }

    /// Advances the quoting state by one byte; `false` drops the byte.
    fn keep(&mut self, byte: u8) -> bool {
        let newline = matches!(byte, b'\n' | b'\r');

        if self.in_comment {
            if newline {
                self.in_comment = false;
                self.line_start = true;
                self.field_start = true;
            }
            return true;
        }

        if self.in_quotes {
            if self.escaped {
                self.escaped = false;
            } else if Some(byte) == self.escape {
                self.escaped = true;
            } else if byte == self.quote {
                self.in_quotes = false;
                self.closed_quote = true;
            }
            return true;
        }

        if self.field_start && byte != self.delimiter && matches!(byte, b' ' | b'\t') {
            // Only a comment byte in column zero starts a comment.
            self.line_start = false;
            return false;
        }

        // A quote right after a closing quote is a doubled quote.
        let reopens = self.closed_quote && byte == self.quote;
        self.closed_quote = false;
        if self.line_start && Some(byte) == self.comment {
            self.in_comment = true;
        } else if reopens || (self.field_start && byte == self.quote) {
            self.in_quotes = true;
        }
        self.line_start = newline;
        self.field_start = newline || byte == self.delimiter;
        true
    }
}

impl<R: Read> Read for LeadingSpaceTrim<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.enabled {
            return self.inner.read(buf);
        }

        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }

            let mut kept = 0;
            for i in 0..n {
                let byte = buf[i];
                if self.keep(byte) {
                    buf[kept] = byte;
                    kept += 1;
                }
            }
            // Only blanks this time; an empty read would look like EOF.
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

/// CSV row sink.
///
/// Rows are buffered by the `csv` writer; call [`RowSink::flush`] or
/// [`CsvRowSink::into_inner`] to push them to the destination.
pub struct CsvRowSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRowSink<W> {
    /// Creates a sink with the default comma dialect.
    pub fn new(writer: W) -> Self {
        Self::with_dialect(writer, &CsvDialect::default())
    }

    /// Creates a sink for the given dialect.
    pub fn with_dialect(writer: W, dialect: &CsvDialect) -> Self {
        Self {
            writer: writer_builder(dialect).from_writer(writer),
        }
    }

    /// Returns a reference to the underlying I/O writer.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Flushes and returns the underlying I/O writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::write("flush", e.error()))
    }
}

impl<W: Write> RowSink for CsvRowSink<W> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.writer
            .write_record(row)
            .map_err(|e| Error::write("write_row", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::write("flush", e))
    }
}

/// Builds a `csv::ReaderBuilder` from the dialect.
fn reader_builder(dialect: &CsvDialect) -> csv::ReaderBuilder {
    let mut rb = csv::ReaderBuilder::new();
    rb.delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .comment(dialect.comment)
        .flexible(dialect.flexible)
        .has_headers(false); // The record layer consumes the header row

    if let Some(e) = dialect.escape {
        rb.escape(Some(e)).double_quote(false);
    }

    rb
}

/// Builds a `csv::WriterBuilder` from the dialect.
fn writer_builder(dialect: &CsvDialect) -> csv::WriterBuilder {
    let mut wb = csv::WriterBuilder::new();
    wb.delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .flexible(true)
        .has_headers(false);

    if dialect.crlf {
        wb.terminator(csv::Terminator::CRLF);
    }
    if let Some(e) = dialect.escape {
        wb.escape(e).double_quote(false);
    }

    wb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(input: &str, dialect: &CsvDialect) -> Result<Vec<Vec<String>>> {
        CsvRowSource::with_dialect(input.as_bytes(), dialect).read_all_rows()
    }

    #[test]
    fn test_source_yields_header_as_row() {
        let mut source = CsvRowSource::new("a,b\n1,2\n".as_bytes());
        assert_eq!(source.next_row().unwrap(), Some(vec!["a".into(), "b".into()]));
        assert_eq!(source.next_row().unwrap(), Some(vec!["1".into(), "2".into()]));
        assert_eq!(source.next_row().unwrap(), None);
    }

    #[test]
    fn test_source_handles_quoting() {
        let all = rows("a,b\n\"x,y\",\"say \"\"hi\"\"\"\n", &CsvDialect::default()).unwrap();
        assert_eq!(all[1], vec!["x,y", "say \"hi\""]);
    }

    #[test]
    fn test_strict_source_rejects_unequal_rows() {
        let err = rows("a,b,c\n3,4,5,6\n", &CsvDialect::default()).unwrap_err();
        assert!(err.is_read());

        let err = rows("a,b,c\n3\n", &CsvDialect::default()).unwrap_err();
        assert!(err.is_read());
    }

    #[test]
    fn test_flexible_source_accepts_unequal_rows() {
        let dialect = CsvDialect::default().with_flexible(true);
        let all = rows("a,b,c\n3,4,5,6\n3\n", &dialect).unwrap();
        assert_eq!(all[1].len(), 4);
        assert_eq!(all[2].len(), 1);
    }

    #[test]
    fn test_leading_trim() {
        let dialect = CsvDialect::default().with_trim_leading_space(true);
        let all = rows(" a,\tb \n 1,2\n", &dialect).unwrap();
        assert_eq!(all[0], vec!["a", "b "]);
        assert_eq!(all[1], vec!["1", "2"]);
    }

    #[test]
    fn test_leading_trim_before_opening_quote() {
        let dialect = CsvDialect::default().with_trim_leading_space(true);
        let all = rows("a,b\nx, \"y,z\"\n", &dialect).unwrap();
        assert_eq!(all[1], vec!["x", "y,z"]);
    }

    #[test]
    fn test_leading_trim_keeps_quoted_blanks() {
        let dialect = CsvDialect::default().with_trim_leading_space(true);
        let all = rows("a,b\nx,\"  y\"\n\"p\"\", q\",\t\"\tr\"\n", &dialect).unwrap();
        assert_eq!(all[1], vec!["x", "  y"]);
        assert_eq!(all[2], vec!["p\", q", "\tr"]);
    }

    #[test]
    fn test_leading_trim_tsv_keeps_empty_fields() {
        let dialect = CsvDialect::tsv().with_trim_leading_space(true);
        let all = rows("a\tb\tc\n  1\t\t 3\n", &dialect).unwrap();
        assert_eq!(all[1], vec!["1", "", "3"]);
    }

    #[test]
    fn test_leading_trim_skips_quotes_in_comments() {
        let dialect = CsvDialect::default()
            .with_trim_leading_space(true)
            .with_comment(Some(b'#'));
        let all = rows("#,\"open\na,b\n1, 2\n", &dialect).unwrap();
        assert_eq!(all, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_leading_trim_off_passes_blanks_through() {
        let mut source = CsvRowSource::new(" a, \"b\"\n".as_bytes());
        assert_eq!(source.next_row().unwrap(), Some(vec![" a".into(), " \"b\"".into()]));
        assert!(source.into_inner().is_empty());
    }

    #[test]
    fn test_tsv_and_comments() {
        let dialect = CsvDialect::tsv().with_comment(Some(b'#'));
        let all = rows("# note\na\tb\n1\t2\n", &dialect).unwrap();
        assert_eq!(all, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_sink_buffers_until_flush() {
        let mut sink = CsvRowSink::new(Vec::new());
        sink.write_row(&["1".to_string(), "2".to_string()]).unwrap();
        assert!(sink.get_ref().is_empty());
        sink.flush().unwrap();
        assert_eq!(sink.get_ref().as_slice(), b"1,2\n");
    }

    #[test]
    fn test_sink_crlf_and_quoting() {
        let dialect = CsvDialect {
            crlf: true,
            ..CsvDialect::default()
        };
        let mut sink = CsvRowSink::with_dialect(Vec::new(), &dialect);
        sink.write_row(&["x,y".to_string(), String::new()]).unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(bytes, b"\"x,y\",\r\n");
    }
}
