//! CLI command for dumping records as JSON lines.

use super::output_error;
use crate::config::ReaderConfig;
use crate::io::RecordReader;
use crate::models::{HeaderIndex, Record};
use crate::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::{Read, Write};

/// A record serialized with its keys in header order.
///
/// Each name is emitted once, at the position the header addresses it by.
pub struct OrderedRecord<'a> {
    header: &'a HeaderIndex,
    record: &'a Record,
}

impl<'a> OrderedRecord<'a> {
    /// Pairs a record with the header it was read under.
    #[must_use]
    pub const fn new(header: &'a HeaderIndex, record: &'a Record) -> Self {
        Self { header, record }
    }
}

impl Serialize for OrderedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.len()))?;
        for (i, field) in self.header.fields().iter().enumerate() {
            if self.header.position(field) != Some(i) {
                continue;
            }
            if let Some(value) = self.record.get(field) {
                map.serialize_entry(field, value)?;
            }
        }
        map.end()
    }
}

/// Writes each record of the input as one JSON object per line.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns an error if reading, serialization, or output fails.
pub fn cmd_cat<R: Read, W: Write>(input: R, out: &mut W, config: &ReaderConfig) -> Result<u64> {
    let mut reader = RecordReader::from_reader_with(input, config)?;
    let header = reader.header().clone();

    let mut count = 0;
    while let Some(record) = reader.read()? {
        let line = serde_json::to_string(&OrderedRecord::new(&header, &record)).map_err(|e| {
            Error::OperationFailed {
                operation: "serialize_record".to_string(),
                cause: e.to_string(),
            }
        })?;
        writeln!(out, "{line}").map_err(|e| output_error(&e))?;
        count += 1;
    }

    tracing::debug!(records = count, "cat finished");
    Ok(count)
}
