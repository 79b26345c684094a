//! CLI command for listing header fields.

use super::output_error;
use crate::Result;
use crate::config::ReaderConfig;
use crate::io::RecordReader;
use std::io::{Read, Write};

/// Writes the input's field list, one name per line.
///
/// # Errors
///
/// Returns an error if the header cannot be read or output fails.
pub fn cmd_fields<R: Read, W: Write>(input: R, out: &mut W, config: &ReaderConfig) -> Result<()> {
    let reader = RecordReader::from_reader_with(input, config)?;
    for field in reader.fields() {
        writeln!(out, "{field}").map_err(|e| output_error(&e))?;
    }
    Ok(())
}
