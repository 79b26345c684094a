//! CLI command implementations.
//!
//! Each submodule implements one `csvrecord` subcommand over generic
//! readers and writers, so the binary only parses arguments and opens files.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fields` | Print the header's field names, one per line |
//! | `cat` | Print every record as a JSON object per line |
//! | `select` | Re-emit records under a new field list |
//!
//! # Example Usage
//!
//! ```bash
//! csvrecord fields people.csv
//! csvrecord --trim-trailing cat people.csv
//! csvrecord select people.csv --fields name,email --allow-unknown
//! ```

mod cat;
mod fields;
mod select;

pub use cat::{OrderedRecord, cmd_cat};
pub use fields::cmd_fields;
pub use select::{SelectOptions, cmd_select, parse_field_list};

use crate::{Error, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Opens a command input; `-` means stdin.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_input(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file = File::open(Path::new(path)).map_err(|e| Error::OperationFailed {
        operation: "open_input".to_string(),
        cause: format!("{path}: {e}"),
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Maps an output I/O failure.
pub(crate) fn output_error(e: &io::Error) -> Error {
    Error::write("write_output", e)
}
