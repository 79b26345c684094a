//! In-memory row adapters.
//!
//! Handy when rows are already tokenized, and for observing exactly what a
//! record writer hands to its sink.

use crate::io::traits::{RowSink, RowSource};
use crate::{Error, Result};
use std::collections::VecDeque;

/// Row source backed by a queue of pre-tokenized rows.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: VecDeque<Vec<String>>,
    fail_at: Option<usize>,
    consumed: usize,
}

impl MemorySource {
    /// Creates a source yielding `rows` in order.
    #[must_use]
    pub fn new<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            fail_at: None,
            consumed: 0,
        }
    }

    /// Makes the source fail instead of yielding the row at `index`
    /// (zero-based, counting the header).
    #[must_use]
    pub const fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Number of rows not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemorySource {
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.fail_at == Some(self.consumed) {
            return Err(Error::read(
                "read_row",
                format!("injected failure at row {}", self.consumed),
            ));
        }

        let row = self.rows.pop_front();
        if row.is_some() {
            self.consumed += 1;
        }
        Ok(row)
    }
}

/// Row sink that buffers rows until flushed.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pending: Vec<Vec<String>>,
    flushed: Vec<Vec<String>>,
    flushes: usize,
    fail_at: Option<usize>,
    fail_flush: bool,
    written: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the sink reject the row at `index` (zero-based, counting a
    /// header row if one is written) and every row after it.
    #[must_use]
    pub const fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Makes every flush fail, leaving pending rows in place.
    #[must_use]
    pub const fn failing_flush(mut self) -> Self {
        self.fail_flush = true;
        self
    }

    /// Rows written but not yet flushed.
    #[must_use]
    pub fn pending(&self) -> &[Vec<String>] {
        &self.pending
    }

    /// Rows delivered by a flush, in write order.
    #[must_use]
    pub fn flushed(&self) -> &[Vec<String>] {
        &self.flushed
    }

    /// Number of flushes performed.
    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Consumes the sink, returning every row written, flushed or not.
    #[must_use]
    pub fn into_rows(mut self) -> Vec<Vec<String>> {
        self.flushed.append(&mut self.pending);
        self.flushed
    }
}

impl RowSink for MemorySink {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        if self.fail_at.is_some_and(|index| self.written >= index) {
            return Err(Error::write(
                "write_row",
                format!("injected failure at row {}", self.written),
            ));
        }

        self.pending.push(row.to_vec());
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.fail_flush {
            return Err(Error::write("flush", "injected flush failure"));
        }

        self.flushed.append(&mut self.pending);
        self.flushes += 1;
        Ok(())
    }
}
