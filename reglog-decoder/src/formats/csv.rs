//! CSV table output
//!
//! Rows are written as they are produced: the header row first, copied verbatim,
//! then one `timestamp,value_1,...,value_N` row per record.

use crate::config::LineEnding;
use crate::types::{Header, Record, Result};
use std::io::Write;

/// Streaming CSV writer for decoded records
pub struct TableWriter<W: Write> {
    writer: W,
    line_ending: LineEnding,
    rows_written: u64,
}

impl<W: Write> TableWriter<W> {
    /// Create a table writer over any sink
    pub fn new(writer: W, line_ending: LineEnding) -> Self {
        Self {
            writer,
            line_ending,
            rows_written: 0,
        }
    }

    /// Write the header row
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        self.write_row(header)
    }

    /// Write one data row
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        self.write_row(record)
    }

    fn write_row(&mut self, row: &dyn std::fmt::Display) -> Result<()> {
        write!(self.writer, "{}{}", row, self.line_ending.as_str())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Rows written so far, header included
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
