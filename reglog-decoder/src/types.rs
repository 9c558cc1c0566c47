//! Core types for the register log decoder library
//!
//! This module defines the header, the decoded record and the error type that the
//! decoder emits when processing binary register logs. Records are transient: the
//! decoder builds one, hands it out, and keeps nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used for wall-clock interpretation of record timestamps
pub type Timestamp = DateTime<Utc>;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Size of the little-endian `u64` timestamp that opens every record
pub const TIMESTAMP_SIZE: usize = 8;

/// Size of one little-endian `i32` register value
pub const VALUE_SIZE: usize = 4;

/// Microseconds per second, the unit the acquisition logger stamps records with
pub const MICROS_PER_SEC: f64 = 1e6;

/// Errors that can occur during decoding
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Failed to read header: {0}")]
    HeaderError(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Unexpected end of file: record {record} has a truncated timestamp ({bytes_read} of 8 bytes)")]
    TruncatedTimestamp { record: u64, bytes_read: usize },

    #[error(
        "Unexpected end of file: record {record} is truncated at column '{column}' ({bytes_read} value bytes read)"
    )]
    TruncatedValue {
        record: u64,
        column: String,
        bytes_read: usize,
    },

    #[error("Record has {found} values but the header declares {expected}")]
    FieldCountMismatch { expected: usize, found: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DecoderError {
    /// True if the input stream ended in the middle of a record
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DecoderError::TruncatedTimestamp { .. } | DecoderError::TruncatedValue { .. }
        )
    }
}

/// Column layout of a register log, read once from its first line
///
/// The first field names the timestamp column, the rest name the register value
/// columns. The number of value columns fixes the size of every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    fields: Vec<String>,
}

impl Header {
    /// Build a header from column names
    ///
    /// Field names must not contain `,`, `\r` or `\n`, otherwise the header line
    /// written to a log could not be split back into the same columns.
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();

        if fields.is_empty() {
            return Err(DecoderError::InvalidHeader(
                "at least the timestamp column is required".to_string(),
            ));
        }

        if let Some(bad) = fields
            .iter()
            .find(|f| f.contains(|c: char| matches!(c, ',' | '\r' | '\n')))
        {
            return Err(DecoderError::InvalidHeader(format!(
                "field name {:?} contains a separator or line break",
                bad
            )));
        }

        Ok(Self { fields })
    }

    /// Parse a header line as found at the start of a log
    ///
    /// Only the line terminator (`\n`, optionally preceded by `\r`) is stripped,
    /// field names are kept verbatim.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return Err(DecoderError::HeaderError("header line is empty".to_string()));
        }

        Ok(Self {
            fields: line.split(',').map(str::to_string).collect(),
        })
    }

    /// All column names, timestamp column first
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Name of the timestamp column
    pub fn time_column(&self) -> &str {
        &self.fields[0]
    }

    /// Names of the register value columns, in record order
    pub fn value_columns(&self) -> &[String] {
        &self.fields[1..]
    }

    /// Number of values per record (N)
    pub fn value_count(&self) -> usize {
        self.fields.len() - 1
    }

    /// Position of a column in a row, timestamp column being 0
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Size in bytes of one encoded record
    pub fn record_size(&self) -> usize {
        TIMESTAMP_SIZE + VALUE_SIZE * self.value_count()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join(","))
    }
}

/// One decoded record: a timestamp and one value per value column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Zero-based position of the record in the log
    pub index: u64,
    /// Raw timestamp, microseconds since the Unix epoch when written by the logger
    pub timestamp: u64,
    /// Register values in header order
    pub values: Vec<i32>,
}

impl Record {
    /// Interpret the timestamp as microseconds since the Unix epoch
    ///
    /// Returns `None` when the value does not fit a calendar date.
    pub fn timestamp_utc(&self) -> Option<Timestamp> {
        let secs = i64::try_from(self.timestamp / 1_000_000).ok()?;
        let nsecs = ((self.timestamp % 1_000_000) * 1_000) as u32;
        DateTime::from_timestamp(secs, nsecs)
    }

    /// Seconds elapsed since `start`, negative if this record is older
    pub fn elapsed_secs(&self, start: u64) -> f64 {
        (self.timestamp as f64 - start as f64) / MICROS_PER_SEC
    }

    /// Value of a named column
    pub fn value(&self, header: &Header, column: &str) -> Option<i32> {
        match header.column_index(column)? {
            0 => None,
            idx => self.values.get(idx - 1).copied(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp)?;
        for value in &self.values {
            write!(f, ",{}", value)?;
        }
        Ok(())
    }
}

/// Outcome of a completed conversion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecodeSummary {
    /// Header columns, timestamp column first
    pub columns: Vec<String>,
    /// Number of value columns (N)
    pub value_columns: usize,
    /// Records decoded and written
    pub records: u64,
    /// Timestamp of the first record
    pub first_timestamp: Option<u64>,
    /// Timestamp of the last record
    pub last_timestamp: Option<u64>,
    /// True if decoding stopped at the configured record limit
    pub truncated_by_limit: bool,
}

impl DecodeSummary {
    pub(crate) fn new(header: &Header) -> Self {
        Self {
            columns: header.fields().to_vec(),
            value_columns: header.value_count(),
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, record: &Record) {
        self.records += 1;
        self.first_timestamp.get_or_insert(record.timestamp);
        self.last_timestamp = Some(record.timestamp);
    }

    /// Time covered by the log in seconds
    pub fn duration_secs(&self) -> Option<f64> {
        let first = self.first_timestamp?;
        let last = self.last_timestamp?;
        Some((last as f64 - first as f64) / MICROS_PER_SEC)
    }
}
