//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! The Decoder struct is the entry point for opening register logs, iterating
//! over their rows and converting them to CSV.

use crate::config::DecoderConfig;
use crate::formats::{RecordReader, TableWriter};
use crate::types::{DecodeSummary, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// The main decoder struct - entry point for all decoding operations
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a new decoder instance with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Open a register log and read its header
    ///
    /// # Example
    /// ```no_run
    /// use reglog_decoder::Decoder;
    /// use std::path::Path;
    ///
    /// let decoder = Decoder::new();
    /// let records = decoder.open(Path::new("log.bin")).unwrap();
    /// println!("Columns: {:?}", records.header().fields());
    ///
    /// for record in records {
    ///     match record {
    ///         Ok(record) => println!("{}", record),
    ///         Err(e) => eprintln!("Error: {}", e),
    ///     }
    /// }
    /// ```
    pub fn open(&self, path: &Path) -> Result<RecordReader<BufReader<File>>> {
        log::info!("Opening register log: {:?}", path);
        let file = File::open(path)?;
        self.read(file)
    }

    /// Read the header from any byte source and return a record reader
    pub fn read<R: Read>(&self, reader: R) -> Result<RecordReader<BufReader<R>>> {
        RecordReader::new(BufReader::new(reader))
    }

    /// Decode a register log into CSV rows
    ///
    /// The first row is the header, followed by one row per record. Rows carry no
    /// line terminator. The sequence is lazy and stops at the first error.
    pub fn decode_rows<R: Read>(&self, reader: R) -> Result<Rows<BufReader<R>>> {
        Ok(Rows {
            records: self.read(reader)?,
            header_pending: true,
            max_records: self.config.max_records,
        })
    }

    /// Convert a register log read from `input` into CSV written to `output`
    ///
    /// Rows are written as they are decoded. On error, the rows written so far
    /// stay in `output`.
    pub fn convert<R: Read, W: Write>(&self, input: R, output: W) -> Result<DecodeSummary> {
        let records = self.read(input)?;
        self.write_table(records, output)
    }

    /// Convert the register log at `input` into a CSV file at `output`
    ///
    /// The output file is only created once the input header has been read. If
    /// decoding fails afterwards, the partial output is left in place unless
    /// `remove_partial_output` is set.
    ///
    /// # Example
    /// ```no_run
    /// use reglog_decoder::{Decoder, DecoderConfig};
    /// use std::path::Path;
    ///
    /// let decoder = Decoder::with_config(DecoderConfig::new().with_remove_partial_output(true));
    /// let summary = decoder
    ///     .convert_file(Path::new("log.bin"), Path::new("log.csv"))
    ///     .unwrap();
    /// println!("{} records", summary.records);
    /// ```
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<DecodeSummary> {
        let records = self.open(input)?;

        log::info!("Writing CSV: {:?}", output);
        let file = File::create(output)?;

        match self.write_table(records, BufWriter::new(file)) {
            Ok(summary) => {
                log::info!(
                    "Converted {} record(s) from {:?} to {:?}",
                    summary.records,
                    input,
                    output
                );
                Ok(summary)
            }
            Err(e) => {
                if self.config.remove_partial_output {
                    log::warn!("Removing partial output {:?}", output);
                    if let Err(remove_err) = fs::remove_file(output) {
                        log::warn!("Failed to remove {:?}: {}", output, remove_err);
                    }
                } else {
                    log::warn!("Partial output left in {:?}", output);
                }
                Err(e)
            }
        }
    }

    fn write_table<R: BufRead, W: Write>(
        &self,
        mut records: RecordReader<R>,
        output: W,
    ) -> Result<DecodeSummary> {
        let mut summary = DecodeSummary::new(records.header());
        let mut table = TableWriter::new(output, self.config.line_ending);
        table.write_header(records.header())?;

        while self.config.allows_record(summary.records) {
            match records.read_record()? {
                Some(record) => {
                    table.write_record(&record)?;
                    summary.record(&record);
                }
                None => break,
            }
        }

        if !self.config.allows_record(summary.records) && !records.is_at_end()? {
            log::info!("Stopped at record limit of {}", summary.records);
            summary.truncated_by_limit = true;
        }

        table.finish()?;
        Ok(summary)
    }
}

/// Lazy sequence of CSV rows, header row first
pub struct Rows<R> {
    records: RecordReader<R>,
    header_pending: bool,
    max_records: Option<u64>,
}

impl<R: BufRead> Rows<R> {
    /// Column layout of the log being decoded
    pub fn header(&self) -> &crate::types::Header {
        self.records.header()
    }
}

impl<R: BufRead> Iterator for Rows<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.header_pending {
            self.header_pending = false;
            return Some(Ok(self.records.header().to_string()));
        }

        if let Some(max) = self.max_records {
            if self.records.records_read() >= max {
                return None;
            }
        }

        self.records
            .next()
            .map(|record| record.map(|r| r.to_string()))
    }
}
