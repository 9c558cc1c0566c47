//! Register Log Decoder Library
//!
//! A small, reusable library for decoding binary register logs captured from a
//! motor-control board into CSV tables.
//!
//! # Format
//!
//! A log opens with a text header line naming the columns (timestamp first),
//! followed by fixed-size records: a little-endian `u64` timestamp and one
//! little-endian `i32` per value column.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Reads the header and streams records with constant memory use
//! - Renders records as CSV rows
//! - Writes logs in the same binary format
//!
//! The library does NOT:
//! - Acquire telemetry from the hardware
//! - Plot or analyze the decoded channels
//!
//! Argument handling and reporting live in the application layer (reglog-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use reglog_decoder::{Decoder, DecoderConfig, LineEnding};
//! use std::path::Path;
//!
//! let config = DecoderConfig::new()
//!     .with_line_ending(LineEnding::Lf)
//!     .with_max_records(10_000);
//! let decoder = Decoder::with_config(config);
//!
//! match decoder.convert_file(Path::new("log.bin"), Path::new("log.csv")) {
//!     Ok(summary) => println!("Decoded {} records", summary.records),
//!     Err(e) => eprintln!("Decode error: {}", e),
//! }
//! ```

// Public modules
pub mod config;
pub mod decoder;
pub mod formats;
pub mod types;

// Re-export main types for convenience
pub use config::{DecoderConfig, LineEnding};
pub use decoder::{Decoder, Rows};
pub use formats::{LogWriter, RecordReader, TableWriter};
pub use types::{DecodeSummary, DecoderError, Header, Record, Result, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
