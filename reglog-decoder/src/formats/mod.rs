//! Log and table formats
//!
//! `binary` holds the register log reader and writer, `csv` the table writer
//! the decoded records are rendered with.

pub mod binary;
pub mod csv;

// Re-export format types
pub use binary::{LogWriter, RecordReader};
pub use csv::TableWriter;
