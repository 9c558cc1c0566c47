//! Decoder configuration types
//!
//! This module defines the small set of knobs the decoder library exposes.
//! The binary format itself has no options; configuration only affects how much
//! is decoded and how the CSV output is written.

use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Optional: stop after this many records
    #[serde(default)]
    pub max_records: Option<u64>,

    /// Line terminator for CSV rows
    #[serde(default)]
    pub line_ending: LineEnding,

    /// Delete the output file when a conversion fails (default: leave partial rows in place)
    #[serde(default)]
    pub remove_partial_output: bool,
}

/// Row terminator used in the CSV output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`, the dialect produced by the legacy converter
    CrLf,
}

impl LineEnding {
    /// Terminator bytes
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: limit the number of decoded records
    pub fn with_max_records(mut self, max_records: u64) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Builder method: set the CSV line terminator
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Builder method: delete incomplete output on failure
    pub fn with_remove_partial_output(mut self, enabled: bool) -> Self {
        self.remove_partial_output = enabled;
        self
    }

    /// Check whether another record may be decoded after `decoded` records
    pub fn allows_record(&self, decoded: u64) -> bool {
        match self.max_records {
            Some(max) => decoded < max,
            None => true,
        }
    }
}
