//! Conversion summary output
//!
//! Renders a `DecodeSummary` either as a short text block or as JSON.

use anyhow::Result;
use reglog_decoder::{DecodeSummary, Record};

/// Human-readable summary
pub fn text_summary(summary: &DecodeSummary) -> String {
    let mut lines = vec![
        format!("Columns:  {}", summary.columns.join(", ")),
        format!("Values:   {} per record", summary.value_columns),
        format!("Records:  {}", summary.records),
    ];

    if let Some(first) = summary.first_timestamp {
        let start = Record {
            index: 0,
            timestamp: first,
            values: Vec::new(),
        };
        match start.timestamp_utc() {
            Some(utc) => lines.push(format!("Start:    {} ({})", first, utc.to_rfc3339())),
            None => lines.push(format!("Start:    {}", first)),
        }
    }

    if let Some(duration) = summary.duration_secs() {
        lines.push(format!("Duration: {:.6} s", duration));
    }

    if summary.truncated_by_limit {
        lines.push("Stopped at the record limit, remaining records were skipped".to_string());
    }

    lines.join("\n")
}

/// JSON summary
pub fn json_summary(summary: &DecodeSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
