//! Configuration loading and parsing

use anyhow::{Context, Result};
use reglog_decoder::{DecoderConfig, LineEnding};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DecodeConfig {
    pub max_records: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub line_ending: LineEnding,
    #[serde(default)]
    pub remove_partial: bool,
    #[serde(default)]
    pub summary: SummaryMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    None,
    Text,
    Json,
}

impl AppConfig {
    /// Decoder settings derived from this configuration
    pub fn decoder_config(&self) -> DecoderConfig {
        let mut config = DecoderConfig::new()
            .with_line_ending(self.output.line_ending)
            .with_remove_partial_output(self.output.remove_partial);
        if let Some(max) = self.decode.max_records {
            config = config.with_max_records(max);
        }
        config
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
