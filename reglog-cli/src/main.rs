//! Register Log CLI Application
//!
//! Command-line front end for the reglog-decoder library. Converts a binary
//! register log captured from the motor-control board into a CSV table that
//! the plotting and analysis scripts read.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, SummaryMode};
use reglog_decoder::{Decoder, LineEnding};

/// Register Log Converter - Decode binary register logs into CSV
#[derive(Parser, Debug)]
#[command(name = "reglog-cli")]
#[command(about = "Convert a binary register log into a CSV table", long_about = None)]
#[command(version)]
struct Args {
    /// Binary register log to decode
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// CSV file to write
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of records to decode
    #[arg(long, value_name = "COUNT")]
    max_records: Option<u64>,

    /// Terminate CSV rows with CRLF instead of LF
    #[arg(long)]
    crlf: bool,

    /// Delete the output file if decoding fails
    #[arg(long)]
    remove_partial: bool,

    /// Print a summary of the decoded log
    #[arg(long, conflicts_with = "summary_json")]
    summary: bool,

    /// Print the summary as JSON
    #[arg(long)]
    summary_json: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress log output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Merge command-line flags over the configuration file
    fn apply_to(&self, mut config: AppConfig) -> AppConfig {
        if let Some(max) = self.max_records {
            config.decode.max_records = Some(max);
        }
        if self.crlf {
            config.output.line_ending = LineEnding::CrLf;
        }
        if self.remove_partial {
            config.output.remove_partial = true;
        }
        if self.summary {
            config.output.summary = SummaryMode::Text;
        }
        if self.summary_json {
            config.output.summary = SummaryMode::Json;
        }
        config
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::debug!("Register Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", reglog_decoder::VERSION);

    let file_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let config = args.apply_to(file_config);
    log::debug!("Effective configuration: {:?}", config);

    let decoder = Decoder::with_config(config.decoder_config());
    let summary = decoder
        .convert_file(&args.input, &args.output)
        .with_context(|| format!("Failed to convert {:?}", args.input))?;

    match config.output.summary {
        SummaryMode::None => {}
        SummaryMode::Text => println!("{}", report::text_summary(&summary)),
        SummaryMode::Json => println!("{}", report::json_summary(&summary)?),
    }

    println!(
        "Conversion complete. CSV file saved as {}",
        args.output.display()
    );

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
