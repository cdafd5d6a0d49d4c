//! CLI argument definitions for rp-pusher.

use clap::{Parser, ValueEnum};
use tracing::Level;

/// Stream a CSV file of sensor records to a sink as JSON documents.
///
/// Reads the file row by row, pairs each row with the captured header,
/// and dispatches one JSON document per row through a pool of
/// concurrent senders.
///
/// ## Examples
///
/// Print documents to stdout (pretty-printed, sequential):
///   rp-pusher -f ./data.csv
///
/// Push to an HTTP endpoint with four senders:
///   rp-pusher -f ./data.csv -s http -u http://localhost:8080/ingest -c 4 -b 16
///
/// Throughput run against the counting sink:
///   rp-pusher -f ./big.csv -s stats -c 8 --progress
#[derive(Parser, Debug)]
#[command(name = "rp-pusher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Input ===
    /// CSV file to read
    #[arg(short = 'f', long, default_value = "./data.csv")]
    pub file: std::path::PathBuf,

    /// Leading header rows; the first supplies column names, the rest
    /// are skipped. With 0, names are synthesized as column0, column1...
    #[arg(short = 'H', long, default_value = "1")]
    pub header_rows: u32,

    /// Maximum number of data rows to read; -1 reads to exhaustion
    #[arg(short = 'm', long, default_value = "-1", allow_negative_numbers = true, value_parser = parse_row_limit)]
    pub max_rows: i64,

    // === Sink ===
    /// Output sink type
    #[arg(short = 's', long, value_enum, default_value = "stdout")]
    pub sink: SinkType,

    /// Target URL (required when sink=http)
    #[arg(short = 'u', long, env = "RP_TARGET_URL")]
    pub url: Option<String>,

    /// Indent string for stdout documents; other sinks send compact JSON
    #[arg(long, default_value = "   ")]
    pub indent: String,

    // === Processing ===
    /// Data-channel buffer size per sender (must be >= 1)
    #[arg(short = 'b', long, default_value = "1", value_parser = parse_positive_usize)]
    pub buffer_size: usize,

    /// Number of concurrent senders (must be >= 1). Above 1, delivery
    /// order across rows is not guaranteed.
    #[arg(short = 'c', long, default_value = "1", value_parser = parse_positive_usize)]
    pub concurrency: usize,

    /// Shutdown timeout in seconds (time to wait for senders to complete)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub shutdown_timeout: u64,

    // === Progress Options ===
    /// Enable progress reporting to stderr
    #[arg(long)]
    pub progress: bool,

    /// Progress reporting interval in seconds
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub progress_interval: u64,

    // === Logging ===
    /// Log level
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Sink type.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SinkType {
    /// Print documents to stdout
    Stdout,
    /// POST each document to a REST endpoint
    Http,
    /// Count documents without output (for performance testing)
    Stats,
}

/// Log level.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

/// Parse a row limit (-1 or a non-negative count).
fn parse_row_limit(s: &str) -> Result<i64, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < -1 {
        return Err(format!("{} is not in -1..", value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = Cli::parse_from(["rp-pusher"]);
        assert_eq!(cli.file, std::path::PathBuf::from("./data.csv"));
        assert_eq!(cli.header_rows, 1);
        assert_eq!(cli.max_rows, -1);
        assert_eq!(cli.buffer_size, 1);
        assert_eq!(cli.concurrency, 1);
        assert_eq!(cli.indent, "   ");
        assert!(!cli.progress);
    }

    #[test]
    fn rejects_zero_concurrency() {
        assert!(Cli::try_parse_from(["rp-pusher", "-c", "0"]).is_err());
    }

    #[test]
    fn rejects_row_limit_below_minus_one() {
        assert!(Cli::try_parse_from(["rp-pusher", "-m", "-2"]).is_err());
        assert!(Cli::try_parse_from(["rp-pusher", "-m", "-1"]).is_ok());
    }
}
