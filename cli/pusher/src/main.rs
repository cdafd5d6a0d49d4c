//! rp-pusher CLI
//!
//! Streams a CSV file of sensor records to a sink as JSON documents.

use clap::Parser;

mod args;
mod progress;
mod run;

use args::Cli;
use progress::{format_bytes, format_number};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Initialize logging (to stderr, so stdout is clean for output)
    run::init_logging(args.log_level)?;

    // Run the pipeline; a fatal abort surfaces here and exits non-zero
    let summary = run::execute(args).await?;

    // Report results to stderr
    eprintln!();
    eprintln!("Pusher completed:");
    eprintln!("  Rows processed:  {}", format_number(summary.total_rows));
    eprintln!(
        "  Documents sent:  {}",
        format_number(summary.stats.documents_sent)
    );
    eprintln!(
        "  Rows skipped:    {}",
        format_number(summary.stats.rows_skipped)
    );
    eprintln!("  Bytes sent:      {}", format_bytes(summary.stats.bytes_sent));

    if let Some(duration) = summary.stats.duration() {
        let secs = duration.num_milliseconds() as f64 / 1000.0;
        eprintln!("  Duration:        {:.2}s", secs);

        if secs > 0.0 && summary.stats.documents_sent > 0 {
            eprintln!(
                "  Throughput:      {} documents/sec",
                format_number((summary.stats.documents_sent as f64 / secs) as u64)
            );
        }
    }

    Ok(())
}
