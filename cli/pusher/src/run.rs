//! rp-pusher execution logic.

use anyhow::{Context, Result, bail};
use rp_csvjson::{JsonFormat, JsonRecords};
use rp_pipeline::{Pipeline, PipelineConfig, RunSummary};
use rp_sink::{HttpSink, StatsSink, StdoutSink};
use rp_traits::Sink;
use std::fs::File;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::fmt;

use crate::args::{Cli, LogLevel, SinkType};
use crate::progress::ProgressReporter;

/// Initialize logging.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let level: Level = level.into();

    let subscriber = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr); // Log to stderr so stdout is clean for output

    subscriber.init();

    Ok(())
}

/// Run the pusher end to end and return the final summary.
pub async fn execute(args: Cli) -> Result<RunSummary> {
    let sink = create_sink(&args)?;

    let file = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    // Only stdout documents are indented; http and stats always send
    // compact payloads.
    let format = match args.sink {
        SinkType::Stdout => JsonFormat::Indented(args.indent.clone()),
        SinkType::Http | SinkType::Stats => JsonFormat::Compact,
    };

    let records = JsonRecords::from_reader(file)
        .with_header_rows(args.header_rows)
        .with_format(format);

    let row_limit = u64::try_from(args.max_rows).ok();
    let config = PipelineConfig::new()
        .with_buffer_size(args.buffer_size)
        .with_concurrency(args.concurrency)
        .with_row_limit(row_limit)
        .with_shutdown_timeout(Duration::from_secs(args.shutdown_timeout));

    info!(
        file = %args.file.display(),
        sink = ?args.sink,
        "starting rp-pusher"
    );

    let pipeline = Pipeline::new(records, sink, config);

    let mut reporter = ProgressReporter::new(args.progress, args.progress_interval);
    reporter.start(pipeline.stats());

    let result = pipeline.run().await;

    match result {
        Ok(summary) => {
            reporter.finish(&summary.stats).await;
            Ok(summary)
        }
        Err(error) => {
            reporter.cancel().await;
            Err(error.into())
        }
    }
}

/// Build the configured sink.
fn create_sink(args: &Cli) -> Result<Arc<dyn Sink>> {
    let sink: Arc<dyn Sink> = match args.sink {
        SinkType::Stdout => Arc::new(StdoutSink::new()),
        SinkType::Http => {
            let Some(url) = args.url.as_deref() else {
                bail!("--url is required when sink=http");
            };
            Arc::new(HttpSink::new(url).context("failed to build HTTP client")?)
        }
        SinkType::Stats => Arc::new(StatsSink::new()),
    };
    Ok(sink)
}
