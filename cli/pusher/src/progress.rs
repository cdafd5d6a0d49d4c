//! Progress reporting for rp-pusher.

use rp_pipeline::{PipelineStats, StatsSnapshot};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Periodic progress reporter over the shared run counters.
pub struct ProgressReporter {
    /// Whether progress reporting is enabled
    enabled: bool,
    /// Reporting interval
    interval: Duration,
    /// Shared stop flag
    stop: Arc<AtomicBool>,
    /// Handle to the background reporter task
    handle: Option<JoinHandle<()>>,
    /// Start time
    start_time: Instant,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    pub fn new(enabled: bool, interval_secs: u64) -> Self {
        Self {
            enabled,
            interval: Duration::from_secs(interval_secs),
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
            start_time: Instant::now(),
        }
    }

    /// Start the background progress reporter.
    pub fn start(&mut self, stats: Arc<PipelineStats>) {
        if !self.enabled {
            return;
        }

        let stop = Arc::clone(&self.stop);
        let interval = self.interval;
        let start_time = self.start_time;

        let handle = tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.tick().await; // Skip first immediate tick

            loop {
                interval_timer.tick().await;

                if stop.load(Ordering::Relaxed) {
                    break;
                }

                let snapshot = stats.snapshot();
                let elapsed = start_time.elapsed();

                let _ = writeln!(
                    io::stderr(),
                    "[Progress] {} rows read, {} skipped, {} documents sent, {} ({:.1}s elapsed)",
                    format_number(snapshot.rows_read),
                    snapshot.rows_skipped,
                    format_number(snapshot.documents_sent),
                    format_bytes(snapshot.bytes_sent),
                    elapsed.as_secs_f64()
                );
            }
        });

        self.handle = Some(handle);
    }

    /// Stop the reporter and print the final progress line.
    pub async fn finish(self, snapshot: &StatsSnapshot) {
        let Some(elapsed) = self.shut_down().await else {
            return;
        };

        let _ = writeln!(
            io::stderr(),
            "[Progress] Complete: {} rows read, {} skipped, {} documents sent, {} ({:.1}s)",
            format_number(snapshot.rows_read),
            snapshot.rows_skipped,
            format_number(snapshot.documents_sent),
            format_bytes(snapshot.bytes_sent),
            elapsed.as_secs_f64()
        );
    }

    /// Stop the reporter without a final line (the run aborted).
    pub async fn cancel(self) {
        let _ = self.shut_down().await;
    }

    async fn shut_down(mut self) -> Option<Duration> {
        if !self.enabled {
            return None;
        }

        self.stop.store(true, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }

        Some(self.start_time.elapsed())
    }
}

/// Format bytes as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a number with comma separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numbers_with_commas() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn formats_bytes_by_magnitude() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
