//! Pipeline coordinator for rowpush.
//!
//! One reader task converts tabular rows into JSON documents and fans
//! them out to a pool of sender tasks over a bounded data channel; the
//! senders dispatch documents to a shared [`rp_traits::Sink`] and report
//! status back over an unbounded control channel. The coordinator is the
//! sole owner of run state and decides when the job completed or must
//! abort.

pub mod config;
pub mod pipeline;
pub mod router;
pub mod stats;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, RunSummary};
pub use router::DataRouter;
pub use stats::{PipelineStats, StatsSnapshot};
