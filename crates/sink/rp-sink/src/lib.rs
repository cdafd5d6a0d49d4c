//! Sink implementations for rowpush.
//!
//! - [`StdoutSink`] - newline-delimited payloads on stdout
//! - [`HttpSink`] - POST of each payload to a REST endpoint
//! - [`StatsSink`] - counts documents without output, for throughput runs
//! - [`SensorSink`] - decodes sensor readings and writes measurement
//!   points through a [`rp_traits::PointStore`]
//! - [`MemoryStore`] - in-memory point store

pub mod http;
pub mod memory;
pub mod sensor;
pub mod stats;
pub mod stdout;

pub use http::HttpSink;
pub use memory::MemoryStore;
pub use sensor::SensorSink;
pub use stats::StatsSink;
pub use stdout::StdoutSink;
