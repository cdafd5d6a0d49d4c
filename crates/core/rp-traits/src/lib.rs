//! Trait seams between the rowpush core and its collaborators.

pub mod sink;
pub mod store;

pub use sink::Sink;
pub use store::{PointStore, TimedValueStream};
