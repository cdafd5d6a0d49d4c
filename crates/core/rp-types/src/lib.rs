//! Shared types for rowpush.
//!
//! - [`message`] - data and control messages exchanged between the
//!   reader task, the sender pool, and the coordinator
//! - [`sensor`] - the raw sensor reading model and the measurement
//!   points it maps to

pub mod message;
pub mod sensor;

pub use message::{ControlEvent, ControlMessage, DataMessage, TaskOrigin};
pub use sensor::{Measurement, Point, RawReading, TimedValue};
