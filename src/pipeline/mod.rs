//! Ingestion pipeline: reading model, hand-off queue, persistence consumer.

pub mod consumer;
pub mod queue;
pub mod reading;

pub use consumer::Consumer;
pub use queue::{handoff, Pushed, QueueConsumer, QueueProducer};
pub use reading::{normalize, RawReading, Reading};
