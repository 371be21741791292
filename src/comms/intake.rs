// src/comms/intake.rs

//! Per-message entry point: decode, then hand off to the consumer.

use log::Level;
use metrics::counter;

use crate::comms::payload::{decode, PayloadError};
use crate::pipeline::queue::{Pushed, QueueProducer};
use crate::relay_log;

#[derive(Clone)]
pub struct Intake {
    queue: QueueProducer,
}

impl Intake {
    pub fn new(queue: QueueProducer) -> Self {
        Self { queue }
    }

    /// Handle one inbound publish. A malformed payload is logged and dropped
    /// here, so it never reaches the consumer.
    pub fn handle(&self, topic: &str, payload: &[u8]) -> Result<Pushed, PayloadError> {
        counter!("relay_messages_received_total").increment(1);
        relay_log!(Level::Debug, "intake", "{} {}", topic, String::from_utf8_lossy(payload));

        let reading = decode(payload).inspect_err(|e| {
            counter!("relay_messages_malformed_total").increment(1);
            relay_log!(Level::Warn, "intake", "Dropped message on {}: {}", topic, e);
        })?;

        let pushed = self.queue.push(reading);
        if pushed == Pushed::Closed {
            relay_log!(Level::Error, "intake", "Consumer is gone; reading dropped");
        }
        Ok(pushed)
    }
}
