// src/pipeline/queue.rs

//! Bounded hand-off between the MQTT intake and the persistence consumer.
//!
//! Backed by a crossbeam bounded channel. Under `DropOldest` the producer side
//! keeps a clone of the receiver so it can evict the oldest record; that clone
//! also keeps the channel open, so such a producer never reports `Closed`.

use crossbeam::channel::{self, Receiver, RecvError, Sender, TryRecvError, TrySendError};
use log::Level;
use metrics::counter;

use crate::config::{OverflowPolicy, QueueConfig};
use crate::pipeline::RawReading;
use crate::relay_log;

/// Outcome of a single push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pushed {
    Queued,
    /// Queued after evicting the oldest record.
    DisplacedOldest,
    /// Every consumer is gone; the record was dropped.
    Closed,
}

#[derive(Clone)]
pub struct QueueProducer {
    tx:    Sender<RawReading>,
    evict: Option<Receiver<RawReading>>,
}

pub struct QueueConsumer {
    rx: Receiver<RawReading>,
}

pub fn handoff(cfg: &QueueConfig) -> (QueueProducer, QueueConsumer) {
    let (tx, rx) = channel::bounded(cfg.capacity);
    let evict = match cfg.overflow {
        OverflowPolicy::DropOldest => Some(rx.clone()),
        OverflowPolicy::Block => None,
    };
    (QueueProducer { tx, evict }, QueueConsumer { rx })
}

impl QueueProducer {
    pub fn push(&self, reading: RawReading) -> Pushed {
        match &self.evict {
            Some(evict) => self.push_displacing(evict, reading),
            None => match self.tx.send(reading) {
                Ok(()) => Pushed::Queued,
                Err(_) => Pushed::Closed,
            },
        }
    }

    fn push_displacing(&self, evict: &Receiver<RawReading>, mut reading: RawReading) -> Pushed {
        let mut displaced = false;
        loop {
            match self.tx.try_send(reading) {
                Ok(()) if displaced => return Pushed::DisplacedOldest,
                Ok(()) => return Pushed::Queued,
                Err(TrySendError::Disconnected(_)) => return Pushed::Closed,
                Err(TrySendError::Full(back)) => {
                    reading = back;
                    // The consumer may drain it first; either way there is room now.
                    if let Ok(old) = evict.try_recv() {
                        displaced = true;
                        counter!("relay_queue_dropped_total").increment(1);
                        relay_log!(Level::Warn, "queue", "Queue full, dropped oldest reading from {}", old.city);
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

impl QueueConsumer {
    /// Block until a record arrives; `Err` once every producer is dropped.
    pub fn recv(&self) -> Result<RawReading, RecvError> {
        self.rx.recv()
    }

    pub fn try_recv(&self) -> Result<RawReading, TryRecvError> {
        self.rx.try_recv()
    }
}
