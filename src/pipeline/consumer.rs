// src/pipeline/consumer.rs

//! Persistence consumer: queue → store → view.

use std::{io, thread};

use chrono::Local;
use log::Level;
use metrics::counter;

use crate::context::RelayContext;
use crate::error::RelayError;
use crate::pipeline::queue::QueueConsumer;
use crate::pipeline::reading::{normalize, RawReading, Reading};
use crate::relay_log;
use crate::view;

pub struct Consumer {
    queue: QueueConsumer,
    ctx:   RelayContext,
}

impl Consumer {
    pub fn new(queue: QueueConsumer, ctx: RelayContext) -> Self {
        Self { queue, ctx }
    }

    pub fn spawn(self) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new().name("consumer".into()).spawn(move || self.run())
    }

    /// Block on the queue until every producer is gone. A failed record is
    /// logged and skipped.
    pub fn run(self) {
        relay_log!(Level::Info, "consumer", "Consumer started");
        while let Ok(raw) = self.queue.recv() {
            if let Err(e) = self.process(raw) {
                relay_log!(Level::Error, "consumer", "Reading not stored: {}", e);
            }
        }
        relay_log!(Level::Info, "consumer", "Queue closed, consumer stopped");
    }

    /// Normalise, insert, refresh. Only a failed insert is an error; a failed
    /// refresh is logged and the stored reading is still returned.
    pub fn process(&self, raw: RawReading) -> Result<Reading, RelayError> {
        let reading = normalize(raw, Local::now());
        self.ctx.with_store(|store| store.insert(&reading))?;
        counter!("relay_readings_stored_total").increment(1);
        relay_log!(
            Level::Debug,
            "consumer",
            "Stored {} {} at {}",
            reading.city,
            reading.temperature,
            reading.date
        );
        if let Err(e) = view::refresh(&self.ctx) {
            relay_log!(Level::Error, "consumer", "Reading stored but view refresh failed: {}", e);
        }
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rusqlite::Connection;

    use super::*;
    use crate::config::{OverflowPolicy, QueueConfig};
    use crate::db::{connection::apply_schema, ReadingStore};
    use crate::pipeline::queue::handoff;
    use crate::view::MemoryView;

    fn consumer(store: ReadingStore) -> (Consumer, Arc<MemoryView>) {
        let view = Arc::new(MemoryView::new());
        let ctx = RelayContext::new(store, view.clone());
        let (_tx, rx) = handoff(&QueueConfig { capacity: 1, overflow: OverflowPolicy::Block });
        (Consumer::new(rx, ctx), view)
    }

    #[test]
    fn failed_refresh_does_not_undo_the_insert() {
        // A BLOB row cannot be read back as text, so every refresh fails.
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute("INSERT INTO weather VALUES (X'00', 'x', 'x')", []).unwrap();
        let (consumer, view) = consumer(ReadingStore::new(conn));

        let stored = consumer.process(RawReading { city: "Berlin".into(), temperature: 21.6 }).unwrap();
        assert_eq!(stored.temperature, "22 °C");
        assert_eq!(consumer.ctx.with_store(|s| s.count()).unwrap(), 2);
        assert_eq!(view.updates(), 0);
    }

    #[test]
    fn failed_insert_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute("DROP TABLE weather", []).unwrap();
        let (consumer, view) = consumer(ReadingStore::new(conn));

        let err = consumer.process(RawReading { city: "Oslo".into(), temperature: 1.0 }).unwrap_err();
        assert!(matches!(err, RelayError::Store(_)));
        assert_eq!(view.updates(), 0);
    }
}
