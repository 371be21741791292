//! Integration tests for the ingestion pipeline.
//!
//! Drives intake → queue → consumer → store → view end to end against an
//! on-disk SQLite file in a temporary directory, with a `MemoryView` standing
//! in for the rendered table.
//!
//! Key responsibilities:
//! - Stored rows carry the rounded temperature and the verbatim city.
//! - Clearing empties both the table and the view.
//! - Sequential inserts are kept, in order, without dedup.
//! - A bad payload never disturbs rows already stored.

use std::sync::Arc;

use relay::{
    comms::Intake,
    config::{DatabaseConfig, OverflowPolicy, QueueConfig},
    db::{self, ReadingStore},
    pipeline::{handoff, Consumer, RawReading},
    view::{self, MemoryView},
    RelayContext,
};
use tempfile::TempDir;

/// Context backed by `weather_data.db` in a fresh temp dir.
fn on_disk_context() -> (TempDir, RelayContext, Arc<MemoryView>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = db::open_shared_store(dir.path(), &DatabaseConfig::default()).expect("open store");
    let view = Arc::new(MemoryView::new());
    let ctx = RelayContext::from_shared(store, view.clone());
    (dir, ctx, view)
}

fn queue_cfg() -> QueueConfig {
    QueueConfig { capacity: 64, overflow: OverflowPolicy::Block }
}

#[test]
fn berlin_message_is_stored_as_22_degrees() {
    let (_dir, ctx, view) = on_disk_context();
    let (tx, rx) = handoff(&queue_cfg());
    let intake = Intake::new(tx);

    intake.handle("ee/ce360/weatherapp", b"{'l': 'Berlin', 't': '21.6'}").unwrap();
    drop(intake);
    Consumer::new(rx, ctx.clone()).run();

    let rows = view.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].city, "Berlin");
    assert_eq!(rows[0].temperature, "22 °C");
    assert_eq!(rows[0].date.len(), "2024-01-01 00:00:00".len());
}

#[test]
fn every_valid_record_rounds_and_keeps_city() {
    let (_dir, ctx, _view) = on_disk_context();
    let cases = [("Oslo", -0.4, "0 °C"), ("Lima", 18.5, "18 °C"), ("Cairo", 34.51, "35 °C"), ("Nuuk", -7.6, "-8 °C")];

    let consumer = {
        let (_tx, rx) = handoff(&queue_cfg());
        Consumer::new(rx, ctx.clone())
    };
    for (city, t, expected) in cases {
        let stored = consumer.process(RawReading { city: city.into(), temperature: t }).unwrap();
        assert_eq!(stored.city, city);
        assert_eq!(stored.temperature, expected);
    }
}

#[test]
fn n_inserts_yield_n_rows_in_order() {
    let (_dir, ctx, view) = on_disk_context();
    let (tx, rx) = handoff(&queue_cfg());
    let handle = Consumer::new(rx, ctx.clone()).spawn().unwrap();

    let intake = Intake::new(tx);
    for i in 0..25 {
        let payload = format!(r#"{{"l": "station-{}", "t": "10"}}"#, i % 3);
        intake.handle("t", payload.as_bytes()).unwrap();
    }
    drop(intake);
    handle.join().unwrap();

    let rows = view.rows();
    assert_eq!(rows.len(), 25);
    let cities: Vec<_> = rows.iter().map(|r| r.city.as_str()).collect();
    let expected: Vec<_> = (0..25).map(|i| format!("station-{}", i % 3)).collect();
    assert_eq!(cities, expected);
    assert_eq!(ctx.with_store(|s| s.count()).unwrap(), 25);
}

#[test]
fn clear_then_refresh_is_empty() {
    let (_dir, ctx, view) = on_disk_context();
    for city in ["A", "B", "C"] {
        ctx.with_store(|s| {
            s.insert(&relay::pipeline::normalize(
                RawReading { city: city.into(), temperature: 1.0 },
                chrono::Local::now(),
            ))
        })
        .unwrap();
    }
    assert_eq!(view::refresh(&ctx).unwrap(), 3);

    assert_eq!(view::clear_database(&ctx).unwrap(), 3);
    assert!(view.rows().is_empty());
    assert_eq!(view::refresh(&ctx).unwrap(), 0);
    assert!(view.rows().is_empty());
}

#[test]
fn startup_refresh_on_empty_store_is_empty() {
    let (_dir, ctx, view) = on_disk_context();
    assert_eq!(view::refresh(&ctx).unwrap(), 0);
    assert!(view.rows().is_empty());
    assert_eq!(view.updates(), 1);
}

#[test]
fn malformed_payload_leaves_existing_rows_alone() {
    let (_dir, ctx, view) = on_disk_context();
    let (tx, rx) = handoff(&queue_cfg());
    let handle = Consumer::new(rx, ctx.clone()).spawn().unwrap();
    let intake = Intake::new(tx);

    intake.handle("t", b"{'l': 'Berlin', 't': '21.6'}").unwrap();
    assert!(intake.handle("t", b"{'l': 'Paris'}").is_err());
    intake.handle("t", b"{'l': 'Rome', 't': 25}").unwrap();
    drop(intake);
    handle.join().unwrap();

    let rows = view.rows();
    let summary: Vec<_> = rows.iter().map(|r| (r.city.as_str(), r.temperature.as_str())).collect();
    assert_eq!(summary, [("Berlin", "22 °C"), ("Rome", "25 °C")]);
}

#[test]
fn every_insert_triggers_a_refresh() {
    let (_dir, ctx, view) = on_disk_context();
    let (tx, rx) = handoff(&queue_cfg());
    let handle = Consumer::new(rx, ctx.clone()).spawn().unwrap();
    let intake = Intake::new(tx);
    for _ in 0..4 {
        intake.handle("t", br#"{"l": "X", "t": 1}"#).unwrap();
    }
    drop(intake);
    handle.join().unwrap();
    assert_eq!(view.updates(), 4);
}

#[test]
fn rows_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = DatabaseConfig::default();
    {
        let store = db::open_shared_store(dir.path(), &cfg).unwrap();
        let ctx = RelayContext::from_shared(store, Arc::new(MemoryView::new()));
        let (_tx, rx) = handoff(&queue_cfg());
        Consumer::new(rx, ctx)
            .process(RawReading { city: "Kyiv".into(), temperature: 3.3 })
            .unwrap();
    }
    let conn = db::connection::init_database(dir.path(), &cfg).unwrap();
    let rows = ReadingStore::new(conn).all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].temperature, "3 °C");
}

#[test]
fn drop_oldest_keeps_intake_moving_when_consumer_stalls() {
    let (_dir, ctx, view) = on_disk_context();
    let (tx, rx) = handoff(&QueueConfig { capacity: 2, overflow: OverflowPolicy::DropOldest });
    let intake = Intake::new(tx);

    // No consumer yet, so the queue overflows.
    for i in 0..5 {
        intake.handle("t", format!(r#"{{"l": "c{i}", "t": 0}}"#).as_bytes()).unwrap();
    }
    drop(intake);

    // Every sender is gone; the consumer drains what is left and stops.
    Consumer::new(rx, ctx).run();

    let cities: Vec<_> = view.rows().into_iter().map(|r| r.city).collect();
    assert_eq!(cities, ["c3", "c4"]);
}
