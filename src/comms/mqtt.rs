// src/comms/mqtt.rs

//! Broker subscriber
//! =================
//! One MQTT session, one topic. The event loop runs on its own OS thread
//! inside a current-thread Tokio runtime and forwards every publish to the
//! `Intake`.
//!
//! Reconnects are left to `rumqttc`: polling the event loop after an error
//! opens a new connection. On every `ConnAck` the topic is subscribed again,
//! since sessions are clean.

use std::{io, thread, time::Duration};

use log::Level;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, SubscribeFilter};

use crate::comms::intake::Intake;
use crate::config::BrokerConfig;
use crate::relay_log;

/// Capacity of the request channel between `AsyncClient` and the event loop.
const REQUEST_CAPACITY: usize = 10;

pub struct Subscriber {
    client:          AsyncClient,
    eventloop:       EventLoop,
    topic:           String,
    reconnect_delay: Duration,
}

impl Subscriber {
    pub fn new(cfg: &BrokerConfig) -> Self {
        let mut opts = MqttOptions::new(cfg.client_id.clone(), cfg.host.clone(), cfg.port);
        opts.set_keep_alive(cfg.keep_alive);
        opts.set_clean_session(true);

        let (client, eventloop) = AsyncClient::new(opts, REQUEST_CAPACITY);
        Self {
            client,
            eventloop,
            topic: cfg.topic.clone(),
            reconnect_delay: cfg.reconnect_delay,
        }
    }

    /// Run the subscriber for the rest of the process on a dedicated thread.
    ///
    /// The runtime is built on the calling thread so a failure reaches the
    /// caller instead of silently ending the subscriber.
    pub fn spawn(self, intake: Intake) -> io::Result<thread::JoinHandle<()>> {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        thread::Builder::new()
            .name("mqtt".into())
            .spawn(move || rt.block_on(self.run(intake)))
    }

    /// Poll the event loop forever.
    ///
    /// `intake.handle` runs inline; with the `block` overflow policy a full
    /// queue stalls this loop until the consumer catches up.
    pub async fn run(mut self, intake: Intake) {
        relay_log!(Level::Info, "mqtt", "Subscriber started for topic {}", self.topic);
        loop {
            match self.eventloop.poll().await {
                Ok(event) => {
                    if let Some(filter) = on_event(&self.topic, event, &intake) {
                        if let Err(e) = self.client.subscribe_many([filter]).await {
                            relay_log!(Level::Error, "mqtt", "Subscribe to {} failed: {}", self.topic, e);
                        }
                    }
                }
                Err(e) => {
                    relay_log!(
                        Level::Warn,
                        "mqtt",
                        "Broker connection error: {}; retrying in {:?}",
                        e,
                        self.reconnect_delay
                    );
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }
}

/// React to one event from the broker. Publishes go to `intake`; a `ConnAck`
/// yields the subscription to (re)issue for `topic`.
fn on_event(topic: &str, event: Event, intake: &Intake) -> Option<SubscribeFilter> {
    match event {
        Event::Incoming(Packet::ConnAck(ack)) => {
            relay_log!(Level::Info, "mqtt", "Connected with result code {:?}", ack.code);
            Some(SubscribeFilter::new(topic.to_owned(), QoS::AtMostOnce))
        }
        Event::Incoming(Packet::SubAck(ack)) => {
            relay_log!(Level::Debug, "mqtt", "Subscription acknowledged: {:?}", ack.return_codes);
            None
        }
        Event::Incoming(Packet::Publish(publish)) => {
            // Malformed payloads are already logged by the intake.
            let _ = intake.handle(&publish.topic, &publish.payload);
            None
        }
        _ => None,
    }
}
