#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sensorwatch_alert::engine::AlertEngine;
use sensorwatch_common::clock::ManualClock;
use sensorwatch_notify::{ChannelSender, NotificationDispatcher};
use sensorwatch_pipeline::AlertPipeline;
use std::sync::{Arc, Mutex};

pub type Outbox = Arc<Mutex<Vec<String>>>;

/// Test double that keeps every message it is asked to send.
pub struct RecordingSender {
    pub name: &'static str,
    pub outbox: Outbox,
    pub fail: bool,
}

impl ChannelSender for RecordingSender {
    fn send(&self, message: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("{} gateway rejected message", self.name);
        }
        self.outbox.lock().unwrap().push(message.to_string());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        self.name
    }
}

pub struct TestContext {
    pub pipeline: AlertPipeline,
    pub clock: Arc<ManualClock>,
    pub chat: Outbox,
    pub email: Outbox,
    pub sms: Outbox,
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn sender(name: &'static str, outbox: &Outbox, fail: bool) -> Box<dyn ChannelSender> {
    Box::new(RecordingSender {
        name,
        outbox: outbox.clone(),
        fail,
    })
}

pub fn build_test_context() -> TestContext {
    build_test_context_with_failing(&[])
}

/// Like [`build_test_context`], but the named channels fail every send.
pub fn build_test_context_with_failing(failing: &[&str]) -> TestContext {
    let clock = Arc::new(ManualClock::new(t0()));
    let chat = Outbox::default();
    let email = Outbox::default();
    let sms = Outbox::default();

    let dispatcher = NotificationDispatcher::new(
        sender("email", &email, failing.contains(&"email")),
        sender("sms", &sms, failing.contains(&"sms")),
        sender("chat", &chat, failing.contains(&"chat")),
    );
    let engine = AlertEngine::with_clock(clock.clone());

    TestContext {
        pipeline: AlertPipeline::new(engine, dispatcher),
        clock,
        chat,
        email,
        sms,
    }
}
