//! Display clock owned by a view.
//!
//! The ticker is a scoped background task: it starts with the view and is
//! aborted when the [`ClockTicker`] is stopped or dropped.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

pub struct ClockTicker {
    now: watch::Receiver<DateTime<Local>>,
    task: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Must be called from within a Tokio runtime.
    pub fn start(tick: Duration) -> Self {
        let (tx, rx) = watch::channel(Local::now());
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial value is already set.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Local::now()).is_err() {
                    break;
                }
            }
        });
        debug!("clock: started tick_ms={}", tick.as_millis());
        Self {
            now: rx,
            task: Some(task),
        }
    }

    pub fn now(&self) -> DateTime<Local> {
        *self.now.borrow()
    }

    /// Watch the clock value; the channel closes once the ticker stops.
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Local>> {
        self.now.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("clock: stopped");
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
