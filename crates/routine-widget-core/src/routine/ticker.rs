//! One-second tick source for the player host.
//!
//! The interval only exists while the engine is `Playing`. Leaving `Playing`
//! drops it, so a stale interval can never tick a discarded session.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::engine::PlayerState;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Start or stop to match `state`. A fresh interval begins a full period
    /// from now, the way a resumed countdown does.
    pub fn sync(&mut self, state: PlayerState) {
        match (state, self.interval.is_some()) {
            (PlayerState::Playing, false) => {
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
                tracing::debug!("ticker started");
            }
            (PlayerState::Playing, true) => {}
            (_, true) => {
                self.interval = None;
                tracing::debug!(%state, "ticker stopped");
            }
            (_, false) => {}
        }
    }

    /// Stop unconditionally (session teardown).
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Never resolves while stopped.
    pub async fn next(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}
