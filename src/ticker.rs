use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};

use crate::board::Board;
use crate::model::fixture::Fixture;
use crate::resolver::next_fixtures;
use crate::schedule::Schedule;

#[derive(Error, Debug)]
pub enum ClockError {
    #[error("current time is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum TickerError {
    #[error("ticker period must be non-zero")]
    ZeroPeriod,

    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Source of the current instant, sampled once per tick.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Result<DateTime<Utc>, ClockError>;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClockError::Unavailable(e.to_string()))?;
        let secs = i64::try_from(since_epoch.as_secs()).map_err(|e| ClockError::Unavailable(e.to_string()))?;
        DateTime::from_timestamp(secs, since_epoch.subsec_nanos())
            .ok_or_else(|| ClockError::Unavailable(format!("{secs}s since epoch is out of range")))
    }
}

/// Latest value published by the ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Nothing computed yet.
    Pending,
    Ready(Board),
    /// The clock failed on this tick; there is deliberately no board to show.
    ClockUnavailable,
}

/// Handle to the refresh task. Subscribers read the latest [`Tick`] from the receiver
/// returned by [`Ticker::spawn`]; the task ends once every receiver is dropped.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Choose the next `count` fixtures now and keep counting down to that set.
    pub fn for_schedule<C: Clock>(
        schedule: &Schedule,
        clock: C,
        count: usize,
        period: Duration,
    ) -> Result<(Self, watch::Receiver<Tick>), TickerError> {
        if period.is_zero() {
            return Err(TickerError::ZeroPeriod);
        }
        let now = clock.now()?;
        let tracked: Vec<Fixture> = next_fixtures(schedule.fixtures(), &now, count)
            .into_iter()
            .cloned()
            .collect();
        info!(tracked = tracked.len(), ?period, "Starting countdown ticker");
        Self::spawn(tracked, clock, period)
    }

    /// Run the refresh loop on its own task. `period` must be non-zero.
    pub fn spawn<C: Clock>(
        fixtures: Vec<Fixture>,
        clock: C,
        period: Duration,
    ) -> Result<(Self, watch::Receiver<Tick>), TickerError> {
        if period.is_zero() {
            return Err(TickerError::ZeroPeriod);
        }
        let (tx, rx) = watch::channel(Tick::Pending);
        let handle = tokio::spawn(run(fixtures, clock, period, tx));
        Ok((Ticker { handle }, rx))
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to end.
    pub async fn join(self) -> Result<(), JoinError> {
        self.handle.await
    }
}

#[instrument(level = "debug", skip_all, fields(fixtures = fixtures.len()))]
async fn run<C: Clock>(fixtures: Vec<Fixture>, clock: C, period: Duration, tx: watch::Sender<Tick>) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tx.closed() => break,
        }

        let tick = match clock.now() {
            Ok(now) => Tick::Ready(Board::track(&fixtures, &now)),
            Err(e) => {
                error!(error = %e, "Clock unavailable; skipping countdown for this tick");
                Tick::ClockUnavailable
            }
        };
        debug!(?tick, "Publishing tick");
        if tx.send(tick).is_err() {
            break;
        }
    }
    info!("Countdown ticker stopped: no subscribers left");
}
