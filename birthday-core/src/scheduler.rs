//! Periodic refresh with a single retry after failures.
//!
//! The scheduler is one task. It runs a cycle right away, then on every tick
//! of the refresh timer. Cycles never overlap: a tick that falls while a cycle
//! is still loading is skipped. After a failed cycle exactly one retry is
//! pending; a later failure replaces it and any success clears it.

use std::pin::Pin;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, Sleep, interval, sleep};
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::clock::Clock;
use crate::config::BoardConfig;
use crate::effects::{self, DRIZZLE_INTERVAL};
use crate::source::SheetSource;
use crate::surface::{DisplaySurface, EffectSink};

/// Timer settings for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub refresh_interval: Duration,
    pub retry_delay: Duration,
}

impl From<&BoardConfig> for Schedule {
    fn from(config: &BoardConfig) -> Self {
        Schedule {
            refresh_interval: config.refresh_interval,
            retry_delay: config.retry_delay,
        }
    }
}

pub struct Scheduler<S, C, D, E> {
    board: Board<S>,
    clock: C,
    surface: D,
    effects: E,
    schedule: Schedule,
    drizzle: Option<Box<dyn EffectSink + Send>>,
}

impl<S, C, D, E> Scheduler<S, C, D, E>
where
    S: SheetSource + 'static,
    C: Clock + 'static,
    D: DisplaySurface + Send + 'static,
    E: EffectSink + Send + 'static,
{
    pub fn new(board: Board<S>, clock: C, surface: D, effects: E, schedule: Schedule) -> Self {
        Scheduler {
            board,
            clock,
            surface,
            effects,
            schedule,
            drizzle: None,
        }
    }

    /// Also keep a background confetti drizzle going on `sink`, independent
    /// of refresh cycles.
    pub fn with_drizzle(mut self, sink: impl EffectSink + Send + 'static) -> Self {
        self.drizzle = Some(Box::new(sink));
        self
    }

    /// Start the refresh task (and the drizzle, if any).
    pub fn spawn(mut self) -> SchedulerHandle {
        let (shutdown, rx) = watch::channel(false);

        let drizzle = self
            .drizzle
            .take()
            .map(|sink| tokio::spawn(drizzle(sink, DRIZZLE_INTERVAL, rx.clone())));
        let refresh = tokio::spawn(self.run(rx));

        SchedulerHandle {
            shutdown,
            refresh,
            drizzle,
        }
    }

    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.schedule.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut retry: Option<Pin<Box<Sleep>>> = None;

        loop {
            let retry_due = async {
                match retry.as_mut() {
                    Some(pending) => pending.await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => debug!("refresh timer fired"),
                _ = retry_due => info!("retrying after failed refresh"),
            }

            let reference = self.clock.today();
            let cycle = tokio::select! {
                _ = shutdown.changed() => break,
                cycle = self.board.refresh(reference, &mut self.surface, &mut self.effects) => cycle,
            };

            retry = if cycle.is_failure() {
                warn!(retry_in = ?self.schedule.retry_delay, "scheduling one retry");
                Some(Box::pin(sleep(self.schedule.retry_delay)))
            } else {
                None
            };
        }

        debug!("refresh scheduler stopped");
    }
}

async fn drizzle(
    mut sink: Box<dyn EffectSink + Send>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => sink.burst(&effects::drizzle()),
        }
    }
}

/// Owner of the running scheduler tasks.
///
/// Dropping the handle without calling [`SchedulerHandle::shutdown`] also
/// stops the tasks at their next wake-up.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    refresh: JoinHandle<()>,
    drizzle: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop all tasks and wait for them to finish. A cycle that is still
    /// loading is abandoned.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.refresh.await;
        if let Some(drizzle) = self.drizzle {
            let _ = drizzle.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.refresh.is_finished()
    }
}
