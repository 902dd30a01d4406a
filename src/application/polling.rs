// Polling loop - periodic dashboard refresh for the lifetime of the page
use crate::application::controller::DashboardController;
use std::cell::Cell;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

/// Hands out increasing request tokens so a response can tell whether a
/// newer request was issued after it.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: Cell<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        let token = self.issued.get() + 1;
        self.issued.set(token);
        token
    }

    pub fn latest(&self) -> u64 {
        self.issued.get()
    }

    pub fn is_latest(&self, token: u64) -> bool {
        token == self.issued.get()
    }
}

/// Issues the startup fetches and starts polling, without waiting on either.
/// A startup fetch that never answers holds up neither the timer nor the
/// page events that follow. Must run inside a `LocalSet`.
pub fn launch(controller: &DashboardController, period: Duration) {
    let startup = controller.clone();
    tokio::task::spawn_local(async move {
        startup.start().await;
        tracing::debug!("startup fetches settled");
    });
    tokio::task::spawn_local(run_polling(controller.clone(), period));
}

/// First tick one period from now. A late tick is followed by a full period
/// rather than a burst of catch-up ticks.
fn poll_interval(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Re-runs the dashboard fetch every `period`, first tick one period after
/// start. Each tick is fire-and-forget: a slow fetch never delays the next
/// tick, so fetches may overlap. Must run inside a `LocalSet`.
pub async fn run_polling(controller: DashboardController, period: Duration) {
    tracing::info!(period_secs = period.as_secs_f64(), "dashboard polling started");
    let mut ticks = IntervalStream::new(poll_interval(period));
    while ticks.next().await.is_some() {
        let controller = controller.clone();
        tokio::task::spawn_local(async move {
            controller.load_dashboard().await;
        });
    }
}
