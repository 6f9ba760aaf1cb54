//! Optional async convenience runner for driving a [`Scheduler`] from a
//! `tokio` interval, for hosts that don't already own a clock (an audio
//! callback, MIDI clock, etc).

use crate::scheduler::{AudioCallbacks, Scheduler};
use std::time::Duration;

/// Ticks `scheduler` by `subdivision_secs` every `subdivision_secs` of wall
/// time, `total_ticks` times, dispatching into `callbacks`.
pub async fn run_for(
    scheduler: &mut Scheduler<'_>,
    subdivision_secs: f64,
    total_ticks: u64,
    callbacks: &mut dyn AudioCallbacks,
) {
    let mut interval = tokio::time::interval(Duration::from_secs_f64(subdivision_secs.max(0.001)));
    for _ in 0..total_ticks {
        interval.tick().await;
        scheduler.tick(subdivision_secs, callbacks);
    }
}
