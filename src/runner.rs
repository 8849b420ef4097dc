use std::time::Duration;
use tokio::sync::Notify;
use tokio::time;
use tracing::info;

use crate::dashboard::Dashboard;
use crate::simulation::RandomSource;

#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub interval: Duration,
    pub tick_limit: Option<u64>,
    pub quiet: bool,
}

/// Tick `dashboard` on a fixed cadence until `shutdown` fires or the tick
/// limit is reached. Returns the number of ticks run.
pub async fn run_loop<R: RandomSource + ?Sized>(
    dashboard: &mut Dashboard,
    rng: &mut R,
    settings: LoopSettings,
    shutdown: &Notify,
) -> u64 {
    let mut interval = time::interval(settings.interval);
    let mut ticks = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = shutdown.notified() => {
                info!("shutdown requested");
                break;
            }
            _ = interval.tick() => {}
        }
        if let Some(report) = dashboard.tick(rng) {
            ticks += 1;
            info!(
                tick = ticks,
                normal = report.sample.counts.normal,
                suspicious = report.sample.counts.suspicious,
                attack = report.sample.counts.attack,
                "tick"
            );
        }
        if !settings.quiet {
            println!("{}", dashboard);
        }
        if settings.tick_limit.is_some_and(|limit| ticks >= limit) {
            break;
        }
    }
    ticks
}
