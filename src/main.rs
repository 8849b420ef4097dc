use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use garuda::config::Config;
use garuda::export::{self, ExportOutcome};
use garuda::runner::{run_loop, LoopSettings};
use garuda::{Dashboard, RngSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // notify_one stores a permit when the loop is not waiting yet
    let shutdown = Arc::new(Notify::new());
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || shutdown_clone.notify_one()).map_err(garuda::GarudaError::from)?;

    let mut rng = match config.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let mut dashboard = Dashboard::new(config.severity_model);
    dashboard.start();
    info!(
        interval_secs = config.interval_secs,
        severity_model = ?config.severity_model,
        "dashboard running"
    );

    let settings = LoopSettings {
        interval: config.interval(),
        tick_limit: config.ticks,
        quiet: config.quiet,
    };
    run_loop(&mut dashboard, &mut rng, settings, &shutdown).await;
    dashboard.stop();

    if let Some(dir) = &config.export_dir {
        match export::export_to_dir(dashboard.store(), dir, config.include_log)? {
            ExportOutcome::Written { path, total_records } => {
                println!("Exported {} records to {}", total_records, path.display())
            }
            ExportOutcome::Skipped => warn!("export skipped: database is empty"),
        }
    }

    let counters = dashboard.counters();
    info!(
        total_packets = counters.total_packets,
        attacks_detected = counters.attacks_detected,
        normal_traffic = counters.normal_traffic,
        "shutdown"
    );
    Ok(())
}
