// Background collection worker: one disk snapshot per interval tick.
// A failed cycle is logged and the next tick proceeds untouched.

use crate::disk::DiskCollector;
use crate::sink::Sink;
use std::sync::Arc;
use tokio::time::{Duration, interval};

/// Collector, sink, and shutdown for the worker.
pub struct WorkerDeps {
    pub collector: DiskCollector,
    pub sink: Arc<dyn Sink>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config. Stats logging uses real-time intervals,
/// independent of collect_interval_ms.
pub struct WorkerConfig {
    pub collect_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        collector,
        sink,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        collect_interval_ms,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(collect_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut cycles_total: u64 = 0;
        let mut failed_cycles_total: u64 = 0;

        let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", collect_interval_ms);
        let _guard = worker_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    cycles_total += 1;
                    if let Err(e) = collector.collect(sink.as_ref()).await {
                        failed_cycles_total += 1;
                        tracing::warn!(
                            error = %e,
                            operation = "collect",
                            "disk collection cycle failed"
                        );
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        cycles_total,
                        failed_cycles_total,
                        "app stats"
                    );
                }
            }
        }
    })
}
