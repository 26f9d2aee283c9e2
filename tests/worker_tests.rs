// Worker integration test: spawn, tick against the live mount table, shutdown

use metricsd::config::DiskConfig;
use metricsd::disk::DiskCollector;
use metricsd::mounts_repo::MountsRepo;
use metricsd::sink::RecordingSink;
use metricsd::worker::{WorkerConfig, WorkerDeps, spawn};
use std::sync::Arc;

#[tokio::test]
async fn worker_ticks_and_shuts_down_cleanly() {
    let sink = Arc::new(RecordingSink::new());
    let collector = DiskCollector::new(DiskConfig::default(), Arc::new(MountsRepo::new()));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            collector,
            sink: sink.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            collect_interval_ms: 25,
            stats_log_interval_secs: 3600,
        },
    );

    tokio::time::sleep(tokio::time::Duration::from_millis(150)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    // A real Linux host always has at least one mount with nonzero capacity.
    #[cfg(target_os = "linux")]
    assert!(
        !sink.is_empty(),
        "worker should have emitted at least one disk record"
    );

    for record in sink.records() {
        assert_eq!(record.measurement, "disk");
        assert!(record.tags.contains_key("path"));
        assert!(record.tags.contains_key("mode"));
        assert!(!record.tags.get("device").unwrap().contains("/dev/"));
    }
}

#[tokio::test]
async fn worker_respects_mount_point_filter() {
    let sink = Arc::new(RecordingSink::new());
    let config = DiskConfig {
        mount_points: vec!["/nonexistent-mount-point".to_string()],
        ..Default::default()
    };
    let collector = DiskCollector::new(config, Arc::new(MountsRepo::new()));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            collector,
            sink: sink.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            collect_interval_ms: 25,
            stats_log_interval_secs: 3600,
        },
    );

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    assert!(sink.is_empty(), "filtered collection should emit nothing");
}
