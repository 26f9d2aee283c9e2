// Disk usage collector: mount table snapshot -> tagged "disk" gauge records

use crate::config::DiskConfig;
use crate::models::FieldValue;
use crate::mounts_repo::{self, DiskUsage, MountPartition, MountsRepo};
use crate::sink::Sink;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Raw mount option tokens for one partition, classified into a coarse
/// access mode.
pub struct MountOptions<'a>(&'a [String]);

impl<'a> MountOptions<'a> {
    pub fn new(opts: &'a [String]) -> Self {
        Self(opts)
    }

    /// `"rw"` wins over `"ro"`; anything else (including no options at all)
    /// is `"unknown"`.
    pub fn mode(&self) -> &'static str {
        if self.exists("rw") {
            "rw"
        } else if self.exists("ro") {
            "ro"
        } else {
            "unknown"
        }
    }

    fn exists(&self, opt: &str) -> bool {
        self.0.iter().any(|o| o == opt)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The mount table snapshot could not be taken; the whole cycle is
    /// abandoned, nothing partial is emitted.
    #[error("error getting disk usage info: {0}")]
    SnapshotUnavailable(#[source] anyhow::Error),
}

/// Gathers one `disk` gauge per real mounted filesystem. Holds only its
/// filter configuration; safe to call from concurrent contexts as long as
/// the repo is.
pub struct DiskCollector {
    config: DiskConfig,
    mounts: Arc<MountsRepo>,
}

impl DiskCollector {
    pub fn new(config: DiskConfig, mounts: Arc<MountsRepo>) -> Self {
        Self { config, mounts }
    }

    /// One best-effort snapshot per invocation. Retry policy, if any,
    /// belongs to the caller.
    pub async fn collect(&self, sink: &dyn Sink) -> Result<(), CollectError> {
        let (usage, partitions) = self
            .mounts
            .disk_usage(
                &self.config.mount_points,
                &self.config.ignore_mount_opts,
                &self.config.ignore_fs,
            )
            .await
            .map_err(CollectError::SnapshotUnavailable)?;
        emit_records(&usage, &partitions, mounts_repo::label_for, sink);
        Ok(())
    }
}

/// Turn index-aligned usage/partition pairs into `disk` records. Public so
/// tests can drive it with fabricated entries and a fake label resolver.
pub fn emit_records(
    usage: &[DiskUsage],
    partitions: &[MountPartition],
    label_for: impl Fn(&str) -> Option<String>,
    sink: &dyn Sink,
) {
    for (du, part) in usage.iter().zip(partitions) {
        if du.total == 0 {
            // Skip dummy filesystems (procfs, cgroupfs, ...)
            continue;
        }

        let device = part.device.replace("/dev/", "");
        let mut tags = BTreeMap::from([
            ("path".to_string(), du.path.clone()),
            ("device".to_string(), device),
            ("fstype".to_string(), du.fstype.clone()),
            ("mode".to_string(), MountOptions::new(&part.opts).mode().to_string()),
        ]);

        let bare = part.device.strip_prefix("/dev/").unwrap_or(&part.device);
        if let Some(label) = label_for(bare).filter(|l| !l.is_empty()) {
            tags.insert("label".to_string(), label);
        }

        let used_percent = if du.used + du.free > 0 {
            du.used as f64 / (du.used as f64 + du.free as f64) * 100.0
        } else {
            0.0
        };
        let inodes_used_percent = if du.inodes_used + du.inodes_free > 0 {
            du.inodes_used as f64 / (du.inodes_used as f64 + du.inodes_free as f64) * 100.0
        } else {
            0.0
        };

        let fields = BTreeMap::from([
            ("total".to_string(), FieldValue::from(du.total)),
            ("free".to_string(), FieldValue::from(du.free)),
            ("used".to_string(), FieldValue::from(du.used)),
            ("used_percent".to_string(), FieldValue::from(used_percent)),
            ("inodes_total".to_string(), FieldValue::from(du.inodes_total)),
            ("inodes_free".to_string(), FieldValue::from(du.inodes_free)),
            ("inodes_used".to_string(), FieldValue::from(du.inodes_used)),
            (
                "inodes_used_percent".to_string(),
                FieldValue::from(inodes_used_percent),
            ),
        ]);

        sink.add_gauge("disk", fields, tags);
    }
}
