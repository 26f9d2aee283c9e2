// Mount table snapshots via /proc and statvfs

mod linux;

pub use linux::label_for;

use std::collections::HashSet;
use tracing::instrument;

/// Usage counters for one mounted filesystem, sampled at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub path: String,
    pub fstype: String,
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub inodes_total: u64,
    pub inodes_free: u64,
    pub inodes_used: u64,
}

/// One mount table entry: device, mount point, type, raw option tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPartition {
    pub device: String,
    pub mount_point: String,
    pub fstype: String,
    pub opts: Vec<String>,
}

/// Snapshot provider over the kernel mount table. Holds no state between
/// calls; every `disk_usage` invocation reads the table fresh.
#[derive(Default)]
pub struct MountsRepo;

impl MountsRepo {
    pub fn new() -> Self {
        Self
    }

    /// Returns two index-aligned vectors: usage counters and the mount table
    /// entry they were sampled from. Filters are applied before any statvfs
    /// call; a mount whose statvfs fails is skipped, never fatal.
    #[instrument(skip(self), fields(repo = "mounts", operation = "disk_usage"))]
    pub async fn disk_usage(
        &self,
        mount_points: &[String],
        ignore_mount_opts: &[String],
        ignore_fs: &[String],
    ) -> anyhow::Result<(Vec<DiskUsage>, Vec<MountPartition>)> {
        let mount_points = mount_points.to_vec();
        let ignore_mount_opts = ignore_mount_opts.to_vec();
        let ignore_fs = ignore_fs.to_vec();
        tokio::task::spawn_blocking(move || {
            let table = linux::read_mount_table()?;
            let partitions = parse_mount_table(&table);
            let partitions = apply_filters(partitions, &mount_points, &ignore_mount_opts, &ignore_fs);

            let mut usage = Vec::with_capacity(partitions.len());
            let mut kept = Vec::with_capacity(partitions.len());
            for part in partitions {
                match linux::usage_for(&part.mount_point, &part.fstype) {
                    Some(du) => {
                        usage.push(du);
                        kept.push(part);
                    }
                    None => {
                        tracing::debug!(
                            mount_point = %part.mount_point,
                            "statvfs failed; skipping mount"
                        );
                    }
                }
            }
            Ok((usage, kept))
        })
        .await
        .map_err(|e| anyhow::anyhow!("mounts task join: {}", e))?
    }
}

/// Parse the full mount table text into partition entries. Lines that do not
/// carry at least device, mount point, type and options are ignored.
fn parse_mount_table(table: &str) -> Vec<MountPartition> {
    table.lines().filter_map(parse_mount_line).collect()
}

fn parse_mount_line(line: &str) -> Option<MountPartition> {
    let mut parts = line.split_whitespace();
    let device = decode_mount_field(parts.next()?);
    let mount_point = decode_mount_field(parts.next()?);
    let fstype = parts.next()?.to_string();
    let opts = parts
        .next()?
        .split(',')
        .map(|o| o.to_string())
        .collect::<Vec<_>>();
    Some(MountPartition {
        device,
        mount_point,
        fstype,
        opts,
    })
}

/// The kernel escapes space, tab, newline and backslash as octal (`\040`
/// etc.) in /proc mount fields.
fn decode_mount_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let digits: String = chars.clone().take(3).collect();
        if digits.len() == 3
            && let Ok(code) = u8::from_str_radix(&digits, 8)
        {
            out.push(code as char);
            chars.nth(2);
        } else {
            out.push(c);
        }
    }
    out
}

/// Mount-point allowlist, fstype and mount-option denylists, plus duplicate
/// suppression for bind mounts that repeat a (device, path) pair.
fn apply_filters(
    partitions: Vec<MountPartition>,
    mount_points: &[String],
    ignore_mount_opts: &[String],
    ignore_fs: &[String],
) -> Vec<MountPartition> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    partitions
        .into_iter()
        .filter(|p| mount_points.is_empty() || mount_points.contains(&p.mount_point))
        .filter(|p| !ignore_fs.contains(&p.fstype))
        .filter(|p| !p.opts.iter().any(|o| ignore_mount_opts.contains(o)))
        .filter(|p| seen.insert((p.device.clone(), p.mount_point.clone())))
        .collect()
}
