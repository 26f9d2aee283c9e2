// Linux-specific helpers: /proc mount table, statvfs counters, volume labels.

use super::DiskUsage;

/// Read the raw mount table for the current process.
pub(super) fn read_mount_table() -> anyhow::Result<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/self/mounts")
            .map_err(|e| anyhow::anyhow!("reading /proc/self/mounts: {}", e))
    }
    #[cfg(not(target_os = "linux"))]
    {
        anyhow::bail!("mount table enumeration is only supported on linux")
    }
}

/// Sample byte and inode counters for one mount point. `None` means the
/// statvfs call failed (stale mount, permission) and the entry is skipped.
pub(super) fn usage_for(mount_point: &str, fstype: &str) -> Option<DiskUsage> {
    #[cfg(target_os = "linux")]
    {
        let stat = nix::sys::statvfs::statvfs(mount_point).ok()?;
        let frsize = stat.fragment_size() as u64;
        let total = stat.blocks() as u64 * frsize;
        // free is the space available to unprivileged users; used counts
        // reserved blocks, so used + free may be less than total.
        let free = stat.blocks_available() as u64 * frsize;
        let used = (stat.blocks() as u64).saturating_sub(stat.blocks_free() as u64) * frsize;
        let inodes_total = stat.files() as u64;
        let inodes_free = stat.files_free() as u64;
        Some(DiskUsage {
            path: mount_point.to_string(),
            fstype: fstype.to_string(),
            total,
            free,
            used,
            inodes_total,
            inodes_free,
            inodes_used: inodes_total.saturating_sub(inodes_free),
        })
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = (mount_point, fstype);
        None
    }
}

/// Best-effort volume label lookup for a bare device name ("sda1"): scan the
/// /dev/disk/by-label symlinks and return the name of the one pointing at the
/// device. Any I/O failure means "no label".
pub fn label_for(device_name: &str) -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let entries = std::fs::read_dir("/dev/disk/by-label").ok()?;
        for entry in entries.flatten() {
            let target = std::fs::read_link(entry.path()).ok()?;
            if target.file_name().and_then(|n| n.to_str()) == Some(device_name) {
                let label = entry.file_name().to_string_lossy().into_owned();
                return Some(decode_label(&label)).filter(|l| !l.is_empty());
            }
        }
        None
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = device_name;
        None
    }
}

/// udev encodes reserved characters in by-label names as `\xNN` hex escapes.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn decode_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' || chars.peek() != Some(&'x') {
            out.push(c);
            continue;
        }
        let digits: String = chars.clone().skip(1).take(2).collect();
        if digits.len() == 2
            && let Ok(code) = u8::from_str_radix(&digits, 16)
        {
            out.push(code as char);
            chars.nth(2);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_label_passes_plain_names_through() {
        assert_eq!(decode_label("DATA"), "DATA");
    }

    #[test]
    fn decode_label_unescapes_hex_sequences() {
        assert_eq!(decode_label("My\\x20Disk"), "My Disk");
        assert_eq!(decode_label("a\\x2fb"), "a/b");
    }

    #[test]
    fn decode_label_leaves_malformed_escapes_alone() {
        assert_eq!(decode_label("oops\\xzz"), "oops\\xzz");
        assert_eq!(decode_label("tail\\x2"), "tail\\x2");
    }
}
