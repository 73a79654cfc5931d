use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use nix::sys::stat::stat;

use crate::disk_stat_diff::errors::{Error, Result};

/// Size of the unit the kernel reports `*_sectors` in, regardless of the
/// device's physical sector size.
pub const SECTOR_SIZE: u64 = 512;

/// Number of counters every stat line must carry (kernel 5.5+ layout).
pub const STAT_FIELDS: usize = 17;

pub fn major(dev: u64) -> u64 {
    ((dev >> 32) & 0xffff_f000) | ((dev >> 8) & 0x0000_0fff)
}

pub fn minor(dev: u64) -> u64 {
    ((dev >> 12) & 0xffff_ff00) | (dev & 0x0000_00ff)
}

pub fn stat_path(sysfs_dir: &Path, major: u64, minor: u64) -> PathBuf {
    sysfs_dir
        .join("dev/block")
        .join(format!("{}:{}", major, minor))
        .join("stat")
}

/// Maps `<dev_dir>/<name>` to the stat file of the block device behind it.
pub fn resolve_stat_path(dev_dir: &Path, sysfs_dir: &Path, name: &str) -> Result<PathBuf> {
    let device_path = dev_dir.join(name);
    let file_stat = stat(&device_path).map_err(|errno| Error::errno(&device_path, errno))?;

    let rdev = file_stat.st_rdev as u64;
    let path = stat_path(sysfs_dir, major(rdev), minor(rdev));
    log::debug!("resolved {} ({}:{}) to {}",
                device_path.display(), major(rdev), minor(rdev), path.display());
    Ok(path)
}

/// Cumulative I/O counters of one block device.
///
/// See https://www.kernel.org/doc/html/latest/block/stat.html
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub read_ios: u64,
    pub read_merges: u64,
    pub read_sectors: u64,
    pub read_ticks: u64,
    pub write_ios: u64,
    pub write_merges: u64,
    pub write_sectors: u64,
    pub write_ticks: u64,
    // instantaneous, not a counter
    pub in_flight: u64,
    pub io_ticks: u64,
    pub time_in_queue: u64,
    pub discard_ios: u64,
    pub discard_merges: u64,
    pub discard_sectors: u64,
    pub discard_ticks: u64,
    pub flush_ios: u64,
    pub flush_ticks: u64,

    pub read_bytes: u64,
    pub write_bytes: u64,
    pub discard_bytes: u64,
}

impl DeviceStats {
    /// Parses the whitespace separated counters of a stat file. Tokens past
    /// the 17th are ignored.
    pub fn parse(content: &str) -> std::result::Result<DeviceStats, String> {
        let mut values = [0u64; STAT_FIELDS];
        let mut tokens = content.split_whitespace();

        for (index, value) in values.iter_mut().enumerate() {
            let token = tokens.next().ok_or_else(|| {
                format!("expected {} fields, found {}", STAT_FIELDS, index)
            })?;
            *value = token.parse().map_err(|e| {
                format!("field {} ({:?}): {}", index + 1, token, e)
            })?;
        }

        let [read_ios, read_merges, read_sectors, read_ticks,
        write_ios, write_merges, write_sectors, write_ticks,
        in_flight, io_ticks, time_in_queue,
        discard_ios, discard_merges, discard_sectors, discard_ticks,
        flush_ios, flush_ticks] = values;

        Ok(DeviceStats {
            read_ios,
            read_merges,
            read_sectors,
            read_ticks,
            write_ios,
            write_merges,
            write_sectors,
            write_ticks,
            in_flight,
            io_ticks,
            time_in_queue,
            discard_ios,
            discard_merges,
            discard_sectors,
            discard_ticks,
            flush_ios,
            flush_ticks,
            read_bytes: read_sectors.saturating_mul(SECTOR_SIZE),
            write_bytes: write_sectors.saturating_mul(SECTOR_SIZE),
            discard_bytes: discard_sectors.saturating_mul(SECTOR_SIZE),
        })
    }

    /// Every field by name, raw counters in kernel order followed by the
    /// derived byte counts.
    pub fn fields(&self) -> [(&'static str, u64); 20] {
        [
            ("read_ios", self.read_ios),
            ("read_merges", self.read_merges),
            ("read_sectors", self.read_sectors),
            ("read_ticks", self.read_ticks),
            ("write_ios", self.write_ios),
            ("write_merges", self.write_merges),
            ("write_sectors", self.write_sectors),
            ("write_ticks", self.write_ticks),
            ("in_flight", self.in_flight),
            ("io_ticks", self.io_ticks),
            ("time_in_queue", self.time_in_queue),
            ("discard_ios", self.discard_ios),
            ("discard_merges", self.discard_merges),
            ("discard_sectors", self.discard_sectors),
            ("discard_ticks", self.discard_ticks),
            ("flush_ios", self.flush_ios),
            ("flush_ticks", self.flush_ticks),
            ("read_bytes", self.read_bytes),
            ("write_bytes", self.write_bytes),
            ("discard_bytes", self.discard_bytes),
        ]
    }
}

pub fn read_device_stats(path: &Path) -> Result<DeviceStats> {
    let content = read_to_string(path).map_err(|e| Error::io(path, e))?;
    let stats = DeviceStats::parse(&content).map_err(|message| Error::parse(path, message))?;
    log::debug!("parsed {}: {:?}", path.display(), stats);
    Ok(stats)
}
