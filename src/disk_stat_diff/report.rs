use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::disk_stat_diff::errors::Result;
use crate::disk_stat_diff::snapshot::SnapshotStore;
use crate::disk_stat_diff::sysfs::DeviceStats;
use crate::disk_stat_diff::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct DiffRow {
    pub name: &'static str,
    pub value: u64,
    pub delta: i64,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub elapsed: Duration,
    pub rows: Vec<DiffRow>,
}

fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // -0.0 would print as "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn delta(old: u64, new: u64) -> i64 {
    let delta = i128::from(new) - i128::from(old);
    delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Per field change from `old` to `new`. Averages are only filled in when
/// `elapsed` is non-zero.
pub fn diff(old: &DeviceStats, new: &DeviceStats, elapsed: Option<Duration>) -> Vec<DiffRow> {
    let secs = elapsed.map(|e| e.as_secs_f64()).filter(|secs| *secs > 0.0);

    old.fields()
        .iter()
        .zip(new.fields().iter())
        .map(|(&(_, old), &(name, new))| {
            let delta = delta(old, new);
            DiffRow {
                name,
                value: new,
                delta,
                average: secs.map(|secs| round2(delta as f64 / secs)),
            }
        })
        .collect()
}

impl Report {
    pub fn has_averages(&self) -> bool {
        self.rows.iter().any(|row| row.average.is_some())
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.push_column("stat", self.rows.iter().map(|row| row.name));
        table.push_column("diff", self.rows.iter().map(|row| row.delta));
        if self.has_averages() {
            table.push_column("avg", self.rows.iter().map(|row| {
                format!("{:.2}", row.average.unwrap_or(0.0))
            }));
        }
        table
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Difference over the past {:.2} second(s).", self.elapsed.as_secs_f64())?;
        write!(f, "{}", self.table())
    }
}

/// Diffs the live stats at `stat_path` against the device's snapshot and
/// replaces the snapshot with the live content.
pub fn diff_report(store: &SnapshotStore, device: &str, stat_path: &Path, averages: bool) -> Result<Report> {
    let taken_at = store.last_modified(device)?;
    let old = store.load(device)?;

    store.store(stat_path, device)?;
    let new = store.load(device)?;

    let elapsed = SystemTime::now().duration_since(taken_at).unwrap_or_else(|e| {
        log::warn!("snapshot of {} is {:?} in the future", device, e.duration());
        Duration::ZERO
    });
    log::debug!("snapshot of {} is {:?} old", device, elapsed);

    if averages && elapsed.is_zero() {
        log::debug!("no time elapsed, skipping averages");
    }

    let rows = diff(&old, &new, Some(elapsed).filter(|_| averages));
    for row in &rows {
        log::debug!("{}: {} ({:+})", row.name, row.value, row.delta);
    }

    Ok(Report { elapsed, rows })
}

/// Captures the first snapshot of a device.
pub fn first_run(store: &SnapshotStore, device: &str, stat_path: &Path) -> Result<()> {
    store.store(stat_path, device)
}
