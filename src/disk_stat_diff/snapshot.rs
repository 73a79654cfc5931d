use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::disk_stat_diff::errors::{Error, Result};
use crate::disk_stat_diff::sysfs::{read_device_stats, DeviceStats};

pub const STORE_DIR_NAME: &str = "disk-stat-diff";

/// Keeps the last raw stat content of each device under
/// `<base>/disk-stat-diff/<device>`. The file's mtime is the time the
/// snapshot was taken.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(base_dir: &Path) -> SnapshotStore {
        SnapshotStore {
            dir: base_dir.join(STORE_DIR_NAME),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, device: &str) -> PathBuf {
        self.dir.join(device)
    }

    pub fn exists(&self, device: &str) -> bool {
        self.path(device).is_file()
    }

    pub fn last_modified(&self, device: &str) -> Result<SystemTime> {
        let path = self.path(device);
        fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| Error::io(&path, e))
    }

    /// Copies `stat_path` verbatim over the device's snapshot. The previous
    /// snapshot is gone afterwards.
    pub fn store(&self, stat_path: &Path, device: &str) -> Result<()> {
        let content = fs::read(stat_path).map_err(|e| Error::io(stat_path, e))?;

        create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let path = self.path(device);
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        log::debug!("stored {} to {}", stat_path.display(), path.display());
        Ok(())
    }

    pub fn load(&self, device: &str) -> Result<DeviceStats> {
        read_device_stats(&self.path(device))
    }
}
