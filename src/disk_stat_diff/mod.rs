use std::path::{Component, Path, PathBuf};

use crate::disk_stat_diff::errors::{Error, Result};
use crate::disk_stat_diff::report::{diff_report, first_run};
use crate::disk_stat_diff::snapshot::SnapshotStore;
use crate::disk_stat_diff::sysfs::resolve_stat_path;

pub mod errors;
pub mod report;
pub mod snapshot;
pub mod sysfs;
pub mod table;

#[cfg(test)]
mod testing;

#[derive(Debug, Clone)]
pub struct Config {
    pub device: String,
    pub dev_dir: PathBuf,
    pub sysfs_dir: PathBuf,
    pub store_dir: PathBuf,
    pub averages: bool,
}

impl Config {
    pub fn new(device: &str) -> Config {
        Config {
            device: device.to_string(),
            dev_dir: PathBuf::from("/dev"),
            sysfs_dir: PathBuf::from("/sys"),
            store_dir: std::env::temp_dir(),
            averages: true,
        }
    }
}

/// The device must be a bare name like `sda1`. Paths such as `/dev/sda1`
/// or `../x` would escape both the dev dir and the snapshot dir.
pub fn check_device_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains('/') => Ok(()),
        _ => Err(Error::Usage(format!(
            "invalid device name {:?}, expected a base name such as `sda1`", name))),
    }
}

/// Stores a first snapshot of the device or, when one exists, prints the
/// difference to it.
pub fn run(config: &Config) -> Result<()> {
    check_device_name(&config.device)?;

    let store = SnapshotStore::new(&config.store_dir);
    log::debug!("snapshot dir {}", store.dir().display());

    let stat_path = resolve_stat_path(&config.dev_dir, &config.sysfs_dir, &config.device)?;

    if store.exists(&config.device) {
        let report = diff_report(&store, &config.device, &stat_path, config.averages)?;
        print!("{}", report);
    } else {
        first_run(&store, &config.device, &stat_path)?;
        println!("Storing stats for the first time.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk_stat_diff::testing::{temp_dir, write_stat, OLD_STAT};

    #[test]
    fn defaults() {
        let config = Config::new("sda1");
        assert_eq!(config.dev_dir, PathBuf::from("/dev"));
        assert_eq!(config.sysfs_dir, PathBuf::from("/sys"));
        assert_eq!(config.store_dir, std::env::temp_dir());
        assert!(config.averages);
    }

    #[test]
    fn unknown_device_stores_nothing() {
        let base = temp_dir();
        let mut config = Config::new("no-such-disk");
        config.store_dir = base.clone();

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }), "{:?}", err);
        assert!(!SnapshotStore::new(&base).dir().exists());

        std::fs::remove_dir_all(base).unwrap();
    }

    #[test]
    fn device_names() {
        for name in ["sda1", "nvme0n1p2", "md127", "dm-0", "null"] {
            assert!(check_device_name(name).is_ok(), "{}", name);
        }
        for name in ["", ".", "..", "../x", "/dev/sda1", "sda1/", "a/b", "./sda1"] {
            let err = check_device_name(name).unwrap_err();
            assert!(matches!(err, Error::Usage(_)), "{}: {:?}", name, err);
        }
    }

    #[test]
    fn path_argument_is_left_alone() {
        let base = temp_dir();
        let user_file = write_stat(&base, OLD_STAT);
        let mut config = Config::new(user_file.to_str().unwrap());
        config.store_dir = base.join("store");

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::Usage(_)), "{:?}", err);
        assert_eq!(std::fs::read_to_string(&user_file).unwrap(), OLD_STAT);
        assert!(!base.join("store").exists());

        std::fs::remove_dir_all(base).unwrap();
    }
}
