use std::fs::{self, create_dir_all, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

pub const OLD_STAT: &str = "     100        0     2000       50      200        0     4000       80        0       10       20        0        0        0        0        0        0\n";
pub const NEW_STAT: &str = "     150        0     3000       60      250        0     5000       90        0       12       25        0        0        0        0        0        0\n";

fn random_string(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
}

/// Fresh scratch directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let path = std::env::temp_dir().join(format!("disk-stat-diff-test-{}", random_string(16)));
    create_dir_all(&path).unwrap();
    path
}

pub fn write_stat(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("stat");
    fs::write(&path, content).unwrap();
    path
}

pub fn set_mtime(path: &Path, mtime: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(mtime).unwrap();
}

pub fn backdate(path: &Path, secs: u64) {
    set_mtime(path, SystemTime::now() - Duration::from_secs(secs));
}
