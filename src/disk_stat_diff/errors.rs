use std::io;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("{}: no such file or device", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: permission denied", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn io(path: &Path, err: io::Error) -> Error {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound { path },
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { path },
            _ => Error::Io { path, source: err },
        }
    }

    pub fn errno(path: &Path, errno: Errno) -> Error {
        match errno {
            Errno::ENOENT | Errno::ENODEV => Error::NotFound { path: path.to_path_buf() },
            Errno::EACCES | Errno::EPERM => Error::PermissionDenied { path: path.to_path_buf() },
            other => Error::io(path, io::Error::from(other)),
        }
    }

    pub fn parse(path: &Path, message: impl Into<String>) -> Error {
        Error::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
