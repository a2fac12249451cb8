//! Reading `.proto` files from disk.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

pub const PROTO_EXTENSION: &str = "proto";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a .proto file: {}", .0.display())]
    NotProto(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to load {} file(s)", .0.len())]
    Multiple(Vec<LoadError>),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub fn is_proto_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PROTO_EXTENSION)
}

/// All `.proto` files under `dir`, sorted by path.
pub fn collect_file_paths(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotFound(dir.to_path_buf()));
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_proto_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    tracing::debug!(dir = %dir.display(), files = paths.len(), "collected proto files");
    Ok(paths)
}

/// Read one `.proto` file.
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    if !is_proto_file(path) {
        return Err(LoadError::NotProto(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))
}
