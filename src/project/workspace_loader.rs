use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::file_loader::{self, LoadError};
use crate::ide::AnalysisHost;

/// Loads `.proto` files from disk into an [`AnalysisHost`].
#[derive(Debug, Default)]
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every `.proto` file under `path`. Files are read in parallel
    /// and published to the host in one update.
    ///
    /// Files that fail to read are skipped; the rest still load, and the
    /// failures are returned together as [`LoadError::Multiple`].
    pub fn load_directory_into_host<P: AsRef<Path>>(&self, path: P, host: &mut AnalysisHost) -> Result<usize, LoadError> {
        let paths = file_loader::collect_file_paths(path.as_ref())?;

        let results: Vec<(PathBuf, Result<String, LoadError>)> = paths
            .into_par_iter()
            .map(|path| {
                let text = file_loader::load_file(&path);
                (path, text)
            })
            .collect();

        let mut loaded = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for (path, result) in results {
            match result {
                Ok(text) => loaded.push((path.to_string_lossy().into_owned(), text)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load file");
                    errors.push(e);
                }
            }
        }

        let count = loaded.len();
        host.set_files(loaded);

        if errors.is_empty() {
            Ok(count)
        } else {
            Err(LoadError::Multiple(errors))
        }
    }

    /// Load a single file.
    pub fn load_file_into_host<P: AsRef<Path>>(&self, path: P, host: &mut AnalysisHost) -> Result<(), LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let text = file_loader::load_file(path)?;
        host.set_file_content(&path.to_string_lossy(), &text);
        Ok(())
    }
}
