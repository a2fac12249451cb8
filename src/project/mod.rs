//! Project-level concerns: import path configuration and loading files
//! from disk.

pub mod config;
pub mod file_loader;
pub mod workspace_loader;

pub use config::{ImportPaths, normalize_path, strip_scheme};
pub use file_loader::{LoadError, collect_file_paths, load_file};
pub use workspace_loader::WorkspaceLoader;
