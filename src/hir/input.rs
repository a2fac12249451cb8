//! The set of loaded documents, by path.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::base::FileId;

/// Every document currently loaded, with its normalized path.
///
/// Iteration follows load order. The reverse map serves import lookup,
/// which compares candidate paths against what is loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceRoot {
    files: IndexMap<FileId, Arc<str>>,
    by_path: FxHashMap<Arc<str>, FileId>,
}

impl SourceRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: FileId, path: impl Into<Arc<str>>) {
        let path = path.into();
        if let Some(old) = self.files.insert(file, path.clone()) {
            self.by_path.remove(&old);
        }
        self.by_path.insert(path, file);
    }

    pub fn remove(&mut self, file: FileId) -> Option<Arc<str>> {
        let path = self.files.shift_remove(&file)?;
        self.by_path.remove(&path);
        Some(path)
    }

    pub fn path(&self, file: FileId) -> Option<&str> {
        self.files.get(&file).map(|s| s.as_ref())
    }

    /// The loaded document at exactly `path`.
    pub fn file(&self, path: &str) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    pub fn contains(&self, file: FileId) -> bool {
        self.files.contains_key(&file)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &str)> + '_ {
        self.files.iter().map(|(&id, path)| (id, path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
