//! Stable path → [`FileId`] assignment.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::base::FileId;

/// Hands out one `FileId` per path, for the lifetime of the database.
///
/// Ids are never reused: removing a document and loading it again gives
/// it the id it had before, so references held across the edit stay
/// meaningful.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    path_to_id: FxHashMap<Arc<str>, FileId>,
    next_id: u32,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the id for `path`.
    pub fn file_id(&self, path: &str) -> FileId {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        let mut inner = self.inner.write();
        // another writer may have assigned it in between
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(Arc::from(path), id);
        id
    }

    /// The id of `path`, without assigning one.
    pub fn get(&self, path: &str) -> Option<FileId> {
        self.inner.read().path_to_id.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
