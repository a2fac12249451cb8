//! Document database and snapshots.
//!
//! The [`Database`] owns every loaded document together with its symbol
//! table. All state lives in one `Arc<DbState>`; an edit builds the new
//! symbol table without holding any lock, then swaps in a new state under
//! a short write lock. Readers work on a [`Snapshot`], an `Arc` clone of
//! one state, so they see either the old or the new table and never a
//! half-applied edit.

use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::input::SourceRoot;
use super::source::FileSet;
use super::symbols::SymbolTable;
use crate::base::{FileId, LineIndex};
use crate::project::{ImportPaths, normalize_path};
use crate::syntax::ast::Document;
use crate::syntax::parser::{ParseError, parse};

// ============================================================================
// DOCUMENT SOURCE
// ============================================================================

/// Read access to already-built documents.
///
/// Everything in `hir` that looks across documents goes through this
/// trait; none of it triggers a rebuild or touches the file system.
pub trait DocumentSource {
    fn document(&self, file: FileId) -> Option<&Document>;

    fn symbol_table(&self, file: FileId) -> Option<&SymbolTable>;

    /// The loaded document an import of `uri` in `from` refers to.
    fn locate(&self, uri: &str, from: FileId) -> Option<FileId>;
}

// ============================================================================
// STATE
// ============================================================================

/// Everything known about one loaded document.
#[derive(Clone, Debug)]
pub struct FileData {
    pub document: Arc<Document>,
    pub symbols: Arc<SymbolTable>,
    /// Present when the document was loaded from text.
    pub line_index: Option<Arc<LineIndex>>,
    pub parse_errors: Arc<[ParseError]>,
}

impl FileData {
    fn build(file: FileId, document: Document, text: Option<&str>, parse_errors: Vec<ParseError>) -> Self {
        let symbols = SymbolTable::build(file, &document);
        Self {
            document: Arc::new(document),
            symbols: Arc::new(symbols),
            line_index: text.map(|t| Arc::new(LineIndex::new(t))),
            parse_errors: parse_errors.into(),
        }
    }

    fn parse(file: FileId, text: &str) -> Self {
        let parse = parse(text);
        Self::build(file, parse.document, Some(text), parse.errors)
    }
}

#[derive(Clone, Debug, Default)]
struct DbState {
    root: SourceRoot,
    files: FxHashMap<FileId, FileData>,
    import_paths: ImportPaths,
    revision: u64,
}

// ============================================================================
// DATABASE
// ============================================================================

#[derive(Debug, Default)]
pub struct Database {
    ids: FileSet,
    state: RwLock<Arc<DbState>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_import_paths(import_paths: ImportPaths) -> Self {
        let db = Self::new();
        db.set_import_paths(import_paths);
        db
    }

    pub fn set_import_paths(&self, import_paths: ImportPaths) {
        self.update(|state| state.import_paths = import_paths);
    }

    /// The stable id for `path`, assigned on first use.
    pub fn file_id(&self, path: &str) -> FileId {
        self.ids.file_id(&normalize_path(path))
    }

    /// Parse `text` as the new content of `path`.
    pub fn set_text(&self, path: &str, text: &str) -> (FileId, Vec<ParseError>) {
        let path = normalize_path(path);
        let file = self.ids.file_id(&path);
        let data = FileData::parse(file, text);
        let errors = data.parse_errors.to_vec();
        tracing::debug!(file = %file, path = %path, errors = errors.len(), "document updated");
        self.update(|state| {
            state.root.insert(file, path.as_str());
            state.files.insert(file, data);
        });
        (file, errors)
    }

    /// Store an already-built document under `path`.
    pub fn set_document(&self, path: &str, document: Document) -> FileId {
        let path = normalize_path(path);
        let file = self.ids.file_id(&path);
        let data = FileData::build(file, document, None, Vec::new());
        tracing::debug!(file = %file, path = %path, "document replaced");
        self.update(|state| {
            state.root.insert(file, path.as_str());
            state.files.insert(file, data);
        });
        file
    }

    /// Parse many documents in parallel and publish them in one swap.
    pub fn set_texts(&self, files: Vec<(String, String)>) -> Vec<(FileId, Vec<ParseError>)> {
        let prepared: Vec<_> = files
            .into_iter()
            .map(|(path, text)| {
                let path = normalize_path(&path);
                let file = self.ids.file_id(&path);
                (file, path, text)
            })
            .collect();

        let built: Vec<_> = prepared
            .par_iter()
            .map(|(file, _, text)| FileData::parse(*file, text))
            .collect();

        let report = prepared
            .iter()
            .zip(&built)
            .map(|((file, _, _), data)| (*file, data.parse_errors.to_vec()))
            .collect();

        tracing::debug!(documents = prepared.len(), "bulk load");
        self.update(|state| {
            for ((file, path, _), data) in prepared.into_iter().zip(built) {
                state.root.insert(file, path);
                state.files.insert(file, data);
            }
        });
        report
    }

    /// Unload `path`. Returns whether it was loaded.
    pub fn remove(&self, path: &str) -> bool {
        let Some(file) = self.ids.get(&normalize_path(path)) else {
            return false;
        };
        let mut removed = false;
        self.update(|state| {
            state.root.remove(file);
            removed = state.files.remove(&file).is_some();
        });
        if removed {
            tracing::debug!(file = %file, "document removed");
        }
        removed
    }

    /// A consistent, immutable view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.read().clone(),
        }
    }

    /// Copy-on-write swap. The closure runs under the write lock, so it
    /// must only move already-built data into place.
    fn update(&self, apply: impl FnOnce(&mut DbState)) {
        let mut guard = self.state.write();
        let mut next = DbState::clone(&guard);
        apply(&mut next);
        next.revision += 1;
        *guard = Arc::new(next);
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// One immutable state of the database.
#[derive(Clone, Debug)]
pub struct Snapshot {
    state: Arc<DbState>,
}

impl Snapshot {
    /// Increases with every applied edit.
    pub fn revision(&self) -> u64 {
        self.state.revision
    }

    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.state.root.file(&normalize_path(path))
    }

    pub fn path(&self, file: FileId) -> Option<&str> {
        self.state.root.path(file)
    }

    /// Loaded documents in load order.
    pub fn files(&self) -> Vec<FileId> {
        self.state.root.iter().map(|(file, _)| file).collect()
    }

    pub fn file_data(&self, file: FileId) -> Option<&FileData> {
        self.state.files.get(&file)
    }

    /// Shared handle to a symbol table, for callers that outlive the snapshot.
    pub fn symbol_table_arc(&self, file: FileId) -> Option<Arc<SymbolTable>> {
        self.file_data(file).map(|d| d.symbols.clone())
    }

    pub fn line_index(&self, file: FileId) -> Option<&LineIndex> {
        self.file_data(file)?.line_index.as_deref()
    }

    pub fn parse_errors(&self, file: FileId) -> &[ParseError] {
        self.file_data(file).map(|d| &*d.parse_errors).unwrap_or(&[])
    }

    pub fn import_paths(&self) -> &ImportPaths {
        &self.state.import_paths
    }

    pub fn len(&self) -> usize {
        self.state.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.files.is_empty()
    }
}

impl DocumentSource for Snapshot {
    fn document(&self, file: FileId) -> Option<&Document> {
        self.file_data(file).map(|d| &*d.document)
    }

    fn symbol_table(&self, file: FileId) -> Option<&SymbolTable> {
        self.file_data(file).map(|d| &*d.symbols)
    }

    fn locate(&self, uri: &str, from: FileId) -> Option<FileId> {
        let importer = self.path(from)?;
        let found = self
            .state
            .import_paths
            .candidates(uri, importer)
            .iter()
            .find_map(|candidate| self.state.root.file(candidate));
        tracing::trace!(uri, from = %from, found = ?found, "locate import");
        found
    }
}
