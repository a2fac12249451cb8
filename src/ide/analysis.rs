//! AnalysisHost and Analysis - state management for IDE features.
//!
//! The `AnalysisHost` owns the mutable database and hands out `Analysis`
//! snapshots for querying. A snapshot is a cheap `Arc` clone; queries on
//! it stay consistent even while the host applies further edits.
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//! host.set_file_content("/ws/a.proto", "message A {}");
//!
//! let analysis = host.analysis();
//! let file = analysis.file_id("/ws/a.proto").unwrap();
//! let diagnostics = analysis.diagnostics(file);
//! ```

use crate::base::{FileId, LineIndex, TextSize};
use crate::hir::{
    Candidate, Database, Diagnostic, DocumentSource, ImportResolution, Reference, Scope, Snapshot,
    SymbolTable, ValidationConfig,
};
use crate::project::ImportPaths;
use crate::syntax::ast::Document;
use crate::syntax::parser::ParseError;

use super::{CompletionItem, DocumentLink, GotoResult};

/// Owns all mutable state for the IDE layer.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    db: Database,
    validation: ValidationConfig,
}

impl AnalysisHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_import_paths(import_paths: ImportPaths) -> Self {
        Self {
            db: Database::with_import_paths(import_paths),
            validation: ValidationConfig::default(),
        }
    }

    pub fn set_import_paths(&mut self, import_paths: ImportPaths) {
        self.db.set_import_paths(import_paths);
    }

    pub fn set_validation_config(&mut self, config: ValidationConfig) {
        self.validation = config;
    }

    /// Set the content of a file, parsing it and rebuilding its symbol
    /// table. Returns the parse errors.
    pub fn set_file_content(&mut self, path: &str, content: &str) -> Vec<ParseError> {
        self.db.set_text(path, content).1
    }

    /// Set many files at once; they are parsed in parallel.
    pub fn set_files(&mut self, files: Vec<(String, String)>) -> Vec<(FileId, Vec<ParseError>)> {
        self.db.set_texts(files)
    }

    /// Store a document built elsewhere.
    pub fn set_document(&mut self, path: &str, document: Document) -> FileId {
        self.db.set_document(path, document)
    }

    pub fn remove_file(&mut self, path: &str) -> bool {
        self.db.remove(path)
    }

    /// Get a consistent snapshot for querying.
    pub fn analysis(&self) -> Analysis {
        Analysis {
            snapshot: self.db.snapshot(),
            validation: self.validation.clone(),
        }
    }
}

/// An immutable snapshot of the analysis state.
#[derive(Clone, Debug)]
pub struct Analysis {
    snapshot: Snapshot,
    validation: ValidationConfig,
}

impl Analysis {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    // ==================== Files ====================

    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.snapshot.file_id(path)
    }

    pub fn path(&self, file: FileId) -> Option<&str> {
        self.snapshot.path(file)
    }

    pub fn files(&self) -> Vec<FileId> {
        self.snapshot.files()
    }

    pub fn document(&self, file: FileId) -> Option<&Document> {
        self.snapshot.document(file)
    }

    pub fn line_index(&self, file: FileId) -> Option<&LineIndex> {
        self.snapshot.line_index(file)
    }

    pub fn parse_errors(&self, file: FileId) -> &[ParseError] {
        self.snapshot.parse_errors(file)
    }

    // ==================== Resolution ====================

    pub fn symbol_table(&self, file: FileId) -> Option<&SymbolTable> {
        self.snapshot.symbol_table(file)
    }

    pub fn resolve_imports(&self, file: FileId) -> ImportResolution {
        crate::hir::resolve_imports(&self.snapshot, file)
    }

    /// Every statically known reference in `file`.
    pub fn references(&self, file: FileId) -> Vec<Reference> {
        self.document(file)
            .map(|doc| crate::hir::references(file, doc))
            .unwrap_or_default()
    }

    pub fn scope(&self, reference: &Reference) -> Scope {
        crate::hir::get_scope(&self.snapshot, reference)
    }

    pub fn resolve(&self, reference: &Reference) -> Option<Candidate> {
        crate::hir::resolve(&self.snapshot, reference)
    }

    pub fn diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        crate::hir::validate(&self.snapshot, file, &self.validation)
    }

    // ==================== Editor features ====================

    pub fn goto_definition(&self, file: FileId, offset: TextSize) -> GotoResult {
        super::goto_definition(&self.snapshot, file, offset)
    }

    pub fn completions(&self, file: FileId, offset: TextSize) -> Vec<CompletionItem> {
        super::completions(&self.snapshot, file, offset)
    }

    pub fn document_links(&self, file: FileId) -> Vec<DocumentLink> {
        super::document_links(&self.snapshot, file)
    }
}
