//! Semantic layer: symbol tables, import graph, scopes and validation.
//!
//! ```text
//! Document ──▶ SymbolTable (per file, symbols.rs)
//!                 │
//! imports ──▶ ImportResolution (visible files + distances, imports.rs)
//!                 │
//! Reference ──▶ Scope (nearest-wins union, scope.rs)
//!                 │
//!             Diagnostics (validate.rs)
//! ```
//!
//! Everything cross-document reads through [`DocumentSource`], which a
//! database [`Snapshot`] implements.

mod db;
mod diagnostics;
mod ids;
mod imports;
mod input;
mod scope;
mod source;
mod symbols;
mod validate;

pub use db::{Database, DocumentSource, FileData, Snapshot};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Element, RelatedInfo, Severity, codes};
pub use ids::DeclRef;
pub use imports::{
    ImportCycle, ImportResolution, UnresolvedImport, VisibleDocument, import_cycles, resolve_imports,
};
pub use input::SourceRoot;
pub use scope::{
    Candidate, Reference, ReferenceKind, Scope, container_type, get_scope, references, resolve,
    resolve_option_name,
};
pub use source::FileSet;
pub use symbols::{Binding, Symbol, SymbolKind, SymbolTable};
pub use validate::{SUPPORTED_SYNTAX, SemanticChecker, ValidationConfig, validate};

/// Build the symbol table of one document.
pub fn build_symbol_table(file: crate::base::FileId, document: &crate::syntax::ast::Document) -> SymbolTable {
    SymbolTable::build(file, document)
}
