//! # protoscope-base
//!
//! Name resolution and editing-time validation for protocol buffer
//! (proto2) schema files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → AnalysisHost/Analysis, goto, completion, document links
//!   ↓
//! hir     → symbol tables, import graph, scopes, validation, database
//!   ↓
//! syntax  → document model, lexer, parser
//!   ↓
//! project → import path configuration, loading files from disk
//!   ↓
//! base    → FileId, TextRange, LineIndex
//! ```

/// Foundation types: FileId, text ranges, line index
pub mod base;

/// Semantic model: symbol tables, imports, scopes, diagnostics
pub mod hir;

/// Editor-facing queries over analysis snapshots
pub mod ide;

pub mod project;
pub mod syntax;

pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
