//! Diagnostics - editing-time errors and warnings.
//!
//! Every diagnostic carries a stable machine-readable code from [`codes`];
//! external tooling keys quick-fixes off those strings, so they never
//! change. Positions are byte ranges; converting to line/column is the
//! caller's business ([`crate::base::LineIndex`]).

use std::sync::Arc;

use crate::base::{FileId, TextRange};
use crate::syntax::ast::DeclId;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
        }
    }
}

/// Which part of the target declaration a diagnostic points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    /// A field's tag number.
    Index,
    /// An option's value literal.
    Value,
    ImportUri,
    SyntaxName,
    PackageName,
}

/// A diagnostic message attached to a sub-range of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: FileId,
    pub range: TextRange,
    pub severity: Severity,
    /// Stable code, see [`codes`].
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    /// The offending declaration, when the diagnostic is about one.
    pub target: Option<DeclId>,
    pub element: Option<Element>,
    pub related: Vec<RelatedInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub file: FileId,
    pub range: TextRange,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(file: FileId, range: TextRange, severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            range,
            severity,
            code: None,
            message: message.into(),
            target: None,
            element: None,
            related: Vec::new(),
        }
    }

    pub fn error(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, range, Severity::Error, message)
    }

    pub fn warning(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, range, Severity::Warning, message)
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Point at `element` of `decl`.
    pub fn with_target(mut self, decl: Option<DeclId>, element: Element) -> Self {
        self.target = decl;
        self.element = Some(element);
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
pub mod codes {
    pub const SYNTAX_IS_NOT_PROTO2: &str = "syntaxIsNotProto2";
    pub const IMPORT_NOT_FOUND: &str = "importNotFound";
    /// Duplicate, zero or negative tag numbers.
    pub const INVALID_FIELD_TAG_NUMBER: &str = "invalidFieldTagNumber";
    pub const MORE_THAN_ONE_PACKAGE: &str = "moreThanOnePackage";
    pub const INVALID_DEFAULT_VALUE: &str = "invalidDefaultValue";
    /// Only emitted when cycle reporting is enabled.
    pub const IMPORT_CYCLE: &str = "importCycle";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics for one document.
#[derive(Clone, Debug)]
pub struct DiagnosticCollector {
    file: FileId,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn missing_syntax_name(&mut self, range: TextRange) {
        self.add(
            Diagnostic::error(self.file, range, "Expected a syntax identifier.")
                .with_code(codes::SYNTAX_IS_NOT_PROTO2)
                .with_target(None, Element::SyntaxName),
        );
    }

    pub fn unrecognized_syntax(&mut self, range: TextRange, name: &str) {
        self.add(
            Diagnostic::error(
                self.file,
                range,
                format!("Unrecognized syntax identifier \"{name}\". This parser only recognizes \"proto2\"."),
            )
            .with_code(codes::SYNTAX_IS_NOT_PROTO2)
            .with_target(None, Element::SyntaxName),
        );
    }

    pub fn import_not_found(&mut self, range: TextRange, uri: &str) {
        self.add(
            Diagnostic::error(self.file, range, format!("Import \"{uri}\" was not found."))
                .with_code(codes::IMPORT_NOT_FOUND)
                .with_target(None, Element::ImportUri),
        );
    }

    pub fn import_cycle(&mut self, range: TextRange, uri: &str) {
        self.add(
            Diagnostic::warning(self.file, range, format!("Import \"{uri}\" leads back to this file."))
                .with_code(codes::IMPORT_CYCLE)
                .with_target(None, Element::ImportUri),
        );
    }

    /// `field` reuses the tag of the earlier `first`, inside `container`.
    pub fn duplicate_tag(
        &mut self,
        field: DeclId,
        range: TextRange,
        index: i64,
        container: &str,
        first: &str,
        first_range: TextRange,
    ) {
        self.add(
            Diagnostic::error(
                self.file,
                range,
                format!("Field number {index} has already been used in \"{container}\" by field \"{first}\"."),
            )
            .with_code(codes::INVALID_FIELD_TAG_NUMBER)
            .with_target(Some(field), Element::Index)
            .with_related(RelatedInfo {
                file: self.file,
                range: first_range,
                message: Arc::from(format!("field \"{first}\" declared here")),
            }),
        );
    }

    pub fn non_positive_tag(&mut self, field: DeclId, range: TextRange, index: i64) {
        let message = if index == 0 {
            "Field numbers must be positive integers."
        } else {
            "Expected field number."
        };
        self.add(
            Diagnostic::error(self.file, range, message)
                .with_code(codes::INVALID_FIELD_TAG_NUMBER)
                .with_target(Some(field), Element::Index),
        );
    }

    pub fn multiple_packages(&mut self, range: TextRange) {
        self.add(
            Diagnostic::error(self.file, range, "Multiple package definitions.")
                .with_code(codes::MORE_THAN_ONE_PACKAGE)
                .with_target(None, Element::PackageName),
        );
    }

    pub fn invalid_default_value(&mut self, field: DeclId, range: TextRange, expected: &str) {
        self.add(
            Diagnostic::error(self.file, range, expected.to_string())
                .with_code(codes::INVALID_DEFAULT_VALUE)
                .with_target(Some(field), Element::Value),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Diagnostics ordered by position; ties keep insertion order.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| d.range.start());
        self.diagnostics
    }
}
