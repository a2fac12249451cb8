//! Document validation.
//!
//! Independent checks over one document. None of them stops at the first
//! problem and none depends on another's outcome; each reports through
//! the shared [`DiagnosticCollector`].

use super::db::DocumentSource;
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::imports::{import_cycles, resolve_imports};
use crate::base::FileId;
use crate::syntax::ast::{Decl, DeclId, DeclKind, Document, Field, ScalarType, Value};

/// The only syntax identifier accepted.
pub const SUPPORTED_SYNTAX: &str = "proto2";

/// Optional checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Warn on imports that lead back to the importing document.
    pub report_import_cycles: bool,
}

// ============================================================================
// SEMANTIC CHECKER
// ============================================================================

pub struct SemanticChecker<'a, S: DocumentSource> {
    source: &'a S,
    config: &'a ValidationConfig,
}

impl<'a, S: DocumentSource> SemanticChecker<'a, S> {
    pub fn new(source: &'a S, config: &'a ValidationConfig) -> Self {
        Self { source, config }
    }

    /// Run every check over `file`.
    pub fn check_file(&self, file: FileId) -> Vec<Diagnostic> {
        let mut collector = DiagnosticCollector::new(file);
        let Some(document) = self.source.document(file) else {
            return collector.finish();
        };

        self.check_syntax(document, &mut collector);
        self.check_imports(file, document, &mut collector);
        self.check_packages(document, &mut collector);
        for id in document.decl_ids() {
            let decl = document.decl(id);
            match &decl.kind {
                DeclKind::Message => self.check_unique_tags(file, document, id, &mut collector),
                DeclKind::Group(_) => {
                    self.check_positive_tag(id, decl, &mut collector);
                    self.check_unique_tags(file, document, id, &mut collector);
                }
                DeclKind::Field(field) => {
                    self.check_positive_tag(id, decl, &mut collector);
                    self.check_default_value(id, field, &mut collector);
                }
                _ => {}
            }
        }

        let diagnostics = collector.finish();
        tracing::debug!(file = %file, count = diagnostics.len(), "validated");
        diagnostics
    }

    fn check_syntax(&self, document: &Document, collector: &mut DiagnosticCollector) {
        let Some(syntax) = &document.syntax else {
            return;
        };
        match syntax.name.as_deref() {
            None => collector.missing_syntax_name(syntax.name_range),
            Some(SUPPORTED_SYNTAX) => {}
            Some(other) => collector.unrecognized_syntax(syntax.name_range, other),
        }
    }

    fn check_imports(&self, file: FileId, document: &Document, collector: &mut DiagnosticCollector) {
        let resolution = resolve_imports(self.source, file);
        for unresolved in &resolution.unresolved {
            collector.import_not_found(unresolved.uri_range, &unresolved.uri);
        }
        if self.config.report_import_cycles {
            for cycle in &import_cycles(self.source, file) {
                let import = &document.imports[cycle.import];
                collector.import_cycle(import.uri_range, &import.uri);
            }
        }
    }

    fn check_packages(&self, document: &Document, collector: &mut DiagnosticCollector) {
        for package in document.packages.iter().skip(1) {
            collector.multiple_packages(package.name_range);
        }
    }

    /// Every named field must have a positive tag, wherever it is declared,
    /// `extend` blocks included.
    fn check_positive_tag(&self, id: DeclId, decl: &Decl, collector: &mut DiagnosticCollector) {
        if decl.name.is_none() {
            return;
        }
        if let Some((index, range)) = decl.index() {
            if index < 1 {
                collector.non_positive_tag(id, range, index);
            }
        }
    }

    /// Tag numbers of a message's or group's fields, one-of members
    /// included, must be unique.
    fn check_unique_tags(&self, file: FileId, document: &Document, container: DeclId, collector: &mut DiagnosticCollector) {
        let fields: Vec<_> = document
            .member_fields(container)
            .into_iter()
            .filter_map(|id| {
                let decl = document.decl(id);
                let name = decl.name.as_ref()?;
                let (index, range) = decl.index()?;
                Some((id, name, index, range, decl.name_range))
            })
            .collect();

        let container_name = self
            .source
            .symbol_table(file)
            .and_then(|t| t.symbol_for_decl(container))
            .map(|s| s.qualified_name.to_string())
            .or_else(|| document.decl(container).name.as_ref().map(|n| n.to_string()))
            .unwrap_or_default();

        for (pos, &(id, _, index, range, _)) in fields.iter().enumerate() {
            let earlier = fields[..pos].iter().find(|(_, _, other, _, _)| *other == index);
            if let Some(&(_, first, _, _, first_range)) = earlier {
                collector.duplicate_tag(id, range, index, &container_name, first, first_range);
            }
        }
    }

    fn check_default_value(&self, id: DeclId, field: &Field, collector: &mut DiagnosticCollector) {
        let Some(scalar) = field.ty.scalar() else {
            return;
        };
        for option in field.options.iter().filter(|o| o.is_default_value()) {
            match (scalar, &option.value) {
                (ScalarType::String, Value::String(_)) | (ScalarType::Bool, Value::Bool(_)) => {}
                (ScalarType::String, _) => {
                    collector.invalid_default_value(id, option.value_range, "Expected a string.")
                }
                (ScalarType::Bool, _) => {
                    collector.invalid_default_value(id, option.value_range, "Expected \"true\" or \"false\".")
                }
                _ => {}
            }
        }
    }
}

/// Validate `file` and return its diagnostics ordered by position.
pub fn validate(source: &impl DocumentSource, file: FileId, config: &ValidationConfig) -> Vec<Diagnostic> {
    SemanticChecker::new(source, config).check_file(file)
}
