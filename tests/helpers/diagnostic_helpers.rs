//! Diagnostic assertion helpers.

use protoscope::hir::{Diagnostic, Severity};

use crate::helpers::hir_helpers::analysis_from_proto;

/// Get all diagnostics for a single-file source.
pub fn diagnostics_from_proto(source: &str) -> Vec<Diagnostic> {
    let (analysis, file) = analysis_from_proto(source);
    analysis.diagnostics(file)
}

pub fn errors_from_proto(source: &str) -> Vec<Diagnostic> {
    diagnostics_from_proto(source)
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .collect()
}

pub fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().filter_map(|d| d.code.as_deref()).collect()
}

pub fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| &*d.message).collect()
}

pub fn assert_no_errors(source: &str) {
    let errors = errors_from_proto(source);
    assert!(
        errors.is_empty(),
        "Expected no errors, got {} error(s):\n{}",
        errors.len(),
        messages(&errors).join("\n")
    );
}

/// The source text a diagnostic points at.
pub fn covered_text<'a>(source: &'a str, diagnostic: &Diagnostic) -> &'a str {
    &source[diagnostic.range]
}
