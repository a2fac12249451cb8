//! Helpers for building analysis snapshots from inline sources.

use protoscope::FileId;
use protoscope::hir::{Reference, ReferenceKind, Scope};
use protoscope::ide::{Analysis, AnalysisHost};
use protoscope::syntax::DeclId;

/// Path used for single-file fixtures.
pub const TEST_PATH: &str = "/ws/test.proto";

/// Creates an AnalysisHost with multiple files, asserting they parse.
pub fn host_from_sources(files: &[(&str, &str)]) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    for (path, content) in files {
        let errors = host.set_file_content(path, content);
        assert!(errors.is_empty(), "Parse errors in '{}': {:?}", path, errors);
    }
    host
}

pub fn analysis_from_sources(files: &[(&str, &str)]) -> Analysis {
    host_from_sources(files).analysis()
}

/// Creates an Analysis with a single file at [`TEST_PATH`].
pub fn analysis_from_proto(source: &str) -> (Analysis, FileId) {
    let analysis = analysis_from_sources(&[(TEST_PATH, source)]);
    let file = file_id(&analysis, TEST_PATH);
    (analysis, file)
}

pub fn file_id(analysis: &Analysis, path: &str) -> FileId {
    analysis
        .file_id(path)
        .unwrap_or_else(|| panic!("'{}' should be loaded", path))
}

/// The first declaration named `name` in `file`.
pub fn decl_named(analysis: &Analysis, file: FileId, name: &str) -> DeclId {
    let document = analysis.document(file).expect("document loaded");
    document
        .decl_ids()
        .find(|&id| document.decl(id).name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no declaration named '{}'", name))
}

/// The type reference written on the field named `field`.
pub fn type_reference(analysis: &Analysis, file: FileId, field: &str) -> Reference {
    let site = decl_named(analysis, file, field);
    analysis
        .references(file)
        .into_iter()
        .find(|r| r.site == site && r.kind == ReferenceKind::ComplexType)
        .unwrap_or_else(|| panic!("field '{}' has no type reference", field))
}

/// Scope of the type reference on `field`.
pub fn type_scope(analysis: &Analysis, file: FileId, field: &str) -> Scope {
    analysis.scope(&type_reference(analysis, file, field))
}

/// Path of the document `field`'s type resolves into, and its qualified name.
pub fn resolved_type(analysis: &Analysis, file: FileId, field: &str) -> Option<(String, String)> {
    let candidate = analysis.resolve(&type_reference(analysis, file, field))?;
    let path = analysis.path(candidate.target.file)?.to_string();
    Some((path, candidate.qualified_name.to_string()))
}
