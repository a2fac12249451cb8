//! Import graph resolution.

use protoscope::hir::{ValidationConfig, codes, import_cycles};
use protoscope::ide::AnalysisHost;
use protoscope::project::ImportPaths;

use crate::helpers::hir_helpers::{analysis_from_sources, file_id, host_from_sources};
use crate::helpers::source_fixtures::{PUBLIC_MIDDLE, PUBLIC_ROOT, PUBLIC_TOP};

#[test]
fn test_root_is_visible_at_distance_zero() {
    let analysis = analysis_from_sources(&[("/ws/a.proto", "message A {}")]);
    let a = file_id(&analysis, "/ws/a.proto");

    let resolution = analysis.resolve_imports(a);
    assert_eq!(resolution.files().collect::<Vec<_>>(), vec![a]);
    assert_eq!(resolution.distance(a), Some(0));
}

#[test]
fn test_public_import_chain_is_transitive() {
    let analysis = analysis_from_sources(&[
        ("/ws/top.proto", PUBLIC_TOP),
        ("/ws/middle.proto", PUBLIC_MIDDLE),
        ("/ws/root.proto", PUBLIC_ROOT),
    ]);
    let top = file_id(&analysis, "/ws/top.proto");
    let middle = file_id(&analysis, "/ws/middle.proto");
    let root = file_id(&analysis, "/ws/root.proto");

    let resolution = analysis.resolve_imports(top);
    assert_eq!(resolution.distance(middle), Some(1));
    assert_eq!(resolution.distance(root), Some(2));
    assert!(resolution.unresolved.is_empty());
}

#[test]
fn test_private_imports_of_imports_are_not_visible() {
    let analysis = analysis_from_sources(&[
        ("/ws/a.proto", "import \"b.proto\";"),
        ("/ws/b.proto", "import \"c.proto\";"),
        ("/ws/c.proto", "message C {}"),
    ]);
    let a = file_id(&analysis, "/ws/a.proto");
    let c = file_id(&analysis, "/ws/c.proto");

    assert!(!analysis.resolve_imports(a).is_visible(c));
}

#[test]
fn test_unresolved_import_is_recorded_and_reported() {
    let analysis = analysis_from_sources(&[("/ws/a.proto", "import \"missing.proto\";\nmessage A {}")]);
    let a = file_id(&analysis, "/ws/a.proto");

    let resolution = analysis.resolve_imports(a);
    assert_eq!(resolution.unresolved.len(), 1);
    assert_eq!(resolution.unresolved[0].uri, "missing.proto");

    let diagnostics = analysis.diagnostics(a);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::IMPORT_NOT_FOUND));
    assert_eq!(&*diagnostics[0].message, "Import \"missing.proto\" was not found.");
}

#[test]
fn test_cycle_terminates_and_warns_when_enabled() {
    let mut host = host_from_sources(&[
        ("/ws/a.proto", "import public \"b.proto\"; message A {}"),
        ("/ws/b.proto", "import public \"a.proto\"; message B {}"),
    ]);
    let analysis = host.analysis();
    let a = file_id(&analysis, "/ws/a.proto");
    let b = file_id(&analysis, "/ws/b.proto");

    let resolution = analysis.resolve_imports(a);
    assert_eq!(resolution.files().collect::<Vec<_>>(), vec![a, b]);
    let cycles = import_cycles(analysis.snapshot(), a);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].target, b);
    assert!(analysis.diagnostics(a).is_empty());

    host.set_validation_config(ValidationConfig {
        report_import_cycles: true,
    });
    let diagnostics = host.analysis().diagnostics(a);
    assert_eq!(diagnostics.len(), 1);
    assert!(!diagnostics[0].is_error());
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::IMPORT_CYCLE));
}

#[test]
fn test_multiple_directories_resolve_against_each_root() {
    let mut host = AnalysisHost::with_import_paths(ImportPaths::MultipleDirectories(vec![
        "/protos/vendor".into(),
        "/protos/common".into(),
    ]));
    host.set_file_content("/ws/app/main.proto", "import \"types/id.proto\";");
    host.set_file_content("/protos/common/types/id.proto", "message Id {}");
    let analysis = host.analysis();

    let main = file_id(&analysis, "/ws/app/main.proto");
    let id = file_id(&analysis, "/protos/common/types/id.proto");
    assert!(analysis.resolve_imports(main).is_visible(id));
}

#[test]
fn test_single_directory_resolves_relative_to_importer() {
    let analysis = analysis_from_sources(&[
        ("/ws/app/main.proto", "import \"../shared/dep.proto\";"),
        ("/ws/shared/dep.proto", "message Dep {}"),
    ]);
    let main = file_id(&analysis, "/ws/app/main.proto");
    let dep = file_id(&analysis, "/ws/shared/dep.proto");

    assert_eq!(analysis.resolve_imports(main).distance(dep), Some(1));
}

#[test]
fn test_import_found_after_target_is_loaded() {
    let mut host = host_from_sources(&[("/ws/a.proto", "import \"b.proto\";")]);
    let a = file_id(&host.analysis(), "/ws/a.proto");
    assert_eq!(host.analysis().resolve_imports(a).unresolved.len(), 1);

    host.set_file_content("/ws/b.proto", "message B {}");
    assert!(host.analysis().resolve_imports(a).unresolved.is_empty());
}
