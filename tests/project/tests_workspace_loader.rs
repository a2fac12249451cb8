//! Loading `.proto` trees from disk.

use std::fs;
use std::path::Path;

use protoscope::ide::AnalysisHost;
use protoscope::project::{ImportPaths, LoadError, WorkspaceLoader};
use tempfile::TempDir;

use crate::helpers::hir_helpers::{file_id, resolved_type};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn path_str(root: &Path, relative: &str) -> String {
    root.join(relative).to_string_lossy().into_owned()
}

#[test]
fn test_load_directory_resolves_imports_between_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app/user.proto", "import \"../types/id.proto\"; message User { optional Id id = 1; }");
    write(dir.path(), "types/id.proto", "message Id {}");
    write(dir.path(), "README.md", "not a schema");

    let mut host = AnalysisHost::new();
    let count = WorkspaceLoader::new().load_directory_into_host(dir.path(), &mut host).unwrap();
    assert_eq!(count, 2);

    let analysis = host.analysis();
    let user = file_id(&analysis, &path_str(dir.path(), "app/user.proto"));
    let (path, _) = resolved_type(&analysis, user, "id").unwrap();
    assert_eq!(path, path_str(dir.path(), "types/id.proto"));
}

#[test]
fn test_import_roots_from_configuration() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.proto", "import \"common/money.proto\"; message Order { optional Money total = 1; }");
    write(dir.path(), "third_party/common/money.proto", "message Money {}");

    let mut host = AnalysisHost::with_import_paths(ImportPaths::MultipleDirectories(vec![
        dir.path().join("third_party"),
    ]));
    WorkspaceLoader::new().load_directory_into_host(dir.path(), &mut host).unwrap();

    let analysis = host.analysis();
    let main = file_id(&analysis, &path_str(dir.path(), "src/main.proto"));
    assert!(analysis.diagnostics(main).is_empty());
    assert!(resolved_type(&analysis, main, "total").is_some());
}

#[test]
fn test_missing_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let mut host = AnalysisHost::new();
    let result = WorkspaceLoader::new().load_directory_into_host(dir.path().join("absent"), &mut host);
    assert!(matches!(result, Err(LoadError::NotFound(_))));
}

#[test]
fn test_load_single_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one.proto", "message One {}");
    write(dir.path(), "notes.txt", "");

    let mut host = AnalysisHost::new();
    let loader = WorkspaceLoader::new();
    loader.load_file_into_host(dir.path().join("one.proto"), &mut host).unwrap();
    assert_eq!(host.analysis().files().len(), 1);

    let err = loader.load_file_into_host(dir.path().join("notes.txt"), &mut host).unwrap_err();
    assert!(matches!(err, LoadError::NotProto(_)));
    let err = loader.load_file_into_host(dir.path().join("gone.proto"), &mut host).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}
