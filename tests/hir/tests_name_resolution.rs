//! Scope computation and cross-reference resolution.

use protoscope::hir::{ReferenceKind, SymbolKind};
use rstest::rstest;

use crate::helpers::hir_helpers::{
    analysis_from_proto, analysis_from_sources, file_id, resolved_type, type_reference, type_scope,
};
use crate::helpers::source_fixtures::{
    CONTACT, FRUIT_IMPORTED, FRUIT_LOCAL, PUBLIC_MIDDLE, PUBLIC_ROOT, PUBLIC_TOP,
};

// ============================================================================
// SAME DOCUMENT
// ============================================================================

#[test]
fn test_contact_type_resolves_to_enum() {
    let (analysis, file) = analysis_from_proto(CONTACT);
    let scope = type_scope(&analysis, file, "type");

    for spelling in ["Type", "proto.Type", "google.proto.Type", "com.google.proto.Type"] {
        let candidate = scope.lookup(spelling).unwrap();
        assert_eq!(candidate.qualified_name, "com.google.proto.Type");
        assert_eq!(candidate.kind, SymbolKind::Enum);
    }
    assert!(scope.lookup(".com.google.proto.Type").is_some());
    assert!(!scope.contains("MOBILE"));
    assert!(!scope.contains("Contact.name"));
}

#[rstest]
#[case::simple("Inner")]
#[case::qualified_by_container("Outer.Inner")]
#[case::qualified_by_package("p.Outer.Inner")]
#[case::fully_qualified(".p.Outer.Inner")]
fn test_nested_type_spellings(#[case] spelling: &str) {
    let source = format!(
        "package p; message Outer {{ message Inner {{}} }} message User {{ optional {spelling} value = 1; }}"
    );
    let (analysis, file) = analysis_from_proto(&source);
    let (_, qualified) = resolved_type(&analysis, file, "value").unwrap();
    assert_eq!(qualified, "p.Outer.Inner");
}

#[test]
fn test_partial_package_prefix_does_not_resolve() {
    let (analysis, file) = analysis_from_proto("package a.b; message T {} message U { optional a.T t = 1; }");
    assert!(resolved_type(&analysis, file, "t").is_none());
}

#[test]
fn test_recursive_and_mutually_recursive_types() {
    let (analysis, file) = analysis_from_proto(
        "message Node { optional Node next = 1; optional Tree tree = 2; } message Tree { repeated Node nodes = 1; }",
    );
    assert_eq!(resolved_type(&analysis, file, "next").unwrap().1, "Node");
    assert_eq!(resolved_type(&analysis, file, "tree").unwrap().1, "Tree");
    assert_eq!(resolved_type(&analysis, file, "nodes").unwrap().1, "Node");
}

#[test]
fn test_unresolved_reference_has_empty_answer() {
    let (analysis, file) = analysis_from_proto("message A { optional Missing m = 1; }");
    let reference = type_reference(&analysis, file, "m");
    assert!(analysis.resolve(&reference).is_none());
    assert!(analysis.scope(&reference).contains("A"));
}

#[test]
fn test_group_is_a_type() {
    let (analysis, file) = analysis_from_proto(
        "message S { repeated group Result = 1 { optional string url = 2; } } message T { optional S.Result r = 1; }",
    );
    let reference = type_reference(&analysis, file, "r");
    let candidate = analysis.resolve(&reference).unwrap();
    assert_eq!(candidate.kind, SymbolKind::Group);
}

// ============================================================================
// ACROSS DOCUMENTS
// ============================================================================

#[test]
fn test_local_declaration_wins_over_imported() {
    let analysis = analysis_from_sources(&[("/ws/main.proto", FRUIT_LOCAL), ("/ws/imported.proto", FRUIT_IMPORTED)]);
    let main = file_id(&analysis, "/ws/main.proto");

    let (path, qualified) = resolved_type(&analysis, main, "items").unwrap();
    assert_eq!(path, "/ws/main.proto");
    assert_eq!(qualified, "fruits.Fruit");

    let (path, _) = resolved_type(&analysis, main, "apple").unwrap();
    assert_eq!(path, "/ws/imported.proto");
}

#[test]
fn test_public_reexport_through_private_import() {
    let analysis = analysis_from_sources(&[
        ("/ws/top.proto", PUBLIC_TOP),
        ("/ws/middle.proto", PUBLIC_MIDDLE),
        ("/ws/root.proto", PUBLIC_ROOT),
    ]);
    let top = file_id(&analysis, "/ws/top.proto");

    for field in ["id", "short_id", "bare_id"] {
        let (path, qualified) = resolved_type(&analysis, top, field).unwrap();
        assert_eq!(path, "/ws/root.proto", "{field}");
        assert_eq!(qualified, "base.types.Id");
    }
    let candidate = analysis.resolve(&type_reference(&analysis, top, "id")).unwrap();
    assert_eq!(candidate.distance, 2);
}

#[test]
fn test_private_import_of_import_is_hidden() {
    let analysis = analysis_from_sources(&[
        ("/ws/a.proto", "import \"b.proto\"; message A { optional C c = 1; optional B b = 2; }"),
        ("/ws/b.proto", "import \"c.proto\"; message B {}"),
        ("/ws/c.proto", "message C {}"),
    ]);
    let a = file_id(&analysis, "/ws/a.proto");

    assert!(resolved_type(&analysis, a, "c").is_none());
    assert!(resolved_type(&analysis, a, "b").is_some());
}

#[test]
fn test_import_cycle_still_resolves() {
    let analysis = analysis_from_sources(&[
        ("/ws/a.proto", "import \"b.proto\"; message A { optional B b = 1; }"),
        ("/ws/b.proto", "import \"a.proto\"; message B { optional A a = 1; }"),
    ]);
    let a = file_id(&analysis, "/ws/a.proto");
    let b = file_id(&analysis, "/ws/b.proto");

    assert_eq!(resolved_type(&analysis, a, "b").unwrap().0, "/ws/b.proto");
    assert_eq!(resolved_type(&analysis, b, "a").unwrap().0, "/ws/a.proto");
}

// ============================================================================
// OPTIONS AND DEFAULTS
// ============================================================================

#[test]
fn test_enum_literal_default_resolves_in_field_type() {
    let (analysis, file) = analysis_from_proto(&format!(
        "{CONTACT}\nmessage Card {{ optional Type kind = 1 [default = HOME]; }}"
    ));
    let literal = analysis
        .references(file)
        .into_iter()
        .find(|r| matches!(r.kind, ReferenceKind::EnumLiteral { .. }))
        .unwrap();

    assert_eq!(literal.spelling, "HOME");
    let candidate = analysis.resolve(&literal).unwrap();
    assert_eq!(candidate.kind, SymbolKind::EnumValue);
    assert_eq!(candidate.qualified_name, "com.google.proto.Type.HOME");
    assert!(!analysis.scope(&literal).contains("Contact"));
}

#[test]
fn test_custom_option_key_resolves_to_imported_extension() {
    let analysis = analysis_from_sources(&[
        (
            "/ws/main.proto",
            "import \"opts.proto\"; message M { optional int32 x = 1 [(opts.weight) = 3]; }",
        ),
        ("/ws/opts.proto", "package opts; message Base {} extend Base { optional int32 weight = 50; }"),
    ]);
    let main = file_id(&analysis, "/ws/main.proto");
    let key = analysis
        .references(main)
        .into_iter()
        .find(|r| r.kind == ReferenceKind::Extension)
        .unwrap();

    let candidate = analysis.resolve(&key).unwrap();
    assert_eq!(candidate.kind, SymbolKind::Extension);
    assert_eq!(candidate.qualified_name, "opts.weight");
    assert!(!analysis.scope(&key).contains("Base"));
}
