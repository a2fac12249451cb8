//! Validator output over whole documents.

use protoscope::hir::{Element, Severity, codes};
use rstest::rstest;

use crate::helpers::diagnostic_helpers::{
    assert_no_errors, codes as codes_of, covered_text, diagnostics_from_proto, errors_from_proto, messages,
};
use crate::helpers::source_fixtures::{ALL_CONSTRAINT_VIOLATIONS, CONTACT};

#[test]
fn test_contact_is_clean() {
    assert!(diagnostics_from_proto(CONTACT).is_empty());
}

#[test]
fn test_every_violation_is_reported_in_one_pass() {
    let diagnostics = diagnostics_from_proto(ALL_CONSTRAINT_VIOLATIONS);
    assert_eq!(
        codes_of(&diagnostics),
        vec![
            codes::SYNTAX_IS_NOT_PROTO2,
            codes::MORE_THAN_ONE_PACKAGE,
            codes::IMPORT_NOT_FOUND,
            codes::INVALID_FIELD_TAG_NUMBER,
            codes::INVALID_FIELD_TAG_NUMBER,
            codes::INVALID_FIELD_TAG_NUMBER,
            codes::INVALID_DEFAULT_VALUE,
            codes::INVALID_DEFAULT_VALUE,
        ]
    );
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn test_diagnostic_ranges_cover_offending_text() {
    let diagnostics = diagnostics_from_proto(ALL_CONSTRAINT_VIOLATIONS);
    let covered: Vec<_> = diagnostics
        .iter()
        .map(|d| covered_text(ALL_CONSTRAINT_VIOLATIONS, d))
        .collect();
    assert_eq!(
        covered,
        vec![
            "\"proto3\"",
            "second",
            "\"nowhere.proto\"",
            "1",
            "0",
            "-5",
            "1",
            "\"no\"",
        ]
    );
}

#[rstest]
#[case::proto3("syntax = \"proto3\";", "Unrecognized syntax identifier \"proto3\". This parser only recognizes \"proto2\".")]
#[case::editions("syntax = \"editions\";", "Unrecognized syntax identifier \"editions\". This parser only recognizes \"proto2\".")]
#[case::second_package("package a; package b;", "Multiple package definitions.")]
#[case::zero_tag("message M { optional int32 x = 0; }", "Field numbers must be positive integers.")]
#[case::negative_tag("message M { optional int32 x = -3; }", "Expected field number.")]
#[case::bool_default("message M { optional bool b = 1 [default = 1]; }", "Expected \"true\" or \"false\".")]
#[case::string_default("message M { optional string s = 1 [default = true]; }", "Expected a string.")]
fn test_single_violation(#[case] source: &str, #[case] expected: &str) {
    let errors = errors_from_proto(source);
    assert_eq!(messages(&errors), vec![expected]);
}

#[rstest]
#[case::proto2("syntax = \"proto2\"; message M {}")]
#[case::no_syntax("message M {}")]
#[case::string_default("message M { optional string s = 1 [default = \"x\"]; }")]
#[case::bool_default("message M { optional bool b = 1 [default = false]; }")]
#[case::int_default_unchecked("message M { optional int32 i = 1 [default = 7]; }")]
#[case::distinct_tags("message M { optional int32 a = 1; oneof o { int32 b = 2; } optional group G = 3 {} }")]
fn test_accepted(#[case] source: &str) {
    assert_no_errors(source);
}

#[test]
fn test_duplicate_tag_in_nested_message_names_full_container() {
    let source = "package p; message Outer { message Inner { optional int32 a = 4; optional int32 b = 4; } }";
    let diagnostics = diagnostics_from_proto(source);

    assert_eq!(
        messages(&diagnostics),
        vec!["Field number 4 has already been used in \"p.Outer.Inner\" by field \"a\"."]
    );
    assert_eq!(diagnostics[0].element, Some(Element::Index));
    assert_eq!(diagnostics[0].related.len(), 1);
}

#[rstest]
#[case::top_level_zero("extend Base { optional int32 ext = 0; }", "Field numbers must be positive integers.", "0")]
#[case::top_level_negative("extend Base { optional int32 ext = -3; }", "Expected field number.", "-3")]
#[case::nested_zero("message H { extend Base { optional int32 ext = 0; } }", "Field numbers must be positive integers.", "0")]
#[case::nested_negative("message H { extend Base { optional int32 ext = -7; } }", "Expected field number.", "-7")]
fn test_extension_field_tags_must_be_positive(#[case] extend: &str, #[case] expected: &str, #[case] covered: &str) {
    let source = format!("message Base {{ extensions 1 to 100; }}\n{extend}");
    let errors = errors_from_proto(&source);

    assert_eq!(messages(&errors), vec![expected]);
    assert_eq!(errors[0].code.as_deref(), Some(codes::INVALID_FIELD_TAG_NUMBER));
    assert_eq!(covered_text(&source, &errors[0]), covered);
}

#[test]
fn test_valid_extension_fields_are_accepted() {
    assert_no_errors(
        "message Base { extensions 1 to 100; } extend Base { optional int32 a = 1; optional group G = 2 {} }",
    );
}

#[test]
fn test_tags_are_scoped_per_message() {
    assert_no_errors("message A { optional int32 x = 1; } message B { optional int32 x = 1; }");
}

#[test]
fn test_group_body_tags_are_checked_separately() {
    let errors = errors_from_proto("message M { optional group G = 1 { optional int32 a = 2; optional int32 b = 2; } }");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("\"M.G\""));
}

#[test]
fn test_unresolved_type_is_not_a_diagnostic() {
    assert!(diagnostics_from_proto("message M { optional Missing m = 1; }").is_empty());
}
