//! Binding and reference pattern tests.
//!
//! Both modes share the list, record and error shapes; these tests check
//! the shapes, the rest-placement rule and the mode restrictions.

use balsyn_ast::{Accessor, ExprKind, Pattern, PatternKind, RestPattern};
use balsyn_lexer::lex;
use balsyn_parser::{parse_binding_pattern, parse_ref_pattern, ParseError, ParseErrorKind};

/// Helper to parse a binding pattern from source.
fn parse(source: &str) -> Pattern {
    let tokens = lex(source).expect("Lex failed");
    parse_binding_pattern(&tokens, 0).expect("Parse failed")
}

/// Helper to parse a reference pattern from source.
fn parse_ref(source: &str) -> Pattern {
    let tokens = lex(source).expect("Lex failed");
    parse_ref_pattern(&tokens, 0).expect("Parse failed")
}

fn binding_error(source: &str) -> ParseError {
    let tokens = lex(source).expect("Lex failed");
    match parse_binding_pattern(&tokens, 0) {
        Ok(p) => panic!("Expected parse error, got {:?}", p.kind),
        Err(mut errors) => errors.remove(0),
    }
}

fn ref_error(source: &str) -> ParseError {
    let tokens = lex(source).expect("Lex failed");
    match parse_ref_pattern(&tokens, 0) {
        Ok(p) => panic!("Expected parse error, got {:?}", p.kind),
        Err(mut errors) => errors.remove(0),
    }
}

// =============================================================================
// Binding Mode
// =============================================================================

#[test]
fn test_name_and_wildcard() {
    assert_eq!(parse("x").kind, PatternKind::BindName("x".into()));
    assert_eq!(parse("_").kind, PatternKind::Wildcard);
}

#[test]
fn test_list_pattern_with_rest_last() {
    let pattern = parse("[a, b, ...rest]");
    let PatternKind::List { elements, rest } = pattern.kind else {
        panic!("expected list pattern");
    };
    assert_eq!(elements.len(), 2);
    assert_eq!(
        rest.map(|p| p.kind),
        Some(PatternKind::BindName("rest".into()))
    );
}

#[test]
fn test_rest_not_last_is_rejected() {
    let err = binding_error("[a, ...rest, b]");
    assert_eq!(err.kind, ParseErrorKind::MalformedPattern);
    // reported at the comma after the rest element
    assert_eq!(err.span.start, 11);
}

#[test]
fn test_nested_record_pattern() {
    let pattern = parse("{id, name: [first, _], ...others}");
    let PatternKind::Record { fields, rest } = pattern.kind else {
        panic!("expected record pattern");
    };
    assert_eq!(fields.len(), 2);
    assert!(fields[0].pattern.is_none());
    assert!(matches!(
        fields[1].pattern.as_ref().map(|p| &p.kind),
        Some(PatternKind::List { .. })
    ));
    assert!(matches!(rest, RestPattern::Bind(_)));
}

#[test]
fn test_error_pattern() {
    let pattern = parse("error MyError(msg, cause, code = c, ...details)");
    let PatternKind::Error {
        type_ref,
        args,
        fields,
        rest,
    } = pattern.kind
    else {
        panic!("expected error pattern");
    };
    assert_eq!(type_ref.map(|t| t.name), Some("MyError".to_string()));
    assert_eq!(args.len(), 2);
    assert_eq!(fields[0].name, "code");
    assert!(rest.is_some());
}

#[test]
fn test_error_pattern_positional_after_named_is_rejected() {
    let err = binding_error("error(code = c, msg)");
    assert_eq!(err.kind, ParseErrorKind::MalformedPattern);
}

#[test]
fn test_literal_is_rejected() {
    assert_eq!(binding_error("[a, 1]").kind, ParseErrorKind::MalformedPattern);
    assert_eq!(ref_error("[a, \"s\"]").kind, ParseErrorKind::MalformedPattern);
}

#[test]
fn test_field_access_is_rejected_in_binding_mode() {
    let err = binding_error("[a.b]");
    assert_eq!(err.kind, ParseErrorKind::MalformedPattern);
}

#[test]
fn test_sealed_rest_is_rejected_in_binding_mode() {
    let err = binding_error("{a, !...}");
    assert_eq!(err.kind, ParseErrorKind::MalformedPattern);
    assert!(err.message.contains("`!...`"), "message: {}", err.message);
}

// =============================================================================
// Reference Mode
// =============================================================================

#[test]
fn test_reference_elements_are_places() {
    let pattern = parse_ref("[a, r.b, xs[0], _]");
    let PatternKind::List { elements, .. } = pattern.kind else {
        panic!("expected list pattern");
    };
    assert_eq!(elements.len(), 4);
    let PatternKind::VarRef(place) = &elements[1].kind else {
        panic!("expected variable reference");
    };
    assert!(matches!(
        place.kind,
        ExprKind::Postfix {
            accessor: Accessor::Field { .. },
            ..
        }
    ));
    assert_eq!(elements[3].kind, PatternKind::Wildcard);
}

#[test]
fn test_sealed_rest_in_reference_mode() {
    let pattern = parse_ref("{a, b: c, !...}");
    let PatternKind::Record { fields, rest } = pattern.kind else {
        panic!("expected record pattern");
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(rest, RestPattern::Sealed);
}

#[test]
fn test_call_is_not_a_reference() {
    let err = ref_error("[f()]");
    assert_eq!(err.kind, ParseErrorKind::MalformedPattern);
}

#[test]
fn test_rest_rule_in_reference_mode() {
    let err = ref_error("{...r, a}");
    assert_eq!(err.kind, ParseErrorKind::MalformedPattern);
}
