//! Type descriptor parsing tests.
//!
//! Covers the suffix operators (array, nullable), union flattening, every
//! primary form and the record field rules.

use balsyn_ast::{
    ArrayDimension, BuiltinGeneric, Expr, ExprKind, FieldDesc, Literal, TypeDesc, TypeKind,
};
use balsyn_lexer::lex;
use balsyn_parser::{parse_expr, parse_type_descriptor, ParseError, ParseErrorKind};

/// Helper to parse a type descriptor from source.
fn parse(source: &str) -> TypeDesc {
    let tokens = lex(source).expect("Lex failed");
    parse_type_descriptor(&tokens, 0).expect("Parse failed")
}

/// Helper for sources that must be rejected.
fn expect_error(source: &str) -> ParseError {
    let tokens = lex(source).expect("Lex failed");
    match parse_type_descriptor(&tokens, 0) {
        Ok(ty) => panic!("Expected parse error, got {:?}", ty.kind),
        Err(mut errors) => errors.remove(0),
    }
}

fn simple_name(ty: &TypeDesc) -> String {
    match &ty.kind {
        TypeKind::Simple(name) => name.to_string(),
        other => panic!("expected simple type, got {:?}", other),
    }
}

// =============================================================================
// Unions
// =============================================================================

#[test]
fn test_union_flattens_chain() {
    let ty = parse("int|string|boolean");
    let TypeKind::Union { members } = ty.kind else {
        panic!("expected union");
    };
    let names: Vec<_> = members.iter().map(simple_name).collect();
    assert_eq!(names, vec!["int", "string", "boolean"]);
}

#[test]
fn test_parenthesized_union_is_spliced() {
    let ty = parse("int|(string|boolean)|()");
    let TypeKind::Union { members } = ty.kind else {
        panic!("expected union");
    };
    assert_eq!(members.len(), 4);
    assert_eq!(simple_name(&members[2]), "boolean");
    assert_eq!(members[3].kind, TypeKind::Nil);
}

#[test]
fn test_parenthesized_union_with_suffix_is_kept() {
    let ty = parse("(int|string)[]");
    let TypeKind::Array { element, dimension } = ty.kind else {
        panic!("expected array");
    };
    assert_eq!(dimension, ArrayDimension::Open);
    assert!(matches!(element.kind, TypeKind::Union { .. }));
}

// =============================================================================
// Suffixes
// =============================================================================

#[test]
fn test_array_dimensions() {
    let ty = parse("int[3][N][*][]");
    let mut dimensions = Vec::new();
    let mut current = &ty;
    while let TypeKind::Array { element, dimension } = &current.kind {
        dimensions.push(dimension.clone());
        current = element;
    }
    // outermost suffix first
    assert_eq!(dimensions.len(), 4);
    assert_eq!(dimensions[0], ArrayDimension::Open);
    assert_eq!(dimensions[1], ArrayDimension::Inferred);
    assert!(matches!(dimensions[2], ArrayDimension::Constant(_)));
    assert_eq!(dimensions[3], ArrayDimension::Fixed(3));
}

#[test]
fn test_nullable_array_and_array_of_nullable() {
    let ty = parse("int[]?");
    assert!(matches!(ty.kind, TypeKind::Nullable(_)));

    let ty = parse("int?[]");
    let TypeKind::Array { element, .. } = ty.kind else {
        panic!("expected array");
    };
    assert!(matches!(element.kind, TypeKind::Nullable(_)));
}

#[test]
fn test_nullable_binds_tighter_than_union() {
    let ty = parse("string|int?");
    let TypeKind::Union { members } = ty.kind else {
        panic!("expected union");
    };
    assert!(matches!(members[1].kind, TypeKind::Nullable(_)));
}

// =============================================================================
// Primaries
// =============================================================================

#[test]
fn test_qualified_reference() {
    assert_eq!(simple_name(&parse("http:Client")), "http:Client");
}

#[test]
fn test_singletons() {
    let ty = parse("\"on\"|\"off\"|-1|true");
    let TypeKind::Union { members } = ty.kind else {
        panic!("expected union");
    };
    assert_eq!(members[0].kind, TypeKind::Singleton(Literal::String("on".into())));
    assert_eq!(members[2].kind, TypeKind::Singleton(Literal::Integer(-1)));
    assert_eq!(members[3].kind, TypeKind::Singleton(Literal::Boolean(true)));
}

#[test]
fn test_tuple_with_rest() {
    let ty = parse("[int, string, boolean...]");
    let TypeKind::Tuple { members, rest } = ty.kind else {
        panic!("expected tuple");
    };
    assert_eq!(members.len(), 2);
    assert_eq!(simple_name(rest.as_deref().unwrap()), "boolean");
}

#[test]
fn test_tuple_then_array_suffix() {
    let ty = parse("[int, string][]");
    let TypeKind::Array { element, .. } = ty.kind else {
        panic!("expected array");
    };
    assert!(matches!(element.kind, TypeKind::Tuple { .. }));
}

#[test]
fn test_generics() {
    let ty = parse("map<map<int>>");
    let TypeKind::Generic { base, args } = ty.kind else {
        panic!("expected generic");
    };
    assert_eq!(base, BuiltinGeneric::Map);
    assert!(matches!(
        args[0].kind,
        TypeKind::Generic {
            base: BuiltinGeneric::Map,
            ..
        }
    ));

    let ty = parse("stream<int, error>");
    let TypeKind::Generic { args, .. } = ty.kind else {
        panic!("expected generic");
    };
    assert_eq!(args.len(), 2);

    let ty = parse("future");
    assert!(matches!(ty.kind, TypeKind::Generic { ref args, .. } if args.is_empty()));
}

#[test]
fn test_generic_argument_count_is_checked() {
    let err = expect_error("map<int, string>");
    assert_eq!(err.kind, ParseErrorKind::InvalidSyntax);
    let err = expect_error("map");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn test_function_type() {
    let ty = parse("function (int a, string... rest) returns boolean");
    let TypeKind::Function {
        params,
        return_type,
    } = ty.kind
    else {
        panic!("expected function type");
    };
    assert_eq!(params.len(), 2);
    assert!(params[1].rest);
    assert_eq!(params[0].name.as_deref(), Some("a"));
    assert!(return_type.is_some());
}

#[test]
fn test_object_type() {
    let ty = parse(
        "object { public string name; *Named; function greet(string who) returns string; }",
    );
    let TypeKind::Object { fields, methods } = ty.kind else {
        panic!("expected object type");
    };
    assert_eq!(fields.len(), 2);
    assert!(matches!(fields[1], FieldDesc::Inclusion(_)));
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].name, "greet");
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn test_inclusive_record() {
    let ty = parse("record { int id; string name?; boolean active = true; *Base; }");
    let TypeKind::Record {
        fields,
        rest,
        sealed,
    } = ty.kind
    else {
        panic!("expected record");
    };
    assert!(!sealed);
    assert!(rest.is_none());
    assert_eq!(fields.len(), 4);
    let FieldDesc::Field(name) = &fields[1] else {
        panic!("expected field");
    };
    assert!(name.optional);
    let FieldDesc::Field(active) = &fields[2] else {
        panic!("expected field");
    };
    assert!(active.default.is_some());
}

#[test]
fn test_exclusive_record_with_rest() {
    let ty = parse("record {| int id; string...; |}");
    let TypeKind::Record { rest, sealed, .. } = ty.kind else {
        panic!("expected record");
    };
    assert!(sealed);
    assert_eq!(simple_name(rest.as_deref().unwrap()), "string");
}

#[test]
fn test_rest_field_rules() {
    let err = expect_error("record { int id; string...; }");
    assert_eq!(err.kind, ParseErrorKind::InvalidSyntax);

    let err = expect_error("record {| string...; int id; |}");
    assert_eq!(err.kind, ParseErrorKind::InvalidSyntax);
}

#[test]
fn test_unclosed_record_names_opener() {
    let err = expect_error("record { int id;");
    assert_eq!(err.kind, ParseErrorKind::UnclosedDelimiter);
    assert!(err.message.contains("`{`"), "message: {}", err.message);
}

// =============================================================================
// Types in Expression Position
// =============================================================================

fn type_expr(source: &str) -> TypeDesc {
    match parse_expr(source, 0).expect("Parse failed") {
        Expr {
            kind: ExprKind::TypeDesc(ty),
            ..
        } => ty,
        other => panic!("expected type descriptor expression, got {:?}", other.kind),
    }
}

#[test]
fn test_builtin_type_as_expression() {
    assert!(matches!(type_expr("int[]").kind, TypeKind::Array { .. }));
    assert!(matches!(type_expr("map<string>").kind, TypeKind::Generic { .. }));
    assert!(matches!(type_expr("record {| int a; |}").kind, TypeKind::Record { .. }));
}

#[test]
fn test_builtin_type_qualified_reference_is_identifier() {
    let expr = parse_expr("int:MAX_VALUE", 0).expect("Parse failed");
    let ExprKind::Identifier(name) = expr.kind else {
        panic!("expected identifier, got {:?}", expr.kind);
    };
    assert_eq!(name.module.as_deref(), Some("int"));
    assert_eq!(name.name, "MAX_VALUE");
}
