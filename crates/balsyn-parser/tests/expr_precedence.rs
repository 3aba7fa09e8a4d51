//! Expression precedence and associativity tests.
//!
//! Each adjacent pair of levels in the precedence table gets at least one
//! test. Trees are rendered as s-expressions so the expected grouping is
//! readable at a glance: `1 + 2 * 3` renders as `(+ 1 (* 2 3))`.

use balsyn_ast::{Accessor, Expr, ExprKind, Literal, TypeDesc, TypeKind};
use balsyn_parser::parse_expr;

/// Helper to parse an expression from source.
fn parse(source: &str) -> Expr {
    parse_expr(source, 0).expect("Parse failed")
}

fn show_type(ty: &TypeDesc) -> String {
    match &ty.kind {
        TypeKind::Simple(name) => name.to_string(),
        TypeKind::Nullable(inner) => format!("{}?", show_type(inner)),
        TypeKind::Union { members } => members
            .iter()
            .map(show_type)
            .collect::<Vec<_>>()
            .join("|"),
        other => format!("{:?}", other),
    }
}

/// Render an expression as an s-expression.
fn show(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(Literal::Integer(n)) => n.to_string(),
        ExprKind::Literal(Literal::Boolean(b)) => b.to_string(),
        ExprKind::Literal(Literal::Nil) => "()".to_string(),
        ExprKind::Identifier(name) => name.to_string(),
        ExprKind::Group(inner) => show(inner),
        ExprKind::Unary { op, operand } => format!("({} {})", op, show(operand)),
        ExprKind::Binary { op, left, right } => {
            format!("({} {} {})", op, show(left), show(right))
        }
        ExprKind::Ternary {
            condition,
            then_branch,
            else_branch,
        } => format!(
            "(? {} {} {})",
            show(condition),
            show(then_branch),
            show(else_branch)
        ),
        ExprKind::Range {
            from,
            to,
            inclusive,
        } => format!(
            "({} {} {})",
            if *inclusive { "..." } else { "..<" },
            show(from),
            show(to)
        ),
        ExprKind::TypeTest { operand, ty } => format!("(is {} {})", show(operand), show_type(ty)),
        ExprKind::Cast {
            target, operand, ..
        } => match target {
            Some(ty) => format!("(<{}> {})", show_type(ty), show(operand)),
            None => format!("(<> {})", show(operand)),
        },
        ExprKind::Check { panics, operand } => format!(
            "({} {})",
            if *panics { "checkpanic" } else { "check" },
            show(operand)
        ),
        ExprKind::Postfix { base, accessor } => match accessor {
            Accessor::Field { name, optional } => {
                format!("({} {} {})", if *optional { "?." } else { "." }, show(base), name)
            }
            Accessor::Index(index) => format!("([] {} {})", show(base), show(index)),
            Accessor::Annotation(name) => format!("(.@ {} {})", show(base), name),
        },
        ExprKind::Call { callee, args } => format!("(call {} {})", show(callee), args.len()),
        ExprKind::Send {
            value,
            worker,
            sync,
        } => format!("({} {} {})", if *sync { "->>" } else { "->" }, show(value), worker),
        ExprKind::TypeDesc(ty) => format!("<type {}>", show_type(ty)),
        other => format!("{:?}", other),
    }
}

fn assert_parses_as(source: &str, expected: &str) {
    assert_eq!(show(&parse(source)), expected, "source: {}", source);
}

// =============================================================================
// Adjacent Levels (tightest to loosest)
// =============================================================================

#[test]
fn test_unary_vs_postfix() {
    assert_parses_as("-a.b", "(- (. a b))");
    assert_parses_as("!f(x)", "(! (call f 1))");
    assert_parses_as("-a[0]?.c", "(- (?. ([] a 0) c))");
}

#[test]
fn test_check_vs_unary() {
    assert_parses_as("check -a", "(check (- a))");
}

#[test]
fn test_multiplicative_vs_check() {
    assert_parses_as("check a * b", "(* (check a) b)");
    assert_parses_as("check a + b", "(+ (check a) b)");
}

#[test]
fn test_check_nests() {
    assert_parses_as("check check f()", "(check (check (call f 0)))");
    assert_parses_as("checkpanic f()", "(checkpanic (call f 0))");
}

#[test]
fn test_additive_vs_multiplicative() {
    assert_parses_as("1 + 2 * 3", "(+ 1 (* 2 3))");
    assert_parses_as("1 * 2 - 3 % 4", "(- (* 1 2) (% 3 4))");
}

#[test]
fn test_shift_vs_additive() {
    assert_parses_as("a + b << c", "(<< (+ a b) c)");
    assert_parses_as("a >> b - c", "(>> a (- b c))");
    assert_parses_as("a >>> 1", "(>>> a 1)");
}

#[test]
fn test_range_vs_shift() {
    assert_parses_as("a << 1 ... b", "(... (<< a 1) b)");
    assert_parses_as("0 ..< n >> 1", "(..< 0 (>> n 1))");
}

#[test]
fn test_relational_vs_range() {
    assert_parses_as("a < 1 ... 5", "(< a (... 1 5))");
}

#[test]
fn test_type_test_vs_relational() {
    assert_parses_as("a < b is boolean", "(is (< a b) boolean)");
}

#[test]
fn test_equality_vs_type_test() {
    assert_parses_as("a == b is int", "(== a (is b int))");
}

#[test]
fn test_ref_equality_vs_equality() {
    assert_parses_as("a === b == c", "(=== a (== b c))");
}

#[test]
fn test_bitwise_and_vs_ref_equality() {
    assert_parses_as("a & b !== c", "(& a (!== b c))");
}

#[test]
fn test_bitwise_or_vs_bitwise_and() {
    assert_parses_as("a | b & c", "(| a (& b c))");
    assert_parses_as("a ^ b & c", "(^ a (& b c))");
}

#[test]
fn test_logical_and_vs_bitwise_or() {
    assert_parses_as("a && b | c", "(&& a (| b c))");
}

#[test]
fn test_logical_or_vs_logical_and() {
    assert_parses_as("a || b && c", "(|| a (&& b c))");
}

#[test]
fn test_elvis_vs_logical_or() {
    assert_parses_as("a || b ?: c", "(?: (|| a b) c)");
}

#[test]
fn test_ternary_vs_elvis() {
    assert_parses_as("a ?: b ? c : d", "(? (?: a b) c d)");
}

#[test]
fn test_send_vs_ternary() {
    assert_parses_as("a ? b : c -> w", "(-> (? a b c) w)");
    assert_parses_as("x + 1 ->> function", "(->> (+ x 1) function)");
}

// =============================================================================
// Associativity
// =============================================================================

#[test]
fn test_binary_left_associative() {
    assert_parses_as("a - b - c", "(- (- a b) c)");
    assert_parses_as("a < b < c", "(< (< a b) c)");
    assert_parses_as("a ?: b ?: c", "(?: (?: a b) c)");
    assert_parses_as("a is int is boolean", "(is (is a int) boolean)");
}

#[test]
fn test_ternary_right_associative() {
    assert_parses_as("a ? b : c ? d : e", "(? a b (? c d e))");
}

#[test]
fn test_ternary_then_branch_takes_any_expression() {
    assert_parses_as("a ? b ? c : d : e", "(? a (? b c d) e)");
}

#[test]
fn test_ternary_without_spaces_around_colon() {
    assert_parses_as("c ? a:b", "(? c a b)");
    assert_parses_as("c ? x + a:b", "(? c (+ x a) b)");
    assert_parses_as("a ? b ? c:d : e", "(? a (? b c d) e)");
}

#[test]
fn test_ternary_keeps_qualified_then_branch() {
    assert_parses_as("c ? io:x : y", "(? c io:x y)");
    assert_parses_as("c ? io:x : m:y", "(? c io:x m:y)");
}

#[test]
fn test_grouping_overrides_precedence() {
    assert_parses_as("(1 + 2) * 3", "(* (+ 1 2) 3)");
}

// =============================================================================
// Cast vs Shift vs Relational
// =============================================================================

#[test]
fn test_cast() {
    assert_parses_as("<int>x", "(<int> x)");
    assert_parses_as("<int>a[0]", "(<int> ([] a 0))");
    assert_parses_as("<int>a + b", "(+ (<int> a) b)");
}

#[test]
fn test_cast_with_annotation_only() {
    let expr = parse("<@untainted>x");
    let ExprKind::Cast {
        annotations,
        target,
        ..
    } = expr.kind
    else {
        panic!("expected cast, got {:?}", expr.kind);
    };
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].name.to_string(), "untainted");
    assert!(target.is_none());
}

#[test]
fn test_shift_needs_adjacent_tokens() {
    assert_parses_as("a << b", "(<< a b)");
    assert_parses_as("a < <int>b", "(< a (<int> b))");
}

#[test]
fn test_nested_generic_cast_closes() {
    let expr = parse("<map<map<int>>>m");
    let ExprKind::Cast {
        target: Some(ty), ..
    } = expr.kind
    else {
        panic!("expected cast, got {:?}", expr.kind);
    };
    assert!(matches!(ty.kind, TypeKind::Generic { .. }));
}

// =============================================================================
// Type Tests and Ternaries
// =============================================================================

#[test]
fn test_is_then_ternary() {
    assert_parses_as("x is int ? a : b", "(? (is x int) a b)");
}

#[test]
fn test_is_nullable_type() {
    assert_parses_as("x is int?", "(is x int?)");
    assert_parses_as("x is int|string", "(is x int|string)");
}

// =============================================================================
// Non-associative and Non-chaining Operators
// =============================================================================

#[test]
fn test_range_is_non_associative() {
    let errors = parse_expr("a ... b ... c", 0).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, balsyn_parser::ParseErrorKind::InvalidSyntax);
    // reported at the second `...`
    assert_eq!(errors[0].span.start, 8);
}

#[test]
fn test_send_does_not_chain() {
    let errors = parse_expr("a -> w -> v", 0).unwrap_err();
    assert_eq!(errors[0].kind, balsyn_parser::ParseErrorKind::InvalidSyntax);
}
