//! Tests for `$filter`/`$orderby` expression parsing
//!
//! Covers:
//! - Operator precedence and grouping
//! - Path navigation and function calls
//! - Lambda operators and range-variable scoping
//! - Recursion-depth limits

use odata_uri_ast::{
    BinaryOperatorKind, OrderByDirection, PrimitiveValue, QueryToken, QueryTokenKind,
    UnaryOperatorKind,
};
use odata_uri_diagnostics::UriParseError;
use odata_uri_parser::UriQueryExpressionParser;
use pretty_assertions::assert_eq;

fn parse(text: &str) -> QueryToken {
    UriQueryExpressionParser::new(800)
        .parse_filter(text)
        .unwrap_or_else(|e| panic!("failed to parse '{text}': {e}"))
}

fn parse_err(text: &str) -> UriParseError {
    UriQueryExpressionParser::new(800)
        .parse_filter(text)
        .expect_err("expected a parse error")
}

// === Precedence ===

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    let QueryToken::BinaryOperator(add) = parse("1 add 2 mul 3") else {
        panic!("expected binary operator");
    };
    assert_eq!(add.kind, BinaryOperatorKind::Add);
    assert!(matches!(
        *add.right,
        QueryToken::BinaryOperator(ref mul) if mul.kind == BinaryOperatorKind::Multiply
    ));
}

#[test]
fn test_or_binds_loosest() {
    let QueryToken::BinaryOperator(or) = parse("Age gt 10 and Name eq 'x' or Active") else {
        panic!("expected binary operator");
    };
    assert_eq!(or.kind, BinaryOperatorKind::Or);
    assert!(matches!(
        *or.left,
        QueryToken::BinaryOperator(ref and) if and.kind == BinaryOperatorKind::And
    ));
}

#[test]
fn test_left_associativity() {
    let QueryToken::BinaryOperator(outer) = parse("1 sub 2 sub 3") else {
        panic!("expected binary operator");
    };
    assert_eq!(outer.kind, BinaryOperatorKind::Subtract);
    // (1 sub 2) sub 3
    assert!(matches!(
        *outer.left,
        QueryToken::BinaryOperator(ref inner) if inner.kind == BinaryOperatorKind::Subtract
    ));
    assert!(matches!(*outer.right, QueryToken::Literal(_)));
}

#[test]
fn test_parens_override_precedence() {
    let QueryToken::BinaryOperator(mul) = parse("(1 add 2) mul 3") else {
        panic!("expected binary operator");
    };
    assert_eq!(mul.kind, BinaryOperatorKind::Multiply);
    assert!(matches!(
        *mul.left,
        QueryToken::BinaryOperator(ref add) if add.kind == BinaryOperatorKind::Add
    ));
}

#[test]
fn test_not_applies_to_comparison() {
    let QueryToken::UnaryOperator(not) = parse("not Name eq 'Bob'") else {
        panic!("expected unary operator");
    };
    assert_eq!(not.kind, UnaryOperatorKind::Not);
    assert!(matches!(
        *not.operand,
        QueryToken::BinaryOperator(ref eq) if eq.kind == BinaryOperatorKind::Equal
    ));
}

#[test]
fn test_negation() {
    let QueryToken::UnaryOperator(neg) = parse("-5") else {
        panic!("expected unary operator");
    };
    assert_eq!(neg.kind, UnaryOperatorKind::Negate);
    assert!(matches!(
        *neg.operand,
        QueryToken::Literal(ref lit) if lit.value == PrimitiveValue::Int32(5)
    ));
}

#[test]
fn test_has_operator() {
    let QueryToken::BinaryOperator(has) = parse("Permissions has Granted") else {
        panic!("expected binary operator");
    };
    assert_eq!(has.kind, BinaryOperatorKind::Has);
}

// === Paths, functions, casts ===

#[test]
fn test_path_navigation_inner_and_end() {
    let token = parse("A/B/C");
    let QueryToken::EndPath(end) = token else {
        panic!("expected end path");
    };
    assert_eq!(end.identifier, "C");
    let QueryToken::InnerPath(middle) = *end.source.expect("source") else {
        panic!("expected inner path for the non-trailing step");
    };
    assert_eq!(middle.identifier, "B");
    let QueryToken::InnerPath(first) = *middle.source.expect("source") else {
        panic!("expected inner path for the first step");
    };
    assert_eq!(first.identifier, "A");
    assert!(first.source.is_none());
}

#[test]
fn test_function_call_positional_arguments() {
    let QueryToken::FunctionCall(call) = parse("contains(Name,'abc')") else {
        panic!("expected function call");
    };
    assert_eq!(call.name, "contains");
    assert_eq!(call.arguments.len(), 2);
    assert!(call.arguments.iter().all(|a| a.name.is_none()));
    assert!(call.source.is_none());
}

#[test]
fn test_dotted_function_with_named_arguments() {
    let QueryToken::FunctionCall(call) = parse("NS.Model.Fn(first=1,second='two')") else {
        panic!("expected function call");
    };
    assert_eq!(call.name, "NS.Model.Fn");
    assert_eq!(
        call.arguments.iter().map(|a| a.name.as_deref()).collect::<Vec<_>>(),
        vec![Some("first"), Some("second")]
    );
}

#[test]
fn test_empty_argument_list_is_valid() {
    let QueryToken::FunctionCall(call) = parse("now()") else {
        panic!("expected function call");
    };
    assert!(call.arguments.is_empty());
}

#[test]
fn test_bound_function_after_navigation() {
    let QueryToken::FunctionCall(call) = parse("Orders/total()") else {
        panic!("expected function call");
    };
    assert_eq!(call.name, "total");
    assert!(matches!(
        call.source.as_deref(),
        Some(QueryToken::InnerPath(_))
    ));
}

#[test]
fn test_dotted_identifier_cast() {
    let token = parse("NS.DerivedType/Name");
    let QueryToken::EndPath(end) = token else {
        panic!("expected end path");
    };
    let QueryToken::DottedIdentifier(cast) = *end.source.expect("source") else {
        panic!("expected dotted identifier");
    };
    assert_eq!(cast.identifier, "NS.DerivedType");
}

#[test]
fn test_parenthesized_key_navigation_becomes_named_values() {
    let token = parse("Nav(first=1)/Prop");
    let QueryToken::EndPath(end) = token else {
        panic!("expected end path");
    };
    let QueryToken::InnerPath(inner) = *end.source.expect("source") else {
        panic!("expected inner path");
    };
    assert_eq!(inner.identifier, "Nav");
    assert_eq!(inner.named_values.len(), 1);
    assert_eq!(inner.named_values[0].name, "first");
}

// === Errors ===

#[test]
fn test_open_paren_then_eof_is_expression_expected() {
    let err = parse_err("func(");
    assert!(err.message().contains("Expression expected"));
    assert_eq!(err.location().map(|l| l.position), Some(5));
}

#[test]
fn test_missing_close_paren() {
    let err = parse_err("func(1,2");
    assert!(err.message().contains("')' or ',' expected"));
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let err = parse_err("1 eq 1 extra junk");
    assert!(matches!(err, UriParseError::Grammar { .. }));
}

// === Lambdas ===

#[test]
fn test_any_with_range_variable() {
    let QueryToken::Any(any) = parse("Things/any(a: a/Name eq 'x')") else {
        panic!("expected any token");
    };
    assert_eq!(any.parameter.as_deref(), Some("a"));
    assert!(matches!(*any.source, QueryToken::InnerPath(_)));
    assert!(matches!(*any.body, QueryToken::BinaryOperator(_)));
}

#[test]
fn test_bodiless_any() {
    let QueryToken::Any(any) = parse("Things/any()") else {
        panic!("expected any token");
    };
    assert_eq!(any.parameter, None);
    assert!(matches!(
        *any.body,
        QueryToken::Literal(ref lit) if lit.value == PrimitiveValue::Boolean(true)
    ));
}

#[test]
fn test_all_requires_boolean_body_shape() {
    let QueryToken::All(all) = parse("Things/all(t: t/Active)") else {
        panic!("expected all token");
    };
    assert_eq!(all.parameter.as_deref(), Some("t"));
}

#[test]
fn test_lambda_comma_separator_is_syntax_error_at_comma() {
    let err = parse_err("Things/any(a,true)");
    assert!(err.message().contains("Syntax error"));
    assert_eq!(err.location().map(|l| l.position), Some(12));
}

#[test]
fn test_implicit_variable_cannot_be_redeclared() {
    let err = parse_err("Things/any($it:true)");
    assert!(err.message().contains("$it"));
    assert!(err.message().contains("already been declared"));
}

#[test]
fn test_shadowing_is_rejected() {
    let err = parse_err("Things/any(o:o/Things/any(o:true))");
    assert!(err.message().contains("'o'"));
    assert!(err.message().contains("already been declared"));
}

#[test]
fn test_range_variable_reverts_after_scope_exit() {
    let QueryToken::BinaryOperator(and) = parse("Things/any(o:true) and o") else {
        panic!("expected binary operator");
    };
    // The trailing `o` is an ordinary property path, not a range variable
    let QueryToken::EndPath(end) = &*and.right else {
        panic!("expected end path, got {:?}", and.right.kind());
    };
    assert_eq!(end.identifier, "o");
    assert!(end.source.is_none());
}

#[test]
fn test_range_variable_binds_inside_scope() {
    let QueryToken::Any(any) = parse("Things/any(o: o eq 1)") else {
        panic!("expected any token");
    };
    let QueryToken::BinaryOperator(eq) = &*any.body else {
        panic!("expected comparison body");
    };
    assert_eq!(eq.left.kind(), QueryTokenKind::RangeVariable);
}

#[test]
fn test_top_level_lambda_is_ordinary_function_call() {
    // Without a preceding collection source, `any` is just a function name
    // and the colon is unexpected in its argument list.
    let err = parse_err("any(a: true)");
    assert!(err.message().contains("')' or ',' expected"));
}

// === Depth limits ===

#[test]
fn test_explicit_grouping_adds_a_nesting_level() {
    let parser = UriQueryExpressionParser::new(1);
    assert!(parser.parse_filter("a or b and c").is_ok());
    let err = parser.parse_filter("(a or b) and c").unwrap_err();
    assert!(matches!(err, UriParseError::Limit { .. }));
}

#[test]
fn test_pathological_nesting_fails_with_too_deep_not_a_crash() {
    let inner = "a".to_string();
    let text = format!("{}{}{}", "(".repeat(2000), inner, ")".repeat(2000));
    let err = UriQueryExpressionParser::new(800).parse_filter(&text).unwrap_err();
    assert!(matches!(err, UriParseError::Limit { .. }));
}

// === $orderby ===

#[test]
fn test_order_by_directions() {
    let orderings = UriQueryExpressionParser::new(800)
        .parse_order_by("Name desc, Age, Total asc")
        .unwrap();
    assert_eq!(orderings.len(), 3);
    assert_eq!(orderings[0].direction, OrderByDirection::Descending);
    assert_eq!(orderings[1].direction, OrderByDirection::Ascending);
    assert_eq!(orderings[2].direction, OrderByDirection::Ascending);
}

#[test]
fn test_order_by_expression_can_navigate() {
    let orderings = UriQueryExpressionParser::new(800)
        .parse_order_by("Customer/Name desc")
        .unwrap();
    assert_eq!(orderings.len(), 1);
    assert_eq!(orderings[0].expression.kind(), QueryTokenKind::EndPath);
}
