//! Tests for `$select`/`$expand` parsing
//!
//! Covers:
//! - Term splitting and validation
//! - Nested query options per expand term
//! - Accumulated nesting depth against the select/expand limit

use odata_uri_ast::{OrderByDirection, QueryTokenKind};
use odata_uri_diagnostics::UriParseError;
use odata_uri_parser::{ParserLimits, SelectExpandParser};
use pretty_assertions::assert_eq;

fn parser() -> SelectExpandParser {
    SelectExpandParser::new(ParserLimits::default())
}

fn with_expand_limit(limit: u32) -> SelectExpandParser {
    SelectExpandParser::new(ParserLimits {
        select_expand_limit: limit,
        ..ParserLimits::default()
    })
}

// === $select ===

#[test]
fn test_select_terms_in_order() {
    let select = parser().parse_select(Some("Name,Address/City,NS.Derived/Zip")).unwrap();
    let paths: Vec<String> = select.properties.iter().map(|p| p.path_text()).collect();
    assert_eq!(paths, vec!["Name", "Address/City", "NS.Derived/Zip"]);
}

#[test]
fn test_select_blank_and_absent_yield_empty() {
    assert!(parser().parse_select(None).unwrap().is_empty());
    assert!(parser().parse_select(Some(" \t ")).unwrap().is_empty());
}

#[test]
fn test_select_empty_term_is_identifier_expected() {
    let err = parser().parse_select(Some("one,,two")).unwrap_err();
    assert!(err.message().contains("Identifier expected"));
    assert_eq!(err.location().map(|l| l.position), Some(4));
}

#[test]
fn test_select_interior_whitespace_names_the_term() {
    let err = parser().parse_select(Some("Name,bad term")).unwrap_err();
    assert!(err.message().contains("'bad term'"));
}

#[test]
fn test_select_wildcards() {
    let select = parser().parse_select(Some("*,NS.*")).unwrap();
    assert_eq!(select.properties.len(), 2);
}

// === $expand ===

#[test]
fn test_expand_path_only_terms() {
    let expand = parser().parse_expand(Some("Orders,Customer/Address")).unwrap();
    assert_eq!(expand.terms.len(), 2);
    assert_eq!(expand.terms[0].path.path_text(), "Orders");
    assert!(!expand.terms[0].has_options());
}

#[test]
fn test_expand_nested_options() {
    let expand = parser()
        .parse_expand(Some(
            "Orders($filter=Total gt 100;$orderby=Created desc;$select=Id,Total;$search=urgent OR big;$expand=Lines)",
        ))
        .unwrap();
    assert_eq!(expand.terms.len(), 1);
    let term = &expand.terms[0];
    assert!(term.filter.as_deref().is_some_and(|f| f.kind() == QueryTokenKind::BinaryOperator));
    assert_eq!(term.order_by.len(), 1);
    assert_eq!(term.order_by[0].direction, OrderByDirection::Descending);
    assert_eq!(term.select.as_ref().unwrap().properties.len(), 2);
    assert!(term.search.is_some());
    let nested = term.expand.as_ref().unwrap();
    assert_eq!(nested.terms[0].path.path_text(), "Lines");
}

#[test]
fn test_expand_filter_value_may_contain_semicolons_in_strings() {
    let expand = parser()
        .parse_expand(Some("Orders($filter=Note eq 'a;b')"))
        .unwrap();
    assert!(expand.terms[0].filter.is_some());
}

#[test]
fn test_expand_empty_options_is_missing_expand_option() {
    let err = parser().parse_expand(Some("Nav()")).unwrap_err();
    assert!(err.message().contains("Nav"));
    assert!(err.message().contains("expand option"));
}

#[test]
fn test_expand_trailing_close_paren_is_invalid_term() {
    let err = parser().parse_expand(Some("Nav)")).unwrap_err();
    assert!(err.message().contains("not valid"));
}

#[test]
fn test_expand_garbage_after_options_is_invalid_term() {
    let err = parser().parse_expand(Some("Nav($select=a)junk")).unwrap_err();
    assert!(err.message().contains("not valid"));
}

#[test]
fn test_semicolon_outside_option_group_is_syntax_error() {
    let err = parser().parse_expand(Some("A;B")).unwrap_err();
    assert!(err.message().contains("';'"));
    let err = parser().parse_select(Some("A;B")).unwrap_err();
    assert!(err.message().contains("';'"));
}

#[test]
fn test_unknown_expand_option_is_rejected() {
    let err = parser().parse_expand(Some("Nav($bogus=1)")).unwrap_err();
    assert!(err.message().contains("$bogus"));
}

// === Depth accounting ===

fn nested_expand(levels: usize) -> String {
    // d1($expand=d2($expand=...dN)...)
    let mut text = format!("d{levels}");
    for level in (1..levels).rev() {
        text = format!("d{level}($expand={text})");
    }
    text
}

#[test]
fn test_expand_depth_at_the_limit_succeeds() {
    let expand = with_expand_limit(5).parse_expand(Some(&nested_expand(5))).unwrap();
    assert_eq!(expand.terms[0].path.path_text(), "d1");
}

#[test]
fn test_expand_depth_beyond_the_limit_is_too_deep() {
    let err = with_expand_limit(5).parse_expand(Some(&nested_expand(6))).unwrap_err();
    assert!(matches!(err, UriParseError::Limit { .. }));
}

#[test]
fn test_depth_accumulates_across_the_chain() {
    // Sibling terms do not accumulate; only the nesting chain does
    let expand = with_expand_limit(2)
        .parse_expand(Some("A($expand=B),C($expand=D)"))
        .unwrap();
    assert_eq!(expand.terms.len(), 2);

    let err = with_expand_limit(2)
        .parse_expand(Some("A($expand=B($expand=C))"))
        .unwrap_err();
    assert!(matches!(err, UriParseError::Limit { .. }));
}
