//! `$select` / `$expand` parser
//!
//! Terms are comma-separated property paths; an expand term may carry a
//! parenthesized, semicolon-separated group of nested query options. Nested
//! `$expand` recursion accumulates depth across the whole chain against the
//! select/expand limit.

use crate::config::ParserLimits;
use crate::expression::UriQueryExpressionParser;
use crate::search::SearchParser;
use odata_uri_ast::{ExpandTermToken, ExpandToken, PropertyPathToken, SelectToken};
use odata_uri_diagnostics::{
    ODU0002, ODU0003, ODU0007, ODU0008, ODU0009, ODU0200, Result, UriParseError,
};

/// Parser for the `$select` and `$expand` query options
#[derive(Debug, Clone, Copy)]
pub struct SelectExpandParser {
    limits: ParserLimits,
}

impl SelectExpandParser {
    pub const fn new(limits: ParserLimits) -> Self {
        Self { limits }
    }

    /// Parse a `$select` clause; absent or blank input is an empty token
    pub fn parse_select(&self, text: Option<&str>) -> Result<SelectToken> {
        let Some(text) = text else {
            return Ok(SelectToken::empty());
        };
        if text.trim().is_empty() {
            return Ok(SelectToken::empty());
        }
        reject_top_level_semicolons(text)?;

        let mut properties = Vec::new();
        for (offset, raw) in split_top_level(text, ',') {
            let (term_start, term) = trim_with_offset(offset, raw);
            if term.is_empty() {
                return Err(identifier_expected(term_start));
            }
            properties.push(parse_property_path(term, term_start)?);
        }
        Ok(SelectToken::new(properties))
    }

    /// Parse a `$expand` clause; absent or blank input is an empty token
    pub fn parse_expand(&self, text: Option<&str>) -> Result<ExpandToken> {
        let Some(text) = text else {
            return Ok(ExpandToken::empty());
        };
        if text.trim().is_empty() {
            return Ok(ExpandToken::empty());
        }
        self.parse_expand_at(text, 1)
    }

    fn parse_expand_at(&self, text: &str, depth: u32) -> Result<ExpandToken> {
        if depth > self.limits.select_expand_limit {
            return Err(UriParseError::limit(
                ODU0200,
                "The expand clause is nested more deeply than the allowed limit",
            ));
        }
        reject_top_level_semicolons(text)?;

        let mut terms = Vec::new();
        for (offset, raw) in split_top_level(text, ',') {
            let (term_start, term) = trim_with_offset(offset, raw);
            if term.is_empty() {
                return Err(identifier_expected(term_start));
            }
            terms.push(self.parse_expand_term(term, term_start, depth)?);
        }
        Ok(ExpandToken::new(terms))
    }

    fn parse_expand_term(&self, term: &str, term_start: usize, depth: u32) -> Result<ExpandTermToken> {
        let Some(open) = find_top_level_open_paren(term) else {
            let path = parse_property_path(term, term_start)?;
            return Ok(ExpandTermToken::path_only(path));
        };

        let close = find_matching_paren(term, open).ok_or_else(|| {
            UriParseError::lexical_at(
                ODU0002,
                format!("Unbalanced parentheses in '{term}'"),
                term_start + open,
            )
        })?;
        if !term[close + 1..].trim().is_empty() {
            return Err(term_is_not_valid(term, term_start));
        }

        let path_text = &term[..open];
        let path = parse_property_path(path_text, term_start)?;

        let content = &term[open + 1..close];
        if content.trim().is_empty() {
            return Err(UriParseError::grammar_at(
                ODU0009,
                format!(
                    "The navigation property '{path_text}' has empty parentheses; at least one expand option is required"
                ),
                term_start + open,
            ));
        }

        let mut result = ExpandTermToken::path_only(path);
        for (option_offset, raw_option) in split_top_level(content, ';') {
            let (option_start, option) = trim_with_offset(option_offset, raw_option);
            if option.is_empty() {
                continue;
            }
            let Some((name, value)) = option.split_once('=') else {
                return Err(UriParseError::grammar_at(
                    ODU0003,
                    format!("Syntax error: expand option '{option}' is missing a value"),
                    term_start + open + 1 + option_start,
                ));
            };
            let name = name.trim();
            match name {
                "$filter" => {
                    let parser = UriQueryExpressionParser::new(self.limits.filter_limit);
                    result.filter = Some(Box::new(parser.parse_filter(value)?));
                }
                "$orderby" => {
                    let parser = UriQueryExpressionParser::new(self.limits.order_by_limit);
                    result.order_by = parser.parse_order_by(value)?;
                }
                "$select" => {
                    result.select = Some(self.parse_select(Some(value))?);
                }
                "$expand" => {
                    result.expand = Some(Box::new(self.parse_expand_at(value, depth + 1)?));
                }
                "$search" => {
                    let parser = SearchParser::new(self.limits.search_limit);
                    result.search = Some(Box::new(parser.parse(value)?));
                }
                other => {
                    return Err(UriParseError::grammar_at(
                        ODU0003,
                        format!("Syntax error: '{other}' is not a supported expand option"),
                        term_start + open + 1 + option_start,
                    ));
                }
            }
        }
        Ok(result)
    }
}

fn identifier_expected(position: usize) -> UriParseError {
    UriParseError::grammar_at(
        ODU0007,
        format!("Identifier expected at position {position}"),
        position,
    )
}

fn term_is_not_valid(term: &str, position: usize) -> UriParseError {
    UriParseError::grammar_at(ODU0008, format!("The term '{term}' is not valid"), position)
}

/// Split on `separator` at paren depth zero, outside quoted runs
///
/// Returns each piece with its byte offset in the input.
fn split_top_level(text: &str, separator: char) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quotes = 0usize;
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '\'' => quotes += 1,
            '(' if quotes % 2 == 0 => depth += 1,
            ')' if quotes % 2 == 0 => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 && quotes % 2 == 0 => {
                parts.push((start, &text[start..i]));
                start = i + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push((start, &text[start..]));
    parts
}

/// A semicolon is only meaningful inside a nested option group
fn reject_top_level_semicolons(text: &str) -> Result<()> {
    let mut depth = 0usize;
    let mut quotes = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '\'' => quotes += 1,
            '(' if quotes % 2 == 0 => depth += 1,
            ')' if quotes % 2 == 0 => depth = depth.saturating_sub(1),
            ';' if depth == 0 && quotes % 2 == 0 => {
                return Err(UriParseError::grammar_at(
                    ODU0003,
                    format!("Syntax error: unexpected ';' at position {i}"),
                    i,
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn find_top_level_open_paren(term: &str) -> Option<usize> {
    let mut quotes = 0usize;
    for (i, ch) in term.char_indices() {
        match ch {
            '\'' => quotes += 1,
            '(' if quotes % 2 == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn find_matching_paren(term: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quotes = 0usize;
    for (i, ch) in term[open..].char_indices() {
        match ch {
            '\'' => quotes += 1,
            '(' if quotes % 2 == 0 => depth += 1,
            ')' if quotes % 2 == 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn trim_with_offset(offset: usize, raw: &str) -> (usize, &str) {
    let leading = raw.len() - raw.trim_start().len();
    (offset + leading, raw.trim())
}

/// Validate and split a term path: `/`-separated segments, each an
/// identifier, a dotted name, `NS.*`, or `*`
fn parse_property_path(term: &str, position: usize) -> Result<PropertyPathToken> {
    if term.is_empty() {
        return Err(identifier_expected(position));
    }
    let mut segments = Vec::new();
    for segment in term.split('/') {
        if !is_valid_segment(segment) {
            return Err(term_is_not_valid(term, position));
        }
        segments.push(segment.to_string());
    }
    Ok(PropertyPathToken::new(segments))
}

fn is_valid_segment(segment: &str) -> bool {
    if segment == "*" {
        return true;
    }
    // A qualified wildcard selects every member of a namespace
    let name = segment.strip_suffix(".*").unwrap_or(segment);
    if name.is_empty() {
        return false;
    }
    let mut chars = name.chars();
    let first = chars.next().expect("non-empty");
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    name.chars().all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SelectExpandParser {
        SelectExpandParser::new(ParserLimits::default())
    }

    #[test]
    fn test_blank_input_is_empty_not_error() {
        assert!(parser().parse_select(None).unwrap().is_empty());
        assert!(parser().parse_select(Some("   ")).unwrap().is_empty());
        assert!(parser().parse_expand(None).unwrap().is_empty());
        assert!(parser().parse_expand(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_empty_term_between_commas() {
        let err = parser().parse_select(Some("one,,two")).unwrap_err();
        assert_eq!(err.code(), ODU0007);
        assert_eq!(err.location().map(|l| l.position), Some(4));
    }

    #[test]
    fn test_interior_whitespace_is_invalid_term() {
        let err = parser().parse_select(Some("one two")).unwrap_err();
        assert_eq!(err.code(), ODU0008);
        assert!(err.message().contains("one two"));
    }

    #[test]
    fn test_trailing_unmatched_paren_is_invalid_term() {
        let err = parser().parse_expand(Some("Nav)")).unwrap_err();
        assert_eq!(err.code(), ODU0008);
    }

    #[test]
    fn test_semicolon_at_top_level() {
        let err = parser().parse_select(Some("one;two")).unwrap_err();
        assert_eq!(err.code(), ODU0003);
        let err = parser().parse_expand(Some("Nav;Other")).unwrap_err();
        assert_eq!(err.code(), ODU0003);
    }

    #[test]
    fn test_empty_expand_options() {
        let err = parser().parse_expand(Some("Nav()")).unwrap_err();
        assert_eq!(err.code(), ODU0009);
        assert!(err.message().contains("Nav"));
    }

    #[test]
    fn test_wildcard_terms() {
        let select = parser().parse_select(Some("*,NS.*,A/B")).unwrap();
        assert_eq!(select.properties.len(), 3);
        assert_eq!(select.properties[0].path_text(), "*");
        assert_eq!(select.properties[1].path_text(), "NS.*");
    }
}
