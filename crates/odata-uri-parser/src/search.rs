//! `$search` parser
//!
//! A small recursive-descent grammar over search text: `AND`/`OR`/`NOT`
//! (uppercase keywords), implicit AND on adjacency, double-quoted phrases,
//! and grouping parentheses. The result reuses the expression token shapes,
//! with search words as string literals.

use odata_uri_ast::{
    BinaryOperatorKind, BinaryOperatorToken, LiteralToken, PrimitiveValue, QueryToken,
    UnaryOperatorKind, UnaryOperatorToken,
};
use odata_uri_diagnostics::{ODU0002, ODU0005, ODU0006, ODU0200, Result, UriParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchTokenKind {
    Word,
    Phrase,
    OpenParen,
    CloseParen,
    End,
}

#[derive(Debug, Clone)]
struct SearchToken<'a> {
    kind: SearchTokenKind,
    text: &'a str,
    position: usize,
}

fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '(' | ')' | '"')
}

fn tokenize_search(text: &str) -> Result<Vec<SearchToken<'_>>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let bytes = text.len();
    while pos < bytes {
        let ch = text[pos..].chars().next().expect("in bounds");
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }
        let start = pos;
        match ch {
            '(' => {
                pos += 1;
                tokens.push(SearchToken {
                    kind: SearchTokenKind::OpenParen,
                    text: &text[start..pos],
                    position: start,
                });
            }
            ')' => {
                pos += 1;
                tokens.push(SearchToken {
                    kind: SearchTokenKind::CloseParen,
                    text: &text[start..pos],
                    position: start,
                });
            }
            '"' => {
                pos += 1;
                loop {
                    match text[pos..].chars().next() {
                        Some('"') => {
                            pos += 1;
                            break;
                        }
                        Some(inner) => pos += inner.len_utf8(),
                        None => {
                            return Err(UriParseError::lexical_at(
                                ODU0002,
                                format!("Unterminated phrase in '{text}'"),
                                start,
                            ));
                        }
                    }
                }
                tokens.push(SearchToken {
                    kind: SearchTokenKind::Phrase,
                    text: &text[start..pos],
                    position: start,
                });
            }
            _ => {
                while let Some(word_ch) = text[pos..].chars().next() {
                    if is_word_char(word_ch) {
                        pos += word_ch.len_utf8();
                    } else {
                        break;
                    }
                }
                tokens.push(SearchToken {
                    kind: SearchTokenKind::Word,
                    text: &text[start..pos],
                    position: start,
                });
            }
        }
    }
    tokens.push(SearchToken {
        kind: SearchTokenKind::End,
        text: "",
        position: bytes,
    });
    Ok(tokens)
}

/// Parser for `$search` text, bounded by its own recursion limit
#[derive(Debug, Clone, Copy)]
pub struct SearchParser {
    max_depth: u32,
}

impl SearchParser {
    pub const fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Parse the search text, consuming the whole input
    pub fn parse(&self, text: &str) -> Result<QueryToken> {
        let tokens = tokenize_search(text)?;
        let mut run = SearchRun {
            text,
            tokens,
            index: 0,
            max_depth: self.max_depth,
            depth: 0,
        };
        let expr = run.parse_expression()?;
        let trailing = run.current();
        if trailing.kind != SearchTokenKind::End {
            return Err(UriParseError::grammar_at(
                ODU0005,
                format!("')' or ',' expected at position {} in '{text}'", trailing.position),
                trailing.position,
            ));
        }
        Ok(expr)
    }
}

struct SearchRun<'a> {
    text: &'a str,
    tokens: Vec<SearchToken<'a>>,
    index: usize,
    max_depth: u32,
    depth: u32,
}

impl<'a> SearchRun<'a> {
    fn current(&self) -> &SearchToken<'a> {
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }

    fn enter_recurse(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(UriParseError::limit(
                ODU0200,
                "The recursion limit of the search expression has been exceeded",
            ));
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<QueryToken> {
        self.enter_recurse()?;
        let result = self.parse_or()?;
        self.depth -= 1;
        Ok(result)
    }

    fn parse_or(&mut self) -> Result<QueryToken> {
        let mut left = self.parse_and()?;
        while self.current().kind == SearchTokenKind::Word && self.current().text == "OR" {
            self.advance();
            let right = self.parse_and()?;
            left = QueryToken::BinaryOperator(BinaryOperatorToken::new(
                BinaryOperatorKind::Or,
                left,
                right,
            ));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<QueryToken> {
        let mut left = self.parse_unary()?;
        loop {
            let token = self.current();
            let explicit_and = token.kind == SearchTokenKind::Word && token.text == "AND";
            // Adjacent terms combine with an implicit AND
            let implicit_and = matches!(
                token.kind,
                SearchTokenKind::Word | SearchTokenKind::Phrase | SearchTokenKind::OpenParen
            ) && token.text != "OR";
            if explicit_and {
                self.advance();
            } else if !implicit_and {
                break;
            }
            let right = self.parse_unary()?;
            left = QueryToken::BinaryOperator(BinaryOperatorToken::new(
                BinaryOperatorKind::And,
                left,
                right,
            ));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<QueryToken> {
        let token = self.current().clone();
        match token.kind {
            SearchTokenKind::Word if token.text == "NOT" => {
                self.advance();
                self.enter_recurse()?;
                let operand = self.parse_unary()?;
                self.depth -= 1;
                Ok(QueryToken::UnaryOperator(UnaryOperatorToken::new(
                    UnaryOperatorKind::Not,
                    operand,
                )))
            }
            SearchTokenKind::Word => {
                self.advance();
                Ok(QueryToken::Literal(LiteralToken::new(
                    PrimitiveValue::String(token.text.to_string()),
                    token.text,
                )))
            }
            SearchTokenKind::Phrase => {
                self.advance();
                let inner = token.text.trim_matches('"');
                Ok(QueryToken::Literal(LiteralToken::new(
                    PrimitiveValue::String(inner.to_string()),
                    token.text,
                )))
            }
            SearchTokenKind::OpenParen => {
                self.advance();
                let expr = self.parse_expression()?;
                let close = self.current();
                if close.kind != SearchTokenKind::CloseParen {
                    return Err(UriParseError::grammar_at(
                        ODU0005,
                        format!("')' or ',' expected at position {} in '{}'", close.position, self.text),
                        close.position,
                    ));
                }
                self.advance();
                Ok(expr)
            }
            _ => Err(UriParseError::grammar_at(
                ODU0006,
                format!("Expression expected at position {} in '{}'", token.position, self.text),
                token.position,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> QueryToken {
        SearchParser::new(100).parse(text).unwrap()
    }

    #[test]
    fn test_implicit_and() {
        let token = parse("red shirt");
        let QueryToken::BinaryOperator(op) = token else {
            panic!("expected binary operator");
        };
        assert_eq!(op.kind, BinaryOperatorKind::And);
    }

    #[test]
    fn test_keywords_and_grouping() {
        let token = parse("(red OR blue) AND NOT green");
        let QueryToken::BinaryOperator(and) = token else {
            panic!("expected and");
        };
        assert_eq!(and.kind, BinaryOperatorKind::And);
        assert!(matches!(*and.left, QueryToken::BinaryOperator(ref or) if or.kind == BinaryOperatorKind::Or));
        assert!(matches!(*and.right, QueryToken::UnaryOperator(_)));
    }

    #[test]
    fn test_phrase_keeps_original_text() {
        let token = parse("\"blue shirt\"");
        let QueryToken::Literal(literal) = token else {
            panic!("expected literal");
        };
        assert_eq!(literal.original_text, "\"blue shirt\"");
        assert_eq!(
            literal.value,
            PrimitiveValue::String("blue shirt".to_string())
        );
    }

    #[test]
    fn test_depth_limit() {
        // Each grouping paren adds one nesting level
        let parser = SearchParser::new(2);
        assert!(parser.parse("(a)").is_ok());
        assert!(parser.parse("((a))").is_err());
    }

    #[test]
    fn test_unterminated_phrase() {
        let err = SearchParser::new(100).parse("\"abc").unwrap_err();
        assert_eq!(err.code(), ODU0002);
    }
}
