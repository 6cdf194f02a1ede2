//! Visitor dispatch over the token tree
//!
//! Consumers implement only the kinds they handle. Every method defaults to
//! an error naming the unhandled kind, so a partial visitor fails loudly
//! instead of silently skipping nodes.

use crate::{
    AggregateStatementToken, AggregateToken, AllToken, AnyToken, BinaryOperatorToken,
    DottedIdentifierToken, EndPathToken, ExpandTermToken, ExpandToken, FunctionCallToken,
    FunctionParameterToken, GroupByToken, InnerPathToken, LiteralToken, OrderByToken, QueryToken,
    QueryTokenKind, RangeVariableToken, SelectToken, StarToken, UnaryOperatorToken,
};
use odata_uri_diagnostics::{ODU0400, Result, UriParseError};

fn unsupported<T>(kind: QueryTokenKind) -> Result<T> {
    Err(UriParseError::internal(
        ODU0400,
        format!("Token kind '{kind}' is not supported by this visitor"),
    ))
}

/// Visitor over every token kind
pub trait SyntaxTreeVisitor<T> {
    fn visit_literal(&mut self, _token: &LiteralToken) -> Result<T> {
        unsupported(QueryTokenKind::Literal)
    }

    fn visit_end_path(&mut self, _token: &EndPathToken) -> Result<T> {
        unsupported(QueryTokenKind::EndPath)
    }

    fn visit_inner_path(&mut self, _token: &InnerPathToken) -> Result<T> {
        unsupported(QueryTokenKind::InnerPath)
    }

    fn visit_range_variable(&mut self, _token: &RangeVariableToken) -> Result<T> {
        unsupported(QueryTokenKind::RangeVariable)
    }

    fn visit_function_call(&mut self, _token: &FunctionCallToken) -> Result<T> {
        unsupported(QueryTokenKind::FunctionCall)
    }

    fn visit_function_parameter(&mut self, _token: &FunctionParameterToken) -> Result<T> {
        unsupported(QueryTokenKind::FunctionParameter)
    }

    fn visit_binary_operator(&mut self, _token: &BinaryOperatorToken) -> Result<T> {
        unsupported(QueryTokenKind::BinaryOperator)
    }

    fn visit_unary_operator(&mut self, _token: &UnaryOperatorToken) -> Result<T> {
        unsupported(QueryTokenKind::UnaryOperator)
    }

    fn visit_any(&mut self, _token: &AnyToken) -> Result<T> {
        unsupported(QueryTokenKind::Any)
    }

    fn visit_all(&mut self, _token: &AllToken) -> Result<T> {
        unsupported(QueryTokenKind::All)
    }

    fn visit_dotted_identifier(&mut self, _token: &DottedIdentifierToken) -> Result<T> {
        unsupported(QueryTokenKind::DottedIdentifier)
    }

    fn visit_star(&mut self, _token: &StarToken) -> Result<T> {
        unsupported(QueryTokenKind::Star)
    }

    fn visit_order_by(&mut self, _token: &OrderByToken) -> Result<T> {
        unsupported(QueryTokenKind::OrderBy)
    }

    fn visit_select(&mut self, _token: &SelectToken) -> Result<T> {
        unsupported(QueryTokenKind::Select)
    }

    fn visit_expand(&mut self, _token: &ExpandToken) -> Result<T> {
        unsupported(QueryTokenKind::Expand)
    }

    fn visit_expand_term(&mut self, _token: &ExpandTermToken) -> Result<T> {
        unsupported(QueryTokenKind::ExpandTerm)
    }

    fn visit_aggregate(&mut self, _token: &AggregateToken) -> Result<T> {
        unsupported(QueryTokenKind::Aggregate)
    }

    fn visit_aggregate_statement(&mut self, _token: &AggregateStatementToken) -> Result<T> {
        unsupported(QueryTokenKind::AggregateStatement)
    }

    fn visit_group_by(&mut self, _token: &GroupByToken) -> Result<T> {
        unsupported(QueryTokenKind::GroupBy)
    }
}

impl QueryToken {
    /// Dispatch to the visitor method matching this node's kind
    pub fn accept<T, V: SyntaxTreeVisitor<T> + ?Sized>(&self, visitor: &mut V) -> Result<T> {
        match self {
            Self::Literal(t) => visitor.visit_literal(t),
            Self::EndPath(t) => visitor.visit_end_path(t),
            Self::InnerPath(t) => visitor.visit_inner_path(t),
            Self::RangeVariable(t) => visitor.visit_range_variable(t),
            Self::FunctionCall(t) => visitor.visit_function_call(t),
            Self::FunctionParameter(t) => visitor.visit_function_parameter(t),
            Self::BinaryOperator(t) => visitor.visit_binary_operator(t),
            Self::UnaryOperator(t) => visitor.visit_unary_operator(t),
            Self::Any(t) => visitor.visit_any(t),
            Self::All(t) => visitor.visit_all(t),
            Self::DottedIdentifier(t) => visitor.visit_dotted_identifier(t),
            Self::Star(t) => visitor.visit_star(t),
            Self::OrderBy(t) => visitor.visit_order_by(t),
            Self::Select(t) => visitor.visit_select(t),
            Self::Expand(t) => visitor.visit_expand(t),
            Self::ExpandTerm(t) => visitor.visit_expand_term(t),
            Self::Aggregate(t) => visitor.visit_aggregate(t),
            Self::AggregateStatement(t) => visitor.visit_aggregate_statement(t),
            Self::GroupBy(t) => visitor.visit_group_by(t),
        }
    }
}
