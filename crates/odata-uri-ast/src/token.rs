//! Expression token nodes
//!
//! `QueryToken` is the closed union over every token kind a parse can
//! produce. The `kind()` discriminator is fixed at construction and never
//! reinterpreted.

use crate::{
    AggregateStatementToken, AggregateToken, BinaryOperatorKind, ExpandTermToken, ExpandToken,
    GroupByToken, OrderByToken, PrimitiveValue, SelectToken, UnaryOperatorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator for every token kind in the syntax tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryTokenKind {
    Literal,
    EndPath,
    InnerPath,
    RangeVariable,
    FunctionCall,
    FunctionParameter,
    BinaryOperator,
    UnaryOperator,
    Any,
    All,
    DottedIdentifier,
    Star,
    OrderBy,
    Select,
    Expand,
    ExpandTerm,
    Aggregate,
    AggregateStatement,
    GroupBy,
}

impl QueryTokenKind {
    /// Get the kind name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Literal => "Literal",
            Self::EndPath => "EndPath",
            Self::InnerPath => "InnerPath",
            Self::RangeVariable => "RangeVariable",
            Self::FunctionCall => "FunctionCall",
            Self::FunctionParameter => "FunctionParameter",
            Self::BinaryOperator => "BinaryOperator",
            Self::UnaryOperator => "UnaryOperator",
            Self::Any => "Any",
            Self::All => "All",
            Self::DottedIdentifier => "DottedIdentifier",
            Self::Star => "Star",
            Self::OrderBy => "OrderBy",
            Self::Select => "Select",
            Self::Expand => "Expand",
            Self::ExpandTerm => "ExpandTerm",
            Self::Aggregate => "Aggregate",
            Self::AggregateStatement => "AggregateStatement",
            Self::GroupBy => "GroupBy",
        }
    }
}

impl fmt::Display for QueryTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed literal with its original text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralToken {
    /// The strongly-typed parsed value
    pub value: PrimitiveValue,
    /// The text the value was parsed from
    pub original_text: String,
}

impl LiteralToken {
    pub fn new(value: PrimitiveValue, original_text: impl Into<String>) -> Self {
        Self {
            value,
            original_text: original_text.into(),
        }
    }
}

/// A trailing property-access step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndPathToken {
    /// The property or navigation name
    pub identifier: String,
    /// The preceding path segment, if any
    pub source: Option<Box<QueryToken>>,
}

impl EndPathToken {
    pub fn new(identifier: impl Into<String>, source: Option<QueryToken>) -> Self {
        Self {
            identifier: identifier.into(),
            source: source.map(Box::new),
        }
    }
}

/// A `name=value` entry inside parenthesized navigation keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: LiteralToken,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: LiteralToken) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A non-trailing property-access step, possibly carrying key values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerPathToken {
    pub identifier: String,
    pub source: Option<Box<QueryToken>>,
    pub named_values: Vec<NamedValue>,
}

impl InnerPathToken {
    pub fn new(
        identifier: impl Into<String>,
        source: Option<QueryToken>,
        named_values: Vec<NamedValue>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            source: source.map(Box::new),
            named_values,
        }
    }
}

/// A reference to a lambda-bound range variable
///
/// Only constructed for names present in the current lexical scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeVariableToken {
    pub name: String,
}

impl RangeVariableToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One argument of a function call, optionally named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameterToken {
    pub name: Option<String>,
    pub value: Box<QueryToken>,
}

impl FunctionParameterToken {
    pub fn positional(value: QueryToken) -> Self {
        Self {
            name: None,
            value: Box::new(value),
        }
    }

    pub fn named(name: impl Into<String>, value: QueryToken) -> Self {
        Self {
            name: Some(name.into()),
            value: Box::new(value),
        }
    }
}

/// A (possibly dotted) function call with its argument list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallToken {
    pub name: String,
    pub arguments: Vec<FunctionParameterToken>,
    pub source: Option<Box<QueryToken>>,
}

impl FunctionCallToken {
    pub fn new(
        name: impl Into<String>,
        arguments: Vec<FunctionParameterToken>,
        source: Option<QueryToken>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            source: source.map(Box::new),
        }
    }
}

/// A binary operation; operands are fully parsed before construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperatorToken {
    pub kind: BinaryOperatorKind,
    pub left: Box<QueryToken>,
    pub right: Box<QueryToken>,
}

impl BinaryOperatorToken {
    pub fn new(kind: BinaryOperatorKind, left: QueryToken, right: QueryToken) -> Self {
        Self {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A unary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOperatorToken {
    pub kind: UnaryOperatorKind,
    pub operand: Box<QueryToken>,
}

impl UnaryOperatorToken {
    pub fn new(kind: UnaryOperatorKind, operand: QueryToken) -> Self {
        Self {
            kind,
            operand: Box::new(operand),
        }
    }
}

/// An `any(...)` lambda over a collection source
///
/// `parameter` is `None` for the bodiless `any()` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnyToken {
    pub source: Box<QueryToken>,
    pub parameter: Option<String>,
    pub body: Box<QueryToken>,
}

impl AnyToken {
    pub fn new(source: QueryToken, parameter: Option<String>, body: QueryToken) -> Self {
        Self {
            source: Box::new(source),
            parameter,
            body: Box::new(body),
        }
    }
}

/// An `all(...)` lambda over a collection source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllToken {
    pub source: Box<QueryToken>,
    pub parameter: Option<String>,
    pub body: Box<QueryToken>,
}

impl AllToken {
    pub fn new(source: QueryToken, parameter: Option<String>, body: QueryToken) -> Self {
        Self {
            source: Box::new(source),
            parameter,
            body: Box::new(body),
        }
    }
}

/// A namespace-or-type-qualified identifier used for casts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DottedIdentifierToken {
    pub identifier: String,
    /// The navigation step being cast, if any
    pub source: Option<Box<QueryToken>>,
}

impl DottedIdentifierToken {
    pub fn new(identifier: impl Into<String>, source: Option<QueryToken>) -> Self {
        Self {
            identifier: identifier.into(),
            source: source.map(Box::new),
        }
    }
}

/// The `*` wildcard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarToken {
    pub source: Option<Box<QueryToken>>,
}

impl StarToken {
    pub fn new(source: Option<QueryToken>) -> Self {
        Self {
            source: source.map(Box::new),
        }
    }
}

/// Closed union over every syntax-tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryToken {
    Literal(LiteralToken),
    EndPath(EndPathToken),
    InnerPath(InnerPathToken),
    RangeVariable(RangeVariableToken),
    FunctionCall(FunctionCallToken),
    FunctionParameter(FunctionParameterToken),
    BinaryOperator(BinaryOperatorToken),
    UnaryOperator(UnaryOperatorToken),
    Any(AnyToken),
    All(AllToken),
    DottedIdentifier(DottedIdentifierToken),
    Star(StarToken),
    OrderBy(OrderByToken),
    Select(SelectToken),
    Expand(ExpandToken),
    ExpandTerm(ExpandTermToken),
    Aggregate(AggregateToken),
    AggregateStatement(AggregateStatementToken),
    GroupBy(GroupByToken),
}

impl QueryToken {
    /// Get the kind discriminator for this node
    pub const fn kind(&self) -> QueryTokenKind {
        match self {
            Self::Literal(_) => QueryTokenKind::Literal,
            Self::EndPath(_) => QueryTokenKind::EndPath,
            Self::InnerPath(_) => QueryTokenKind::InnerPath,
            Self::RangeVariable(_) => QueryTokenKind::RangeVariable,
            Self::FunctionCall(_) => QueryTokenKind::FunctionCall,
            Self::FunctionParameter(_) => QueryTokenKind::FunctionParameter,
            Self::BinaryOperator(_) => QueryTokenKind::BinaryOperator,
            Self::UnaryOperator(_) => QueryTokenKind::UnaryOperator,
            Self::Any(_) => QueryTokenKind::Any,
            Self::All(_) => QueryTokenKind::All,
            Self::DottedIdentifier(_) => QueryTokenKind::DottedIdentifier,
            Self::Star(_) => QueryTokenKind::Star,
            Self::OrderBy(_) => QueryTokenKind::OrderBy,
            Self::Select(_) => QueryTokenKind::Select,
            Self::Expand(_) => QueryTokenKind::Expand,
            Self::ExpandTerm(_) => QueryTokenKind::ExpandTerm,
            Self::Aggregate(_) => QueryTokenKind::Aggregate,
            Self::AggregateStatement(_) => QueryTokenKind::AggregateStatement,
            Self::GroupBy(_) => QueryTokenKind::GroupBy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrimitiveValue;

    #[test]
    fn test_kind_is_fixed_at_construction() {
        let token = QueryToken::Literal(LiteralToken::new(PrimitiveValue::Boolean(true), "true"));
        assert_eq!(token.kind(), QueryTokenKind::Literal);

        let path = QueryToken::EndPath(EndPathToken::new("Name", Some(token)));
        assert_eq!(path.kind(), QueryTokenKind::EndPath);
    }

    #[test]
    fn test_binary_token_owns_operands() {
        let left = QueryToken::EndPath(EndPathToken::new("A", None));
        let right = QueryToken::EndPath(EndPathToken::new("B", None));
        let op = BinaryOperatorToken::new(BinaryOperatorKind::And, left, right);
        assert_eq!(op.left.kind(), QueryTokenKind::EndPath);
        assert_eq!(op.right.kind(), QueryTokenKind::EndPath);
    }

    #[test]
    fn test_tree_serializes_for_tooling() {
        let tree = QueryToken::BinaryOperator(BinaryOperatorToken::new(
            BinaryOperatorKind::Equal,
            QueryToken::EndPath(EndPathToken::new("Name", None)),
            QueryToken::Literal(LiteralToken::new(PrimitiveValue::Int32(1), "1")),
        ));
        let json = serde_json::to_string(&tree).unwrap();
        let back: QueryToken = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }
}
