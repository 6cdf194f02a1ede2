//! Tokens for `$apply`-style aggregation statements
//!
//! Unlike the rest of the tree these carry construction invariants beyond
//! what the type system gives us (non-empty alias, non-empty statement and
//! property lists), so their constructors are fallible.

use crate::{PropertyPathToken, QueryToken};
use odata_uri_diagnostics::{ODU0103, Result, UriParseError};
use serde::{Deserialize, Serialize};

/// Aggregation verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationVerb {
    Sum,
    Min,
    Max,
    Average,
    CountDistinct,
}

impl AggregationVerb {
    /// Get the verb keyword as it appears in the URI
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Average => "average",
            Self::CountDistinct => "countdistinct",
        }
    }

    /// Resolve a verb keyword
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "sum" => Some(Self::Sum),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "average" => Some(Self::Average),
            "countdistinct" => Some(Self::CountDistinct),
            _ => None,
        }
    }
}

/// One aggregation statement: `expression with verb as alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatementToken {
    pub expression: Box<QueryToken>,
    pub verb: AggregationVerb,
    pub alias: String,
}

impl AggregateStatementToken {
    /// Create a statement; the alias must be non-empty
    pub fn new(
        expression: QueryToken,
        verb: AggregationVerb,
        alias: impl Into<String>,
    ) -> Result<Self> {
        let alias = alias.into();
        if alias.is_empty() {
            return Err(UriParseError::declaration(
                ODU0103,
                "Argument 'alias' must not be null or empty",
            ));
        }
        Ok(Self {
            expression: Box::new(expression),
            verb,
            alias,
        })
    }
}

/// The `aggregate(...)` transformation: one or more statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateToken {
    pub statements: Vec<AggregateStatementToken>,
}

impl AggregateToken {
    /// Create an aggregation; the statement list must be non-empty
    pub fn new(statements: Vec<AggregateStatementToken>) -> Result<Self> {
        if statements.is_empty() {
            return Err(UriParseError::declaration(
                ODU0103,
                "Argument 'statements' must not be null or empty",
            ));
        }
        Ok(Self { statements })
    }
}

/// The `groupby(...)` transformation: grouping properties plus an optional
/// nested aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupByToken {
    pub properties: Vec<PropertyPathToken>,
    pub child_transformation: Option<AggregateToken>,
}

impl GroupByToken {
    /// Create a grouping; the property list must be non-empty
    pub fn new(
        properties: Vec<PropertyPathToken>,
        child_transformation: Option<AggregateToken>,
    ) -> Result<Self> {
        if properties.is_empty() {
            return Err(UriParseError::declaration(
                ODU0103,
                "Argument 'properties' must not be null or empty",
            ));
        }
        Ok(Self {
            properties,
            child_transformation,
        })
    }
}

/// One transformation in a `$apply` chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApplyTransformation {
    Aggregate(AggregateToken),
    GroupBy(GroupByToken),
    Filter(Box<QueryToken>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EndPathToken;

    fn amount() -> QueryToken {
        QueryToken::EndPath(EndPathToken::new("Amount", None))
    }

    #[test]
    fn test_statement_requires_alias() {
        let err = AggregateStatementToken::new(amount(), AggregationVerb::Sum, "").unwrap_err();
        assert!(err.message().contains("alias"));

        let ok = AggregateStatementToken::new(amount(), AggregationVerb::Sum, "Total").unwrap();
        assert_eq!(ok.alias, "Total");
        assert_eq!(ok.verb, AggregationVerb::Sum);
    }

    #[test]
    fn test_aggregate_requires_statements() {
        let err = AggregateToken::new(Vec::new()).unwrap_err();
        assert!(err.message().contains("statements"));
    }

    #[test]
    fn test_groupby_requires_properties() {
        let err = GroupByToken::new(Vec::new(), None).unwrap_err();
        assert!(err.message().contains("properties"));
    }

    #[test]
    fn test_expression_is_always_present_by_construction() {
        // The original API guarded a null expression at runtime; here the
        // parameter type makes that state unrepresentable.
        let stmt =
            AggregateStatementToken::new(amount(), AggregationVerb::CountDistinct, "Kinds")
                .unwrap();
        assert!(matches!(*stmt.expression, QueryToken::EndPath(_)));
    }
}
