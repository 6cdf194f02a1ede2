//! Tokens for the `$orderby`, `$select` and `$expand` query options

use crate::QueryToken;
use serde::{Deserialize, Serialize};

/// Sort direction for an `$orderby` term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

/// One `$orderby` term: an expression and a direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByToken {
    pub expression: Box<QueryToken>,
    pub direction: OrderByDirection,
}

impl OrderByToken {
    pub fn new(expression: QueryToken, direction: OrderByDirection) -> Self {
        Self {
            expression: Box::new(expression),
            direction,
        }
    }
}

/// A `/`-separated property path within a select or expand term
///
/// Segments are stored verbatim; a segment may be a type-qualified (dotted)
/// name or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyPathToken {
    pub segments: Vec<String>,
}

impl PropertyPathToken {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Render the path as it appeared in the URI
    pub fn path_text(&self) -> String {
        self.segments.join("/")
    }
}

/// The parsed `$select` clause: an ordered list of property paths
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectToken {
    pub properties: Vec<PropertyPathToken>,
}

impl SelectToken {
    pub fn new(properties: Vec<PropertyPathToken>) -> Self {
        Self { properties }
    }

    /// An empty (but non-null) select, produced for blank input
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// One `$expand` term with its nested query options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandTermToken {
    pub path: PropertyPathToken,
    pub filter: Option<Box<QueryToken>>,
    pub order_by: Vec<OrderByToken>,
    pub select: Option<SelectToken>,
    pub expand: Option<Box<ExpandToken>>,
    pub search: Option<Box<QueryToken>>,
}

impl ExpandTermToken {
    /// A term with no nested options
    pub fn path_only(path: PropertyPathToken) -> Self {
        Self {
            path,
            filter: None,
            order_by: Vec::new(),
            select: None,
            expand: None,
            search: None,
        }
    }

    /// Check whether any nested option is present
    pub fn has_options(&self) -> bool {
        self.filter.is_some()
            || !self.order_by.is_empty()
            || self.select.is_some()
            || self.expand.is_some()
            || self.search.is_some()
    }
}

/// The parsed `$expand` clause: an ordered list of expand terms
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpandToken {
    pub terms: Vec<ExpandTermToken>,
}

impl ExpandToken {
    pub fn new(terms: Vec<ExpandTermToken>) -> Self {
        Self { terms }
    }

    /// An empty (but non-null) expand, produced for blank input
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
