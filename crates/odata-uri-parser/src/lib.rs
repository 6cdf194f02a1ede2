//! OData URI query-option parsers
//!
//! Hand-written lexer and recursive-descent parsers turning the raw
//! `$filter`, `$orderby`, `$select`, `$expand`, `$search`, `$apply` and
//! request-path strings into the token trees defined in `odata-uri-ast`.
//! Parsing is purely syntactic: nothing is validated against an entity
//! model or bound to types.
//!
//! Every parser is synchronous and stateless across invocations; each parse
//! call owns its own cursor, depth counter and range-variable scope, so
//! independent parses may run concurrently without locking. Recursion is
//! bounded by the explicit limits in [`ParserLimits`], never by the host
//! call stack.

mod config;
mod expression;
mod lexer;
mod literal;
mod path;
mod search;
mod select_expand;

pub use config::{KeyDelimiter, ParserLimits};
pub use expression::UriQueryExpressionParser;
pub use lexer::{ExpressionLexer, ExpressionToken, ExpressionTokenKind, TokenStream, tokenize};
pub use literal::{LiteralParseFailure, LiteralParser};
pub use path::UriPathParser;
pub use search::SearchParser;
pub use select_expand::SelectExpandParser;
