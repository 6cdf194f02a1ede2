//! OData URI diagnostics and error handling
//!
//! This crate provides the error handling infrastructure for the URI parsing
//! core, including error codes, source positions, and the typed parse error.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for URI parsing operations
pub type Result<T> = std::result::Result<T, UriParseError>;
