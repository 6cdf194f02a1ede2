//! URI parse error types

use crate::{ErrorCode, SourceLocation};
use thiserror::Error;

/// Main parse error type for the URI parsing core
///
/// Every variant is a synchronous, recoverable-by-caller failure. The parser
/// never retries and never recovers partially; errors propagate to the
/// top-level parse entry point.
#[derive(Debug, Clone, Error)]
pub enum UriParseError {
    /// Lexical error (unrecognized character, unterminated quote or bracket)
    #[error("{code}: {message} at {location}")]
    Lexical {
        code: ErrorCode,
        message: String,
        location: SourceLocation,
    },

    /// Grammar error (missing or misplaced punctuation, invalid term)
    #[error("{code}: {message} at {location}")]
    Grammar {
        code: ErrorCode,
        message: String,
        location: SourceLocation,
    },

    /// Declaration error (duplicate range variable, star misuse,
    /// construction precondition violations)
    #[error("{code}: {message}")]
    Declaration { code: ErrorCode, message: String },

    /// Limit error (recursion depth or segment count exceeded)
    #[error("{code}: {message}")]
    Limit { code: ErrorCode, message: String },

    /// URI error (request URI inconsistent with the service base URI)
    #[error("{code}: {message} (request: '{request_uri}', base: '{base_uri}')")]
    Uri {
        code: ErrorCode,
        message: String,
        request_uri: String,
        base_uri: String,
    },

    /// Internal error (unsupported token dispatch)
    #[error("{code}: {message}")]
    Internal { code: ErrorCode, message: String },
}

impl UriParseError {
    /// Create a lexical error at a position
    pub fn lexical_at(code: ErrorCode, message: impl Into<String>, position: usize) -> Self {
        Self::Lexical {
            code,
            message: message.into(),
            location: SourceLocation::point(position),
        }
    }

    /// Create a grammar error at a position
    pub fn grammar_at(code: ErrorCode, message: impl Into<String>, position: usize) -> Self {
        Self::Grammar {
            code,
            message: message.into(),
            location: SourceLocation::point(position),
        }
    }

    /// Create a declaration error
    pub fn declaration(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Declaration {
            code,
            message: message.into(),
        }
    }

    /// Create a limit error
    pub fn limit(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Limit {
            code,
            message: message.into(),
        }
    }

    /// Create a URI mismatch error
    pub fn uri(
        code: ErrorCode,
        message: impl Into<String>,
        request_uri: impl Into<String>,
        base_uri: impl Into<String>,
    ) -> Self {
        Self::Uri {
            code,
            message: message.into(),
            request_uri: request_uri.into(),
            base_uri: base_uri.into(),
        }
    }

    /// Create an internal error
    pub fn internal(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Internal {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Lexical { code, .. } => *code,
            Self::Grammar { code, .. } => *code,
            Self::Declaration { code, .. } => *code,
            Self::Limit { code, .. } => *code,
            Self::Uri { code, .. } => *code,
            Self::Internal { code, .. } => *code,
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::Lexical { message, .. } => message,
            Self::Grammar { message, .. } => message,
            Self::Declaration { message, .. } => message,
            Self::Limit { message, .. } => message,
            Self::Uri { message, .. } => message,
            Self::Internal { message, .. } => message,
        }
    }

    /// Get the location if this error carries one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::Lexical { location, .. } => Some(*location),
            Self::Grammar { location, .. } => Some(*location),
            _ => None,
        }
    }
}
