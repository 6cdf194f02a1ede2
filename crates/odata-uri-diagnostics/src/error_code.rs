//! URI parse error codes following a structured numbering system
//!
//! Error code ranges:
//! - ODU0001-ODU0099: Lexical and grammar errors (syntax)
//! - ODU0100-ODU0199: Declaration errors (range variables, literals, construction)
//! - ODU0200-ODU0299: Limit errors (recursion and segment ceilings)
//! - ODU0300-ODU0399: URI errors (request/base URI handling)
//! - ODU0400-ODU0499: Internal errors (unsupported dispatch)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a lexical or grammar error (0001-0099)
    pub const fn is_grammar_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a declaration error (0100-0199)
    pub const fn is_declaration_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a limit error (0200-0299)
    pub const fn is_limit_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a URI error (0300-0399)
    pub const fn is_uri_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is an internal error (0400-0499)
    pub const fn is_internal_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ODU{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

// Static error info storage
static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

use std::collections::HashMap;
use std::sync::LazyLock;

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Lexical and grammar errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unrecognized character"));
    map.insert(2, ErrorInfo::new("Unbalanced bracket expression"));
    map.insert(3, ErrorInfo::new("Syntax error"));
    map.insert(4, ErrorInfo::new("'(' expected"));
    map.insert(5, ErrorInfo::new("')' or ',' expected"));
    map.insert(6, ErrorInfo::new("Expression expected"));
    map.insert(7, ErrorInfo::new("Identifier expected"));
    map.insert(8, ErrorInfo::new("Term is not valid"));
    map.insert(9, ErrorInfo::new("Expand navigation is missing its options")
        .with_help("Remove the empty parentheses or supply at least one query option"));
    map.insert(10, ErrorInfo::new("Unexpected token after end of expression"));

    // Declaration errors (0100-0199)
    map.insert(100, ErrorInfo::new("Range variable already declared")
        .with_help("Lambda range variables cannot shadow an outer variable or the implicit '$it'"));
    map.insert(101, ErrorInfo::new("Cannot create star token from a non-star identifier"));
    map.insert(102, ErrorInfo::new("Invalid spatial data"));
    map.insert(103, ErrorInfo::new("Argument must not be null or empty"));

    // Limit errors (0200-0299)
    map.insert(200, ErrorInfo::new("Recursion limit exceeded")
        .with_help("The query is nested more deeply than the configured limit allows"));
    map.insert(201, ErrorInfo::new("Too many segments in the request path"));

    // URI errors (0300-0399)
    map.insert(300, ErrorInfo::new("Request URI does not have the correct base URI"));

    // Internal errors (0400-0499)
    map.insert(400, ErrorInfo::new("Token kind is not supported"));

    map
});

// Convenient error code constants

// Lexical and grammar errors
pub const ODU0001: ErrorCode = ErrorCode::new(1);
pub const ODU0002: ErrorCode = ErrorCode::new(2);
pub const ODU0003: ErrorCode = ErrorCode::new(3);
pub const ODU0004: ErrorCode = ErrorCode::new(4);
pub const ODU0005: ErrorCode = ErrorCode::new(5);
pub const ODU0006: ErrorCode = ErrorCode::new(6);
pub const ODU0007: ErrorCode = ErrorCode::new(7);
pub const ODU0008: ErrorCode = ErrorCode::new(8);
pub const ODU0009: ErrorCode = ErrorCode::new(9);
pub const ODU0010: ErrorCode = ErrorCode::new(10);

// Declaration errors
pub const ODU0100: ErrorCode = ErrorCode::new(100);
pub const ODU0101: ErrorCode = ErrorCode::new(101);
pub const ODU0102: ErrorCode = ErrorCode::new(102);
pub const ODU0103: ErrorCode = ErrorCode::new(103);

// Limit errors
pub const ODU0200: ErrorCode = ErrorCode::new(200);
pub const ODU0201: ErrorCode = ErrorCode::new(201);

// URI errors
pub const ODU0300: ErrorCode = ErrorCode::new(300);

// Internal errors
pub const ODU0400: ErrorCode = ErrorCode::new(400);
