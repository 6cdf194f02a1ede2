//! Syntax tree definitions for OData-style URI query options
//!
//! This crate defines the token-tree nodes produced by the URI query parsers.
//! Tokens are immutable value nodes constructed bottom-up during a single
//! parse pass; each node solely owns its children. The tree is lexical only:
//! nothing here is bound against an entity model or evaluated.

mod aggregate;
mod operator;
mod primitive;
mod query_options;
mod token;
mod visitor;

pub use aggregate::*;
pub use operator::*;
pub use primitive::*;
pub use query_options::*;
pub use token::*;
pub use visitor::*;
