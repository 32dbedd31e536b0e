//! DDL parser.
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! `CREATE TABLE` is parsed in full; every other statement is captured as
//! [`Statement::Unsupported`](crate::ast::Statement::Unsupported).

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::{Parser, MAX_EXPRESSION_DEPTH};
