//! # schemeta-sql
//!
//! TiDB/MySQL DDL front end used by `schemeta`.
//!
//! This crate provides:
//! - A hand-written lexer that understands MySQL executable comments and
//!   TiDB feature comments (`/*T![auto_rand] ... */`)
//! - A recursive descent parser for `CREATE TABLE`, with Pratt expression
//!   parsing; other statements are kept as raw text
//! - [`format::Restore`], which writes expressions and key parts back as SQL
//!   under configurable quoting and casing
//! - [`visit::Visitor`], an enter/leave traversal over parsed statements
//!
//! ```rust
//! use schemeta_sql::ast::Statement;
//! use schemeta_sql::format::{restore_to_string, RestoreFlags};
//!
//! let statements = schemeta_sql::parse(
//!     "CREATE TABLE t (id INT NOT NULL, name VARCHAR(20) DEFAULT 'x')",
//! )
//! .unwrap();
//! let Statement::CreateTable(stmt) = &statements[0] else { unreachable!() };
//! assert_eq!(stmt.columns[1].field_type.compact_str(), "varchar(20)");
//!
//! let expr = match &stmt.columns[1].options[0] {
//!     schemeta_sql::ast::ColumnOption::Default(expr) => expr,
//!     _ => unreachable!(),
//! };
//! assert_eq!(
//!     restore_to_string(expr, RestoreFlags::STRING_SINGLE_QUOTES).unwrap(),
//!     "'x'"
//! );
//! ```

pub mod ast;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod visit;

pub use ast::Statement;
pub use format::{Restore, RestoreCtx, RestoreError, RestoreFlags};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use visit::{Node, VisitAction, Visitable, Visitor};

/// Parses a `;`-separated DDL script.
pub fn parse(sql: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::new(sql).parse_script()
}
