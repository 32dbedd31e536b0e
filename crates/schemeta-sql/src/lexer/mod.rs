//! DDL lexer.
//!
//! Hand-written tokenizer for the TiDB/MySQL dialect. Only reserved words are
//! produced as [`Keyword`] tokens; every other word (type names, `ENGINE`,
//! `COMMENT`, `AUTO_INCREMENT`, ...) is an identifier that the parser matches
//! contextually, so such words stay usable as column names.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
