//! Token types for the DDL lexer.

use super::Span;

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// Reserved words of the dialect.
        ///
        /// Non-reserved words are lexed as [`TokenKind::Identifier`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Attempts to parse a reserved word (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the canonical upper-case spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    And => "AND",
    As => "AS",
    Asc => "ASC",
    Binary => "BINARY",
    Cascade => "CASCADE",
    Character => "CHARACTER",
    Check => "CHECK",
    Collate => "COLLATE",
    Constraint => "CONSTRAINT",
    Create => "CREATE",
    Default => "DEFAULT",
    Delete => "DELETE",
    Desc => "DESC",
    Div => "DIV",
    Exists => "EXISTS",
    False => "FALSE",
    Foreign => "FOREIGN",
    Fulltext => "FULLTEXT",
    Generated => "GENERATED",
    If => "IF",
    Index => "INDEX",
    Is => "IS",
    Key => "KEY",
    Like => "LIKE",
    Match => "MATCH",
    Mod => "MOD",
    Not => "NOT",
    Null => "NULL",
    On => "ON",
    Or => "OR",
    Partition => "PARTITION",
    Primary => "PRIMARY",
    References => "REFERENCES",
    Restrict => "RESTRICT",
    Set => "SET",
    Stored => "STORED",
    Table => "TABLE",
    True => "TRUE",
    Unique => "UNIQUE",
    Unsigned => "UNSIGNED",
    Update => "UPDATE",
    Using => "USING",
    Virtual => "VIRTUAL",
    Xor => "XOR",
    Zerofill => "ZEROFILL",
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Integer literal that fits an `i64` (e.g., 42)
    Integer(i64),
    /// Any other numeric literal, kept as written (e.g., `3.50`, `1e3`)
    Decimal(String),
    /// String literal, unescaped (e.g., 'it''s')
    String(String),
    /// Hexadecimal literal digits (`0x1F` or `x'1F'`)
    Hex(String),
    /// Bit literal digits (`0b101` or `b'101'`)
    Bit(String),

    // Identifiers and keywords
    /// Bare identifier or non-reserved word
    Identifier(String),
    /// Back-quoted identifier, unescaped
    QuotedIdentifier(String),
    /// Reserved word
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <=>
    NullSafeEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// &&
    LogicalAnd,
    /// ||
    LogicalOr,
    /// !
    Bang,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// ?
    Question,
    /// @
    At,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a reserved-word token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns true for any token that spells a word: identifiers (bare or
    /// quoted) and reserved words.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) | TokenKind::Keyword(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("PRIMARY"), Some(Keyword::Primary));
        assert_eq!(Keyword::from_str("primary"), Some(Keyword::Primary));
        assert_eq!(Keyword::from_str("Zerofill"), Some(Keyword::Zerofill));
        // Non-reserved words stay identifiers.
        assert_eq!(Keyword::from_str("ENGINE"), None);
        assert_eq!(Keyword::from_str("comment"), None);
        assert_eq!(Keyword::from_str("AUTO_INCREMENT"), None);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::References.as_str(), "REFERENCES");
        assert_eq!(Keyword::Fulltext.as_str(), "FULLTEXT");
    }

    #[test]
    fn test_token_is_word() {
        let kw = Token::new(TokenKind::Keyword(Keyword::Key), Span::new(0, 3));
        let quoted = Token::new(TokenKind::QuotedIdentifier("k".into()), Span::new(0, 3));
        let comma = Token::new(TokenKind::Comma, Span::new(0, 1));
        assert!(kw.is_word());
        assert!(quoted.is_word());
        assert!(!comma.is_word());
        assert_eq!(kw.as_keyword(), Some(Keyword::Key));
        assert_eq!(comma.as_keyword(), None);
    }
}
