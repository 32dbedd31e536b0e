//! DDL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes TiDB/MySQL DDL.
///
/// Executable comments (`/*! ... */`, `/*!50100 ... */`) and TiDB feature
/// comments (`/*T![auto_rand] ... */`) are not skipped: their bodies are
/// tokenized like ordinary text.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Number of executable comments whose closing `*/` is still pending.
    open_executable_comments: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            open_executable_comments: 0,
        }
    }

    /// Returns the full source text.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.input
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn rest_starts_with(&self, prefix: &str) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    fn skip_line(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.open_executable_comments > 0 && self.rest_starts_with("*/") {
                self.pos += 2;
                self.open_executable_comments -= 1;
                continue;
            }

            // `-- ` needs trailing whitespace in MySQL; `1--1` is arithmetic.
            if self.rest_starts_with("--") && self.peek_nth(2).is_none_or(char::is_whitespace) {
                self.skip_line();
                continue;
            }

            if self.peek() == Some('#') {
                self.skip_line();
                continue;
            }

            if self.rest_starts_with("/*!") {
                self.pos += 3;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
                self.open_executable_comments += 1;
                continue;
            }

            if self.rest_starts_with("/*T!") {
                self.pos += 4;
                if self.peek() == Some('[') {
                    while let Some(c) = self.advance() {
                        if c == ']' {
                            break;
                        }
                    }
                }
                self.open_executable_comments += 1;
                continue;
            }

            if self.rest_starts_with("/*") {
                self.pos += 2;
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        Keyword::from_str(text).map_or_else(
            || self.make_token(TokenKind::Identifier(text.to_string())),
            |keyword| self.make_token(TokenKind::Keyword(keyword)),
        )
    }

    /// Scans a back-quoted identifier; a doubled backtick is a literal one.
    fn scan_quoted_identifier(&mut self) -> Token {
        self.advance();
        let mut name = String::new();

        loop {
            match self.advance() {
                Some('`') if self.peek() == Some('`') => {
                    self.advance();
                    name.push('`');
                }
                Some('`') => break,
                Some(c) => name.push(c),
                None => return self.error("Unterminated quoted identifier"),
            }
        }

        self.make_token(TokenKind::QuotedIdentifier(name))
    }

    /// Scans a string literal delimited by `quote`, honouring doubled quotes
    /// and backslash escapes.
    fn scan_string(&mut self, quote: char) -> Token {
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                        value.push(quote);
                    } else {
                        break;
                    }
                }
                Some('\\') => match self.advance() {
                    Some('0') => value.push('\0'),
                    Some('b') => value.push('\u{8}'),
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('Z') => value.push('\u{1a}'),
                    // Kept escaped so LIKE patterns survive.
                    Some(c @ ('%' | '_')) => {
                        value.push('\\');
                        value.push(c);
                    }
                    Some(c) => value.push(c),
                    None => return self.error("Unterminated string literal"),
                },
                Some(c) => value.push(c),
                None => return self.error("Unterminated string literal"),
            }
        }

        self.make_token(TokenKind::String(value))
    }

    /// Scans `x'..'` / `b'..'` literals; the prefix letter is at `self.pos`.
    fn scan_quoted_digits(&mut self, hex: bool) -> Token {
        self.advance(); // x / b
        self.advance(); // opening quote
        let digits_start = self.pos;

        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if hex && c.is_ascii_hexdigit() => {}
                Some('0' | '1') if !hex => {}
                Some(c) => return self.error(format!("Invalid digit in literal: {c}")),
                None => return self.error("Unterminated literal"),
            }
        }

        let digits = self.input[digits_start..self.pos - 1].to_string();
        if hex {
            if digits.len() % 2 != 0 {
                return self.error("Odd number of hex digits in literal");
            }
            self.make_token(TokenKind::Hex(digits))
        } else {
            self.make_token(TokenKind::Bit(digits))
        }
    }

    fn scan_number(&mut self) -> Token {
        if self.rest_starts_with("0x") && self.peek_nth(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.pos += 2;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            return self.make_token(TokenKind::Hex(self.input[self.start + 2..self.pos].to_string()));
        }

        if self.rest_starts_with("0b") && self.peek_nth(2).is_some_and(|c| c == '0' || c == '1') {
            self.pos += 2;
            while self.peek().is_some_and(|c| c == '0' || c == '1') {
                self.advance();
            }
            return self.make_token(TokenKind::Bit(self.input[self.start + 2..self.pos].to_string()));
        }

        let mut is_integer = true;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') {
            is_integer = false;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E')
            && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            is_integer = false;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[self.start..self.pos];
        match text.parse::<i64>() {
            Ok(value) if is_integer => self.make_token(TokenKind::Integer(value)),
            // Out-of-range integers (e.g. unsigned BIGINT bounds) keep their text.
            _ => self.make_token(TokenKind::Decimal(text.to_string())),
        }
    }

    /// Consumes `next` when it follows, yielding `long`, otherwise `short`.
    fn either(&mut self, next: char, long: TokenKind, short: TokenKind) -> Token {
        if self.peek() == Some(next) {
            self.advance();
            self.make_token(long)
        } else {
            self.make_token(short)
        }
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' | '"' => return self.scan_string(c),
            '`' => return self.scan_quoted_identifier(),
            'x' | 'X' if self.peek_nth(1) == Some('\'') => return self.scan_quoted_digits(true),
            'b' | 'B' if self.peek_nth(1) == Some('\'') => return self.scan_quoted_digits(false),
            c if c.is_ascii_digit() => return self.scan_number(),
            c if c.is_alphabetic() || c == '_' || c == '$' => return self.scan_identifier(),
            _ => {}
        }

        self.advance();
        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' => self.make_token(TokenKind::Dot),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '^' => self.make_token(TokenKind::BitXor),
            '~' => self.make_token(TokenKind::BitNot),
            '?' => self.make_token(TokenKind::Question),
            '@' => self.make_token(TokenKind::At),
            '=' => self.make_token(TokenKind::Eq),
            '!' => self.either('=', TokenKind::NotEq, TokenKind::Bang),
            '&' => self.either('&', TokenKind::LogicalAnd, TokenKind::BitAnd),
            '|' => self.either('|', TokenKind::LogicalOr, TokenKind::BitOr),
            '>' => match self.peek() {
                Some('=') => self.either('=', TokenKind::GtEq, TokenKind::Gt),
                Some('>') => self.either('>', TokenKind::RightShift, TokenKind::Gt),
                _ => self.make_token(TokenKind::Gt),
            },
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.either('>', TokenKind::NullSafeEq, TokenKind::LtEq)
                }
                Some('>') => self.either('>', TokenKind::NotEq, TokenKind::Lt),
                Some('<') => self.either('<', TokenKind::LeftShift, TokenKind::Lt),
                _ => self.make_token(TokenKind::Lt),
            },
            _ => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
