//! DDL parser implementation.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op,
};
use crate::ast::{
    AutoRandom, ColumnDef, ColumnOption, Constraint, ConstraintKind, CreateTableStmt, Expr,
    FieldType, FunctionCall, IndexOption, IndexPartSpec, IndexType, Literal, ReferenceDef,
    ReferentialAction, Statement, TableName, TableOption, TypeKind, UnsupportedStmt,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Functions that may be called without parentheses.
const NILADIC_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_USER",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "UTC_DATE",
    "UTC_TIME",
    "UTC_TIMESTAMP",
];

/// Deepest expression nesting accepted before parsing fails.
pub const MAX_EXPRESSION_DEPTH: usize = 100;

/// DDL parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
    current: Token,
    previous: Token,
    /// Parameter counter for ? placeholders.
    param_counter: usize,
    /// Current expression nesting.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            source: lexer.source(),
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::default()),
            param_counter: 0,
            depth: 0,
        }
    }

    /// Parses a `;`-separated script. Empty statements are skipped.
    pub fn parse_script(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.current.is_eof() {
                break;
            }
            statements.push(self.parse_statement()?);
            if !self.current.is_eof() {
                self.expect(&TokenKind::Semicolon)?;
            }
        }
        Ok(statements)
    }

    /// Parses a single statement, leaving the terminating `;` unconsumed.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current.span;
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Create) => {
                self.advance();
                if self.check_keyword(Keyword::Table) || self.check_word("TEMPORARY") {
                    return Ok(Statement::CreateTable(self.parse_create_table(start)?));
                }
            }
            TokenKind::Keyword(_) | TokenKind::Identifier(_) => self.advance(),
            _ => return Err(self.unexpected("statement")),
        }

        let end = self.skip_to_statement_end()?.max(start.end);
        let span = Span::new(start.start, end);
        Ok(Statement::Unsupported(UnsupportedStmt {
            keyword: start.slice(self.source).to_ascii_uppercase(),
            text: span.slice(self.source).to_string(),
            span,
        }))
    }

    /// Skips tokens up to (not including) the next top-level `;` or the end
    /// of input, returning the end offset of the last skipped token.
    fn skip_to_statement_end(&mut self) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut end = self.previous.span.end;
        loop {
            match &self.current.kind {
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::Eof if depth == 0 => break,
                TokenKind::Eof => return Err(ParseError::unexpected_eof("')'", self.current.span)),
                TokenKind::Error(message) => {
                    return Err(ParseError::new(message.clone(), self.current.span));
                }
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen if depth == 0 => {
                    return Err(ParseError::new("Unbalanced ')'", self.current.span));
                }
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            end = self.current.span.end;
            self.advance();
        }
        Ok(end)
    }

    // ====================================================================
    // CREATE TABLE
    // ====================================================================

    /// Parses the remainder of a CREATE TABLE statement; `CREATE` has been
    /// consumed and spans `start`.
    fn parse_create_table(&mut self, start: Span) -> Result<CreateTableStmt, ParseError> {
        let temporary = self.eat_word("TEMPORARY");
        self.expect_keyword(Keyword::Table)?;

        let if_not_exists = if self.eat_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };

        let mut stmt = CreateTableStmt {
            temporary,
            if_not_exists,
            table: self.parse_table_name()?,
            refer_table: None,
            columns: Vec::new(),
            constraints: Vec::new(),
            options: Vec::new(),
            span: start,
        };

        if self.eat_keyword(Keyword::Like) {
            stmt.refer_table = Some(self.parse_table_name()?);
        } else {
            self.expect(&TokenKind::LeftParen)?;
            if self.eat_keyword(Keyword::Like) {
                stmt.refer_table = Some(self.parse_table_name()?);
            } else {
                self.parse_table_elements(&mut stmt)?;
            }
            self.expect(&TokenKind::RightParen)?;
            stmt.options = self.parse_table_options()?;
            if self.check_keyword(Keyword::Partition) {
                self.skip_to_statement_end()?;
            }
        }

        stmt.span = start.to(self.previous.span);
        Ok(stmt)
    }

    fn parse_table_elements(&mut self, stmt: &mut CreateTableStmt) -> Result<(), ParseError> {
        loop {
            match self.current.as_keyword() {
                Some(
                    Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Key
                    | Keyword::Index
                    | Keyword::Unique
                    | Keyword::Foreign
                    | Keyword::Fulltext
                    | Keyword::Check,
                ) => stmt.constraints.push(self.parse_constraint()?),
                _ => stmt.columns.push(self.parse_column_def()?),
            }
            if !self.eat(&TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    fn parse_table_name(&mut self) -> Result<TableName, ParseError> {
        let first = self.expect_identifier()?;
        if self.eat(&TokenKind::Dot) {
            Ok(TableName::qualified(first, self.expect_identifier()?))
        } else {
            Ok(TableName::new(first))
        }
    }

    // ====================================================================
    // Columns
    // ====================================================================

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.expect_identifier()?;
        let field_type = self.parse_field_type()?;
        let mut options = Vec::new();
        while let Some(option) = self.parse_column_option()? {
            options.push(option);
        }
        Ok(ColumnDef {
            name,
            field_type,
            options,
        })
    }

    /// Parses one column option, or returns `None` when the current token
    /// does not start one.
    fn parse_column_option(&mut self) -> Result<Option<ColumnOption>, ParseError> {
        if let Some(word) = self.bare_word() {
            let option = match word.as_str() {
                "AUTO_INCREMENT" => {
                    self.advance();
                    ColumnOption::AutoIncrement
                }
                "AUTO_RANDOM" => {
                    self.advance();
                    ColumnOption::AutoRandom(self.parse_auto_random()?)
                }
                "COMMENT" => {
                    self.advance();
                    ColumnOption::Comment(Expr::string(self.expect_string()?))
                }
                _ => return Ok(None),
            };
            return Ok(Some(option));
        }

        let option = match self.current.as_keyword() {
            Some(Keyword::Not) => {
                self.advance();
                self.expect_keyword(Keyword::Null)?;
                ColumnOption::NotNull
            }
            Some(Keyword::Null) => {
                self.advance();
                ColumnOption::Null
            }
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                ColumnOption::PrimaryKey
            }
            Some(Keyword::Key) => {
                self.advance();
                ColumnOption::PrimaryKey
            }
            Some(Keyword::Unique) => {
                self.advance();
                self.eat_keyword(Keyword::Key);
                ColumnOption::UniqueKey
            }
            Some(Keyword::Default) => {
                self.advance();
                ColumnOption::Default(self.parse_expression(0)?)
            }
            Some(Keyword::On) => {
                self.advance();
                self.expect_keyword(Keyword::Update)?;
                ColumnOption::OnUpdate(self.parse_expression(0)?)
            }
            Some(Keyword::Collate) => {
                self.advance();
                ColumnOption::Collate(self.parse_option_value()?)
            }
            Some(Keyword::References) => ColumnOption::Reference(self.parse_reference_def()?),
            Some(Keyword::Check) => {
                self.advance();
                ColumnOption::Check(self.parse_check_body()?)
            }
            Some(Keyword::Generated) => {
                self.advance();
                self.expect_word("ALWAYS")?;
                self.expect_keyword(Keyword::As)?;
                self.parse_generated()?
            }
            Some(Keyword::As) => {
                self.advance();
                self.parse_generated()?
            }
            _ => return Ok(None),
        };
        Ok(Some(option))
    }

    fn parse_auto_random(&mut self) -> Result<AutoRandom, ParseError> {
        let mut bits = AutoRandom::default();
        if self.eat(&TokenKind::LeftParen) {
            bits.shard_bits = self.expect_integer()?;
            if self.eat(&TokenKind::Comma) {
                bits.range_bits = self.expect_integer()?;
            }
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(bits)
    }

    /// Parses `(expr) [VIRTUAL | STORED]` of a generated column.
    fn parse_generated(&mut self) -> Result<ColumnOption, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect(&TokenKind::RightParen)?;
        let stored = if self.eat_keyword(Keyword::Stored) {
            true
        } else {
            self.eat_keyword(Keyword::Virtual);
            false
        };
        Ok(ColumnOption::Generated { expr, stored })
    }

    /// Parses `(expr) [[NOT] ENFORCED]` after CHECK.
    fn parse_check_body(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect(&TokenKind::RightParen)?;
        if self.eat_keyword(Keyword::Not) {
            self.expect_word("ENFORCED")?;
        } else {
            self.eat_word("ENFORCED");
        }
        Ok(expr)
    }

    // ====================================================================
    // Data types
    // ====================================================================

    fn parse_field_type(&mut self) -> Result<FieldType, ParseError> {
        let word = match &self.current.kind {
            TokenKind::Identifier(word) => word.to_ascii_uppercase(),
            TokenKind::Keyword(kw @ (Keyword::Binary | Keyword::Set)) => kw.as_str().to_string(),
            _ => return Err(self.unexpected("data type")),
        };
        let type_span = self.current.span;
        self.advance();

        let mut ft = match word.as_str() {
            "TINYINT" | "INT1" => self.parse_width(TypeKind::TinyInt)?,
            "SMALLINT" | "INT2" => self.parse_width(TypeKind::SmallInt)?,
            "MEDIUMINT" | "MIDDLEINT" | "INT3" => self.parse_width(TypeKind::MediumInt)?,
            "INT" | "INTEGER" | "INT4" => self.parse_width(TypeKind::Int)?,
            "BIGINT" | "INT8" => self.parse_width(TypeKind::BigInt)?,
            "BIT" => self.parse_width(TypeKind::Bit)?,
            "BOOL" | "BOOLEAN" => FieldType::new(TypeKind::TinyInt).with_flen(1),
            "DECIMAL" | "DEC" | "NUMERIC" | "FIXED" => self.parse_precision(TypeKind::Decimal)?,
            "FLOAT" => {
                let ft = self.parse_precision(TypeKind::Float)?;
                // FLOAT(p) with p > 24 is a DOUBLE.
                if ft.decimal.is_none() && ft.flen.is_some_and(|p| p > 24) {
                    FieldType::new(TypeKind::Double)
                } else {
                    ft
                }
            }
            "DOUBLE" | "REAL" => {
                self.eat_word("PRECISION");
                self.parse_precision(TypeKind::Double)?
            }
            "DATE" => FieldType::new(TypeKind::Date),
            "TIME" => self.parse_fsp(TypeKind::Time)?,
            "DATETIME" => self.parse_fsp(TypeKind::Datetime)?,
            "TIMESTAMP" => self.parse_fsp(TypeKind::Timestamp)?,
            "YEAR" => self.parse_width(TypeKind::Year)?,
            "CHAR" | "NCHAR" => self.parse_width(TypeKind::Char)?,
            "VARCHAR" | "NVARCHAR" => self.parse_required_width(TypeKind::Varchar, &word)?,
            "BINARY" => self.parse_width(TypeKind::Binary)?,
            "VARBINARY" => self.parse_required_width(TypeKind::Varbinary, &word)?,
            "TINYTEXT" => FieldType::new(TypeKind::TinyText),
            "TEXT" => self.parse_width(TypeKind::Text)?,
            "MEDIUMTEXT" => FieldType::new(TypeKind::MediumText),
            "LONGTEXT" => FieldType::new(TypeKind::LongText),
            "TINYBLOB" => FieldType::new(TypeKind::TinyBlob),
            "BLOB" => self.parse_width(TypeKind::Blob)?,
            "MEDIUMBLOB" => FieldType::new(TypeKind::MediumBlob),
            "LONGBLOB" => FieldType::new(TypeKind::LongBlob),
            "JSON" => FieldType::new(TypeKind::Json),
            "ENUM" => self.parse_members(TypeKind::Enum)?,
            "SET" => self.parse_members(TypeKind::Set)?,
            _ => return Err(ParseError::new(format!("Unknown data type: {word}"), type_span)),
        };

        self.parse_type_attributes(&mut ft)?;
        Ok(ft)
    }

    /// Parses an optional `(n)` display width or length.
    fn parse_width(&mut self, kind: TypeKind) -> Result<FieldType, ParseError> {
        let mut ft = FieldType::new(kind);
        if self.eat(&TokenKind::LeftParen) {
            ft.flen = Some(self.expect_length()?);
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(ft)
    }

    fn parse_required_width(&mut self, kind: TypeKind, word: &str) -> Result<FieldType, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return Err(ParseError::new(
                format!("{word} requires a length"),
                self.current.span,
            ));
        }
        self.parse_width(kind)
    }

    /// Parses an optional `(fsp)` fractional-seconds precision.
    fn parse_fsp(&mut self, kind: TypeKind) -> Result<FieldType, ParseError> {
        let mut ft = FieldType::new(kind);
        if self.eat(&TokenKind::LeftParen) {
            ft.decimal = Some(self.expect_length()?);
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(ft)
    }

    /// Parses an optional `(precision[, scale])`.
    fn parse_precision(&mut self, kind: TypeKind) -> Result<FieldType, ParseError> {
        let mut ft = FieldType::new(kind);
        if self.eat(&TokenKind::LeftParen) {
            ft.flen = Some(self.expect_length()?);
            if self.eat(&TokenKind::Comma) {
                ft.decimal = Some(self.expect_length()?);
            }
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(ft)
    }

    /// Parses the `('a', 'b', ...)` member list of ENUM / SET.
    fn parse_members(&mut self, kind: TypeKind) -> Result<FieldType, ParseError> {
        let mut ft = FieldType::new(kind);
        self.expect(&TokenKind::LeftParen)?;
        loop {
            ft.elems.push(self.expect_string()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(ft)
    }

    fn parse_type_attributes(&mut self, ft: &mut FieldType) -> Result<(), ParseError> {
        loop {
            if self.eat_keyword(Keyword::Unsigned) {
                ft.unsigned = true;
            } else if self.eat_keyword(Keyword::Zerofill) {
                ft.zerofill = true;
                ft.unsigned = true;
            } else if self.eat_word("SIGNED") {
            } else if self.eat_keyword(Keyword::Binary) {
                ft.binary = true;
            } else if self.eat_keyword(Keyword::Character) {
                self.expect_keyword(Keyword::Set)?;
                ft.charset = Some(self.parse_option_value()?);
            } else if self.eat_word("CHARSET") {
                ft.charset = Some(self.parse_option_value()?);
            } else if self.eat_keyword(Keyword::Collate) {
                ft.collate = Some(self.parse_option_value()?);
            } else {
                return Ok(());
            }
        }
    }

    // ====================================================================
    // Constraints
    // ====================================================================

    fn parse_constraint(&mut self) -> Result<Constraint, ParseError> {
        let symbol = if self.eat_keyword(Keyword::Constraint) && self.check_name() {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let mut constraint = match self.current.as_keyword() {
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                self.parse_index_body(ConstraintKind::PrimaryKey, false)?
            }
            Some(Keyword::Key) => {
                self.advance();
                self.parse_index_body(ConstraintKind::Key, true)?
            }
            Some(Keyword::Index) => {
                self.advance();
                self.parse_index_body(ConstraintKind::Index, true)?
            }
            Some(Keyword::Unique) => {
                self.advance();
                let kind = if self.eat_keyword(Keyword::Key) {
                    ConstraintKind::UniqueKey
                } else if self.eat_keyword(Keyword::Index) {
                    ConstraintKind::UniqueIndex
                } else {
                    ConstraintKind::Unique
                };
                self.parse_index_body(kind, true)?
            }
            Some(Keyword::Fulltext) => {
                self.advance();
                if !self.eat_keyword(Keyword::Key) {
                    self.eat_keyword(Keyword::Index);
                }
                self.parse_index_body(ConstraintKind::Fulltext, true)?
            }
            Some(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let name = if self.check_name() {
                    self.expect_identifier()?
                } else {
                    String::new()
                };
                let keys = self.parse_key_parts()?;
                let mut constraint = Constraint::new(ConstraintKind::ForeignKey, name, keys);
                constraint.refer = Some(self.parse_reference_def()?);
                constraint
            }
            Some(Keyword::Check) => {
                self.advance();
                let mut constraint = Constraint::new(ConstraintKind::Check, "", Vec::new());
                constraint.expr = Some(self.parse_check_body()?);
                constraint
            }
            _ => return Err(self.unexpected("constraint")),
        };

        if let Some(symbol) = symbol.filter(|s| !s.is_empty()) {
            constraint.name = symbol;
        }
        Ok(constraint)
    }

    /// Parses `[name] [USING type] (key_parts) [index_options]`.
    fn parse_index_body(&mut self, kind: ConstraintKind, named: bool) -> Result<Constraint, ParseError> {
        let name = if named && self.check_name() {
            self.expect_identifier()?
        } else {
            String::new()
        };
        let mut option = IndexOption::default();
        self.parse_index_options(&mut option)?;
        let keys = self.parse_key_parts()?;
        self.parse_index_options(&mut option)?;

        let mut constraint = Constraint::new(kind, name, keys);
        constraint.option = option;
        Ok(constraint)
    }

    fn parse_index_options(&mut self, option: &mut IndexOption) -> Result<(), ParseError> {
        loop {
            if self.eat_keyword(Keyword::Using) {
                option.index_type = Some(match self.bare_word().as_deref() {
                    Some("BTREE") => IndexType::BTree,
                    Some("HASH") => IndexType::Hash,
                    _ => return Err(self.unexpected("BTREE or HASH")),
                });
                self.advance();
            } else if self.eat_word("COMMENT") {
                option.comment = Some(self.expect_string()?);
            } else if self.eat_word("VISIBLE") {
                option.visible = Some(true);
            } else if self.eat_word("INVISIBLE") {
                option.visible = Some(false);
            } else if self.eat_word("CLUSTERED") {
                option.clustered = Some(true);
            } else if self.eat_word("NONCLUSTERED") {
                option.clustered = Some(false);
            } else if self.eat_word("KEY_BLOCK_SIZE") {
                self.eat(&TokenKind::Eq);
                option.key_block_size = Some(self.expect_unsigned()?);
            } else {
                return Ok(());
            }
        }
    }

    /// Parses `(part, ...)` where a part is `col[(len)]` or `(expr)`, each
    /// optionally followed by ASC / DESC.
    fn parse_key_parts(&mut self) -> Result<Vec<IndexPartSpec>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut parts = Vec::new();
        loop {
            let mut part = if self.eat(&TokenKind::LeftParen) {
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                IndexPartSpec::expression(expr)
            } else {
                let mut part = IndexPartSpec::column(self.expect_identifier()?);
                if self.eat(&TokenKind::LeftParen) {
                    part.length = Some(self.expect_length()?);
                    self.expect(&TokenKind::RightParen)?;
                }
                part
            };
            part.desc = self.eat_keyword(Keyword::Desc);
            if !part.desc {
                self.eat_keyword(Keyword::Asc);
            }
            parts.push(part);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(parts)
    }

    fn parse_reference_def(&mut self) -> Result<ReferenceDef, ParseError> {
        self.expect_keyword(Keyword::References)?;
        let table = self.parse_table_name()?;
        let keys = if self.check(&TokenKind::LeftParen) {
            self.parse_key_parts()?
        } else {
            Vec::new()
        };
        let mut refer = ReferenceDef {
            table,
            keys,
            on_delete: None,
            on_update: None,
        };

        if self.eat_keyword(Keyword::Match) {
            self.expect_identifier()?;
        }
        while self.eat_keyword(Keyword::On) {
            if self.eat_keyword(Keyword::Delete) {
                refer.on_delete = Some(self.parse_referential_action()?);
            } else if self.eat_keyword(Keyword::Update) {
                refer.on_update = Some(self.parse_referential_action()?);
            } else {
                return Err(self.unexpected("DELETE or UPDATE"));
            }
        }
        Ok(refer)
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, ParseError> {
        if self.eat_keyword(Keyword::Restrict) {
            Ok(ReferentialAction::Restrict)
        } else if self.eat_keyword(Keyword::Cascade) {
            Ok(ReferentialAction::Cascade)
        } else if self.eat_keyword(Keyword::Set) {
            if self.eat_keyword(Keyword::Null) {
                Ok(ReferentialAction::SetNull)
            } else {
                self.expect_keyword(Keyword::Default)?;
                Ok(ReferentialAction::SetDefault)
            }
        } else if self.eat_word("NO") {
            self.expect_word("ACTION")?;
            Ok(ReferentialAction::NoAction)
        } else {
            Err(self.unexpected("referential action"))
        }
    }

    // ====================================================================
    // Table options
    // ====================================================================

    fn parse_table_options(&mut self) -> Result<Vec<TableOption>, ParseError> {
        let mut options = Vec::new();
        loop {
            self.eat(&TokenKind::Comma);
            let has_default = self.eat_keyword(Keyword::Default);

            let option = if self.eat_keyword(Keyword::Character) {
                self.expect_keyword(Keyword::Set)?;
                self.eat(&TokenKind::Eq);
                TableOption::Charset(self.parse_option_value()?)
            } else if self.eat_word("CHARSET") {
                self.eat(&TokenKind::Eq);
                TableOption::Charset(self.parse_option_value()?)
            } else if self.eat_keyword(Keyword::Collate) {
                self.eat(&TokenKind::Eq);
                TableOption::Collate(self.parse_option_value()?)
            } else if has_default {
                return Err(self.unexpected("CHARACTER SET or COLLATE"));
            } else if self.eat_word("ENGINE") {
                self.eat(&TokenKind::Eq);
                TableOption::Engine(self.parse_option_value()?)
            } else if self.eat_word("COMMENT") {
                self.eat(&TokenKind::Eq);
                TableOption::Comment(self.expect_string()?)
            } else if self.eat_word("AUTO_INCREMENT") {
                self.eat(&TokenKind::Eq);
                TableOption::AutoIncrement(self.expect_unsigned()?)
            } else if self.eat_word("AUTO_RANDOM_BASE") {
                self.eat(&TokenKind::Eq);
                TableOption::AutoRandomBase(self.expect_unsigned()?)
            } else if let Some(name) = self.bare_word() {
                self.advance();
                self.eat(&TokenKind::Eq);
                TableOption::Other {
                    name,
                    value: self.parse_option_value()?,
                }
            } else {
                return Ok(options);
            };
            options.push(option);
        }
    }

    /// Parses a name-like option value: an identifier, a string, a number or
    /// a reserved word, returned as written (strings unquoted).
    fn parse_option_value(&mut self) -> Result<String, ParseError> {
        let value = match &self.current.kind {
            TokenKind::Identifier(s) | TokenKind::QuotedIdentifier(s) | TokenKind::String(s) => {
                s.clone()
            }
            TokenKind::Keyword(_) | TokenKind::Integer(_) | TokenKind::Decimal(_) => {
                self.current.span.slice(self.source).to_string()
            }
            _ => return Err(self.unexpected("option value")),
        };
        self.advance();
        Ok(value)
    }

    // ====================================================================
    // Expressions
    // ====================================================================

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(ParseError::new(
                format!("Expression nested deeper than {MAX_EXPRESSION_DEPTH} levels"),
                self.current.span,
            ));
        }
        self.depth += 1;
        let result = self.parse_infix(min_bp);
        self.depth -= 1;
        result
    }

    fn parse_infix(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) {
            if l_bp < min_bp {
                break;
            }

            if self.eat_keyword(Keyword::Is) {
                let negated = self.eat_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null)?;
                lhs = Expr::IsNull {
                    expr: Box::new(lhs),
                    negated,
                };
                continue;
            }

            let Some(op) = token_to_binary_op(&self.current.kind) else {
                break;
            };
            self.advance();
            let rhs = self.parse_expression(r_bp)?;
            lhs = Expr::binary(lhs, op, rhs);
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let Some(bp) = prefix_binding_power(&self.current.kind) else {
            return self.parse_primary();
        };
        let op = token_to_unary_op(&self.current.kind);
        self.advance();
        let operand = self.parse_expression(bp)?;
        Ok(match op {
            Some(op) => Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            None => operand,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();
        let literal = match token.kind {
            TokenKind::Integer(n) => Literal::Integer(n),
            TokenKind::Decimal(text) => Literal::Decimal(text),
            TokenKind::String(value) => Literal::String {
                value,
                charset: None,
            },
            TokenKind::Hex(digits) => Literal::Hex(digits),
            TokenKind::Bit(digits) => Literal::Bit(digits),
            TokenKind::Keyword(Keyword::True) => Literal::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Literal::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,
            TokenKind::Question => {
                self.advance();
                self.param_counter += 1;
                return Ok(Expr::Parameter {
                    position: self.param_counter,
                });
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(Expr::Paren(Box::new(expr)));
            }
            TokenKind::Identifier(name) => {
                self.advance();
                return self.parse_identifier_expression(name);
            }
            TokenKind::QuotedIdentifier(name) => {
                self.advance();
                return self.parse_column_ref(name);
            }
            // Reserved words that double as function names, e.g. IF(a, b, c).
            TokenKind::Keyword(Keyword::If | Keyword::Default)
                if self.followed_by_left_paren() =>
            {
                self.advance();
                let name = token.span.slice(self.source).to_string();
                return self.parse_function_call(name);
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(Expr::Literal(literal))
    }

    /// Parses what follows a bare identifier: a call, a charset-introduced
    /// string, a niladic function or a column reference.
    fn parse_identifier_expression(&mut self, name: String) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(name);
        }

        if let (Some(charset), TokenKind::String(value)) =
            (name.strip_prefix('_'), &self.current.kind)
        {
            let literal = Literal::String {
                value: value.clone(),
                charset: Some(charset.to_string()),
            };
            self.advance();
            return Ok(Expr::Literal(literal));
        }

        if NILADIC_FUNCTIONS
            .iter()
            .any(|f| f.eq_ignore_ascii_case(&name))
        {
            return Ok(Expr::Function(FunctionCall {
                name,
                args: Vec::new(),
                bare: true,
            }));
        }

        self.parse_column_ref(name)
    }

    fn parse_column_ref(&mut self, first: String) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Dot) {
            return Ok(Expr::Column {
                table: Some(first),
                name: self.expect_identifier()?,
            });
        }
        Ok(Expr::column(first))
    }

    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression(0)?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::call(name, args))
    }

    // ====================================================================
    // Helper methods
    // ====================================================================

    /// Advances to the next token.
    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Whether the token after the current one is `(`. Only `(` immediately
    /// following the word in the source text counts, which is what makes a
    /// reserved word a function name.
    fn followed_by_left_paren(&self) -> bool {
        self.source
            .get(self.current.span.end..)
            .is_some_and(|rest| rest.starts_with('('))
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    /// Returns the upper-cased text of the current token when it is a bare
    /// (unquoted, non-reserved) word.
    fn bare_word(&self) -> Option<String> {
        match &self.current.kind {
            TokenKind::Identifier(word) => Some(word.to_ascii_uppercase()),
            _ => None,
        }
    }

    /// Checks if the current token is the bare word `word` (case-insensitive).
    fn check_word(&self, word: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(w) if w.eq_ignore_ascii_case(word))
    }

    fn eat_word(&mut self, word: &str) -> bool {
        let matched = self.check_word(word);
        if matched {
            self.advance();
        }
        matched
    }

    fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.unexpected(word))
        }
    }

    /// Whether the current token can be a name (bare or quoted identifier).
    const fn check_name(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        )
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(format!("{kind:?}")))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Expects and returns an identifier, bare or quoted.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    fn expect_integer(&mut self) -> Result<i64, ParseError> {
        match self.current.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected("integer")),
        }
    }

    fn expect_unsigned(&mut self) -> Result<u64, ParseError> {
        let span = self.current.span;
        let text = span.slice(self.source);
        let value = match self.current.kind {
            TokenKind::Integer(n) => u64::try_from(n).ok(),
            TokenKind::Decimal(_) => text.parse::<u64>().ok(),
            _ => return Err(self.unexpected("unsigned integer")),
        };
        let value =
            value.ok_or_else(|| ParseError::new(format!("Invalid unsigned integer: {text}"), span))?;
        self.advance();
        Ok(value)
    }

    /// Expects a length, width or precision.
    fn expect_length(&mut self) -> Result<u32, ParseError> {
        let span = self.current.span;
        let n = self.expect_integer()?;
        u32::try_from(n).map_err(|_| ParseError::new(format!("Invalid length: {n}"), span))
    }

    /// Builds an error for the current token.
    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        match &self.current.kind {
            TokenKind::Eof => ParseError::unexpected_eof(expected, self.current.span),
            TokenKind::Error(message) => ParseError::new(message.clone(), self.current.span),
            found => ParseError::unexpected(expected, found.clone(), self.current.span),
        }
    }
}
