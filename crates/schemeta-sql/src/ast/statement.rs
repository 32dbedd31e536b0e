//! Statement AST types.

use super::expression::Expr;
use super::types::FieldType;
use crate::lexer::Span;

/// Sentinel for an AUTO_RANDOM bit count that was not written.
pub const UNSPECIFIED_LENGTH: i64 = -1;

/// A possibly database-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    /// Database qualifier (`db` in `db.t`).
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
}

impl TableName {
    /// Creates an unqualified table name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Creates a database-qualified table name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// CREATE TABLE.
    CreateTable(CreateTableStmt),
    /// Any other statement, kept as raw text.
    Unsupported(UnsupportedStmt),
}

/// A statement the parser recognises only by its leading word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedStmt {
    /// Upper-cased leading word (`INSERT`, `SET`, `DROP`, ...).
    pub keyword: String,
    /// Raw statement text, without the terminating `;`.
    pub text: String,
    /// Source span.
    pub span: Span,
}

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStmt {
    /// CREATE TEMPORARY TABLE.
    pub temporary: bool,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
    /// Table being created.
    pub table: TableName,
    /// Source of `CREATE TABLE t LIKE other`.
    pub refer_table: Option<TableName>,
    /// Column definitions, in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Table-level constraints, in declaration order.
    pub constraints: Vec<Constraint>,
    /// Table options after the closing parenthesis.
    pub options: Vec<TableOption>,
    /// Source span.
    pub span: Span,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Column options, in declaration order.
    pub options: Vec<ColumnOption>,
}

/// AUTO_RANDOM bit counts; [`UNSPECIFIED_LENGTH`] when not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoRandom {
    /// Shard bits.
    pub shard_bits: i64,
    /// Range bits.
    pub range_bits: i64,
}

impl Default for AutoRandom {
    fn default() -> Self {
        Self {
            shard_bits: UNSPECIFIED_LENGTH,
            range_bits: UNSPECIFIED_LENGTH,
        }
    }
}

/// A column option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOption {
    /// NOT NULL.
    NotNull,
    /// NULL.
    Null,
    /// [PRIMARY] KEY.
    PrimaryKey,
    /// UNIQUE [KEY].
    UniqueKey,
    /// DEFAULT expr.
    Default(Expr),
    /// AUTO_INCREMENT.
    AutoIncrement,
    /// AUTO_RANDOM[(shard[, range])].
    AutoRandom(AutoRandom),
    /// COMMENT 'text'.
    Comment(Expr),
    /// ON UPDATE expr.
    OnUpdate(Expr),
    /// COLLATE name.
    Collate(String),
    /// Inline REFERENCES clause.
    Reference(ReferenceDef),
    /// CHECK (expr).
    Check(Expr),
    /// [GENERATED ALWAYS] AS (expr) [VIRTUAL | STORED].
    Generated {
        /// Generation expression.
        expr: Expr,
        /// STORED rather than VIRTUAL.
        stored: bool,
    },
}

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// PRIMARY KEY.
    PrimaryKey,
    /// KEY.
    Key,
    /// INDEX.
    Index,
    /// UNIQUE.
    Unique,
    /// UNIQUE KEY.
    UniqueKey,
    /// UNIQUE INDEX.
    UniqueIndex,
    /// FOREIGN KEY.
    ForeignKey,
    /// FULLTEXT [KEY | INDEX].
    Fulltext,
    /// CHECK (expr).
    Check,
}

/// One part of an index key: a column (with optional prefix length) or a
/// parenthesised expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPartSpec {
    /// Column name, for column parts.
    pub column: Option<String>,
    /// Prefix length, for column parts.
    pub length: Option<u32>,
    /// Expression, for functional parts.
    pub expr: Option<Expr>,
    /// DESC ordering.
    pub desc: bool,
}

impl IndexPartSpec {
    /// Creates a column key part.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            column: Some(name.into()),
            length: None,
            expr: None,
            desc: false,
        }
    }

    /// Creates a functional key part.
    #[must_use]
    pub const fn expression(expr: Expr) -> Self {
        Self {
            column: None,
            length: None,
            expr: Some(expr),
            desc: false,
        }
    }
}

/// Referential action of ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
    NoAction,
}

/// REFERENCES clause of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDef {
    /// Referenced table.
    pub table: TableName,
    /// Referenced key parts.
    pub keys: Vec<IndexPartSpec>,
    /// ON DELETE action.
    pub on_delete: Option<ReferentialAction>,
    /// ON UPDATE action.
    pub on_update: Option<ReferentialAction>,
}

/// USING BTREE | HASH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    BTree,
    Hash,
}

/// Index options trailing a key list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexOption {
    /// USING clause.
    pub index_type: Option<IndexType>,
    /// COMMENT 'text'.
    pub comment: Option<String>,
    /// VISIBLE (true) / INVISIBLE (false).
    pub visible: Option<bool>,
    /// CLUSTERED (true) / NONCLUSTERED (false).
    pub clustered: Option<bool>,
    /// KEY_BLOCK_SIZE.
    pub key_block_size: Option<u64>,
}

/// A table-level constraint or index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Constraint or index name; empty when none was written.
    pub name: String,
    /// Key parts.
    pub keys: Vec<IndexPartSpec>,
    /// REFERENCES clause of a foreign key.
    pub refer: Option<ReferenceDef>,
    /// Expression of a CHECK constraint.
    pub expr: Option<Expr>,
    /// Index options.
    pub option: IndexOption,
}

impl Constraint {
    /// Creates a constraint of `kind` with the given name and keys.
    #[must_use]
    pub fn new(kind: ConstraintKind, name: impl Into<String>, keys: Vec<IndexPartSpec>) -> Self {
        Self {
            kind,
            name: name.into(),
            keys,
            refer: None,
            expr: None,
            option: IndexOption::default(),
        }
    }
}

/// A table option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOption {
    /// ENGINE = name.
    Engine(String),
    /// [DEFAULT] CHARSET | CHARACTER SET = name.
    Charset(String),
    /// [DEFAULT] COLLATE = name.
    Collate(String),
    /// COMMENT = 'text'.
    Comment(String),
    /// AUTO_INCREMENT = n.
    AutoIncrement(u64),
    /// AUTO_RANDOM_BASE = n.
    AutoRandomBase(u64),
    /// Any other `NAME [=] value` pair; the name is upper-cased.
    Other {
        /// Option name.
        name: String,
        /// Option value as written (string values unquoted).
        value: String,
    },
}

impl TableOption {
    /// Returns the string value of the option, as written.
    #[must_use]
    pub fn str_value(&self) -> Option<&str> {
        match self {
            Self::Engine(v) | Self::Charset(v) | Self::Collate(v) | Self::Comment(v) => Some(v),
            Self::Other { value, .. } => Some(value),
            Self::AutoIncrement(_) | Self::AutoRandomBase(_) => None,
        }
    }
}
