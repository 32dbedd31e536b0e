//! Abstract Syntax Tree (AST) types for DDL statements.

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal, UnaryOp};
pub use statement::{
    AutoRandom, ColumnDef, ColumnOption, Constraint, ConstraintKind, CreateTableStmt, IndexOption,
    IndexPartSpec, IndexType, ReferenceDef, ReferentialAction, Statement, TableName, TableOption,
    UnsupportedStmt, UNSPECIFIED_LENGTH,
};
pub use types::{FieldType, TypeKind};
