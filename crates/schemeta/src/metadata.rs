//! Public schema metadata.
//!
//! This is the shape handed to callers and persisted as JSON. Collections are
//! always present, possibly empty. Column `position` is recomputed on export
//! and ignored on import.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata for one database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSchemaMetadata {
    /// Database name.
    #[serde(default)]
    pub name: String,
    /// Schemas, in order.
    #[serde(default)]
    pub schemas: Vec<SchemaMetadata>,
    /// Installed extensions; never populated from DDL.
    #[serde(default)]
    pub extensions: Vec<ExtensionMetadata>,
}

impl DatabaseSchemaMetadata {
    /// Parses metadata from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes metadata to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes metadata to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Finds a table by name in any schema.
    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&TableMetadata> {
        self.schemas
            .iter()
            .flat_map(|schema| schema.tables.iter())
            .find(|table| table.name == name)
    }
}

/// Metadata for one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    /// Schema name; empty for dialects without schemas.
    #[serde(default)]
    pub name: String,
    /// Tables, in order.
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
    /// Views; never populated from DDL.
    #[serde(default)]
    pub views: Vec<ViewMetadata>,
    /// Functions; never populated from DDL.
    #[serde(default)]
    pub functions: Vec<FunctionMetadata>,
    /// Streams; never populated from DDL.
    #[serde(default)]
    pub streams: Vec<StreamMetadata>,
    /// Tasks; never populated from DDL.
    #[serde(default)]
    pub tasks: Vec<TaskMetadata>,
    /// Materialized views; never populated from DDL.
    #[serde(default)]
    pub materialized_views: Vec<MaterializedViewMetadata>,
}

/// Metadata for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    /// Table name.
    pub name: String,
    /// Columns, in order.
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    /// Indexes, in order.
    #[serde(default)]
    pub indexes: Vec<IndexMetadata>,
    /// Foreign keys, in order.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyMetadata>,
    /// Table comment.
    #[serde(default)]
    pub comment: String,
    /// Storage engine.
    #[serde(default)]
    pub engine: String,
    /// Table collation.
    #[serde(default)]
    pub collation: String,
}

/// Metadata for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// 1-based position within the table.
    #[serde(default)]
    pub position: usize,
    /// Default value, AUTO_INCREMENT or AUTO_RANDOM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ColumnDefault>,
    /// Whether NULL is allowed.
    #[serde(default)]
    pub nullable: bool,
    /// Rendered column type.
    #[serde(rename = "type", default)]
    pub column_type: String,
    /// Column comment.
    #[serde(default)]
    pub comment: String,
}

/// Persisted form of a column default; exactly one variant is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnDefault {
    /// DEFAULT NULL.
    DefaultNull(bool),
    /// A string literal. `None` is read back as DEFAULT NULL.
    Default(Option<String>),
    /// A raw expression.
    DefaultExpression(String),
}

/// Metadata for one index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    /// Index name.
    pub name: String,
    /// Key texts: column names or parenthesised expressions.
    #[serde(default)]
    pub expressions: Vec<String>,
    /// Prefix lengths parallel to `expressions`; `-1` means none.
    #[serde(default)]
    pub key_length: Vec<i64>,
    /// Primary key.
    #[serde(default)]
    pub primary: bool,
    /// Unique index.
    #[serde(default)]
    pub unique: bool,
    /// Visible to the optimizer.
    #[serde(default)]
    pub visible: bool,
}

/// Metadata for one foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyMetadata {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Referenced table.
    #[serde(default)]
    pub referenced_table: String,
    /// Referenced columns.
    #[serde(default)]
    pub referenced_columns: Vec<String>,
}

/// A view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewMetadata {
    /// View name.
    pub name: String,
    /// View definition.
    #[serde(default)]
    pub definition: String,
}

/// A stored function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionMetadata {
    /// Function name.
    pub name: String,
    /// Function definition.
    #[serde(default)]
    pub definition: String,
}

/// A stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMetadata {
    /// Stream name.
    pub name: String,
}

/// A scheduled task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadata {
    /// Task name.
    pub name: String,
}

/// A materialized view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedViewMetadata {
    /// View name.
    pub name: String,
    /// View definition.
    #[serde(default)]
    pub definition: String,
}

/// A database extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMetadata {
    /// Extension name.
    pub name: String,
    /// Schema the extension is installed in.
    #[serde(default)]
    pub schema: String,
    /// Extension version.
    #[serde(default)]
    pub version: String,
}
