//! Error types for metadata extraction.

use schemeta_sql::{ParseError, RestoreError};

/// Errors that can occur while building or loading schema metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The DDL text could not be parsed.
    #[error("Failed to parse DDL: {0}")]
    Parse(#[from] ParseError),

    /// An expression could not be written back as SQL.
    #[error("Failed to restore expression: {0}")]
    Restore(#[from] RestoreError),

    /// Two statements qualify their tables with different databases.
    #[error("multiple database names found: {existing}, {found}")]
    MultipleDatabaseNames {
        /// Database name fixed by an earlier statement.
        existing: String,
        /// Conflicting database name.
        found: String,
    },

    /// A table is created twice.
    #[error("multiple table names found: {0}")]
    DuplicateTable(String),

    /// A column is declared twice in one table.
    #[error("multiple column names found: {column} in table {table}")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// An index name is used twice in one table.
    #[error("multiple index names found: {index} in table {table}")]
    DuplicateIndex {
        /// Table name.
        table: String,
        /// Index name.
        index: String,
    },

    /// A foreign key name is used twice in one table.
    #[error("multiple foreign keys found: {foreign_key} in table {table}")]
    DuplicateForeignKey {
        /// Table name.
        table: String,
        /// Foreign key name.
        foreign_key: String,
    },

    /// A foreign key was declared without a name.
    #[error("empty foreign key name in table {0}")]
    EmptyForeignKeyName(String),

    /// A secondary index was declared without a name.
    #[error("empty index name in table {0}")]
    EmptyIndexName(String),

    /// Persisted metadata is not valid JSON for the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MetadataError {
    /// Returns true for conflicts found while walking otherwise valid DDL.
    ///
    /// These are recorded without stopping the walk, so a model built
    /// alongside them may still be partially usable.
    #[must_use]
    pub const fn is_semantic_conflict(&self) -> bool {
        matches!(
            self,
            Self::MultipleDatabaseNames { .. }
                | Self::DuplicateTable(_)
                | Self::DuplicateColumn { .. }
                | Self::DuplicateIndex { .. }
                | Self::DuplicateForeignKey { .. }
                | Self::EmptyForeignKeyName(_)
                | Self::EmptyIndexName(_)
        )
    }
}

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;
