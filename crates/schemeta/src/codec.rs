//! Conversion between the canonical model and public metadata.
//!
//! Export sorts every collection by id and renumbers column positions.
//! Import assigns ids from the position of each entry in its source list, so
//! exporting again reproduces the same order.

use crate::default_value::DefaultValue;
use crate::metadata::{
    ColumnDefault, ColumnMetadata, DatabaseSchemaMetadata, ForeignKeyMetadata, IndexMetadata,
    SchemaMetadata, TableMetadata,
};
use crate::state::{
    by_id, ColumnState, DatabaseState, ForeignKeyState, IndexState, SchemaState, TableState,
};

impl DatabaseState {
    /// Exports the model as public metadata.
    #[must_use]
    pub fn to_metadata(&self) -> DatabaseSchemaMetadata {
        DatabaseSchemaMetadata {
            name: self.name.clone(),
            schemas: by_id(&self.schemas)
                .into_iter()
                .map(SchemaState::to_metadata)
                .collect(),
            extensions: Vec::new(),
        }
    }

    /// Builds a model from public metadata.
    #[must_use]
    pub fn from_metadata(metadata: &DatabaseSchemaMetadata) -> Self {
        let mut state = Self::new();
        state.name.clone_from(&metadata.name);
        for (id, schema) in metadata.schemas.iter().enumerate() {
            state
                .schemas
                .insert(schema.name.clone(), SchemaState::from_metadata(id, schema));
        }
        state
    }
}

impl SchemaState {
    /// Exports the schema as public metadata.
    #[must_use]
    pub fn to_metadata(&self) -> SchemaMetadata {
        SchemaMetadata {
            name: self.name.clone(),
            tables: by_id(&self.tables)
                .into_iter()
                .map(TableState::to_metadata)
                .collect(),
            views: Vec::new(),
            functions: Vec::new(),
            streams: Vec::new(),
            tasks: Vec::new(),
            materialized_views: Vec::new(),
        }
    }

    /// Builds a schema from public metadata.
    #[must_use]
    pub fn from_metadata(id: usize, metadata: &SchemaMetadata) -> Self {
        let mut state = Self::new(id, metadata.name.clone());
        for (id, table) in metadata.tables.iter().enumerate() {
            state
                .tables
                .insert(table.name.clone(), TableState::from_metadata(id, table));
        }
        state
    }
}

impl TableState {
    /// Exports the table as public metadata.
    #[must_use]
    pub fn to_metadata(&self) -> TableMetadata {
        let columns = by_id(&self.columns)
            .into_iter()
            .enumerate()
            .map(|(i, column)| column.to_metadata(i + 1))
            .collect();
        TableMetadata {
            name: self.name.clone(),
            columns,
            indexes: by_id(&self.indexes)
                .into_iter()
                .map(IndexState::to_metadata)
                .collect(),
            foreign_keys: by_id(&self.foreign_keys)
                .into_iter()
                .map(ForeignKeyState::to_metadata)
                .collect(),
            comment: self.comment.clone(),
            engine: self.engine.clone(),
            collation: self.collation.clone(),
        }
    }

    /// Builds a table from public metadata.
    #[must_use]
    pub fn from_metadata(id: usize, metadata: &TableMetadata) -> Self {
        let mut state = Self::new(id, metadata.name.clone());
        state.comment.clone_from(&metadata.comment);
        state.engine.clone_from(&metadata.engine);
        state.collation.clone_from(&metadata.collation);
        for (id, column) in metadata.columns.iter().enumerate() {
            state
                .columns
                .insert(column.name.clone(), ColumnState::from_metadata(id, column));
        }
        for (id, index) in metadata.indexes.iter().enumerate() {
            state
                .indexes
                .insert(index.name.clone(), IndexState::from_metadata(id, index));
        }
        for (id, fk) in metadata.foreign_keys.iter().enumerate() {
            state
                .foreign_keys
                .insert(fk.name.clone(), ForeignKeyState::from_metadata(id, fk));
        }
        state
    }
}

impl ColumnState {
    /// Exports the column at 1-based `position`.
    #[must_use]
    pub fn to_metadata(&self, position: usize) -> ColumnMetadata {
        ColumnMetadata {
            name: self.name.clone(),
            position,
            default_value: self.default.as_ref().map(ColumnDefault::from),
            nullable: self.nullable,
            column_type: self.column_type.clone(),
            comment: self.comment.clone(),
        }
    }

    /// Builds a column from public metadata; `position` is ignored.
    #[must_use]
    pub fn from_metadata(id: usize, metadata: &ColumnMetadata) -> Self {
        let mut state = Self::new(id, metadata.name.clone(), metadata.column_type.clone());
        state.nullable = metadata.nullable;
        state.default = metadata.default_value.clone().map(DefaultValue::from);
        state.comment.clone_from(&metadata.comment);
        state
    }
}

impl IndexState {
    /// Exports the index as public metadata.
    #[must_use]
    pub fn to_metadata(&self) -> IndexMetadata {
        IndexMetadata {
            name: self.name.clone(),
            expressions: self.keys.clone(),
            key_length: self.length.clone(),
            primary: self.is_primary(),
            unique: self.is_unique(),
            visible: true,
        }
    }

    /// Builds an index from public metadata. A primary index is unique
    /// whatever `unique` says.
    #[must_use]
    pub fn from_metadata(id: usize, metadata: &IndexMetadata) -> Self {
        if metadata.primary {
            let mut state = Self::primary(id, metadata.expressions.clone());
            state.name.clone_from(&metadata.name);
            state.length.clone_from(&metadata.key_length);
            state
        } else {
            Self::secondary(
                id,
                metadata.name.clone(),
                metadata.expressions.clone(),
                metadata.key_length.clone(),
                metadata.unique,
            )
        }
    }
}

impl ForeignKeyState {
    /// Exports the foreign key as public metadata.
    #[must_use]
    pub fn to_metadata(&self) -> ForeignKeyMetadata {
        ForeignKeyMetadata {
            name: self.name.clone(),
            columns: self.columns.clone(),
            referenced_table: self.referenced_table.clone(),
            referenced_columns: self.referenced_columns.clone(),
        }
    }

    /// Builds a foreign key from public metadata.
    #[must_use]
    pub fn from_metadata(id: usize, metadata: &ForeignKeyMetadata) -> Self {
        Self {
            id,
            name: metadata.name.clone(),
            columns: metadata.columns.clone(),
            referenced_table: metadata.referenced_table.clone(),
            referenced_columns: metadata.referenced_columns.clone(),
        }
    }
}

impl From<&DefaultValue> for ColumnDefault {
    fn from(value: &DefaultValue) -> Self {
        match value {
            DefaultValue::Null => Self::DefaultNull(true),
            DefaultValue::String(s) => Self::Default(Some(s.clone())),
            DefaultValue::Expression(expr) => Self::DefaultExpression(expr.clone()),
        }
    }
}

impl From<ColumnDefault> for DefaultValue {
    fn from(value: ColumnDefault) -> Self {
        match value {
            ColumnDefault::DefaultNull(_) | ColumnDefault::Default(None) => Self::Null,
            ColumnDefault::Default(Some(s)) => Self::String(s),
            ColumnDefault::DefaultExpression(expr) => Self::Expression(expr),
        }
    }
}
