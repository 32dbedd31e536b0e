//! Canonical schema model.
//!
//! Every collection is an [`IndexMap`] keyed by name. Each entry records the
//! order in which it was discovered as its `id` (the collection length at
//! insertion time); ordered output always sorts by `id` rather than relying
//! on map iteration.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::default_value::DefaultValue;

/// Name of the primary key index.
pub const PRIMARY_KEY_NAME: &str = "PRIMARY";

/// An entry with a discovery-order id.
pub trait Ordered {
    /// Returns the entry's discovery-order id.
    fn id(&self) -> usize;
}

/// Returns the values of `map` sorted by id.
#[must_use]
pub fn by_id<T: Ordered>(map: &IndexMap<String, T>) -> Vec<&T> {
    let mut values: Vec<&T> = map.values().collect();
    values.sort_by_key(|value| value.id());
    values
}

/// Inserts the value built by `make(id)` under `name` unless the name is taken.
fn insert_new<T>(
    map: &mut IndexMap<String, T>,
    name: String,
    make: impl FnOnce(usize, String) -> T,
) -> Option<&mut T> {
    let id = map.len();
    match map.entry(name) {
        Entry::Occupied(_) => None,
        Entry::Vacant(entry) => {
            let value = make(id, entry.key().clone());
            Some(entry.insert(value))
        }
    }
}

/// A database: the root of the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseState {
    /// Database name; empty until a qualified table name is seen.
    pub name: String,
    /// Schemas by name.
    pub schemas: IndexMap<String, SchemaState>,
}

impl DatabaseState {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty database with a single unnamed schema, the layout
    /// used for dialects without schema namespacing.
    #[must_use]
    pub fn with_default_schema() -> Self {
        let mut state = Self::new();
        state.default_schema_mut();
        state
    }

    /// Returns the unnamed schema, creating it if needed.
    pub fn default_schema_mut(&mut self) -> &mut SchemaState {
        let id = self.schemas.len();
        self.schemas
            .entry(String::new())
            .or_insert_with(|| SchemaState::new(id, ""))
    }

    /// Adds a schema, or returns `None` if the name is taken.
    pub fn add_schema(&mut self, name: impl Into<String>) -> Option<&mut SchemaState> {
        insert_new(&mut self.schemas, name.into(), SchemaState::new)
    }

    /// Gets a schema by name.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&SchemaState> {
        self.schemas.get(name)
    }

    /// Gets a mutable schema by name.
    #[must_use]
    pub fn schema_mut(&mut self, name: &str) -> Option<&mut SchemaState> {
        self.schemas.get_mut(name)
    }

    /// Finds a table by name in any schema.
    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&TableState> {
        self.schemas.values().find_map(|schema| schema.table(name))
    }

    /// Total number of tables across all schemas.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.schemas.values().map(|schema| schema.tables.len()).sum()
    }
}

/// A schema namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaState {
    /// Discovery-order id.
    pub id: usize,
    /// Schema name.
    pub name: String,
    /// Tables by name.
    pub tables: IndexMap<String, TableState>,
}

impl SchemaState {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tables: IndexMap::new(),
        }
    }

    /// Adds an empty table, or returns `None` if the name is taken.
    pub fn add_table(&mut self, name: impl Into<String>) -> Option<&mut TableState> {
        insert_new(&mut self.tables, name.into(), TableState::new)
    }

    /// Gets a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableState> {
        self.tables.get(name)
    }

    /// Gets a mutable table by name.
    #[must_use]
    pub fn table_mut(&mut self, name: &str) -> Option<&mut TableState> {
        self.tables.get_mut(name)
    }

    /// Returns table names in discovery order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        by_id(&self.tables).into_iter().map(|t| t.name.as_str())
    }
}

impl Ordered for SchemaState {
    fn id(&self) -> usize {
        self.id
    }
}

/// A table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    /// Discovery-order id.
    pub id: usize,
    /// Table name.
    pub name: String,
    /// Table comment.
    pub comment: String,
    /// Storage engine.
    pub engine: String,
    /// Table collation.
    pub collation: String,
    /// Columns by name.
    pub columns: IndexMap<String, ColumnState>,
    /// Indexes by name; the primary key is keyed [`PRIMARY_KEY_NAME`].
    pub indexes: IndexMap<String, IndexState>,
    /// Foreign keys by name.
    pub foreign_keys: IndexMap<String, ForeignKeyState>,
}

impl TableState {
    /// Creates an empty table.
    #[must_use]
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            comment: String::new(),
            engine: String::new(),
            collation: String::new(),
            columns: IndexMap::new(),
            indexes: IndexMap::new(),
            foreign_keys: IndexMap::new(),
        }
    }

    /// Adds a nullable column without default, or returns `None` if the
    /// name is taken.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Option<&mut ColumnState> {
        let column_type = column_type.into();
        insert_new(&mut self.columns, name.into(), |id, name| {
            ColumnState::new(id, name, column_type)
        })
    }

    /// Adds a secondary index, or returns `None` if the name is taken.
    pub fn add_index(
        &mut self,
        name: impl Into<String>,
        keys: Vec<String>,
        length: Vec<i64>,
        unique: bool,
    ) -> Option<&mut IndexState> {
        insert_new(&mut self.indexes, name.into(), |id, name| {
            IndexState::secondary(id, name, keys, length, unique)
        })
    }

    /// Returns the primary key index, creating an empty one if needed.
    pub fn primary_key_mut(&mut self) -> &mut IndexState {
        let id = self.indexes.len();
        self.indexes
            .entry(PRIMARY_KEY_NAME.to_string())
            .or_insert_with(|| IndexState::primary(id, Vec::new()))
    }

    /// Adds a foreign key, or returns `None` if the name is taken.
    pub fn add_foreign_key(
        &mut self,
        name: impl Into<String>,
        columns: Vec<String>,
        referenced_table: impl Into<String>,
        referenced_columns: Vec<String>,
    ) -> Option<&mut ForeignKeyState> {
        let referenced_table = referenced_table.into();
        insert_new(&mut self.foreign_keys, name.into(), |id, name| {
            ForeignKeyState {
                id,
                name,
                columns,
                referenced_table,
                referenced_columns,
            }
        })
    }

    /// Gets a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnState> {
        self.columns.get(name)
    }

    /// Gets an index by name.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexState> {
        self.indexes.get(name)
    }

    /// Gets the primary key index.
    #[must_use]
    pub fn primary_key(&self) -> Option<&IndexState> {
        self.indexes.get(PRIMARY_KEY_NAME)
    }

    /// Gets a foreign key by name.
    #[must_use]
    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKeyState> {
        self.foreign_keys.get(name)
    }
}

impl Ordered for TableState {
    fn id(&self) -> usize {
        self.id
    }
}

/// A column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnState {
    /// Discovery-order id.
    pub id: usize,
    /// Column name.
    pub name: String,
    /// Rendered type, e.g. `int(11) unsigned zerofill`.
    pub column_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Explicit default, AUTO_INCREMENT or AUTO_RANDOM; at most one.
    pub default: Option<DefaultValue>,
    /// Column comment.
    pub comment: String,
}

impl ColumnState {
    /// Creates a nullable column without default.
    #[must_use]
    pub fn new(id: usize, name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            column_type: column_type.into(),
            nullable: true,
            default: None,
            comment: String::new(),
        }
    }

    /// Returns true if the default slot is occupied.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Returns true if the column is AUTO_INCREMENT.
    #[must_use]
    pub fn has_auto_increment(&self) -> bool {
        self.default
            .as_ref()
            .is_some_and(DefaultValue::is_auto_increment)
    }

    /// Returns true if the column is AUTO_RANDOM.
    #[must_use]
    pub fn has_auto_random(&self) -> bool {
        self.default.as_ref().is_some_and(DefaultValue::is_auto_random)
    }
}

impl Ordered for ColumnState {
    fn id(&self) -> usize {
        self.id
    }
}

/// An index.
///
/// Keys are column names, or parenthesised expression text for functional
/// key parts. `length` runs parallel to `keys` and may be shorter; a
/// missing or `-1` entry means no prefix length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexState {
    /// Discovery-order id.
    pub id: usize,
    /// Index name.
    pub name: String,
    /// Key texts.
    pub keys: Vec<String>,
    /// Prefix lengths.
    pub length: Vec<i64>,
    primary: bool,
    unique: bool,
}

impl IndexState {
    /// Creates the primary key index. It is always unique.
    #[must_use]
    pub fn primary(id: usize, keys: Vec<String>) -> Self {
        Self {
            id,
            name: PRIMARY_KEY_NAME.to_string(),
            keys,
            length: Vec::new(),
            primary: true,
            unique: true,
        }
    }

    /// Creates a secondary index.
    #[must_use]
    pub fn secondary(
        id: usize,
        name: impl Into<String>,
        keys: Vec<String>,
        length: Vec<i64>,
        unique: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            keys,
            length,
            primary: false,
            unique,
        }
    }

    /// Returns true for the primary key.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.primary
    }

    /// Returns true for unique indexes, including the primary key.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }
}

impl Ordered for IndexState {
    fn id(&self) -> usize {
        self.id
    }
}

/// A foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyState {
    /// Discovery-order id.
    pub id: usize,
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table name.
    pub referenced_table: String,
    /// Referenced columns, matched to `columns` by position.
    pub referenced_columns: Vec<String>,
}

impl Ordered for ForeignKeyState {
    fn id(&self) -> usize {
        self.id
    }
}
