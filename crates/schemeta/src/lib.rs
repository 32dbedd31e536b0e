//! Canonical schema metadata from TiDB/MySQL DDL.
//!
//! `schemeta` reads `CREATE TABLE` statements into a dialect-neutral model
//! (database → schema → table → column / index / foreign key) and renders
//! that model back to DDL.
//!
//! - **Extraction** - [`extract`] parses a script and walks it with a
//!   [`transform::Transformer`], collecting tables into a
//!   [`state::DatabaseState`]
//! - **Codec** - [`state::DatabaseState::to_metadata`] and
//!   [`state::DatabaseState::from_metadata`] convert to and from the public
//!   [`metadata::DatabaseSchemaMetadata`], which serializes as JSON
//! - **Rendering** - [`state::TableState::to_ddl`] writes a table back as
//!   `CREATE TABLE` text
//!
//! Ordering is deterministic: every entry keeps the order in which it was
//! first seen.
//!
//! # Example
//!
//! ```rust
//! use schemeta::metadata::ColumnDefault;
//!
//! let metadata = schemeta::parse_to_metadata(
//!     "CREATE TABLE t (
//!         id INT NOT NULL AUTO_INCREMENT,
//!         name VARCHAR(10) DEFAULT 'x',
//!         PRIMARY KEY (id)
//!     )",
//! )
//! .unwrap();
//!
//! let table = metadata.find_table("t").unwrap();
//! assert_eq!(table.indexes[0].name, "PRIMARY");
//! assert_eq!(
//!     table.columns[1].default_value,
//!     Some(ColumnDefault::Default(Some("x".to_string())))
//! );
//!
//! let ddl = schemeta::render_metadata(&metadata);
//! assert!(ddl.contains("`id` int(11) NOT NULL AUTO_INCREMENT"));
//! assert!(ddl.contains("PRIMARY KEY (`id`)"));
//! ```
//!
//! # Errors
//!
//! A script that does not parse fails immediately. Conflicts found while
//! walking a parsed script (a table created twice, a duplicate column, ...)
//! do not stop the walk: [`extract`] returns the partial model together
//! with the most recent conflict, and [`Extraction::into_result`] turns
//! that into an error.

pub mod codec;
pub mod default_value;
pub mod error;
pub mod keys;
pub mod metadata;
pub mod render;
pub mod state;
pub mod transform;

use schemeta_sql::visit::Visitable;
use tracing::debug;

pub use error::{MetadataError, Result};
pub use metadata::DatabaseSchemaMetadata;
pub use state::DatabaseState;
pub use transform::Transformer;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::default_value::DefaultValue;
    pub use crate::error::{MetadataError, Result};
    pub use crate::keys::equal_keys;
    pub use crate::metadata::{
        ColumnDefault, ColumnMetadata, DatabaseSchemaMetadata, ForeignKeyMetadata, IndexMetadata,
        SchemaMetadata, TableMetadata,
    };
    pub use crate::state::{
        ColumnState, DatabaseState, ForeignKeyState, IndexState, SchemaState, TableState,
    };
    pub use crate::{extract, parse_to_metadata, render_metadata, Extraction};
}

/// The model built from a script, with the last conflict found, if any.
#[derive(Debug)]
pub struct Extraction {
    /// Model built from every statement that could be processed.
    pub state: DatabaseState,
    /// Most recent error recorded during the walk.
    pub error: Option<MetadataError>,
}

impl Extraction {
    /// Exports the (possibly partial) model as public metadata.
    #[must_use]
    pub fn metadata(&self) -> DatabaseSchemaMetadata {
        self.state.to_metadata()
    }

    /// Returns the metadata, or the recorded error if there is one.
    pub fn into_result(self) -> Result<DatabaseSchemaMetadata> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.state.to_metadata()),
        }
    }
}

/// Parses `ddl` and builds the model from its `CREATE TABLE` statements.
///
/// Fails only if the script does not parse; conflicts are reported in
/// [`Extraction::error`].
pub fn extract(ddl: &str) -> Result<Extraction> {
    let statements = schemeta_sql::parse(ddl)?;
    debug!(statements = statements.len(), "Parsed DDL");

    let mut transformer = Transformer::new();
    for stmt in &statements {
        stmt.accept(&mut transformer);
    }
    let (state, error) = transformer.finish();
    debug!(
        tables = state.table_count(),
        failed = error.is_some(),
        "Built schema state"
    );
    Ok(Extraction { state, error })
}

/// Parses `ddl` into public metadata, failing on any recorded conflict.
pub fn parse_to_metadata(ddl: &str) -> Result<DatabaseSchemaMetadata> {
    extract(ddl)?.into_result()
}

/// Renders public metadata back to DDL, one `CREATE TABLE` per table.
#[must_use]
pub fn render_metadata(metadata: &DatabaseSchemaMetadata) -> String {
    DatabaseState::from_metadata(metadata).to_ddl()
}
