//! Builds the canonical model from parsed statements.
//!
//! [`Transformer`] is a [`Visitor`]: it registers a table when it enters a
//! `CREATE TABLE`, then fills it in from the column definitions and
//! constraints it visits as children. Other statements are ignored.
//!
//! A conflict (duplicate name, missing name, database mismatch) or a
//! failure to restore an expression stops work on the current statement
//! only. The error is kept and the walk moves on to the next statement; a
//! later error replaces an earlier one.

use schemeta_sql::ast::{
    ColumnDef, ColumnOption, Constraint, ConstraintKind, CreateTableStmt, FieldType,
    IndexPartSpec, TableOption, TypeKind,
};
use schemeta_sql::format::{restore_to_string, Restore, RestoreFlags};
use schemeta_sql::visit::{Node, VisitAction, Visitor};
use tracing::{debug, trace, warn};

use crate::default_value::DefaultValue;
use crate::error::{MetadataError, Result};
use crate::keys::UNSPECIFIED_LENGTH;
use crate::state::{DatabaseState, TableState};

/// Flags for restoring DEFAULT expressions.
const DEFAULT_VALUE_FLAGS: RestoreFlags =
    RestoreFlags::STRING_SINGLE_QUOTES.union(RestoreFlags::STRING_WITHOUT_CHARSET);

/// Flags for restoring functional key parts.
const KEY_PART_FLAGS: RestoreFlags = RestoreFlags::KEYWORD_LOWERCASE
    .union(RestoreFlags::STRING_SINGLE_QUOTES)
    .union(RestoreFlags::NAME_BACK_QUOTES);

/// Rendered column type: compact type text plus `unsigned` (except for
/// bit and year) and `zerofill` (except for year).
#[must_use]
pub fn column_type_str(field_type: &FieldType) -> String {
    let kind = field_type.effective_kind();
    let mut desc = field_type.compact_str();
    if field_type.unsigned && kind != TypeKind::Bit && kind != TypeKind::Year {
        desc.push_str(" unsigned");
    }
    if field_type.zerofill && kind != TypeKind::Year {
        desc.push_str(" zerofill");
    }
    desc
}

/// Returns false if the column is declared NOT NULL or PRIMARY KEY.
fn column_can_be_null(column: &ColumnDef) -> bool {
    !column
        .options
        .iter()
        .any(|option| matches!(option, ColumnOption::NotNull | ColumnOption::PrimaryKey))
}

/// Restores an expression or key part with `flags`.
fn restore<T: Restore + ?Sized>(node: &T, flags: RestoreFlags) -> Result<String> {
    Ok(restore_to_string(node, flags)?)
}

/// Column fields derived from a definition before it is inserted.
struct ColumnParts {
    column_type: String,
    nullable: bool,
    default: Option<DefaultValue>,
    comment: String,
    primary: bool,
}

impl ColumnParts {
    /// Folds the column options left to right.
    fn from_def(column: &ColumnDef) -> Result<Self> {
        let mut parts = Self {
            column_type: column_type_str(&column.field_type),
            nullable: column_can_be_null(column),
            default: None,
            comment: String::new(),
            primary: false,
        };
        for option in &column.options {
            match option {
                ColumnOption::Default(expr) => {
                    let text = restore(expr, DEFAULT_VALUE_FLAGS)?;
                    parts.default = Some(DefaultValue::from_restored(&text));
                }
                ColumnOption::Comment(expr) => {
                    parts.comment = restore(expr, RestoreFlags::STRING_WITHOUT_CHARSET)?;
                }
                ColumnOption::AutoIncrement => {
                    parts.default = Some(DefaultValue::auto_increment());
                }
                ColumnOption::AutoRandom(auto_random) => {
                    parts.default = Some(DefaultValue::auto_random(
                        auto_random.shard_bits,
                        auto_random.range_bits,
                    ));
                }
                ColumnOption::PrimaryKey => parts.primary = true,
                _ => {}
            }
        }
        Ok(parts)
    }
}

/// Key texts and prefix lengths of a secondary index.
fn index_keys(keys: &[IndexPartSpec]) -> Result<(Vec<String>, Vec<i64>)> {
    let mut texts = Vec::with_capacity(keys.len());
    let mut lengths = Vec::with_capacity(keys.len());
    for part in keys {
        if let Some(column) = &part.column {
            texts.push(column.clone());
            lengths.push(
                part.length
                    .filter(|&length| length > 0)
                    .map_or(UNSPECIFIED_LENGTH, i64::from),
            );
        } else {
            texts.push(restore(part, KEY_PART_FLAGS)?);
            lengths.push(UNSPECIFIED_LENGTH);
        }
    }
    Ok((texts, lengths))
}

/// Column names of the column key parts.
fn column_names(keys: &[IndexPartSpec]) -> Vec<String> {
    keys.iter().filter_map(|part| part.column.clone()).collect()
}

/// Visitor that fills a [`DatabaseState`] from `CREATE TABLE` statements.
#[derive(Debug)]
pub struct Transformer {
    state: DatabaseState,
    error: Option<MetadataError>,
    /// Table being filled; `None` outside CREATE TABLE or after a failure.
    current: Option<String>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    /// Creates a transformer over an empty database with one unnamed schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: DatabaseState::with_default_schema(),
            error: None,
            current: None,
        }
    }

    /// The model built so far.
    #[must_use]
    pub const fn state(&self) -> &DatabaseState {
        &self.state
    }

    /// The most recent error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&MetadataError> {
        self.error.as_ref()
    }

    /// Consumes the transformer, returning the model and the retained error.
    #[must_use]
    pub fn finish(self) -> (DatabaseState, Option<MetadataError>) {
        (self.state, self.error)
    }

    /// Records `error`, abandons the current statement and skips its children.
    fn fail(&mut self, error: MetadataError) -> VisitAction {
        warn!(
            table = self.current.as_deref().unwrap_or_default(),
            error = %error,
            "Skipping rest of statement"
        );
        if let Some(previous) = self.error.replace(error) {
            debug!(error = %previous, "Discarding earlier error");
        }
        self.current = None;
        VisitAction::SkipChildren
    }

    fn table_mut(&mut self) -> Option<&mut TableState> {
        let name = self.current.as_deref()?;
        self.state.default_schema_mut().table_mut(name)
    }

    fn enter_create_table(&mut self, stmt: &CreateTableStmt) -> Result<()> {
        if let Some(database) = &stmt.table.schema {
            if self.state.name.is_empty() {
                self.state.name.clone_from(database);
            } else if self.state.name != *database {
                return Err(MetadataError::MultipleDatabaseNames {
                    existing: self.state.name.clone(),
                    found: database.clone(),
                });
            }
        }

        let name = stmt.table.name.clone();
        let Some(table) = self.state.default_schema_mut().add_table(name.clone()) else {
            return Err(MetadataError::DuplicateTable(name));
        };
        debug!(table = %name, id = table.id, "Creating table");

        for option in &stmt.options {
            match option {
                TableOption::Comment(comment) => table.comment.clone_from(comment),
                TableOption::Engine(engine) => table.engine.clone_from(engine),
                TableOption::Collate(collation) => table.collation.clone_from(collation),
                _ => {}
            }
        }
        self.current = Some(name);
        Ok(())
    }

    /// Adds a column to the current table.
    ///
    /// A column-level `PRIMARY KEY` also appends the column to the `PRIMARY`
    /// index, so `CREATE TABLE t (id INT PRIMARY KEY)` yields a primary index
    /// where a reader honoring only table-level constraints would yield none.
    fn add_column(&mut self, column: &ColumnDef) -> Result<()> {
        let Some(table) = self.table_mut() else {
            return Ok(());
        };
        if table.column(&column.name).is_some() {
            return Err(MetadataError::DuplicateColumn {
                table: table.name.clone(),
                column: column.name.clone(),
            });
        }
        let parts = ColumnParts::from_def(column)?;

        let Some(table) = self.table_mut() else {
            return Ok(());
        };
        if let Some(state) = table.add_column(column.name.clone(), parts.column_type) {
            state.nullable = parts.nullable;
            state.default = parts.default;
            state.comment = parts.comment;
        }
        if parts.primary {
            table.primary_key_mut().keys.push(column.name.clone());
        }
        trace!(table = %table.name, column = %column.name, "Added column");
        Ok(())
    }

    fn add_constraint(&mut self, constraint: &Constraint) -> Result<()> {
        match constraint.kind {
            ConstraintKind::PrimaryKey => {
                if let Some(table) = self.table_mut() {
                    table
                        .primary_key_mut()
                        .keys
                        .extend(column_names(&constraint.keys));
                }
                Ok(())
            }
            ConstraintKind::ForeignKey => self.add_foreign_key(constraint),
            ConstraintKind::Index
            | ConstraintKind::Key
            | ConstraintKind::Unique
            | ConstraintKind::UniqueKey
            | ConstraintKind::UniqueIndex => self.add_index(constraint),
            ConstraintKind::Fulltext | ConstraintKind::Check => {
                trace!(kind = ?constraint.kind, "Ignoring constraint");
                Ok(())
            }
        }
    }

    fn add_foreign_key(&mut self, constraint: &Constraint) -> Result<()> {
        let Some(table) = self.table_mut() else {
            return Ok(());
        };
        if constraint.name.is_empty() {
            return Err(MetadataError::EmptyForeignKeyName(table.name.clone()));
        }
        let (referenced_table, referenced_columns) = constraint
            .refer
            .as_ref()
            .map(|refer| (refer.table.name.clone(), column_names(&refer.keys)))
            .unwrap_or_default();
        let added = table.add_foreign_key(
            constraint.name.clone(),
            column_names(&constraint.keys),
            referenced_table,
            referenced_columns,
        );
        if added.is_none() {
            return Err(MetadataError::DuplicateForeignKey {
                table: table.name.clone(),
                foreign_key: constraint.name.clone(),
            });
        }
        Ok(())
    }

    fn add_index(&mut self, constraint: &Constraint) -> Result<()> {
        if self.current.is_none() {
            return Ok(());
        }
        let (keys, length) = index_keys(&constraint.keys)?;
        let unique = matches!(
            constraint.kind,
            ConstraintKind::Unique | ConstraintKind::UniqueKey | ConstraintKind::UniqueIndex
        );
        let Some(table) = self.table_mut() else {
            return Ok(());
        };
        if constraint.name.is_empty() {
            return Err(MetadataError::EmptyIndexName(table.name.clone()));
        }
        if table
            .add_index(constraint.name.clone(), keys, length, unique)
            .is_none()
        {
            return Err(MetadataError::DuplicateIndex {
                table: table.name.clone(),
                index: constraint.name.clone(),
            });
        }
        Ok(())
    }

    /// Turns the outcome of handling a node into the next visit action.
    fn proceed(&mut self, result: Result<()>) -> VisitAction {
        match result {
            Ok(()) => VisitAction::Continue,
            Err(error) => self.fail(error),
        }
    }
}

impl Visitor for Transformer {
    fn enter(&mut self, node: Node<'_>) -> VisitAction {
        match node {
            Node::CreateTable(stmt) => {
                let result = self.enter_create_table(stmt);
                self.proceed(result)
            }
            Node::ColumnDef(column) => {
                let result = self.add_column(column);
                self.proceed(result)
            }
            Node::Constraint(constraint) => {
                let result = self.add_constraint(constraint);
                self.proceed(result)
            }
            Node::Unsupported(stmt) => {
                trace!(keyword = %stmt.keyword, "Ignoring statement");
                VisitAction::SkipChildren
            }
        }
    }

    fn leave(&mut self, node: Node<'_>) {
        if let Node::CreateTable(_) = node {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemeta_sql::visit::Visitable;

    fn transform(sql: &str) -> Transformer {
        let statements =
            schemeta_sql::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {e}"));
        let mut transformer = Transformer::new();
        for stmt in &statements {
            stmt.accept(&mut transformer);
        }
        transformer
    }

    fn table<'a>(transformer: &'a Transformer, name: &str) -> &'a TableState {
        transformer
            .state()
            .find_table(name)
            .unwrap_or_else(|| panic!("no table {name}"))
    }

    // ====================================================================
    // Columns
    // ====================================================================

    #[test]
    fn test_column_types() {
        let t = transform(
            "CREATE TABLE t (
                a INT UNSIGNED ZEROFILL,
                b BIT(8) UNSIGNED,
                c YEAR ZEROFILL,
                d DECIMAL(10,2),
                e VARCHAR(20) CHARACTER SET binary
            )",
        );
        let table = table(&t, "t");
        let types: Vec<_> = table.columns.values().map(|c| c.column_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "int(11) unsigned zerofill",
                "bit(8)",
                "year(4)",
                "decimal(10,2)",
                "varbinary(20)",
            ]
        );
    }

    #[test]
    fn test_nullability() {
        let t = transform("CREATE TABLE t (a INT NOT NULL, b INT PRIMARY KEY, c INT NULL, d INT)");
        let table = table(&t, "t");
        let nullable: Vec<_> = table.columns.values().map(|c| c.nullable).collect();
        assert_eq!(nullable, vec![false, false, true, true]);
    }

    #[test]
    fn test_default_classification() {
        let t = transform(
            "CREATE TABLE t (
                a INT DEFAULT NULL,
                b VARCHAR(10) DEFAULT 'it''s',
                c TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                d INT DEFAULT -1,
                e VARCHAR(10) DEFAULT _utf8mb4'x'
            )",
        );
        let table = table(&t, "t");
        let defaults: Vec<_> = table.columns.values().map(|c| c.default.clone()).collect();
        assert_eq!(
            defaults,
            vec![
                Some(DefaultValue::Null),
                Some(DefaultValue::String("it's".to_string())),
                Some(DefaultValue::Expression("CURRENT_TIMESTAMP".to_string())),
                Some(DefaultValue::Expression("-1".to_string())),
                Some(DefaultValue::String("x".to_string())),
            ]
        );
    }

    #[test]
    fn test_last_of_default_and_auto_options_wins() {
        let t = transform(
            "CREATE TABLE t (
                a BIGINT AUTO_INCREMENT DEFAULT 1,
                b BIGINT DEFAULT 1 AUTO_INCREMENT,
                c BIGINT AUTO_RANDOM(5, 54),
                d BIGINT AUTO_RANDOM
            )",
        );
        let table = table(&t, "t");
        let a = table.column("a").unwrap();
        assert_eq!(a.default, Some(DefaultValue::Expression("1".to_string())));
        assert!(!a.has_auto_increment());
        assert!(table.column("b").unwrap().has_auto_increment());
        assert_eq!(
            table.column("c").unwrap().default,
            Some(DefaultValue::Expression("AUTO_RANDOM(5, 54)".to_string()))
        );
        assert_eq!(
            table.column("d").unwrap().default,
            Some(DefaultValue::Expression("AUTO_RANDOM".to_string()))
        );
    }

    #[test]
    fn test_comment_is_raw_text() {
        let t = transform("CREATE TABLE t (a INT COMMENT 'it''s here') COMMENT = 'tbl'");
        let table = table(&t, "t");
        assert_eq!(table.column("a").unwrap().comment, "it's here");
        assert_eq!(table.comment, "tbl");
    }

    // ====================================================================
    // Table options and keys
    // ====================================================================

    #[test]
    fn test_table_options_last_wins() {
        let t = transform(
            "CREATE TABLE t (a INT) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 \
             COLLATE=utf8mb4_bin ENGINE=MyISAM",
        );
        let table = table(&t, "t");
        assert_eq!(table.engine, "MyISAM");
        assert_eq!(table.collation, "utf8mb4_bin");
    }

    #[test]
    fn test_primary_keys_merged() {
        let t = transform("CREATE TABLE t (a INT PRIMARY KEY, b INT, c INT, PRIMARY KEY (b, c))");
        let table = table(&t, "t");
        let pk = table.primary_key().unwrap();
        assert_eq!(pk.keys, vec!["a", "b", "c"]);
        assert!(pk.is_primary() && pk.is_unique());
        assert_eq!(table.indexes.len(), 1);
    }

    #[test]
    fn test_secondary_indexes() {
        let t = transform(
            "CREATE TABLE t (
                a VARCHAR(100), b INT,
                KEY idx_a (a(10), b),
                UNIQUE INDEX uk_b (b),
                UNIQUE uk_expr ((lower(a))),
                FULLTEXT KEY ft (a),
                CHECK (b > 0)
            )",
        );
        let table = table(&t, "t");
        let idx = table.index("idx_a").unwrap();
        assert_eq!(idx.keys, vec!["a", "b"]);
        assert_eq!(idx.length, vec![10, -1]);
        assert!(!idx.is_unique());
        assert!(table.index("uk_b").unwrap().is_unique());
        let expr = table.index("uk_expr").unwrap();
        assert_eq!(expr.keys, vec!["(lower(`a`))"]);
        assert_eq!(expr.length, vec![-1]);
        assert!(table.index("ft").is_none());
        assert_eq!(table.indexes.len(), 3);
    }

    #[test]
    fn test_foreign_keys() {
        let t = transform(
            "CREATE TABLE c (
                a INT, b INT,
                CONSTRAINT fk_p FOREIGN KEY (a, b) REFERENCES p (x, y) ON DELETE CASCADE
            )",
        );
        let fk = table(&t, "c").foreign_key("fk_p").unwrap();
        assert_eq!(fk.columns, vec!["a", "b"]);
        assert_eq!(fk.referenced_table, "p");
        assert_eq!(fk.referenced_columns, vec!["x", "y"]);
    }

    // ====================================================================
    // Errors
    // ====================================================================

    #[test]
    fn test_duplicate_table() {
        let t = transform("CREATE TABLE t (a INT); CREATE TABLE t (b INT)");
        assert!(matches!(t.error(), Some(MetadataError::DuplicateTable(name)) if name == "t"));
        assert!(table(&t, "t").column("a").is_some());
    }

    #[test]
    fn test_duplicate_column_abandons_table() {
        let t = transform("CREATE TABLE t (a INT, a INT, b INT); CREATE TABLE u (c INT)");
        assert!(matches!(
            t.error(),
            Some(MetadataError::DuplicateColumn { column, .. }) if column == "a"
        ));
        assert!(table(&t, "t").column("b").is_none());
        assert!(table(&t, "u").column("c").is_some());
    }

    #[test]
    fn test_abandoned_table_ignores_later_key_parts() {
        let t = transform("CREATE TABLE t (a INT, a INT, KEY k ((a + ?)))");
        assert!(matches!(
            t.error(),
            Some(MetadataError::DuplicateColumn { column, .. }) if column == "a"
        ));
        assert!(table(&t, "t").index("k").is_none());
    }

    #[test]
    fn test_index_errors() {
        let t = transform("CREATE TABLE t (a INT, KEY (a))");
        assert!(matches!(t.error(), Some(MetadataError::EmptyIndexName(_))));

        let t = transform("CREATE TABLE t (a INT, KEY i (a), UNIQUE KEY i (a))");
        assert!(matches!(t.error(), Some(MetadataError::DuplicateIndex { .. })));

        let t = transform("CREATE TABLE t (a INT, FOREIGN KEY (a) REFERENCES p (id))");
        assert!(matches!(t.error(), Some(MetadataError::EmptyForeignKeyName(_))));

        let t = transform(
            "CREATE TABLE t (a INT, CONSTRAINT f FOREIGN KEY (a) REFERENCES p (id), \
             CONSTRAINT f FOREIGN KEY (a) REFERENCES q (id))",
        );
        assert!(matches!(t.error(), Some(MetadataError::DuplicateForeignKey { .. })));
    }

    #[test]
    fn test_database_names() {
        let t = transform("CREATE TABLE db.a (x INT); CREATE TABLE b (y INT); CREATE TABLE db.c (z INT)");
        assert!(t.error().is_none());
        assert_eq!(t.state().name, "db");

        let t = transform("CREATE TABLE db1.a (x INT); CREATE TABLE db2.b (y INT)");
        assert!(matches!(
            t.error(),
            Some(MetadataError::MultipleDatabaseNames { existing, found })
                if existing == "db1" && found == "db2"
        ));
        assert!(t.state().find_table("b").is_none());
    }

    #[test]
    fn test_last_error_wins() {
        let t = transform(
            "CREATE TABLE t (a INT); CREATE TABLE t (a INT); \
             CREATE TABLE u (a INT, a INT); CREATE TABLE v (a INT)",
        );
        assert!(matches!(t.error(), Some(MetadataError::DuplicateColumn { .. })));
        assert!(t.state().find_table("v").is_some());
    }

    #[test]
    fn test_unrestorable_default() {
        let t = transform("CREATE TABLE t (a INT DEFAULT ?, b INT)");
        assert!(matches!(t.error(), Some(MetadataError::Restore(_))));
        assert!(table(&t, "t").column("a").is_none());
    }

    #[test]
    fn test_other_statements_ignored() {
        let t = transform("SET NAMES utf8mb4; DROP TABLE IF EXISTS t; CREATE TABLE t (a INT)");
        assert!(t.error().is_none());
        assert_eq!(t.state().table_count(), 1);
    }
}
