//! DDL synthesis.
//!
//! Renders tables back to `CREATE TABLE` text. The output is meant for
//! display and comparison; re-parsing it yields an equivalent model, not
//! byte-identical input.

use std::fmt;

use crate::state::{by_id, ColumnState, DatabaseState, ForeignKeyState, IndexState, TableState};

/// Separator between the items of a CREATE TABLE body.
const ITEM_SEPARATOR: &str = ",\n  ";

/// Doubles single quotes for use inside a `'...'` literal.
fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Writes `items` as back-quoted names joined by `, `.
fn write_names(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "`{item}`")?;
    }
    Ok(())
}

/// Returns true for key text holding a parenthesised expression.
fn is_expression_key(key: &str) -> bool {
    key.len() > 2 && key.starts_with('(') && key.ends_with(')')
}

impl DatabaseState {
    /// Renders every table of every schema, in id order.
    #[must_use]
    pub fn to_ddl(&self) -> String {
        by_id(&self.schemas)
            .into_iter()
            .flat_map(|schema| by_id(&schema.tables))
            .map(TableState::to_ddl)
            .collect()
    }
}

impl TableState {
    /// Renders the table as a `CREATE TABLE` statement preceded by a
    /// comment banner.
    #[must_use]
    pub fn to_ddl(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--")?;
        writeln!(f, "-- Table structure for `{}`", self.name)?;
        writeln!(f, "--")?;
        write!(f, "CREATE TABLE `{}` (\n  ", self.name)?;

        let columns = by_id(&self.columns).into_iter().map(|c| c as &dyn fmt::Display);
        let indexes = by_id(&self.indexes).into_iter().map(|i| i as &dyn fmt::Display);
        let foreign_keys = by_id(&self.foreign_keys)
            .into_iter()
            .map(|fk| fk as &dyn fmt::Display);
        for (i, item) in columns.chain(indexes).chain(foreign_keys).enumerate() {
            if i > 0 {
                f.write_str(ITEM_SEPARATOR)?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("\n)")?;

        if !self.engine.is_empty() {
            write!(f, " ENGINE={}", self.engine)?;
        }
        if !self.collation.is_empty() {
            write!(f, " COLLATE={}", self.collation)?;
        }
        if !self.comment.is_empty() {
            write!(f, " COMMENT '{}'", escape(&self.comment))?;
        }
        f.write_str(";\n")
    }
}

impl fmt::Display for ColumnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.name, self.column_type)?;
        f.write_str(if self.nullable { " NULL" } else { " NOT NULL" })?;
        if let Some(default) = &self.default {
            if default.is_auto_increment() {
                write!(f, " {}", default.to_sql())?;
            } else if default.is_auto_random() {
                write!(f, " /*T![auto_rand] {} */", default.to_sql())?;
            } else {
                write!(f, " DEFAULT {}", default.to_sql())?;
            }
        }
        if !self.comment.is_empty() {
            write!(f, " COMMENT '{}'", escape(&self.comment))?;
        }
        Ok(())
    }
}

impl fmt::Display for IndexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_primary() {
            f.write_str("PRIMARY KEY (")?;
            write_names(f, &self.keys)?;
            return f.write_str(")");
        }

        if self.is_unique() {
            f.write_str("UNIQUE ")?;
        }
        write!(f, "KEY `{}` (", self.name)?;
        for (j, key) in self.keys.iter().enumerate() {
            if j > 0 {
                f.write_str(",")?;
            }
            if is_expression_key(key) {
                f.write_str(key)?;
            } else {
                write!(f, "`{key}`")?;
                let length = self.length.get(j).copied().unwrap_or(-1);
                if length > 0 {
                    write!(f, "({length})")?;
                }
            }
        }
        f.write_str(")")
    }
}

impl fmt::Display for ForeignKeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CONSTRAINT `{}` FOREIGN KEY (", self.name)?;
        write_names(f, &self.columns)?;
        write!(f, ") REFERENCES `{}` (", self.referenced_table)?;
        write_names(f, &self.referenced_columns)?;
        f.write_str(")")
    }
}
