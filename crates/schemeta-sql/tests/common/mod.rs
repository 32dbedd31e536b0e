#![allow(dead_code)]

use schemeta_sql::ast::{ColumnDef, CreateTableStmt, Statement};
use schemeta_sql::ParseError;

pub fn parse(sql: &str) -> Vec<Statement> {
    schemeta_sql::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    schemeta_sql::parse(sql).expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_create(sql: &str) -> CreateTableStmt {
    match parse(sql).into_iter().next() {
        Some(Statement::CreateTable(stmt)) => stmt,
        other => panic!("Expected CREATE TABLE, got {other:?}"),
    }
}

pub fn column<'a>(stmt: &'a CreateTableStmt, name: &str) -> &'a ColumnDef {
    stmt.columns
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no column {name} in {}", stmt.table.name))
}
