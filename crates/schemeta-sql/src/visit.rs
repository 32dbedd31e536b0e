//! Statement traversal.
//!
//! A [`Visitor`] sees every node on the way down ([`Visitor::enter`]) and on
//! the way back up ([`Visitor::leave`]). Returning
//! [`VisitAction::SkipChildren`] from `enter` prunes the node's children;
//! `leave` is still called for the node itself.

use crate::ast::{ColumnDef, Constraint, CreateTableStmt, Statement, UnsupportedStmt};

/// A borrowed view of a visitable node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// A CREATE TABLE statement; its children are its columns and constraints.
    CreateTable(&'a CreateTableStmt),
    /// A column definition inside CREATE TABLE.
    ColumnDef(&'a ColumnDef),
    /// A constraint inside CREATE TABLE.
    Constraint(&'a Constraint),
    /// A statement kept as raw text.
    Unsupported(&'a UnsupportedStmt),
}

/// What to do after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    /// Visit the node's children.
    Continue,
    /// Do not visit the node's children.
    SkipChildren,
}

/// Callbacks invoked during traversal.
pub trait Visitor {
    /// Called before a node's children are visited.
    fn enter(&mut self, node: Node<'_>) -> VisitAction;

    /// Called after a node's children were visited (or skipped).
    fn leave(&mut self, _node: Node<'_>) {}
}

/// A node that can drive a [`Visitor`] over itself and its children.
pub trait Visitable {
    /// Walks `self` with `visitor`.
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V);
}

impl Visitable for Statement {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::CreateTable(stmt) => stmt.accept(visitor),
            Self::Unsupported(stmt) => stmt.accept(visitor),
        }
    }
}

impl Visitable for CreateTableStmt {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        if visitor.enter(Node::CreateTable(self)) == VisitAction::Continue {
            for column in &self.columns {
                column.accept(visitor);
            }
            for constraint in &self.constraints {
                constraint.accept(visitor);
            }
        }
        visitor.leave(Node::CreateTable(self));
    }
}

impl Visitable for ColumnDef {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.enter(Node::ColumnDef(self));
        visitor.leave(Node::ColumnDef(self));
    }
}

impl Visitable for Constraint {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.enter(Node::Constraint(self));
        visitor.leave(Node::Constraint(self));
    }
}

impl Visitable for UnsupportedStmt {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.enter(Node::Unsupported(self));
        visitor.leave(Node::Unsupported(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip_tables: bool,
    }

    fn label(node: Node<'_>) -> String {
        match node {
            Node::CreateTable(stmt) => format!("table:{}", stmt.table.name),
            Node::ColumnDef(column) => format!("column:{}", column.name),
            Node::Constraint(constraint) => format!("constraint:{:?}", constraint.kind),
            Node::Unsupported(stmt) => format!("unsupported:{}", stmt.keyword),
        }
    }

    impl Visitor for Recorder {
        fn enter(&mut self, node: Node<'_>) -> VisitAction {
            self.events.push(format!("enter {}", label(node)));
            if self.skip_tables && matches!(node, Node::CreateTable(_)) {
                VisitAction::SkipChildren
            } else {
                VisitAction::Continue
            }
        }

        fn leave(&mut self, node: Node<'_>) {
            self.events.push(format!("leave {}", label(node)));
        }
    }

    fn visit(sql: &str, skip_tables: bool) -> Vec<String> {
        let statements = parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {e}"));
        let mut recorder = Recorder {
            skip_tables,
            ..Recorder::default()
        };
        for stmt in &statements {
            stmt.accept(&mut recorder);
        }
        recorder.events
    }

    #[test]
    fn test_children_visited_in_order() {
        let events = visit("CREATE TABLE t (a INT, PRIMARY KEY (a)); DROP TABLE x", false);
        assert_eq!(
            events,
            vec![
                "enter table:t",
                "enter column:a",
                "leave column:a",
                "enter constraint:PrimaryKey",
                "leave constraint:PrimaryKey",
                "leave table:t",
                "enter unsupported:DROP",
                "leave unsupported:DROP",
            ]
        );
    }

    #[test]
    fn test_skip_children_still_leaves() {
        let events = visit("CREATE TABLE t (a INT)", true);
        assert_eq!(events, vec!["enter table:t", "leave table:t"]);
    }
}
