//! Dialects hide the syntax differences between database products.
//!
//! A [`Dialect`] answers three questions for the schema mapper and the
//! table operations: which column type a native [`Kind`] becomes, how a
//! typed [`Constraint`] is spelled, and how to ask the store's catalog
//! whether a table exists. Dialects are looked up by driver name in a
//! [`DialectRegistry`] that is built once at startup and then only read.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rusqlite::types::Value;
use tracing::debug;

use crate::datatype::Kind;
use crate::error::{NeormError, Result};
use crate::schema::Constraint;

/// Driver name the built-in SQLite dialect registers under.
pub const SQLITE3: &str = "sqlite3";

pub trait Dialect: fmt::Debug + Send + Sync {
    /// Maps a native kind onto a column type, looking through indirection first.
    /// Kinds the dialect cannot classify are an error, never a guess.
    fn data_type_of(&self, kind: &Kind) -> Result<&'static str>;

    /// A parameterized query yielding a row iff `table_name` exists, and its arguments.
    fn table_exist_sql(&self, table_name: &str) -> (String, Vec<Value>);

    fn constraint_sql(&self, constraint: Constraint) -> &'static str {
        match constraint {
            Constraint::PrimaryKey => "PRIMARY KEY",
            Constraint::AutoIncrement => "AUTOINCREMENT",
            Constraint::NotNull => "NOT NULL",
            Constraint::Unique => "UNIQUE",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite3;

impl Dialect for Sqlite3 {
    fn data_type_of(&self, kind: &Kind) -> Result<&'static str> {
        match kind.resolve() {
            Kind::Bool => Ok("bool"),
            Kind::I8
            | Kind::I16
            | Kind::I32
            | Kind::Isize
            | Kind::U8
            | Kind::U16
            | Kind::U32
            | Kind::Usize => Ok("integer"),
            Kind::I64 | Kind::U64 => Ok("bigint"),
            Kind::Text => Ok("text"),
            Kind::Sequence => Ok("blob"),
            Kind::DateTime => Ok("datetime"),
            other => Err(NeormError::UnsupportedType(other.clone())),
        }
    }

    fn table_exist_sql(&self, table_name: &str) -> (String, Vec<Value>) {
        (
            "SELECT `name` FROM `sqlite_master` WHERE `type` = 'table' AND `name` = ?".to_string(),
            vec![Value::Text(table_name.to_string())],
        )
    }
}

/// Registry of dialects by name.
///
/// Explicitly constructed and passed by reference to whatever needs a
/// dialect, rather than living in a global.
#[derive(Debug, Default, Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in dialects.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_dialect(SQLITE3, Sqlite3);
        registry
    }

    /// Installs `dialect` under `name`, replacing any earlier registration.
    pub fn register_dialect(&mut self, name: impl Into<String>, dialect: impl Dialect + 'static) {
        self.register_dialect_arc(name, Arc::new(dialect));
    }

    pub fn register_dialect_arc(&mut self, name: impl Into<String>, dialect: Arc<dyn Dialect>) {
        let name = name.into();
        debug!(dialect = %name, "registering dialect");
        self.dialects.insert(name, dialect);
    }

    pub fn get_dialect(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_type_table() {
        let d = Sqlite3;
        assert_eq!(d.data_type_of(&Kind::Bool).unwrap(), "bool");
        assert_eq!(d.data_type_of(&Kind::I32).unwrap(), "integer");
        assert_eq!(d.data_type_of(&Kind::U8).unwrap(), "integer");
        assert_eq!(d.data_type_of(&Kind::Isize).unwrap(), "integer");
        assert_eq!(d.data_type_of(&Kind::I64).unwrap(), "bigint");
        assert_eq!(d.data_type_of(&Kind::U64).unwrap(), "bigint");
        assert_eq!(d.data_type_of(&Kind::Text).unwrap(), "text");
        assert_eq!(d.data_type_of(&Kind::Sequence).unwrap(), "blob");
        assert_eq!(d.data_type_of(&Kind::DateTime).unwrap(), "datetime");
    }

    #[test]
    fn sqlite_looks_through_indirection() {
        let kind = Kind::Indirect(Box::new(Kind::Indirect(Box::new(Kind::Text))));
        assert_eq!(Sqlite3.data_type_of(&kind).unwrap(), "text");
    }

    #[test]
    fn sqlite_rejects_unmapped_kinds() {
        for kind in [Kind::F32, Kind::F64, Kind::Char, Kind::Struct("Point")] {
            match Sqlite3.data_type_of(&kind) {
                Err(NeormError::UnsupportedType(k)) => assert_eq!(k, kind),
                other => panic!("expected unsupported type for {kind}, got {other:?}"),
            }
        }
    }

    #[test]
    fn unsupported_error_names_the_resolved_kind() {
        let kind = Kind::Indirect(Box::new(Kind::F64));
        let err = Sqlite3.data_type_of(&kind).unwrap_err();
        assert_eq!(err.to_string(), "invalid sql type f64");
    }

    #[test]
    fn builtins_contain_sqlite3() {
        let registry = DialectRegistry::with_builtins();
        assert!(registry.get_dialect(SQLITE3).is_some());
        assert!(registry.get_dialect("postgres").is_none());
        assert_eq!(registry.names(), vec![SQLITE3]);
    }
}
