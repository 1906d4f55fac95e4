//! The statement-building session.
//!
//! A [`Session`] accumulates SQL text and positional parameters through
//! [`Session::raw`] and sends them to the store with one of three execution
//! calls. Every execution call leaves the session with an empty statement,
//! whether the store accepted it or not; the bound schema and dialect stay.

use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, MappedRows, OptionalExtension, Row, Rows, Statement, params_from_iter};
use tracing::{error, info};

use crate::dialect::Dialect;
use crate::error::{NeormError, Result};
use crate::schema::Schema;

/// Outcome of a statement that produces no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: usize,
    pub last_insert_rowid: i64,
}

pub struct Session<'conn> {
    pub(crate) conn: &'conn Connection,
    pub(crate) dialect: Option<Arc<dyn Dialect>>,
    sql: String,
    vars: Vec<Value>,
    pub(crate) ref_table: Option<Schema>,
}

impl<'conn> Session<'conn> {
    pub fn new(conn: &'conn Connection, dialect: Option<Arc<dyn Dialect>>) -> Self {
        Self {
            conn,
            dialect,
            sql: String::new(),
            vars: Vec::new(),
            ref_table: None,
        }
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }
    pub fn dialect(&self) -> Option<&Arc<dyn Dialect>> {
        self.dialect.as_ref()
    }
    /// Pending statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }
    /// Pending statement parameters.
    pub fn vars(&self) -> &[Value] {
        &self.vars
    }

    /// Empties the pending statement. The bound schema is kept.
    pub fn clear(&mut self) {
        self.sql.clear();
        self.vars.clear();
    }

    /// Appends `sql` and a separating space, then `values`, to the pending statement.
    pub fn raw(&mut self, sql: &str, values: &[Value]) -> &mut Self {
        self.sql.push_str(sql);
        self.sql.push(' ');
        self.vars.extend_from_slice(values);
        self
    }

    fn take_statement(&mut self) -> (String, Vec<Value>) {
        (std::mem::take(&mut self.sql), std::mem::take(&mut self.vars))
    }

    /// Runs the pending statement for its effect.
    ///
    /// The statement must not produce rows: a `SELECT` (or anything else that
    /// returns rows) fails with `rusqlite::Error::ExecuteReturnedResults`. Use
    /// [`Session::query_row`] or [`Session::query_rows`] for those.
    pub fn exec(&mut self) -> Result<ExecResult> {
        let (sql, vars) = self.take_statement();
        info!(sql = %sql, vars = ?vars, "exec");
        match self.conn.execute(&sql, params_from_iter(vars.iter())) {
            Ok(rows_affected) => Ok(ExecResult {
                rows_affected,
                last_insert_rowid: self.conn.last_insert_rowid(),
            }),
            Err(e) => {
                error!(sql = %sql, error = %e, "exec failed");
                Err(e.into())
            }
        }
    }

    /// Runs the pending statement and maps at most one row with `f`.
    /// No row at all is `Ok(None)`.
    pub fn query_row<T, F>(&mut self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let (sql, vars) = self.take_statement();
        info!(sql = %sql, vars = ?vars, "query row");
        self.conn
            .query_row(&sql, params_from_iter(vars.iter()), f)
            .optional()
            .map_err(|e| {
                error!(sql = %sql, error = %e, "query row failed");
                e.into()
            })
    }

    /// Prepares the pending statement, binds its parameters and hands back a
    /// lazy cursor over its rows.
    ///
    /// Prepare and bind failures, including a parameter count that does not
    /// match the placeholders, are reported here rather than by the cursor.
    pub fn query_rows(&mut self) -> Result<Cursor<'conn>> {
        let (sql, vars) = self.take_statement();
        info!(sql = %sql, vars = ?vars, "query rows");
        let conn: &'conn Connection = self.conn;
        match conn.prepare(&sql).and_then(|stmt| bind(stmt, &vars)) {
            Ok(stmt) => Ok(Cursor { stmt, started: false }),
            Err(e) => {
                error!(sql = %sql, error = %e, "query rows failed");
                Err(e.into())
            }
        }
    }
}

fn bind<'conn>(mut stmt: Statement<'conn>, vars: &[Value]) -> rusqlite::Result<Statement<'conn>> {
    let expected = stmt.parameter_count();
    if expected != vars.len() {
        return Err(rusqlite::Error::InvalidParameterCount(vars.len(), expected));
    }
    for (i, value) in vars.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, value)?;
    }
    Ok(stmt)
}

/// A prepared query with its parameters already bound.
///
/// The rows can be handed out once, through either [`Cursor::rows`] or
/// [`Cursor::map`]; a second call fails with [`NeormError::CursorConsumed`].
/// Rows are only fetched from the store while the caller steps through them.
/// Dropping the cursor finalizes the statement.
pub struct Cursor<'conn> {
    stmt: Statement<'conn>,
    started: bool,
}

impl<'conn> Cursor<'conn> {
    pub fn column_names(&self) -> Vec<&str> {
        self.stmt.column_names()
    }

    fn start(&mut self) -> Result<&mut Statement<'conn>> {
        if self.started {
            error!("cursor rows already handed out");
            return Err(NeormError::CursorConsumed);
        }
        self.started = true;
        Ok(&mut self.stmt)
    }

    pub fn rows(&mut self) -> Result<Rows<'_>> {
        Ok(self.start()?.raw_query())
    }

    pub fn map<T, F>(&mut self, f: F) -> Result<MappedRows<'_, F>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        Ok(self.start()?.raw_query().mapped(f))
    }
}
