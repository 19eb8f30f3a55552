use crate::{error::SqliteError, value::SqlValue};
use rowbatch_core::{
    db::{Session, Statement},
    error::PersistenceError,
    value::Value,
};
use rusqlite::{CachedStatement, Connection};
use std::path::Path;
use tracing::{instrument, trace};

///
/// SqliteSession
///
/// Batch-insert session over one SQLite connection.
/// Statements come from the connection's prepared-statement cache, so the
/// same multi-row text is compiled once per batch size.
///

#[derive(Debug)]
pub struct SqliteSession {
    conn: Connection,
}

impl SqliteSession {
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    #[instrument(name = "rowbatch::sqlite::open", level = "debug", skip_all)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteError> {
        Ok(Self::new(Connection::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, SqliteError> {
        Ok(Self::new(Connection::open_in_memory()?))
    }

    /// Size the statement cache; each distinct batch size is one entry.
    #[must_use]
    pub fn with_statement_cache_capacity(self, capacity: usize) -> Self {
        self.conn.set_prepared_statement_cache_capacity(capacity);
        self
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    #[must_use]
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

///
/// SqliteStatement
/// Cached prepared statement; goes back to the cache on release.
///

pub struct SqliteStatement<'c> {
    inner: Option<CachedStatement<'c>>,
}

impl Statement for SqliteStatement<'_> {
    type Error = SqliteError;

    fn bind(&mut self, index: usize, value: &Value) -> Result<(), SqliteError> {
        let statement = self.inner.as_mut().ok_or(SqliteError::Released)?;
        statement.raw_bind_parameter(index, SqlValue(value))?;

        Ok(())
    }
}

impl Session for SqliteSession {
    type Error = SqliteError;
    type Statement<'s> = SqliteStatement<'s>;

    fn prepare_statement<'s>(&'s self, sql: &str) -> Result<SqliteStatement<'s>, SqliteError> {
        let statement = self.conn.prepare_cached(sql)?;

        Ok(SqliteStatement {
            inner: Some(statement),
        })
    }

    fn execute_update<'s>(
        &'s self,
        statement: &mut SqliteStatement<'s>,
    ) -> Result<u64, SqliteError> {
        let statement = statement.inner.as_mut().ok_or(SqliteError::Released)?;
        let changed = statement.raw_execute()?;
        trace!(changed, "sqlite insert executed");

        Ok(u64::try_from(changed).unwrap_or(u64::MAX))
    }

    fn release<'s>(&'s self, statement: &mut SqliteStatement<'s>) {
        // dropping a cached statement resets it and returns it to the cache
        drop(statement.inner.take());
    }

    fn translate_error(&self, error: SqliteError, message: &str, sql: &str) -> PersistenceError {
        PersistenceError::new(error.kind(), message, sql, error)
    }
}
