use crate::{
    error::{PersistenceError, PersistenceErrorKind},
    value::Value,
};
use std::error::Error as StdError;

// ============================================================================
// BACKEND CONTRACT
// ============================================================================
//
// Implemented by the host for its connection layer. The executor never
// opens, commits, or closes anything; it prepares one statement per chunk,
// binds, executes once, and hands the statement back.
//

///
/// Statement
/// Prepared statement handle with 1-based positional placeholders.
///

pub trait Statement {
    type Error: StdError + Send + Sync + 'static;

    fn bind(&mut self, index: usize, value: &Value) -> Result<(), Self::Error>;
}

///
/// Session
///
/// Statement lifecycle and error translation for one connection.
///
/// ## Contract
/// - every prepared statement is passed to `release` exactly once, whether
///   or not binding and execution succeeded
/// - `after_statement_execution` runs after every `release`
/// - `translate_error` maps a backend failure onto a `PersistenceError`;
///   the default classifies everything as generic
///

pub trait Session {
    type Error: StdError + Send + Sync + 'static;
    type Statement<'s>: Statement<Error = Self::Error>
    where
        Self: 's;

    fn prepare_statement<'s>(&'s self, sql: &str) -> Result<Self::Statement<'s>, Self::Error>;

    /// Execute and return the affected-row count.
    fn execute_update<'s>(
        &'s self,
        statement: &mut Self::Statement<'s>,
    ) -> Result<u64, Self::Error>;

    /// Return the handle to the session; it must not be executed again.
    fn release<'s>(&'s self, statement: &mut Self::Statement<'s>);

    fn after_statement_execution(&self) {}

    fn translate_error(&self, error: Self::Error, message: &str, sql: &str) -> PersistenceError {
        PersistenceError::new(PersistenceErrorKind::Generic, message, sql, error)
    }
}

///
/// StatementGuard
///
/// Owns one prepared statement for the duration of a chunk.
/// Release and post-execution cleanup happen on drop.
///

pub(crate) struct StatementGuard<'s, S: Session + 's> {
    session: &'s S,
    statement: S::Statement<'s>,
}

impl<'s, S: Session + 's> StatementGuard<'s, S> {
    pub(crate) fn prepare(session: &'s S, sql: &str) -> Result<Self, S::Error> {
        let statement = session.prepare_statement(sql)?;

        Ok(Self { session, statement })
    }

    pub(crate) fn bind(&mut self, index: usize, value: &Value) -> Result<(), S::Error> {
        self.statement.bind(index, value)
    }

    pub(crate) fn execute(&mut self) -> Result<u64, S::Error> {
        self.session.execute_update(&mut self.statement)
    }
}

impl<'s, S: Session + 's> Drop for StatementGuard<'s, S> {
    fn drop(&mut self) {
        self.session.release(&mut self.statement);
        self.session.after_statement_execution();
    }
}
