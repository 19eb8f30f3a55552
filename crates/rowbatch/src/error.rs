use derive_more::Display;
use rowbatch_core::{
    db::BatchInsertError,
    error::{ErrorOrigin as CoreErrorOrigin, PersistenceError, PersistenceErrorKind},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<BatchInsertError> for Error {
    fn from(err: BatchInsertError) -> Self {
        let origin = err.origin().into();
        let message = err.to_string();

        match err {
            BatchInsertError::StaleBatch { .. } => {
                Self::new(ErrorKind::Insert(InsertErrorKind::StaleBatch), origin, message)
            }

            BatchInsertError::TooManyRowsAffected { .. } => Self::new(
                ErrorKind::Insert(InsertErrorKind::TooManyRowsAffected),
                origin,
                message,
            ),

            BatchInsertError::Persistence(err) => err.into(),

            BatchInsertError::Generation { .. } => {
                Self::new(ErrorKind::Generation, origin, message)
            }

            BatchInsertError::SnapshotArity { .. } | BatchInsertError::ColumnArity { .. } => {
                Self::new(ErrorKind::Internal, origin, message)
            }
        }
    }
}

impl From<PersistenceError> for Error {
    fn from(err: PersistenceError) -> Self {
        Self::new(
            ErrorKind::Backend(err.kind.into()),
            ErrorOrigin::Backend,
            err.to_string(),
        )
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Insert(InsertErrorKind),
    Backend(BackendErrorKind),

    /// An identifier or value generator failed before anything was sent.
    Generation,

    /// The caller cannot remediate this.
    Internal,
}

///
/// InsertErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum InsertErrorKind {
    /// Fewer rows written than submitted.
    StaleBatch,

    /// More rows written than submitted.
    TooManyRowsAffected,
}

///
/// BackendErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum BackendErrorKind {
    ConstraintViolation,
    LockAcquisition,
    DataException,
    SqlGrammar,
    Connection,
    Other,
}

impl From<PersistenceErrorKind> for BackendErrorKind {
    fn from(kind: PersistenceErrorKind) -> Self {
        match kind {
            PersistenceErrorKind::ConstraintViolation => Self::ConstraintViolation,
            PersistenceErrorKind::LockAcquisition => Self::LockAcquisition,
            PersistenceErrorKind::DataException => Self::DataException,
            PersistenceErrorKind::SqlGrammar => Self::SqlGrammar,
            PersistenceErrorKind::Connection => Self::Connection,
            PersistenceErrorKind::Generic => Self::Other,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Backend,
    Executor,
    Generator,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Backend => Self::Backend,
            CoreErrorOrigin::Executor => Self::Executor,
            CoreErrorOrigin::Generator => Self::Generator,
        }
    }
}

///
/// TESTS
///
