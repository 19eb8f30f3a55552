use rowbatch_core::error::PersistenceErrorKind;
use rusqlite::{Error as SqlError, ErrorCode, ffi};
use thiserror::Error as ThisError;

///
/// SqliteError
///

#[derive(Debug, ThisError)]
pub enum SqliteError {
    #[error(transparent)]
    Sqlite(#[from] SqlError),

    #[error("statement used after release")]
    Released,
}

impl SqliteError {
    #[must_use]
    pub fn kind(&self) -> PersistenceErrorKind {
        match self {
            Self::Sqlite(err) => classify(err),
            Self::Released => PersistenceErrorKind::Generic,
        }
    }
}

/// Map a SQLite failure onto a persistence error category.
///
/// Primary result codes decide first; a bare `SQLITE_ERROR` from prepare or
/// step is a grammar or schema problem.
#[must_use]
pub fn classify(err: &SqlError) -> PersistenceErrorKind {
    match err {
        SqlError::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => PersistenceErrorKind::ConstraintViolation,
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                PersistenceErrorKind::LockAcquisition
            }
            ErrorCode::TooBig | ErrorCode::TypeMismatch => PersistenceErrorKind::DataException,
            ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::SystemIoFailure => {
                PersistenceErrorKind::Connection
            }
            _ if failure.extended_code == ffi::SQLITE_ERROR => PersistenceErrorKind::SqlGrammar,
            _ => PersistenceErrorKind::Generic,
        },
        SqlError::InvalidParameterCount(..) | SqlError::ToSqlConversionFailure(_) => {
            PersistenceErrorKind::DataException
        }
        _ => PersistenceErrorKind::Generic,
    }
}

///
/// TESTS
///
