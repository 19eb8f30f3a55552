use std::{error::Error as StdError, fmt};
use thiserror::Error as ThisError;

/// Boxed backend cause carried through translation.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

///
/// PersistenceError
///
/// Translated backend failure for one attempted statement.
/// Carries the backend cause and the statement text; `message` names the
/// entity being persisted.
///

#[derive(Debug, ThisError)]
#[error("{message} [{sql}]")]
pub struct PersistenceError {
    pub kind: PersistenceErrorKind,
    pub message: String,
    pub sql: String,
    #[source]
    pub source: BoxError,
}

impl PersistenceError {
    pub fn new(
        kind: PersistenceErrorKind,
        message: impl Into<String>,
        sql: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            sql: sql.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(self.kind, PersistenceErrorKind::ConstraintViolation)
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self.kind {
            PersistenceErrorKind::ConstraintViolation | PersistenceErrorKind::LockAcquisition => {
                ErrorClass::Conflict
            }
            PersistenceErrorKind::DataException
            | PersistenceErrorKind::SqlGrammar
            | PersistenceErrorKind::Connection
            | PersistenceErrorKind::Generic => ErrorClass::Backend,
        }
    }
}

///
/// PersistenceErrorKind
///
/// Backend failure categories produced by a session's error translation.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PersistenceErrorKind {
    ConstraintViolation,
    LockAcquisition,
    DataException,
    SqlGrammar,
    Connection,
    Generic,
}

impl fmt::Display for PersistenceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ConstraintViolation => "constraint_violation",
            Self::LockAcquisition => "lock_acquisition",
            Self::DataException => "data_exception",
            Self::SqlGrammar => "sql_grammar",
            Self::Connection => "connection",
            Self::Generic => "generic",
        };
        write!(f, "{label}")
    }
}

///
/// GenerationError
///
/// Failure raised while producing identifiers or in-memory values.
/// Always raised before a statement is prepared.
///

#[derive(Debug, ThisError)]
pub enum GenerationError {
    #[error("identifier must be manually assigned before insert")]
    UnassignedIdentifier,

    #[error("monotonic ulid generator overflow")]
    UlidOverflow,

    #[error("property index {property} out of range for {len} snapshot values")]
    PropertyOutOfRange { property: usize, len: usize },

    #[error("value generation failed: {0}")]
    Failed(String),
}

impl GenerationError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Backend,
    Conflict,
    Internal,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Backend => "backend",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Generator,
    Executor,
    Backend,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Generator => "generator",
            Self::Executor => "executor",
            Self::Backend => "backend",
        };
        write!(f, "{label}")
    }
}
