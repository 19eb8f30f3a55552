//! SQLite backend for rowbatch.
//!
//! Implements the `Session` and `Statement` contracts over a
//! `rusqlite::Connection` using the connection's prepared-statement cache,
//! and classifies SQLite result codes into `PersistenceErrorKind`s.
#![warn(unreachable_pub)]

mod error;
mod session;
mod value;

// re-exports
pub use error::{SqliteError, classify};
pub use session::{SqliteSession, SqliteStatement};
pub use value::SqlValue;
