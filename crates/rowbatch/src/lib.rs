//! rowbatch: collapse same-type entity inserts into multi-row statements.
//!
//! Re-exports the core runtime and, with the default `sqlite` feature, the
//! SQLite session.
//!
//! ```ignore
//! use rowbatch::{MultiRowInsert, sqlite::SqliteSession};
//!
//! if let Some(executor) = MultiRowInsert::new(&persister) {
//!     executor.insert_batch(&session, &mut entities)?;
//! }
//! ```
pub mod error;

pub use error::Error;

// core
pub use rowbatch_core::{
    PLACEHOLDER,
    db::{
        self, BatchInsertError, IneligibleReason, InsertConfig, InsertPlan, MultiRowInsert,
        Session, Statement, analyze, lookup,
    },
    generator, model, obs, traits, value,
};

#[cfg(feature = "sqlite")]
pub use rowbatch_sqlite as sqlite;

/// Crate version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Domain vocabulary plus the executor entry point.
///

pub mod prelude {
    pub use crate::Error;
    pub use rowbatch_core::{
        db::{InsertConfig, MultiRowInsert},
        generator::{
            AssignedGenerator, CreationTimestamp, IdGeneratorKind, UlidGenerator, UuidGenerator,
            UuidHexGenerator,
        },
        prelude::*,
    };
}
