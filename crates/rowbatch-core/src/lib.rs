//! Core runtime for rowbatch: entity models, eligibility analysis, insert
//! template rewriting, value generation, and the multi-row batch executor.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod generator;
pub mod model;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Positional placeholder emitted by generated insert statements.
pub const PLACEHOLDER: &str = "?";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, or sessions are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{
            entity::{EntityModel, ResultCheckStyle},
            identifier::IdentifierModel,
            property::{ColumnModel, PropertyModel},
            version::{VersionKind, VersionModel},
        },
        traits::{EntityPersister, GenerationTiming, IdentifierGenerator, ValueGenerator},
        value::Value,
    };
}
