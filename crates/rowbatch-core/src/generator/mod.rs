//! Local identifier and value generators.
//!
//! Every generator here produces its value in process; none of them
//! reaches the database.
pub(crate) mod ulid;

#[cfg(test)]
mod tests;

use crate::{
    error::GenerationError,
    model::version::now_millis,
    traits::{IdentifierGenerator, ValueGenerator},
    value::Value,
};
use derive_more::Display;
use uuid::Uuid;

///
/// IdGeneratorKind
///
/// Identifier strategy classification used by eligibility analysis.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum IdGeneratorKind {
    /// Caller assigns the identifier before insert.
    Assigned,
    /// Random v4 UUID.
    Uuid,
    /// Random UUID rendered as 32 hex characters.
    UuidHex,
    /// Monotonic ULID.
    Ulid,
    /// Database auto-increment read back after insert.
    Identity,
    /// Database sequence query.
    Sequence,
    /// `max(id)` read on first use.
    Increment,
    /// Hi/lo table allocation.
    Table,
    /// Natural-key select after insert.
    Select,
    /// Borrowed from an associated entity.
    Foreign,
    #[display("Custom({_0})")]
    Custom(&'static str),
}

impl IdGeneratorKind {
    /// Whether the strategy produces values without a database round trip.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Assigned | Self::Uuid | Self::UuidHex | Self::Ulid)
    }
}

///
/// AssignedGenerator
///
/// Reads the caller-assigned identifier off the entity.
///

pub struct AssignedGenerator<F> {
    read: F,
}

impl<F> AssignedGenerator<F> {
    pub const fn new(read: F) -> Self {
        Self { read }
    }
}

impl<E, F> IdentifierGenerator<E> for AssignedGenerator<F>
where
    F: Fn(&E) -> Option<Value>,
{
    fn kind(&self) -> IdGeneratorKind {
        IdGeneratorKind::Assigned
    }

    fn generate(&self, entity: &E) -> Result<Value, GenerationError> {
        match (self.read)(entity) {
            Some(id) if !id.is_null() => Ok(id),
            _ => Err(GenerationError::UnassignedIdentifier),
        }
    }
}

///
/// UuidGenerator
///

#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl<E> IdentifierGenerator<E> for UuidGenerator {
    fn kind(&self) -> IdGeneratorKind {
        IdGeneratorKind::Uuid
    }

    fn generate(&self, _: &E) -> Result<Value, GenerationError> {
        Ok(Value::Uuid(Uuid::new_v4()))
    }
}

///
/// UuidHexGenerator
///

#[derive(Clone, Copy, Debug, Default)]
pub struct UuidHexGenerator;

impl<E> IdentifierGenerator<E> for UuidHexGenerator {
    fn kind(&self) -> IdGeneratorKind {
        IdGeneratorKind::UuidHex
    }

    fn generate(&self, _: &E) -> Result<Value, GenerationError> {
        Ok(Value::Text(Uuid::new_v4().simple().to_string()))
    }
}

///
/// UlidGenerator
///

#[derive(Clone, Copy, Debug, Default)]
pub struct UlidGenerator;

impl<E> IdentifierGenerator<E> for UlidGenerator {
    fn kind(&self) -> IdGeneratorKind {
        IdGeneratorKind::Ulid
    }

    fn generate(&self, _: &E) -> Result<Value, GenerationError> {
        ulid::generate().map(Value::Ulid)
    }
}

///
/// CreationTimestamp
/// In-memory creation stamp in epoch milliseconds.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CreationTimestamp;

impl<E> ValueGenerator<E> for CreationTimestamp {
    fn generate_value(&self, _: &E, _: &[Value]) -> Result<Value, GenerationError> {
        Ok(Value::Int(now_millis()))
    }
}
