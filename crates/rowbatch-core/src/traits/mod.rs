use crate::{
    error::GenerationError, generator::IdGeneratorKind, model::entity::EntityModel, value::Value,
};

// ============================================================================
// HOST PERSISTENCE CONTRACT
// ============================================================================
//
// These traits are implemented by the host persistence layer. They are the
// only way the executor reads mapping metadata or touches entity state.
//

///
/// EntityPersister
///
/// Mapping capability for one entity type.
///
/// ## Semantics
/// - `property_values` returns one value per `model().properties` entry,
///   in property order
/// - `set_property_value` writes a generated value back onto the entity so
///   later readers observe what was persisted
/// - `set_identifier` receives each generated identifier; the default
///   ignores it
/// - nothing here may perform I/O
///

pub trait EntityPersister {
    type Entity;

    fn model(&self) -> &EntityModel;

    fn identifier_generator(&self) -> &dyn IdentifierGenerator<Self::Entity>;

    /// In-memory generator for one property, if it has one.
    fn value_generator(&self, property: usize) -> Option<&dyn ValueGenerator<Self::Entity>> {
        let _ = property;
        None
    }

    fn property_values(&self, entity: &Self::Entity) -> Vec<Value>;

    fn set_property_value(&self, entity: &mut Self::Entity, property: usize, value: Value);

    fn set_identifier(&self, entity: &mut Self::Entity, id: &Value) {
        let _ = (entity, id);
    }
}

///
/// IdentifierGenerator
///
/// Produces the identifier for a new row.
/// Only generators whose kind is local are accepted for batching.
///

pub trait IdentifierGenerator<E> {
    fn kind(&self) -> IdGeneratorKind;

    fn generate(&self, entity: &E) -> Result<Value, GenerationError>;
}

///
/// ValueGenerator
///
/// Computes a property value in process at insert time.
/// `fields` is the row snapshot as it stands when the generator runs.
///

pub trait ValueGenerator<E> {
    fn timing(&self) -> GenerationTiming {
        GenerationTiming::Insert
    }

    fn generate_value(&self, entity: &E, fields: &[Value]) -> Result<Value, GenerationError>;
}

///
/// GenerationTiming
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationTiming {
    Never,
    Insert,
    Always,
}

impl GenerationTiming {
    #[must_use]
    pub const fn includes_insert(self) -> bool {
        matches!(self, Self::Insert | Self::Always)
    }
}
