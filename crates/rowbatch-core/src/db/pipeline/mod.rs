
use crate::{
    error::GenerationError,
    model::version::VersionKind,
    traits::{EntityPersister, ValueGenerator},
    value::Value,
};

///
/// PipelineStep
///

pub enum PipelineStep<'p, E> {
    /// Seed the version slot when it is still unset.
    SeedVersion { property: usize, kind: VersionKind },
    /// Overwrite a slot with an in-memory generated value.
    InMemory {
        property: usize,
        generator: &'p dyn ValueGenerator<E>,
    },
}

///
/// ValueGenerationPipeline
///
/// Ordered per-row mutators run between snapshot capture and binding.
/// Version seeding always comes first, then in-memory generators in
/// property order. Every written value is mirrored onto the entity.
///

pub struct ValueGenerationPipeline<'p, E> {
    steps: Vec<PipelineStep<'p, E>>,
}

impl<'p, E> ValueGenerationPipeline<'p, E> {
    /// Build the steps for one persister's entity type.
    pub fn for_persister<P>(persister: &'p P) -> Self
    where
        P: EntityPersister<Entity = E>,
    {
        let model = persister.model();
        let mut steps = Vec::new();

        if let Some(version) = model.version {
            steps.push(PipelineStep::SeedVersion {
                property: version.property,
                kind: version.kind,
            });
        }

        for property in 0..model.properties.len() {
            if let Some(generator) = persister.value_generator(property)
                && generator.timing().includes_insert()
            {
                steps.push(PipelineStep::InMemory {
                    property,
                    generator,
                });
            }
        }

        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[PipelineStep<'p, E>] {
        &self.steps
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step to one row's snapshot.
    pub fn run<P>(
        &self,
        persister: &P,
        entity: &mut E,
        fields: &mut [Value],
    ) -> Result<(), GenerationError>
    where
        P: EntityPersister<Entity = E> + ?Sized,
    {
        let len = fields.len();

        for step in &self.steps {
            match step {
                PipelineStep::SeedVersion { property, kind } => {
                    let property = *property;
                    let slot = fields
                        .get_mut(property)
                        .ok_or(GenerationError::PropertyOutOfRange { property, len })?;

                    if VersionKind::is_unset(slot) {
                        let seed = kind.seed();
                        *slot = seed.clone();
                        persister.set_property_value(entity, property, seed);
                    }
                }

                PipelineStep::InMemory {
                    property,
                    generator,
                } => {
                    let property = *property;
                    if property >= len {
                        return Err(GenerationError::PropertyOutOfRange { property, len });
                    }

                    let value = generator.generate_value(entity, fields)?;
                    fields[property] = value.clone();
                    persister.set_property_value(entity, property, value);
                }
            }
        }

        Ok(())
    }
}
