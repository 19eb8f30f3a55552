mod bind;

use crate::{
    db::{
        config::InsertConfig,
        eligibility::{IneligibleReason, InsertPlan},
        pipeline::ValueGenerationPipeline,
        registry,
        session::{Session, StatementGuard},
    },
    error::{ErrorClass, ErrorOrigin, GenerationError, PersistenceError},
    obs::sink::{self, MetricsEvent, Span},
    traits::EntityPersister,
    value::Value,
};
use bind::RowShapeError;
use std::{num::NonZeroUsize, sync::Arc};
use thiserror::Error as ThisError;
use tracing::{debug, instrument, warn};

///
/// BatchInsertError
///

#[derive(Debug, ThisError)]
pub enum BatchInsertError {
    /// Fewer rows written than entities submitted.
    #[error("Unexpected row count: {actual}; expected: {expected}")]
    StaleBatch {
        entity: &'static str,
        expected: u64,
        actual: u64,
    },

    /// More rows written than entities submitted.
    #[error("Unexpected row count: {actual}; expected: {expected}")]
    TooManyRowsAffected {
        entity: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("could not generate values for [{entity}]: {source}")]
    Generation {
        entity: &'static str,
        #[source]
        source: GenerationError,
    },

    #[error("snapshot for [{entity}] has {found} values; expected {expected}")]
    SnapshotArity {
        entity: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("property {property} of [{entity}] has {found} column values; expected {expected}")]
    ColumnArity {
        entity: &'static str,
        property: &'static str,
        expected: usize,
        found: usize,
    },
}

impl BatchInsertError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::StaleBatch { .. } => ErrorClass::Conflict,
            Self::Persistence(err) => err.class(),
            Self::Generation { .. } => ErrorClass::Internal,
            Self::TooManyRowsAffected { .. }
            | Self::SnapshotArity { .. }
            | Self::ColumnArity { .. } => ErrorClass::InvariantViolation,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Persistence(_) => ErrorOrigin::Backend,
            Self::Generation { .. } => ErrorOrigin::Generator,
            Self::StaleBatch { .. }
            | Self::TooManyRowsAffected { .. }
            | Self::SnapshotArity { .. }
            | Self::ColumnArity { .. } => ErrorOrigin::Executor,
        }
    }

    fn from_shape(entity: &'static str, err: RowShapeError) -> Self {
        match err {
            RowShapeError::Snapshot { expected, found } => Self::SnapshotArity {
                entity,
                expected,
                found,
            },
            RowShapeError::Columns {
                property,
                expected,
                found,
            } => Self::ColumnArity {
                entity,
                property,
                expected,
                found,
            },
        }
    }
}

///
/// RowSnapshot
/// Identifier and frozen property values captured for one entity.
///

struct RowSnapshot {
    id: Value,
    fields: Vec<Value>,
}

///
/// MultiRowInsert
///
/// Batch insert executor for one eligible entity type.
/// Holds the cached plan; one instance may serve any number of batches.
///

pub struct MultiRowInsert<'p, P: EntityPersister> {
    persister: &'p P,
    plan: Arc<InsertPlan>,
    config: InsertConfig,
}

impl<'p, P: EntityPersister> MultiRowInsert<'p, P> {
    /// Executor for an eligible entity type, or `None` when the caller must
    /// stay on the single-row path.
    #[must_use]
    pub fn new(persister: &'p P) -> Option<Self> {
        Self::try_new(persister).ok()
    }

    /// Like `new`, but keeps the reason an entity type was turned down.
    pub fn try_new(persister: &'p P) -> Result<Self, IneligibleReason> {
        let plan = registry::decision(persister)?;

        Ok(Self {
            persister,
            plan,
            config: InsertConfig::default(),
        })
    }

    #[must_use]
    pub const fn with_config(mut self, config: InsertConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn plan(&self) -> &InsertPlan {
        &self.plan
    }

    #[must_use]
    pub const fn config(&self) -> &InsertConfig {
        &self.config
    }

    /// Insert every entity with as few statements as the config allows.
    ///
    /// Identifiers and generated values are written onto the entities
    /// before any statement is prepared. The bound values come from the
    /// snapshots taken then, not from the entities' later state.
    #[instrument(
        name = "rowbatch::insert_batch",
        level = "debug",
        skip_all,
        fields(entity = self.plan.path, rows = entities.len())
    )]
    pub fn insert_batch<S: Session>(
        &self,
        session: &S,
        entities: &mut [P::Entity],
    ) -> Result<(), BatchInsertError> {
        if entities.is_empty() {
            return Ok(());
        }

        let mut span = Span::new(self.plan.path, count(entities.len()));
        let rows = self.capture(entities)?;

        let chunk_len = self.config.chunk_len(rows.len());
        for chunk in rows.chunks(chunk_len) {
            let written = self.write_chunk(session, chunk)?;
            span.add_statement(written);
        }

        Ok(())
    }

    // Generate ids, snapshot, and run the pipeline for every entity in order.
    fn capture(&self, entities: &mut [P::Entity]) -> Result<Vec<RowSnapshot>, BatchInsertError> {
        let model = self.persister.model();
        let pipeline = ValueGenerationPipeline::for_persister(self.persister);
        let ids = self.persister.identifier_generator();
        let generation = |source: GenerationError| BatchInsertError::Generation {
            entity: self.plan.path,
            source,
        };

        let mut rows = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            let id = ids.generate(entity).map_err(generation)?;
            self.persister.set_identifier(entity, &id);

            let mut fields = self.persister.property_values(entity);
            if fields.len() != model.properties.len() {
                return Err(BatchInsertError::SnapshotArity {
                    entity: self.plan.path,
                    expected: model.properties.len(),
                    found: fields.len(),
                });
            }

            pipeline
                .run(self.persister, entity, &mut fields)
                .map_err(generation)?;

            rows.push(RowSnapshot { id, fields });
        }

        Ok(rows)
    }

    // One statement for one chunk: build, bind, execute, verify.
    fn write_chunk<S: Session>(
        &self,
        session: &S,
        chunk: &[RowSnapshot],
    ) -> Result<u64, BatchInsertError> {
        let Some(rows) = NonZeroUsize::new(chunk.len()) else {
            return Ok(0);
        };
        let model = self.persister.model();

        let values = chunk
            .iter()
            .map(|row| bind::row_values(model, &row.id, &row.fields))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| BatchInsertError::from_shape(self.plan.path, err))?;

        let sql = self.plan.template.create_multi_row_insert(rows);
        debug!(%sql, rows = rows.get(), "executing multi-row insert");

        let affected = execute(session, &sql, &values)
            .map_err(|err| self.backend_failure(session, err, &sql))?;
        self.check_row_count(count(rows.get()), affected)?;

        Ok(affected)
    }

    fn check_row_count(&self, expected: u64, actual: u64) -> Result<(), BatchInsertError> {
        if !(self.plan.insert_check.verifies() && self.config.verify_row_count) {
            return Ok(());
        }
        if actual == expected {
            return Ok(());
        }

        let entity = self.plan.path;
        warn!(entity, expected, actual, "multi-row insert row count mismatch");
        sink::record(MetricsEvent::RowCountMismatch {
            entity_path: entity,
            expected,
            actual,
        });

        if actual < expected {
            Err(BatchInsertError::StaleBatch {
                entity,
                expected,
                actual,
            })
        } else {
            Err(BatchInsertError::TooManyRowsAffected {
                entity,
                expected,
                actual,
            })
        }
    }

    fn backend_failure<S: Session>(
        &self,
        session: &S,
        err: S::Error,
        sql: &str,
    ) -> BatchInsertError {
        let entity = self.plan.path;
        let message = format!("could not insert: [{entity}]");
        let err = session.translate_error(err, &message, sql);

        warn!(entity, kind = %err.kind, error = %err.source, "multi-row insert failed");
        sink::record(MetricsEvent::BackendFailure {
            entity_path: entity,
            kind: err.kind,
        });

        err.into()
    }
}

// Prepare, bind row-major, execute. The guard releases the statement on
// every return from here.
fn execute<S: Session>(session: &S, sql: &str, rows: &[Vec<&Value>]) -> Result<u64, S::Error> {
    let mut statement = StatementGuard::prepare(session, sql)?;

    for (offset, value) in rows.iter().flatten().enumerate() {
        statement.bind(offset + 1, value)?;
    }

    statement.execute()
}

fn count(rows: usize) -> u64 {
    u64::try_from(rows).unwrap_or(u64::MAX)
}
