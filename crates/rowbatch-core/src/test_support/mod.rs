//! Fixtures shared by unit tests: a positional entity, a scriptable
//! persister, and a recording in-memory session.
use crate::{
    db::session::{Session, Statement},
    error::{GenerationError, PersistenceError, PersistenceErrorKind},
    generator::IdGeneratorKind,
    model::{
        entity::EntityModel,
        identifier::IdentifierModel,
        property::{ColumnModel, PropertyModel},
        version::{VersionKind, VersionModel},
    },
    traits::{EntityPersister, IdentifierGenerator, ValueGenerator},
    value::Value,
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use thiserror::Error as ThisError;

// ============================================================================
// MODELS
// ============================================================================

static A_COLUMNS: [ColumnModel; 1] = [ColumnModel::new("a")];
static A_PROPERTIES: [PropertyModel; 1] = [PropertyModel::new("a", &A_COLUMNS)];

/// One property `a`, identifier column `b`, two placeholders per row.
pub(crate) const fn pair_model(path: &'static str) -> EntityModel {
    EntityModel::new(path, "t", IdentifierModel::new("b"), &A_PROPERTIES)
        .with_custom_insert("INSERT INTO t (a,b) VALUES (?,?)", false)
}

static NAME_COLUMNS: [ColumnModel; 1] = [ColumnModel::new("name")];
static SPAN_COLUMNS: [ColumnModel; 3] = [
    ColumnModel::new("span_start"),
    ColumnModel::read_only("span_len"),
    ColumnModel::new("span_end"),
];
static NOTE_COLUMNS: [ColumnModel; 1] = [ColumnModel::new("note")];
static VERSION_COLUMNS: [ColumnModel; 1] = [ColumnModel::new("version")];
static STAMP_COLUMNS: [ColumnModel; 1] = [ColumnModel::new("stamp")];

static SPAN_PROPERTIES: [PropertyModel; 5] = [
    PropertyModel::new("name", &NAME_COLUMNS),
    PropertyModel::new("span", &SPAN_COLUMNS),
    PropertyModel::new("note", &NOTE_COLUMNS).not_insertable(),
    PropertyModel::new("version", &VERSION_COLUMNS),
    PropertyModel::new("stamp", &STAMP_COLUMNS),
];

pub(crate) const SPAN_VERSION: usize = 3;
pub(crate) const SPAN_STAMP: usize = 4;

/// Versioned entity with a multi-column property, a read-only column and a
/// non-insertable property. Generated SQL, six placeholders per row.
pub(crate) const fn span_model(path: &'static str) -> EntityModel {
    EntityModel::new(path, "spans", IdentifierModel::new("id"), &SPAN_PROPERTIES)
        .with_version(VersionModel::new(SPAN_VERSION, VersionKind::Counter))
}

/// Span row values: name, [start, len, end], note, version, stamp.
pub(crate) fn span_row(name: &str, start: i64, end: i64) -> Row {
    Row::new(vec![
        Value::from(name),
        Value::List(vec![
            Value::Int(start),
            Value::Int(end - start),
            Value::Int(end),
        ]),
        Value::from("skipped"),
        Value::Null,
        Value::Null,
    ])
}

// ============================================================================
// ENTITY + PERSISTER
// ============================================================================

///
/// Row
/// Positional fixture entity.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Row {
    pub(crate) id: Value,
    pub(crate) fields: Vec<Value>,
}

impl Row {
    pub(crate) fn new(fields: Vec<Value>) -> Self {
        Self {
            id: Value::Null,
            fields,
        }
    }

    pub(crate) fn single(a: impl Into<Value>) -> Self {
        Self::new(vec![a.into()])
    }
}

///
/// CountingIds
/// Sequential integer identifiers reported under a configurable kind.
///

pub(crate) struct CountingIds {
    kind: IdGeneratorKind,
    next: Cell<i64>,
    pub(crate) calls: Cell<usize>,
    fail_on_call: Option<usize>,
}

impl IdentifierGenerator<Row> for CountingIds {
    fn kind(&self) -> IdGeneratorKind {
        self.kind
    }

    fn generate(&self, _: &Row) -> Result<Value, GenerationError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if self.fail_on_call == Some(call) {
            return Err(GenerationError::failed("id source exhausted"));
        }

        let id = self.next.get();
        self.next.set(id + 1);

        Ok(Value::Int(id))
    }
}

///
/// FnGenerator
/// In-memory value generator backed by a closure; counts its calls.
/// The counter is shared so it stays readable after the generator moves
/// into a persister.
///

pub(crate) struct FnGenerator<F> {
    f: F,
    calls: Rc<Cell<usize>>,
}

impl<F> FnGenerator<F> {
    pub(crate) fn new(f: F) -> Self {
        Self {
            f,
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl<F> ValueGenerator<Row> for FnGenerator<F>
where
    F: Fn(&Row, &[Value]) -> Value,
{
    fn generate_value(&self, entity: &Row, fields: &[Value]) -> Result<Value, GenerationError> {
        self.calls.set(self.calls.get() + 1);

        Ok((self.f)(entity, fields))
    }
}

///
/// TestPersister
///

pub(crate) struct TestPersister {
    model: EntityModel,
    pub(crate) ids: CountingIds,
    generators: Vec<Option<Box<dyn ValueGenerator<Row>>>>,
}

impl TestPersister {
    pub(crate) fn new(model: EntityModel) -> Self {
        Self {
            generators: (0..model.properties.len()).map(|_| None).collect(),
            model,
            ids: CountingIds {
                kind: IdGeneratorKind::Assigned,
                next: Cell::new(1),
                calls: Cell::new(0),
                fail_on_call: None,
            },
        }
    }

    pub(crate) fn with_id_kind(mut self, kind: IdGeneratorKind) -> Self {
        self.ids.kind = kind;
        self
    }

    pub(crate) fn with_id_failure_on_call(mut self, call: usize) -> Self {
        self.ids.fail_on_call = Some(call);
        self
    }

    pub(crate) fn with_generator(
        mut self,
        property: usize,
        generator: impl ValueGenerator<Row> + 'static,
    ) -> Self {
        self.generators[property] = Some(Box::new(generator));
        self
    }
}

impl EntityPersister for TestPersister {
    type Entity = Row;

    fn model(&self) -> &EntityModel {
        &self.model
    }

    fn identifier_generator(&self) -> &dyn IdentifierGenerator<Row> {
        &self.ids
    }

    fn value_generator(&self, property: usize) -> Option<&dyn ValueGenerator<Row>> {
        self.generators.get(property).and_then(Option::as_deref)
    }

    fn property_values(&self, entity: &Row) -> Vec<Value> {
        entity.fields.clone()
    }

    fn set_property_value(&self, entity: &mut Row, property: usize, value: Value) {
        if let Some(slot) = entity.fields.get_mut(property) {
            *slot = value;
        }
    }

    fn set_identifier(&self, entity: &mut Row, id: &Value) {
        entity.id = id.clone();
    }
}

// ============================================================================
// SESSION
// ============================================================================

///
/// MockError
///

#[derive(Clone, Debug, ThisError)]
#[error("{message}")]
pub(crate) struct MockError {
    pub(crate) message: String,
    pub(crate) constraint: bool,
}

impl MockError {
    pub(crate) fn constraint(message: &str) -> Self {
        Self {
            message: message.to_string(),
            constraint: true,
        }
    }

    pub(crate) fn other(message: &str) -> Self {
        Self {
            message: message.to_string(),
            constraint: false,
        }
    }
}

///
/// Affected
/// Row count reported by `execute_update`.
///

#[derive(Clone, Copy, Debug)]
pub(crate) enum Affected {
    /// Bound values divided by the placeholders per row.
    Echo(usize),
    Fixed(u64),
}

///
/// SessionLog
///

#[derive(Debug, Default)]
pub(crate) struct SessionLog {
    pub(crate) prepared: Vec<String>,
    pub(crate) executed: Vec<Vec<(usize, Value)>>,
    pub(crate) released: usize,
    pub(crate) after_execution: usize,
}

///
/// MockSession
///

pub(crate) struct MockSession {
    affected: Affected,
    fail_prepare: Option<MockError>,
    fail_bind_at: Option<usize>,
    fail_execute: Option<MockError>,
    pub(crate) log: RefCell<SessionLog>,
}

impl MockSession {
    pub(crate) fn new(affected: Affected) -> Self {
        Self {
            affected,
            fail_prepare: None,
            fail_bind_at: None,
            fail_execute: None,
            log: RefCell::new(SessionLog::default()),
        }
    }

    pub(crate) fn failing_prepare(mut self, error: MockError) -> Self {
        self.fail_prepare = Some(error);
        self
    }

    pub(crate) fn failing_bind_at(mut self, index: usize) -> Self {
        self.fail_bind_at = Some(index);
        self
    }

    pub(crate) fn failing_execute(mut self, error: MockError) -> Self {
        self.fail_execute = Some(error);
        self
    }
}

///
/// MockStatement
///

pub(crate) struct MockStatement {
    binds: Vec<(usize, Value)>,
    fail_at: Option<usize>,
}

impl Statement for MockStatement {
    type Error = MockError;

    fn bind(&mut self, index: usize, value: &Value) -> Result<(), MockError> {
        if self.fail_at == Some(index) {
            return Err(MockError::other("bind rejected"));
        }
        self.binds.push((index, value.clone()));

        Ok(())
    }
}

impl Session for MockSession {
    type Error = MockError;
    type Statement<'s> = MockStatement;

    fn prepare_statement<'s>(&'s self, sql: &str) -> Result<MockStatement, MockError> {
        if let Some(err) = &self.fail_prepare {
            return Err(err.clone());
        }
        self.log.borrow_mut().prepared.push(sql.to_string());

        Ok(MockStatement {
            binds: Vec::new(),
            fail_at: self.fail_bind_at,
        })
    }

    fn execute_update<'s>(&'s self, statement: &mut MockStatement) -> Result<u64, MockError> {
        self.log
            .borrow_mut()
            .executed
            .push(statement.binds.clone());
        if let Some(err) = &self.fail_execute {
            return Err(err.clone());
        }

        Ok(match self.affected {
            Affected::Echo(per_row) => (statement.binds.len() / per_row) as u64,
            Affected::Fixed(rows) => rows,
        })
    }

    fn release<'s>(&'s self, _: &mut MockStatement) {
        self.log.borrow_mut().released += 1;
    }

    fn after_statement_execution(&self) {
        self.log.borrow_mut().after_execution += 1;
    }

    fn translate_error(&self, error: MockError, message: &str, sql: &str) -> PersistenceError {
        let kind = if error.constraint {
            PersistenceErrorKind::ConstraintViolation
        } else {
            PersistenceErrorKind::Generic
        };

        PersistenceError::new(kind, message, sql, error)
    }
}
