
use crate::{
    db::template::InsertTemplate,
    generator::IdGeneratorKind,
    model::entity::{EntityModel, ResultCheckStyle},
    traits::EntityPersister,
};
use std::fmt;

///
/// IneligibleReason
///
/// First failed condition of the eligibility check.
/// A routing decision for the caller, not an error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IneligibleReason {
    MultiTable { span: usize },
    DynamicInsert,
    UnsupportedIdGenerator(IdGeneratorKind),
    CallableInsert,
    UnparseableTemplate,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiTable { span } => write!(f, "entity spans {span} tables"),
            Self::DynamicInsert => write!(f, "dynamic insert"),
            Self::UnsupportedIdGenerator(kind) => {
                write!(f, "identifier generator {kind} needs a database round trip")
            }
            Self::CallableInsert => write!(f, "callable insert"),
            Self::UnparseableTemplate => write!(f, "insert template has no single values clause"),
        }
    }
}

impl IneligibleReason {
    /// Stable snake_case label for metrics and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MultiTable { .. } => "multi_table",
            Self::DynamicInsert => "dynamic_insert",
            Self::UnsupportedIdGenerator(_) => "unsupported_id_generator",
            Self::CallableInsert => "callable_insert",
            Self::UnparseableTemplate => "unparseable_template",
        }
    }
}

///
/// EligibilityDescriptor
///
/// The mapping facts eligibility depends on, captured from one persister.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EligibilityDescriptor {
    pub table_span: usize,
    pub dynamic_insert: bool,
    pub id_generator: IdGeneratorKind,
    pub insert_callable: bool,
    pub template: Option<InsertTemplate>,
}

impl EligibilityDescriptor {
    /// Capture the descriptor for a persister. Parses the insert template.
    #[must_use]
    pub fn from_persister<P: EntityPersister + ?Sized>(persister: &P) -> Self {
        let model = persister.model();

        Self {
            table_span: model.table_span,
            dynamic_insert: model.dynamic_insert,
            id_generator: persister.identifier_generator().kind(),
            insert_callable: model.insert_callable,
            template: InsertTemplate::try_parse(&model.insert_sql()),
        }
    }

    /// Check the conditions in order, stopping at the first that fails.
    pub fn check(&self) -> Result<&InsertTemplate, IneligibleReason> {
        if self.table_span != 1 {
            return Err(IneligibleReason::MultiTable {
                span: self.table_span,
            });
        }
        if self.dynamic_insert {
            return Err(IneligibleReason::DynamicInsert);
        }
        if !self.id_generator.is_local() {
            return Err(IneligibleReason::UnsupportedIdGenerator(self.id_generator));
        }
        if self.insert_callable {
            return Err(IneligibleReason::CallableInsert);
        }

        self.template
            .as_ref()
            .ok_or(IneligibleReason::UnparseableTemplate)
    }

    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.check().is_ok()
    }
}

///
/// InsertPlan
///
/// Immutable result of a successful eligibility check.
/// Shared through the plan cache for the rest of the process.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsertPlan {
    pub path: &'static str,
    pub template: InsertTemplate,
    pub insert_check: ResultCheckStyle,
}

impl InsertPlan {
    fn new(model: &EntityModel, template: InsertTemplate) -> Self {
        Self {
            path: model.path,
            template,
            insert_check: model.insert_check,
        }
    }
}

/// Decide whether an entity type may be written with multi-row inserts.
///
/// Uncached; see `registry::lookup` for the memoized entry point.
pub fn analyze<P: EntityPersister + ?Sized>(persister: &P) -> Result<InsertPlan, IneligibleReason> {
    let descriptor = EligibilityDescriptor::from_persister(persister);
    let template = descriptor.check()?.clone();

    Ok(InsertPlan::new(persister.model(), template))
}
