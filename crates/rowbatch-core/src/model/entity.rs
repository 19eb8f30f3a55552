use crate::{
    PLACEHOLDER,
    model::{identifier::IdentifierModel, property::PropertyModel, version::VersionModel},
};
use std::borrow::Cow;

///
/// EntityModel
/// Read-only mapping descriptor for one entity type.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityModel {
    /// Fully-qualified entity path (for caching and diagnostics).
    pub path: &'static str,
    /// Primary table name.
    pub table: &'static str,
    /// Number of physical tables the entity spans.
    pub table_span: usize,
    pub identifier: IdentifierModel,
    /// Ordered property list (authoritative for snapshots and binding).
    pub properties: &'static [PropertyModel],
    pub version: Option<VersionModel>,
    /// Column set is decided per instance at insert time.
    pub dynamic_insert: bool,
    /// Inserts go through a stored-procedure call.
    pub insert_callable: bool,
    /// Host-supplied insert statement replacing the generated one.
    pub custom_insert_sql: Option<&'static str>,
    pub insert_check: ResultCheckStyle,
}

impl EntityModel {
    #[must_use]
    pub const fn new(
        path: &'static str,
        table: &'static str,
        identifier: IdentifierModel,
        properties: &'static [PropertyModel],
    ) -> Self {
        Self {
            path,
            table,
            table_span: 1,
            identifier,
            properties,
            version: None,
            dynamic_insert: false,
            insert_callable: false,
            custom_insert_sql: None,
            insert_check: ResultCheckStyle::Count,
        }
    }

    #[must_use]
    pub const fn with_version(mut self, version: VersionModel) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub const fn with_table_span(mut self, table_span: usize) -> Self {
        self.table_span = table_span;
        self
    }

    #[must_use]
    pub const fn with_dynamic_insert(mut self) -> Self {
        self.dynamic_insert = true;
        self
    }

    #[must_use]
    pub const fn with_custom_insert(mut self, sql: &'static str, callable: bool) -> Self {
        self.custom_insert_sql = Some(sql);
        self.insert_callable = callable;
        self
    }

    #[must_use]
    pub const fn with_insert_check(mut self, check: ResultCheckStyle) -> Self {
        self.insert_check = check;
        self
    }

    /// Static insertability mask, one entry per property.
    #[must_use]
    pub fn property_insertability(&self) -> Vec<bool> {
        self.properties.iter().map(|p| p.insertable).collect()
    }

    /// Placeholders bound per row, identifier included.
    #[must_use]
    pub fn placeholders_per_row(&self) -> usize {
        self.properties
            .iter()
            .map(PropertyModel::bound_columns)
            .sum::<usize>()
            + 1
    }

    /// Single-row insert statement for this entity.
    ///
    /// Custom SQL wins; otherwise the statement lists every insertable column
    /// in property order followed by the identifier column.
    #[must_use]
    pub fn insert_sql(&self) -> Cow<'static, str> {
        if let Some(sql) = self.custom_insert_sql {
            return Cow::Borrowed(sql);
        }

        let columns = self
            .properties
            .iter()
            .filter(|p| p.insertable)
            .flat_map(|p| p.columns.iter())
            .filter(|c| c.insertable)
            .map(|c| c.name)
            .chain(std::iter::once(self.identifier.column))
            .collect::<Vec<_>>();
        let placeholders = vec![PLACEHOLDER; columns.len()];

        Cow::Owned(format!(
            "insert into {} ({}) values ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        ))
    }
}

///
/// ResultCheckStyle
/// How the affected-row count of an insert is verified.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResultCheckStyle {
    /// The statement reports nothing useful; skip verification.
    None,
    /// Affected rows must equal the rows written.
    Count,
}

impl ResultCheckStyle {
    #[must_use]
    pub const fn verifies(self) -> bool {
        matches!(self, Self::Count)
    }
}
