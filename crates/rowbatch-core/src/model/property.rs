///
/// PropertyModel
/// One mapped property and the ordered columns it writes.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PropertyModel {
    /// Property name as used in diagnostics.
    pub name: &'static str,
    /// Ordered column list; multi-column properties bind a `Value::List`.
    pub columns: &'static [ColumnModel],
    /// Static property-level insertability.
    pub insertable: bool,
}

impl PropertyModel {
    #[must_use]
    pub const fn new(name: &'static str, columns: &'static [ColumnModel]) -> Self {
        Self {
            name,
            columns,
            insertable: true,
        }
    }

    /// Mark the whole property as excluded from inserts.
    #[must_use]
    pub const fn not_insertable(mut self) -> Self {
        self.insertable = false;
        self
    }

    /// Number of placeholders this property contributes to one row.
    #[must_use]
    pub fn bound_columns(&self) -> usize {
        if self.insertable {
            self.columns.iter().filter(|c| c.insertable).count()
        } else {
            0
        }
    }
}

///
/// ColumnModel
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColumnModel {
    pub name: &'static str,
    pub insertable: bool,
}

impl ColumnModel {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            insertable: true,
        }
    }

    /// Column computed or defaulted by the database; never bound.
    #[must_use]
    pub const fn read_only(name: &'static str) -> Self {
        Self {
            name,
            insertable: false,
        }
    }
}
