///
/// IdentifierModel
/// Identifier column metadata; the identifier is always bound last in a row.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IdentifierModel {
    pub column: &'static str,
}

impl IdentifierModel {
    #[must_use]
    pub const fn new(column: &'static str) -> Self {
        Self { column }
    }
}
