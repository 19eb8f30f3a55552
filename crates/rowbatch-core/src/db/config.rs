use serde::Deserialize;
use std::num::NonZeroUsize;

///
/// InsertConfig
///
/// Executor tuning. Deserializable so hosts can load it alongside their
/// own settings; every field has a default.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct InsertConfig {
    /// Upper bound on rows per statement. Larger batches are split into
    /// consecutive chunks, each executed and verified on its own.
    pub max_rows_per_statement: Option<NonZeroUsize>,

    /// Verify affected-row counts when the mapping asks for it.
    pub verify_row_count: bool,
}

impl InsertConfig {
    #[must_use]
    pub const fn with_max_rows_per_statement(mut self, rows: NonZeroUsize) -> Self {
        self.max_rows_per_statement = Some(rows);
        self
    }

    #[must_use]
    pub const fn without_row_count_check(mut self) -> Self {
        self.verify_row_count = false;
        self
    }

    /// Rows per statement for a batch of `total` rows.
    pub(crate) fn chunk_len(&self, total: usize) -> usize {
        self.max_rows_per_statement
            .map_or(total, |max| max.get().min(total))
    }
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self {
            max_rows_per_statement: None,
            verify_row_count: true,
        }
    }
}

///
/// TESTS
///
