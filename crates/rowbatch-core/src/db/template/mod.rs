
use regex::Regex;
use std::{num::NonZeroUsize, sync::LazyLock};

// One values-clause introducer: `VALUES` on a word boundary, optional
// whitespace, then the opening parenthesis of the row tuple.
static SPLITTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bvalues\s*\(").expect("values splitter pattern is valid"));

///
/// InsertTemplate
///
/// Single-row insert text split into a fixed prefix and a repeatable
/// per-row values clause. `prefix + values_clause` is the original text.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsertTemplate {
    prefix: String,
    values_clause: String,
}

impl InsertTemplate {
    /// Split a single-row insert statement.
    ///
    /// Returns `None` when the text has no values-clause introducer or more
    /// than one. Column and placeholder counts are not inspected.
    #[must_use]
    pub fn try_parse(sql: &str) -> Option<Self> {
        let mut matches = SPLITTER.find_iter(sql);
        let introducer = matches.next()?;
        if matches.next().is_some() {
            return None;
        }

        // the match always ends on the ASCII '(' that opens the row tuple
        let split = introducer.end() - 1;
        let (prefix, values_clause) = sql.split_at(split);

        Some(Self {
            prefix: prefix.to_string(),
            values_clause: values_clause.to_string(),
        })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn values_clause(&self) -> &str {
        &self.values_clause
    }

    /// Statement text writing `rows` rows in one round trip.
    #[must_use]
    pub fn create_multi_row_insert(&self, rows: NonZeroUsize) -> String {
        let rows = rows.get();
        let mut sql =
            String::with_capacity(self.prefix.len() + rows * (self.values_clause.len() + 1));

        sql.push_str(&self.prefix);
        sql.push_str(&self.values_clause);
        for _ in 1..rows {
            sql.push(',');
            sql.push_str(&self.values_clause);
        }

        sql
    }
}
