use crate::value::Value;
use std::time::{SystemTime, UNIX_EPOCH};

///
/// VersionModel
/// Optimistic-concurrency version property of an entity type.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VersionModel {
    /// Index of the version property in the ordered property list.
    pub property: usize,
    pub kind: VersionKind,
}

impl VersionModel {
    #[must_use]
    pub const fn new(property: usize, kind: VersionKind) -> Self {
        Self { property, kind }
    }
}

///
/// VersionKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VersionKind {
    /// Integer counter seeded at zero.
    Counter,
    /// Epoch-millisecond timestamp seeded from the wall clock.
    Timestamp,
}

impl VersionKind {
    /// Initial version value for a new row.
    #[must_use]
    pub fn seed(self) -> Value {
        match self {
            Self::Counter => Value::Int(0),
            Self::Timestamp => Value::Int(now_millis()),
        }
    }

    /// Whether the current value still needs a seed.
    ///
    /// Null and negative counters are treated as unsaved.
    #[must_use]
    pub const fn is_unset(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Int(v) => *v < 0,
            _ => false,
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
