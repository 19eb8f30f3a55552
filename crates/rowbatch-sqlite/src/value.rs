use rowbatch_core::value::Value;
use rusqlite::{
    Error as SqlError,
    types::{ToSql, ToSqlOutput, ValueRef},
};
use std::fmt;

///
/// SqlValue
///
/// Borrowed view binding a row value as a SQLite parameter.
///
/// Bool  → INTEGER 0/1
/// Ulid  → TEXT, canonical 26-character form
/// Uuid  → TEXT, hyphenated form
/// List  → rejected; multi-column properties are split before binding
///

#[derive(Clone, Copy, Debug)]
pub struct SqlValue<'a>(pub &'a Value);

impl ToSql for SqlValue<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let out = match self.0 {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(v) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*v))),
            Value::Int(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            Value::Float(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
            Value::Ulid(v) => ToSqlOutput::from(v.to_string()),
            Value::Uuid(v) => ToSqlOutput::from(v.hyphenated().to_string()),
            Value::List(_) => {
                return Err(SqlError::ToSqlConversionFailure(Box::new(
                    UnbindableValue(self.0.label()),
                )));
            }
        };

        Ok(out)
    }
}

///
/// UnbindableValue
///

#[derive(Debug)]
struct UnbindableValue(&'static str);

impl fmt::Display for UnbindableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} value cannot be bound to a single parameter", self.0)
    }
}

impl std::error::Error for UnbindableValue {}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_binds(value: &Value, expected: &ToSqlOutput<'_>) {
        let param = SqlValue(value);

        assert_eq!(&param.to_sql().unwrap(), expected);
    }

    #[test]
    fn scalars_map_onto_sqlite_storage_classes() {
        assert_binds(&Value::Bool(true), &ToSqlOutput::Borrowed(ValueRef::Integer(1)));
        assert_binds(&Value::Int(-4), &ToSqlOutput::Borrowed(ValueRef::Integer(-4)));
        assert_binds(&Value::Float(0.5), &ToSqlOutput::Borrowed(ValueRef::Real(0.5)));
        assert_binds(&Value::from("x"), &ToSqlOutput::Borrowed(ValueRef::Text(b"x")));
        assert_binds(&Value::Null, &ToSqlOutput::Borrowed(ValueRef::Null));
    }

    #[test]
    fn uuid_binds_as_hyphenated_text() {
        assert_binds(
            &Value::Uuid(uuid::Uuid::nil()),
            &ToSqlOutput::from("00000000-0000-0000-0000-000000000000".to_string()),
        );
    }

    #[test]
    fn lists_are_rejected() {
        let value = Value::List(vec![Value::Int(1)]);
        let err = SqlValue(&value).to_sql().unwrap_err();

        assert!(matches!(err, SqlError::ToSqlConversionFailure(_)));
    }
}
