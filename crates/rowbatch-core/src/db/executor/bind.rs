use crate::{model::entity::EntityModel, value::Value};

///
/// RowShapeError
/// Snapshot that does not line up with the entity model.
///

#[derive(Debug, Eq, PartialEq)]
pub(super) enum RowShapeError {
    Snapshot {
        expected: usize,
        found: usize,
    },
    Columns {
        property: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Values one row binds, in placeholder order.
///
/// Every insertable column of every insertable property, in property then
/// column order, followed by the identifier.
pub(super) fn row_values<'a>(
    model: &EntityModel,
    id: &'a Value,
    fields: &'a [Value],
) -> Result<Vec<&'a Value>, RowShapeError> {
    if fields.len() != model.properties.len() {
        return Err(RowShapeError::Snapshot {
            expected: model.properties.len(),
            found: fields.len(),
        });
    }

    let mut values = Vec::with_capacity(model.placeholders_per_row());
    for (property, field) in model.properties.iter().zip(fields) {
        if !property.insertable {
            continue;
        }

        let columns = field
            .column_values(property.columns.len())
            .ok_or_else(|| RowShapeError::Columns {
                property: property.name,
                expected: property.columns.len(),
                found: match field {
                    Value::List(items) => items.len(),
                    _ => 1,
                },
            })?;

        values.extend(
            property
                .columns
                .iter()
                .zip(columns)
                .filter(|(column, _)| column.insertable)
                .map(|(_, value)| value),
        );
    }
    values.push(id);

    Ok(values)
}
