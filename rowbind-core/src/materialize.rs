use crate::{ColumnDef, Error, FieldKind, FieldValue, Record, Result, Schema, Value};
use time::OffsetDateTime;

/// Writes one result row into `record`, column `i` of the row going to column
/// `i` of the schema. NULL cells leave the field untouched.
///
/// Returns `1` when the whole row was written.
pub fn materialize<R: Record>(schema: &Schema, row: &[Value], record: &mut R) -> Result<usize> {
    if row.len() != schema.columns.len() {
        return Err(Error::RowShapeMismatch {
            table: schema.table.clone(),
            expected: schema.columns.len(),
            found: row.len(),
        });
    }
    for (column, value) in schema.columns.iter().zip(row) {
        if value.is_null() {
            continue;
        }
        let value = decode(column, value.clone()).map_err(|e| e.for_column(&column.name))?;
        record
            .write(&column.path, value)
            .map_err(|e| e.for_column(&column.name))?;
    }
    Ok(1)
}

fn decode(column: &ColumnDef, value: Value) -> Result<FieldValue> {
    if column.json {
        return match value {
            Value::Varchar(Some(v)) => Ok(FieldValue::Json(v)),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map(FieldValue::Json)
                .map_err(|e| Error::JsonDecodeFailure {
                    column: column.name.clone(),
                    reason: e.to_string(),
                }),
            v => Err(Error::JsonDecodeFailure {
                column: column.name.clone(),
                reason: format!("expected text or bytes, found {}", v.type_name()),
            }),
        };
    }
    let mismatch = |expected, value: &Value| Error::TypeMismatch {
        column: column.name.clone(),
        expected,
        found: value.type_name().to_owned(),
    };
    Ok(match column.kind {
        FieldKind::Time => FieldValue::Time(decode_time(column, value)?),
        FieldKind::Struct | FieldKind::Embedded(..) => {
            return Err(Error::UnsupportedStructColumn {
                column: column.name.clone(),
            });
        }
        FieldKind::Text => match value {
            Value::Varchar(Some(v)) => FieldValue::Text(v),
            Value::Blob(Some(v)) => match String::from_utf8(v.into_vec()) {
                Ok(v) => FieldValue::Text(v),
                Err(e) => return Err(mismatch("text", &Value::Blob(Some(e.into_bytes().into())))),
            },
            v => return Err(mismatch("text", &v)),
        },
        FieldKind::Integer | FieldKind::Reference(..) => match value {
            Value::Int64(Some(v)) => FieldValue::Integer(v),
            Value::Boolean(Some(v)) => FieldValue::Integer(v as i64),
            v => return Err(mismatch("integer", &v)),
        },
        FieldKind::Float => match value {
            Value::Float64(Some(v)) => FieldValue::Float(v),
            Value::Int64(Some(v)) => FieldValue::Float(v as f64),
            v => return Err(mismatch("float", &v)),
        },
        FieldKind::Boolean => match value {
            Value::Boolean(Some(v)) => FieldValue::Boolean(v),
            Value::Int64(Some(v)) => FieldValue::Boolean(v != 0),
            v => return Err(mismatch("boolean", &v)),
        },
        FieldKind::Opaque => match value {
            Value::Varchar(Some(v)) => FieldValue::Json(v),
            v => return Err(mismatch("JSON text", &v)),
        },
    })
}

/// Times are stored as unix seconds, either as an integer or as its decimal text.
fn decode_time(column: &ColumnDef, value: Value) -> Result<OffsetDateTime> {
    let invalid = |value: &dyn std::fmt::Display| Error::InvalidTimeEncoding {
        column: column.name.clone(),
        value: value.to_string(),
    };
    let seconds = match &value {
        Value::Int64(Some(v)) => *v,
        Value::Varchar(Some(v)) => v.trim().parse::<i64>().map_err(|_| invalid(v))?,
        v => return Err(invalid(v)),
    };
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| invalid(&seconds))
}
