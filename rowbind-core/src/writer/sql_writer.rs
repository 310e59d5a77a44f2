use crate::{
    ColumnDef, Error, FieldKind, FieldValue, Params, Record, Result, Schema, Value,
    separated_by, starts_with_keyword,
};
use std::fmt::Write;
use time::OffsetDateTime;

/// Writes the statements of one SQL dialect.
///
/// The default implementations produce the generic dialect, drivers override
/// the pieces where their engine differs. Every method appends to `out` and
/// returns the values of the placeholders it wrote, in order. Columns always
/// follow schema order.
pub trait SqlWriter {
    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push_str(value);
    }

    fn write_placeholder(&self, out: &mut String, _index: usize) {
        out.push('?');
    }

    fn write_column_type(&self, out: &mut String, column: &ColumnDef) {
        if let Some(column_type) = &column.column_type {
            out.push_str(column_type);
            return;
        }
        if column.json {
            out.push_str("TEXT");
            return;
        }
        out.push_str(match column.kind {
            FieldKind::Text => "VARCHAR(255)",
            FieldKind::Integer | FieldKind::Boolean | FieldKind::Reference(..) => "INT",
            FieldKind::Float => "FLOAT",
            FieldKind::Time => "DATETIME",
            _ => "TEXT",
        });
    }

    fn write_auto_increment(&self, out: &mut String) {
        out.push_str(" AUTOINCREMENT");
    }

    fn write_insert_into(&self, out: &mut String, or_ignore: bool) {
        out.push_str(if or_ignore {
            "INSERT OR IGNORE INTO "
        } else {
            "INSERT INTO "
        });
    }

    /// Storage form of a field value: times become unix seconds, JSON becomes text.
    fn write_field_value(&self, column: &ColumnDef, value: FieldValue) -> Result<Value> {
        Ok(match value {
            FieldValue::Null => Value::Null,
            FieldValue::Text(v) | FieldValue::Json(v) => Value::Varchar(Some(v)),
            FieldValue::Integer(v) => Value::Int64(Some(v)),
            FieldValue::Float(v) => Value::Float64(Some(v)),
            FieldValue::Boolean(v) => Value::Boolean(Some(v)),
            FieldValue::Time(v) if column.kind == FieldKind::Time => {
                Value::Int64(Some(v.unix_timestamp()))
            }
            v => {
                return Err(Error::type_mismatch(column.kind.name(), v).for_column(&column.name));
            }
        })
    }

    fn write_create_table_column(&self, out: &mut String, column: &ColumnDef) {
        self.write_identifier(out, &column.name);
        out.push(' ');
        self.write_column_type(out, column);
        if column.primary_key {
            out.push_str(" NOT NULL PRIMARY KEY");
        }
        if column.auto_increment {
            self.write_auto_increment(out);
        }
        if let Some(default) = &column.default {
            out.push_str(" DEFAULT ");
            out.push_str(default);
        }
        if column.unique {
            out.push_str(" UNIQUE");
        }
        if let Some(extra) = &column.extra {
            out.push(' ');
            out.push_str(extra);
        }
    }

    fn write_create_table(&self, out: &mut String, schema: &Schema) {
        out.reserve(32 + schema.columns.len() * 32);
        out.push_str("CREATE TABLE ");
        self.write_identifier(out, &schema.table);
        out.push_str(" (");
        separated_by(
            out,
            &schema.columns,
            |out, v| self.write_create_table_column(out, v),
            ", ",
        );
        let foreign_key = schema.foreign_key.and_then(|i| schema.columns.get(i));
        if let Some((column, Some(target))) = foreign_key.map(|v| (v, &v.references)) {
            out.push_str(", FOREIGN KEY (");
            self.write_identifier(out, &column.name);
            out.push_str(") REFERENCES ");
            self.write_identifier(out, &target.table);
            out.push('(');
            self.write_identifier(out, &target.name);
            out.push(')');
        }
        out.push(')');
    }

    fn write_select(&self, out: &mut String, schema: &Schema, params: &Params) -> Result<Vec<Value>> {
        out.push_str("SELECT * FROM ");
        self.write_identifier(out, &schema.table);
        let filter = params.filter.as_deref().filter(|v| !v.trim().is_empty());
        if filter.is_none() && !params.filter_args.is_empty() {
            return Err(Error::InvalidParams(format!(
                "{} filter arguments were given without a filter",
                params.filter_args.len()
            )));
        }
        if let Some(filter) = filter {
            if starts_with_keyword(filter, "WHERE") {
                return Err(Error::InvalidParams(format!(
                    "the filter `{filter}` must not start with WHERE"
                )));
            }
            out.push_str(" WHERE ");
            out.push_str(filter);
        }
        if let Some(order_by) = params.order_by.as_deref().filter(|v| !v.trim().is_empty()) {
            if starts_with_keyword(order_by, "ORDER") {
                return Err(Error::InvalidParams(format!(
                    "the ordering `{order_by}` must not start with ORDER BY"
                )));
            }
            out.push_str(" ORDER BY ");
            out.push_str(order_by);
        }
        if let Some(limit) = params.limit.filter(|v| *v > 0) {
            let _ = write!(out, " LIMIT {limit}");
        }
        Ok(params.filter_args.clone())
    }

    /// Inserts every column except the primary key, which is written only when
    /// it is set and not auto incremented. Created and updated columns take
    /// `now` instead of the current field value.
    fn write_insert<R: Record>(
        &self,
        out: &mut String,
        schema: &Schema,
        record: &R,
        params: &Params,
        now: OffsetDateTime,
    ) -> Result<Vec<Value>>
    where
        Self: Sized,
    {
        let mut columns = Vec::with_capacity(schema.columns.len());
        let mut values = Vec::with_capacity(schema.columns.len());
        for column in &schema.columns {
            let value = if column.stamped() {
                FieldValue::Time(now)
            } else {
                read_column(record, column)?
            };
            let skip = if column.primary_key {
                column.auto_increment || value.is_zero()
            } else {
                params.skip_empty && value.is_zero()
            };
            if skip {
                continue;
            }
            columns.push(column);
            values.push(self.write_field_value(column, value)?);
        }
        if columns.is_empty() {
            return Err(Error::InvalidParams(format!(
                "no column of `{}` is left to insert",
                schema.table
            )));
        }
        self.write_insert_into(out, params.or_ignore);
        self.write_identifier(out, &schema.table);
        out.push_str(" (");
        separated_by(out, &columns, |out, v| self.write_identifier(out, &v.name), ", ");
        out.push_str(") VALUES (");
        separated_by(out, 0..columns.len(), |out, i| self.write_placeholder(out, i), ", ");
        out.push(')');
        Ok(values)
    }

    /// Sets every column except the primary key, which selects the row. With
    /// `skip_empty` zero valued columns are left out, the updated column never
    /// is.
    fn write_update<R: Record>(
        &self,
        out: &mut String,
        schema: &Schema,
        record: &R,
        params: &Params,
        now: OffsetDateTime,
    ) -> Result<Vec<Value>>
    where
        Self: Sized,
    {
        let primary_key = schema.primary_key()?;
        let mut values = Vec::with_capacity(schema.columns.len());
        out.push_str("UPDATE ");
        self.write_identifier(out, &schema.table);
        out.push_str(" SET ");
        let len = out.len();
        for column in schema.columns.iter().filter(|v| !v.primary_key) {
            let value = if column.updated {
                FieldValue::Time(now)
            } else {
                let value = read_column(record, column)?;
                if params.skip_empty && value.is_zero() {
                    continue;
                }
                value
            };
            if out.len() > len {
                out.push_str(", ");
            }
            self.write_identifier(out, &column.name);
            out.push_str(" = ");
            self.write_placeholder(out, values.len());
            values.push(self.write_field_value(column, value)?);
        }
        if values.is_empty() {
            return Err(Error::InvalidParams(format!(
                "no column of `{}` is left to update",
                schema.table
            )));
        }
        out.push_str(" WHERE ");
        self.write_identifier(out, &primary_key.name);
        out.push_str(" = ");
        self.write_placeholder(out, values.len());
        values.push(self.write_field_value(primary_key, read_column(record, primary_key)?)?);
        Ok(values)
    }

    fn write_delete<R: Record>(
        &self,
        out: &mut String,
        schema: &Schema,
        record: &R,
    ) -> Result<Vec<Value>>
    where
        Self: Sized,
    {
        let primary_key = schema.primary_key()?;
        out.push_str("DELETE FROM ");
        self.write_identifier(out, &schema.table);
        out.push_str(" WHERE ");
        self.write_identifier(out, &primary_key.name);
        out.push_str(" = ");
        self.write_placeholder(out, 0);
        Ok(vec![self.write_field_value(
            primary_key,
            read_column(record, primary_key)?,
        )?])
    }
}

pub(crate) fn read_column<R: Record>(record: &R, column: &ColumnDef) -> Result<FieldValue> {
    record
        .read(&column.path)
        .map_err(|e| e.for_column(&column.name))
}

/// Generic dialect, close to SQLite.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {}
