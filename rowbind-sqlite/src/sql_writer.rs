use rowbind_core::{ColumnDef, FieldKind, SqlWriter};

/// Sqlite dialect. Integer keys are declared `INTEGER` so that a primary key
/// becomes the rowid and accepts `AUTOINCREMENT`.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter;

impl SqlWriter for SqliteSqlWriter {
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
            FieldKind::Text => "TEXT",
            FieldKind::Integer | FieldKind::Boolean | FieldKind::Reference(..) => "INTEGER",
            FieldKind::Float => "REAL",
            FieldKind::Time => "INTEGER",
            _ => "TEXT",
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbind_core::{FieldKind, Tag};

    #[test]
    fn integer_primary_key() {
        let column = ColumnDef::from_tag(
            "Item",
            "id",
            Box::new([0]),
            FieldKind::Integer,
            Tag {
                name: "id".into(),
                primary: true,
                autoinc: true,
                ..Default::default()
            },
        )
        .unwrap();
        let mut out = String::new();
        SqliteSqlWriter.write_create_table_column(&mut out, &column);
        assert_eq!(out, "id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT");
    }
}
