use rowbind_core::{ColumnDef, FieldKind, SqlWriter};

/// MySQL dialect. Times are unix seconds, so they are declared `BIGINT`
/// rather than `DATETIME`.
#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlSqlWriter;

impl SqlWriter for MySqlSqlWriter {
    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push('`');
        out.push_str(&value.replace('`', "``"));
        out.push('`');
    }

    fn write_column_type(&self, out: &mut String, column: &ColumnDef) {
        if let Some(column_type) = &column.column_type {
            out.push_str(column_type);
            return;
        }
        if column.json {
            out.push_str("JSON");
            return;
        }
        out.push_str(match column.kind {
            FieldKind::Text => "VARCHAR(255)",
            FieldKind::Integer | FieldKind::Reference(..) => "BIGINT",
            FieldKind::Boolean => "BOOLEAN",
            FieldKind::Float => "DOUBLE",
            FieldKind::Time => "BIGINT",
            _ => "TEXT",
        });
    }

    fn write_auto_increment(&self, out: &mut String) {
        out.push_str(" AUTO_INCREMENT");
    }

    fn write_insert_into(&self, out: &mut String, or_ignore: bool) {
        out.push_str(if or_ignore {
            "INSERT IGNORE INTO "
        } else {
            "INSERT INTO "
        });
    }
}
