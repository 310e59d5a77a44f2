mod common;

#[cfg(test)]
mod tests {
    use crate::common::Item;
    use rowbind_core::{Error, Registry, Schema, Value, materialize};
    use std::sync::Arc;
    use time::macros::datetime;

    fn schema() -> Arc<Schema> {
        Registry::new()
            .schema_of::<Item>()
            .expect("The item schema must build")
    }

    fn row() -> Vec<Value> {
        vec![
            Value::Int64(Some(3)),
            Value::Varchar(Some("lamp".into())),
            Value::Int64(Some(2)),
            Value::Varchar(Some("[\"desk\",\"metal\"]".into())),
            Value::Varchar(Some(" 1714564800 ".into())),
            Value::Null,
        ]
    }

    #[test]
    fn reads_a_row() {
        let mut item = Item {
            updated_at: Some(datetime!(2020-02-02 0:00 UTC)),
            ..Default::default()
        };
        let count = materialize(&schema(), &row(), &mut item).expect("Failed to read the row");
        assert_eq!(count, 1);
        assert_eq!(
            item,
            Item {
                id: 3,
                name: "lamp".into(),
                price: 2.0,
                tags: vec!["desk".into(), "metal".into()],
                created_at: Some(datetime!(2024-05-01 12:00 UTC)),
                updated_at: Some(datetime!(2020-02-02 0:00 UTC)),
            }
        );
    }

    #[test]
    fn row_shape() {
        let mut row = row();
        row.pop();
        let result = materialize(&schema(), &row, &mut Item::default());
        assert!(matches!(
            result,
            Err(Error::RowShapeMismatch {
                expected: 6,
                found: 5,
                ..
            })
        ));
    }

    #[test]
    fn cell_errors() {
        let schema = schema();
        let mut row = row();
        row[1] = Value::Int64(Some(7));
        assert!(matches!(
            materialize(&schema, &row, &mut Item::default()),
            Err(Error::TypeMismatch { column, .. }) if column == "name"
        ));

        let mut row = self::row();
        row[3] = Value::Varchar(Some("[\"desk\"".into()));
        assert!(matches!(
            materialize(&schema, &row, &mut Item::default()),
            Err(Error::JsonDecodeFailure { column, .. }) if column == "tags"
        ));

        let mut row = self::row();
        row[4] = Value::Varchar(Some("yesterday".into()));
        assert!(matches!(
            materialize(&schema, &row, &mut Item::default()),
            Err(Error::InvalidTimeEncoding { column, .. }) if column == "created_at"
        ));

        let mut row = self::row();
        row[4] = Value::Float64(Some(1.5));
        assert!(matches!(
            materialize(&schema, &row, &mut Item::default()),
            Err(Error::InvalidTimeEncoding { .. })
        ));
    }
}
