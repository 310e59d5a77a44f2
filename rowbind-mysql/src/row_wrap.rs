use crate::ValueWrap;
use rowbind_core::{Row, RowLabeled, RowNames};

/// Converts a row, computing the labels from the first row of a result set.
pub(crate) fn row_labeled(mut row: mysql_async::Row, labels: &mut Option<RowNames>) -> RowLabeled {
    let labels = labels
        .get_or_insert_with(|| {
            row.columns_ref()
                .iter()
                .map(|v| v.name_str().into_owned())
                .collect()
        })
        .clone();
    let values: Row = (0..row.len())
        .map(|i| {
            let value: Option<mysql_async::Value> = row.take(i);
            ValueWrap::from(value.unwrap_or(mysql_async::Value::NULL)).0
        })
        .collect();
    RowLabeled::new(labels, values)
}
