use crate::{Value, truncate_long};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// A statement ready to be sent to an [`Executor`](crate::Executor), with the
/// values of its `?` placeholders in order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Query {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl From<String> for Query {
    fn from(value: String) -> Self {
        Self::new(value, Vec::new())
    }
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Self::new(value, Vec::new())
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}

/// Outcome of a statement that returns no rows.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct RowsAffected {
    pub rows_affected: u64,
    /// Key generated by the last insert, when the backend reports one.
    pub last_affected_id: Option<i64>,
}

/// Column labels of a result set, shared by all of its rows.
pub type RowNames = Arc<[String]>;
pub type Row = Box<[Value]>;

/// One result row, `values[i]` being the cell of column `labels[i]`.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
}

/// Items emitted by `Executor::run`: rows, or the effect of a modify statement.
#[derive(Debug)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for v in iter {
            self.rows_affected += v.rows_affected;
            self.last_affected_id = v.last_affected_id.or(self.last_affected_id);
        }
    }
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
