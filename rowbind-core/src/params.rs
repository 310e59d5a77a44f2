use crate::{AsValue, Value};

/// Per call options of the select and write statements.
///
/// `filter` and `order_by` are raw SQL fragments inserted as they are, after
/// `WHERE` and `ORDER BY`. Untrusted values belong in `filter_args`, bound to
/// placeholders written inside `filter`.
#[derive(Default, Debug, Clone)]
pub struct Params {
    pub filter: Option<String>,
    pub filter_args: Vec<Value>,
    pub order_by: Option<String>,
    /// `None` and `Some(0)` both mean no limit.
    pub limit: Option<u32>,
    /// Leave zero valued fields out of UPDATE and INSERT.
    pub skip_empty: bool,
    /// Use the insert variant that skips rows conflicting on a key.
    pub or_ignore: bool,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn bind(mut self, value: impl AsValue) -> Self {
        self.filter_args.push(value.as_value());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    pub fn or_ignore(mut self, or_ignore: bool) -> Self {
        self.or_ignore = or_ignore;
        self
    }
}
