use std::fmt::{self, Display};

/// Dynamically typed value exchanged with the executor, both as a bound
/// statement parameter and as a cell of a returned row.
///
/// Each variant wraps an `Option` so that a typed NULL can be produced from
/// [`AsValue::as_empty_value`](crate::AsValue::as_empty_value).
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Boolean(None)
                | Value::Int64(None)
                | Value::Float64(None)
                | Value::Varchar(None)
                | Value::Blob(None)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(..) => "BOOLEAN",
            Value::Int64(..) => "INTEGER",
            Value::Float64(..) => "FLOAT",
            Value::Varchar(..) => "VARCHAR",
            Value::Blob(..) => "BLOB",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.is_null() && other.is_null() {
            return true;
        }
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float64(a), Self::Float64(b)) => a == b,
            (Self::Varchar(a), Self::Varchar(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            _ if self.is_null() => f.write_str("NULL"),
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Int64(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Varchar(Some(v)) => write!(f, "'{}'", v.replace('\'', "''")),
            Value::Blob(Some(v)) => write!(f, "<{} bytes>", v.len()),
            _ => f.write_str("NULL"),
        }
    }
}
