use crate::Value;

/// Conversion of native Rust types into the dynamic [`Value`], used to build
/// the bound values of a filter (`filter_args` of [`Params`](crate::Params))
/// and by drivers to produce row cells.
///
/// ```rust
/// use rowbind_core::{AsValue, Value};
/// assert_eq!(42i64.as_value(), Value::Int64(Some(42)));
/// assert_eq!(None::<String>.as_value(), Value::Varchar(None));
/// ```
pub trait AsValue {
    /// The NULL of the variant used by this type.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

macro_rules! impl_as_value {
    ($($source:ty => $variant:path),+ $(,)?) => {
        $(
            impl AsValue for $source {
                fn as_empty_value() -> Value {
                    $variant(None)
                }
                fn as_value(self) -> Value {
                    $variant(Some(self.into()))
                }
            }
        )+
    };
}

impl_as_value!(
    bool => Value::Boolean,
    i32 => Value::Int64,
    i64 => Value::Int64,
    u32 => Value::Int64,
    f64 => Value::Float64,
    String => Value::Varchar,
    Box<[u8]> => Value::Blob,
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
}
