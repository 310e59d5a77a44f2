use crate::{Error, FieldKind, Record, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    any,
    collections::{BTreeMap, HashMap},
    fmt::{self, Debug},
    hash::Hash,
    marker::PhantomData,
};
use time::OffsetDateTime;

/// Value of a single record field, independent of the database.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Time(OffsetDateTime),
    /// Serialized JSON document.
    Json(String),
}

impl FieldValue {
    /// Zero value of the field type: empty text, `0`, `false`, the unix epoch
    /// or an empty JSON document.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(v) => v.is_empty(),
            FieldValue::Integer(v) => *v == 0,
            FieldValue::Float(v) => *v == 0.0,
            FieldValue::Boolean(v) => !*v,
            FieldValue::Time(v) => *v == OffsetDateTime::UNIX_EPOCH,
            FieldValue::Json(v) => matches!(v.as_str(), "null" | "{}" | "[]" | "\"\"" | "0"),
        }
    }

    pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<FieldValue> {
        serde_json::to_string(value)
            .map(FieldValue::Json)
            .map_err(|e| Error::JsonEncodeFailure {
                column: String::new(),
                reason: e.to_string(),
            })
    }

    pub fn from_json<T: DeserializeOwned>(value: FieldValue) -> Result<T> {
        let FieldValue::Json(json) = value else {
            return Err(Error::type_mismatch("a JSON document", value));
        };
        serde_json::from_str(&json).map_err(|e| Error::JsonDecodeFailure {
            column: String::new(),
            reason: e.to_string(),
        })
    }
}

/// Native Rust type usable as a record field.
pub trait Column: Sized {
    fn kind() -> FieldKind;

    fn to_field(&self) -> Result<FieldValue>;

    fn from_field(value: FieldValue) -> Result<Self>;

    /// Reads a field of an embedded record.
    fn read_nested(&self, path: &[usize]) -> Result<FieldValue> {
        Err(Error::InvalidFieldPath {
            record: any::type_name::<Self>(),
            path: path.to_vec(),
        })
    }

    /// Writes a field of an embedded record.
    fn write_nested(&mut self, path: &[usize], _value: FieldValue) -> Result<()> {
        Err(Error::InvalidFieldPath {
            record: any::type_name::<Self>(),
            path: path.to_vec(),
        })
    }
}

impl Column for String {
    fn kind() -> FieldKind {
        FieldKind::Text
    }
    fn to_field(&self) -> Result<FieldValue> {
        Ok(FieldValue::Text(self.clone()))
    }
    fn from_field(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Text(v) => Ok(v),
            _ => Err(Error::type_mismatch("text", value)),
        }
    }
}

impl Column for bool {
    fn kind() -> FieldKind {
        FieldKind::Boolean
    }
    fn to_field(&self) -> Result<FieldValue> {
        Ok(FieldValue::Boolean(*self))
    }
    fn from_field(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Boolean(v) => Ok(v),
            FieldValue::Integer(v) => Ok(v != 0),
            _ => Err(Error::type_mismatch("boolean", value)),
        }
    }
}

macro_rules! impl_integer_column {
    ($($source:ty),+ $(,)?) => {
        $(
            impl Column for $source {
                fn kind() -> FieldKind {
                    FieldKind::Integer
                }
                fn to_field(&self) -> Result<FieldValue> {
                    i64::try_from(*self)
                        .map(FieldValue::Integer)
                        .map_err(|_| Error::type_mismatch("a 64 bit integer", self))
                }
                fn from_field(value: FieldValue) -> Result<Self> {
                    match value {
                        FieldValue::Integer(v) => <$source>::try_from(v)
                            .map_err(|_| Error::type_mismatch(stringify!($source), v)),
                        _ => Err(Error::type_mismatch(stringify!($source), value)),
                    }
                }
            }
        )+
    };
}

impl_integer_column!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Column for f64 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }
    fn to_field(&self) -> Result<FieldValue> {
        Ok(FieldValue::Float(*self))
    }
    fn from_field(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Float(v) => Ok(v),
            FieldValue::Integer(v) => Ok(v as f64),
            _ => Err(Error::type_mismatch("f64", value)),
        }
    }
}

impl Column for f32 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }
    fn to_field(&self) -> Result<FieldValue> {
        Ok(FieldValue::Float(*self as f64))
    }
    fn from_field(value: FieldValue) -> Result<Self> {
        f64::from_field(value).map(|v| v as f32)
    }
}

impl Column for OffsetDateTime {
    fn kind() -> FieldKind {
        FieldKind::Time
    }
    fn to_field(&self) -> Result<FieldValue> {
        Ok(FieldValue::Time(*self))
    }
    fn from_field(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Time(v) => Ok(v),
            _ => Err(Error::type_mismatch("time", value)),
        }
    }
}

/// An optional record cannot be flattened: its columns would have nowhere to
/// be written when the option is `None`. It is a `Struct` field instead.
impl<T: Column> Column for Option<T> {
    fn kind() -> FieldKind {
        match T::kind() {
            FieldKind::Embedded(..) => FieldKind::Struct,
            v => v,
        }
    }
    fn to_field(&self) -> Result<FieldValue> {
        match self {
            Some(v) => v.to_field(),
            None => Ok(FieldValue::Null),
        }
    }
    fn from_field(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Null => Ok(None),
            v => T::from_field(v).map(Some),
        }
    }
}

macro_rules! impl_json_column {
    ($ty:ty, $($generics:tt)*) => {
        impl<$($generics)*> Column for $ty {
            fn kind() -> FieldKind {
                FieldKind::Opaque
            }
            fn to_field(&self) -> Result<FieldValue> {
                FieldValue::to_json(self)
            }
            fn from_field(value: FieldValue) -> Result<Self> {
                FieldValue::from_json(value)
            }
        }
    };
}

impl_json_column!(Vec<T>, T: Serialize + DeserializeOwned);
impl_json_column!(HashMap<K, V>, K: Serialize + DeserializeOwned + Eq + Hash, V: Serialize + DeserializeOwned);
impl_json_column!(BTreeMap<K, V>, K: Serialize + DeserializeOwned + Ord, V: Serialize + DeserializeOwned);
impl_json_column!(serde_json::Value,);

/// Foreign key to the primary key of another record.
///
/// Stored as the integer key of the referenced row. A field of this type can
/// be tagged `foreign` once `T` is registered.
pub struct Ref<T: Record> {
    pub id: i64,
    _target: PhantomData<fn() -> T>,
}

impl<T: Record> Ref<T> {
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            _target: PhantomData,
        }
    }
}

impl<T: Record> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Record> Copy for Ref<T> {}

impl<T: Record> Default for Ref<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Record> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: Record> Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref<{}>({})", T::RECORD_TYPE.name, self.id)
    }
}

impl<T: Record> From<i64> for Ref<T> {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl<T: Record> Column for Ref<T> {
    fn kind() -> FieldKind {
        FieldKind::Reference(T::RECORD_TYPE)
    }
    fn to_field(&self) -> Result<FieldValue> {
        Ok(FieldValue::Integer(self.id))
    }
    fn from_field(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Integer(v) => Ok(Self::new(v)),
            _ => Err(Error::type_mismatch("a reference key", value)),
        }
    }
}
