use crate::{FieldValue, Result};
use std::{
    any::TypeId,
    fmt::{self, Debug},
};

/// Static description of a record type: its name, identity and field table.
///
/// Produced by `#[derive(Record)]` as [`Record::RECORD_TYPE`]. It is also the
/// payload of [`FieldKind::Embedded`] and [`FieldKind::Reference`], which is
/// how the schema builder walks nested structures and foreign keys without
/// instantiating them.
#[derive(Clone, Copy)]
pub struct RecordType {
    pub name: &'static str,
    pub type_id: fn() -> TypeId,
    pub fields: fn() -> &'static [FieldDef],
}

impl RecordType {
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }
    pub fn fields(&self) -> &'static [FieldDef] {
        (self.fields)()
    }
}

impl Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name).finish()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

/// Storage category of a field, derived from its Rust type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Time,
    /// Maps, lists and free-form JSON values: always stored as JSON text.
    Opaque,
    /// A record used as a named column without the `json` flag.
    Struct,
    /// A record whose fields are flattened into the parent when untagged.
    Embedded(RecordType),
    /// An integer key pointing to the primary key of another record.
    Reference(RecordType),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Time => "time",
            FieldKind::Opaque => "opaque",
            FieldKind::Struct => "struct",
            FieldKind::Embedded(..) => "embedded record",
            FieldKind::Reference(..) => "reference",
        }
    }
}

/// One field of a record as seen by the schema builder.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    /// Raw annotation, `None` when the field carries a bare `#[db]`.
    pub tag: Option<&'static str>,
    pub kind: FieldKind,
}

/// A struct that can be stored as one table row.
///
/// Fields are addressed by path: the index within [`Record::fields`],
/// followed by the path inside an embedded record when the field is one.
pub trait Record: Send + Sync + 'static {
    const RECORD_TYPE: RecordType;

    fn fields() -> &'static [FieldDef] {
        Self::RECORD_TYPE.fields()
    }

    fn read(&self, path: &[usize]) -> Result<FieldValue>;

    fn write(&mut self, path: &[usize], value: FieldValue) -> Result<()>;
}
