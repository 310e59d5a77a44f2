use crate::{Error, FieldKind, Result, Tag};

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: String,
    pub name: String,
}

/// Mapping of one record field onto one table column.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    /// Accessor path of the field, see [`Record`](crate::Record).
    pub path: Box<[usize]>,
    pub kind: FieldKind,
    /// Explicit SQL type, overrides the driver mapping of `kind`.
    pub column_type: Option<String>,
    pub primary_key: bool,
    pub foreign_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    pub created: bool,
    pub updated: bool,
    pub json: bool,
    pub default: Option<String>,
    pub references: Option<ColumnRef>,
    pub extra: Option<String>,
}

impl ColumnDef {
    /// Builds the column of a field, rejecting flags that do not fit its kind.
    pub fn from_tag(
        record: &str,
        field: &str,
        path: Box<[usize]>,
        kind: FieldKind,
        tag: Tag,
    ) -> Result<Self> {
        let invalid = |flag, expected| Error::InvalidFieldType {
            record: record.to_owned(),
            field: field.to_owned(),
            flag,
            expected,
        };
        if tag.created && kind != FieldKind::Time {
            return Err(invalid("created", "a time value"));
        }
        if tag.updated && kind != FieldKind::Time {
            return Err(invalid("updated", "a time value"));
        }
        if tag.foreign && !matches!(kind, FieldKind::Reference(..)) {
            return Err(invalid("foreign", "a reference to another record"));
        }
        if tag.autoinc && kind != FieldKind::Integer {
            return Err(invalid("autoinc", "an integer"));
        }
        let kind = match kind {
            FieldKind::Embedded(..) if !tag.json => FieldKind::Struct,
            v => v,
        };
        Ok(Self {
            name: tag.name,
            path,
            json: tag.json || kind == FieldKind::Opaque,
            kind,
            column_type: tag.column_type,
            primary_key: tag.primary,
            foreign_key: tag.foreign,
            auto_increment: tag.autoinc,
            unique: tag.unique,
            created: tag.created,
            updated: tag.updated,
            default: tag.default,
            references: None,
            extra: tag.extra,
        })
    }

    pub fn stamped(&self) -> bool {
        self.created || self.updated
    }
}
