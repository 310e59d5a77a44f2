use crate::{
    ColumnDef, ColumnRef, Error, FieldDef, FieldKind, RecordType, Result, parse_tag,
};
use std::{
    any::TypeId,
    sync::{Arc, OnceLock},
};

/// Table layout of one record type.
///
/// Columns are in field declaration order, depth first through embedded
/// records. Every statement and every row follows this order.
#[derive(Debug)]
pub struct Schema {
    pub record: &'static str,
    /// Empty when no `table:` key was found.
    pub table: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Option<usize>,
    pub foreign_key: Option<usize>,
    pub created: Option<usize>,
    pub updated: Option<usize>,
    /// Ordering applied by refresh, from the `refresh:` key.
    pub refresh: Option<String>,
    validated: OnceLock<Result<()>>,
}

impl Schema {
    /// Walks `record` and collects its columns.
    ///
    /// `resolve` returns the completed schema of a referenced record type, it
    /// is called for every `foreign` column.
    pub fn build<F>(record: RecordType, resolve: F) -> Result<Schema>
    where
        F: Fn(TypeId) -> Option<Arc<Schema>>,
    {
        let mut builder = Builder {
            schema: Schema {
                record: record.name,
                table: String::new(),
                columns: Vec::new(),
                primary_key: None,
                foreign_key: None,
                created: None,
                updated: None,
                refresh: None,
                validated: OnceLock::new(),
            },
            visiting: Vec::new(),
            path: Vec::new(),
            resolve,
        };
        builder.walk(record)?;
        Ok(builder.schema)
    }

    /// Checks the invariants required before running any statement. The
    /// outcome is computed once and returned on every call.
    pub fn validate(&self) -> Result<()> {
        self.validated.get_or_init(|| self.check()).clone()
    }

    fn check(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::MissingTableName {
                record: self.record.to_owned(),
            });
        }
        let Some(primary_key) = self.primary_key else {
            return Err(Error::MissingPrimaryKey {
                record: self.record.to_owned(),
            });
        };
        if self.foreign_key == Some(primary_key) {
            return Err(Error::DuplicateOrConflictingKeyRole {
                record: self.record.to_owned(),
                column: self.columns[primary_key].name.clone(),
                role: "foreign",
            });
        }
        Ok(())
    }

    pub fn primary_key(&self) -> Result<&ColumnDef> {
        self.primary_key
            .and_then(|i| self.columns.get(i))
            .ok_or_else(|| Error::MissingPrimaryKey {
                record: self.record.to_owned(),
            })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|v| v.name == name)
    }
}

struct Builder<F> {
    schema: Schema,
    visiting: Vec<TypeId>,
    path: Vec<usize>,
    resolve: F,
}

impl<F> Builder<F>
where
    F: Fn(TypeId) -> Option<Arc<Schema>>,
{
    fn walk(&mut self, record: RecordType) -> Result<()> {
        let id = record.type_id();
        if self.visiting.contains(&id) {
            return Err(Error::CyclicEmbedding {
                record: self.schema.record.to_owned(),
                embedded: record.name.to_owned(),
            });
        }
        self.visiting.push(id);
        for (i, field) in record.fields().iter().enumerate() {
            self.path.push(i);
            match (field.tag, field.kind) {
                (None, FieldKind::Embedded(inner)) => self.walk(inner)?,
                (None, FieldKind::Struct) => {
                    return Err(Error::NotFlattenable {
                        record: self.schema.record.to_owned(),
                        field: field.name.to_owned(),
                    });
                }
                (None, _) => {}
                (Some(tag), _) => self.add(record, field, tag)?,
            }
            self.path.pop();
        }
        self.visiting.pop();
        Ok(())
    }

    fn add(&mut self, record: RecordType, field: &FieldDef, tag: &str) -> Result<()> {
        let mut tag = parse_tag(tag)?;
        if self.schema.table.is_empty() {
            self.schema.table = tag.table.take().unwrap_or_default();
        }
        if self.schema.refresh.is_none() {
            self.schema.refresh = tag.refresh.take();
        }
        let mut column = ColumnDef::from_tag(
            record.name,
            field.name,
            self.path.clone().into(),
            field.kind,
            tag,
        )?;
        if self.schema.column(&column.name).is_some() {
            return Err(Error::DuplicateColumn {
                record: self.schema.record.to_owned(),
                column: column.name,
            });
        }
        let index = self.schema.columns.len();
        let roles = [
            (column.primary_key, &mut self.schema.primary_key, "primary"),
            (column.foreign_key, &mut self.schema.foreign_key, "foreign"),
            (column.created, &mut self.schema.created, "created"),
            (column.updated, &mut self.schema.updated, "updated"),
        ];
        for (flagged, slot, role) in roles {
            if !flagged {
                continue;
            }
            if slot.is_some() {
                return Err(Error::DuplicateOrConflictingKeyRole {
                    record: self.schema.record.to_owned(),
                    column: column.name,
                    role,
                });
            }
            *slot = Some(index);
        }
        if let (true, FieldKind::Reference(target)) = (column.foreign_key, column.kind) {
            let Some(referenced) = (self.resolve)(target.type_id()) else {
                return Err(Error::ForeignKeyNotYetDefined {
                    record: self.schema.record.to_owned(),
                    column: column.name,
                    target: target.name.to_owned(),
                });
            };
            let key = referenced.primary_key()?;
            column.references = Some(ColumnRef {
                table: referenced.table.clone(),
                name: key.name.clone(),
            });
        }
        self.schema.columns.push(column);
        Ok(())
    }
}
