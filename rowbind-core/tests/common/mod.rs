use rowbind_core::{Column, Error, FieldDef, FieldKind, FieldValue, Record, RecordType, Result};
use std::any::TypeId;
use time::OffsetDateTime;

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub tags: Vec<String>,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

static ITEM_FIELDS: [FieldDef; 6] = [
    FieldDef {
        name: "id",
        tag: Some("id,primary,autoinc,table:items"),
        kind: FieldKind::Integer,
    },
    FieldDef {
        name: "name",
        tag: Some("name,unique"),
        kind: FieldKind::Text,
    },
    FieldDef {
        name: "price",
        tag: Some("price,default:0"),
        kind: FieldKind::Float,
    },
    FieldDef {
        name: "tags",
        tag: Some("tags"),
        kind: FieldKind::Opaque,
    },
    FieldDef {
        name: "created_at",
        tag: Some("created_at,created"),
        kind: FieldKind::Time,
    },
    FieldDef {
        name: "updated_at",
        tag: Some("updated_at,updated"),
        kind: FieldKind::Time,
    },
];

fn item_fields() -> &'static [FieldDef] {
    &ITEM_FIELDS
}

impl Record for Item {
    const RECORD_TYPE: RecordType = RecordType {
        name: "Item",
        type_id: TypeId::of::<Item>,
        fields: item_fields,
    };

    fn read(&self, path: &[usize]) -> Result<FieldValue> {
        match path {
            [0] => self.id.to_field(),
            [1] => self.name.to_field(),
            [2] => self.price.to_field(),
            [3] => self.tags.to_field(),
            [4] => self.created_at.to_field(),
            [5] => self.updated_at.to_field(),
            _ => Err(Error::InvalidFieldPath {
                record: "Item",
                path: path.to_vec(),
            }),
        }
    }

    fn write(&mut self, path: &[usize], value: FieldValue) -> Result<()> {
        match path {
            [0] => self.id = Column::from_field(value)?,
            [1] => self.name = Column::from_field(value)?,
            [2] => self.price = Column::from_field(value)?,
            [3] => self.tags = Column::from_field(value)?,
            [4] => self.created_at = Column::from_field(value)?,
            [5] => self.updated_at = Column::from_field(value)?,
            _ => {
                return Err(Error::InvalidFieldPath {
                    record: "Item",
                    path: path.to_vec(),
                });
            }
        }
        Ok(())
    }
}
