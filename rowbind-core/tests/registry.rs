mod common;

#[cfg(test)]
mod tests {
    use crate::common::Item;
    use rowbind_core::{Error, FieldDef, FieldKind, RecordType, Registry};
    use std::{any::TypeId, sync::Arc, thread};

    struct Broken;

    static BROKEN_FIELDS: [FieldDef; 2] = [
        FieldDef {
            name: "a",
            tag: Some("a,primary,table:broken"),
            kind: FieldKind::Integer,
        },
        FieldDef {
            name: "b",
            tag: Some("a"),
            kind: FieldKind::Integer,
        },
    ];

    fn broken_fields() -> &'static [FieldDef] {
        &BROKEN_FIELDS
    }

    const BROKEN: RecordType = RecordType {
        name: "Broken",
        type_id: TypeId::of::<Broken>,
        fields: broken_fields,
    };

    #[test]
    fn builds_once_under_contention() {
        let registry = Arc::new(Registry::new());
        let schemas = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.schema_of::<Item>())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|v| {
                v.join()
                    .expect("The thread panicked")
                    .expect("The item schema must build")
            })
            .collect::<Vec<_>>();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<Item>());
        for schema in &schemas {
            assert!(Arc::ptr_eq(schema, &schemas[0]));
        }
    }

    #[test]
    fn failures_are_not_cached() {
        let registry = Registry::new();
        for _ in 0..2 {
            assert!(matches!(
                registry.schema_for(BROKEN),
                Err(Error::DuplicateColumn { .. })
            ));
        }
        assert!(registry.is_empty());
        assert!(registry.get(TypeId::of::<Broken>()).is_none());
    }
}
