use rowbind::{Database, Error, Executor, FieldKind, Params, Record};
use std::collections::BTreeMap;

#[derive(Default, Debug, Clone, PartialEq, Record)]
pub struct Audit {
    #[db("revision")]
    pub revision: i64,
    #[db("reviewer")]
    pub reviewer: Option<String>,
}

#[derive(Default, Debug, Record)]
pub struct Note {
    #[db("id,primary,table:notes")]
    pub id: i64,
    #[db("labels")]
    pub labels: BTreeMap<String, i64>,
    #[db("lines,json")]
    pub lines: Vec<String>,
    #[db]
    pub audit: Audit,
    pub scratch: String,
}

pub async fn notes<E: Executor>(database: &mut Database<E>) {
    let schema = database
        .register::<Note>()
        .expect("Failed to register Note");
    assert_eq!(
        schema
            .columns
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>(),
        ["id", "labels", "lines", "revision", "reviewer"]
    );
    assert!(schema.columns[1].json);
    assert_eq!(schema.columns[3].kind, FieldKind::Integer);

    database
        .attach(&mut Note::default())
        .expect("Failed to attach")
        .create_table()
        .await
        .expect("Failed to create the notes table");

    let mut note = Note {
        id: 7,
        labels: BTreeMap::from([("red".into(), 1), ("blue".into(), 2)]),
        lines: vec!["hello".into(), "world".into()],
        audit: Audit {
            revision: 4,
            reviewer: Some("dana".into()),
        },
        scratch: "not stored".into(),
    };
    let affected = database
        .attach(&mut note)
        .expect("Failed to attach")
        .save_new(&Params::new())
        .await
        .expect("Failed to save the note");
    assert_eq!(affected, 1);
    assert_eq!(note.id, 7, "A key that is not auto incremented stays as it was");

    let mut loaded = Note {
        id: 7,
        ..Default::default()
    };
    database
        .attach(&mut loaded)
        .expect("Failed to attach")
        .refresh()
        .await
        .expect("Failed to reload the note");
    assert_eq!(loaded.labels, note.labels);
    assert_eq!(loaded.lines, note.lines);
    assert_eq!(loaded.audit, note.audit);
    assert_eq!(loaded.scratch, "");

    let mut updated = Note {
        id: 7,
        audit: Audit {
            revision: 5,
            reviewer: None,
        },
        ..Default::default()
    };
    database
        .attach(&mut updated)
        .expect("Failed to attach")
        .save_existing(&Params::new().skip_empty(true))
        .await
        .expect("Failed to update the note");
    let mut notes = Vec::new();
    database
        .get_many::<Note>(&Params::new().filter("revision = ?").bind(5_i64), &mut notes)
        .await
        .expect("Failed to list the notes");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].labels, note.labels, "Empty maps are skipped");
    assert_eq!(notes[0].audit.reviewer.as_deref(), Some("dana"));

    let mut empty = Note {
        id: 7,
        ..Default::default()
    };
    let result = database
        .attach(&mut empty)
        .expect("Failed to attach")
        .save_existing(&Params::new().skip_empty(true))
        .await;
    assert!(
        matches!(result, Err(Error::InvalidParams(..))),
        "Nothing is left to update, found {:?}",
        result
    );
}
