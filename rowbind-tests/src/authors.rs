use crate::silent_logs;
use rowbind::{Database, Error, Executor, Params, Record};
use time::OffsetDateTime;

#[derive(Default, Debug, Clone, PartialEq, Record)]
pub struct Author {
    #[db("id,primary,autoinc,table:authors,refresh:id DESC")]
    pub id: i64,
    #[db("name,unique")]
    pub name: String,
    #[db("email")]
    pub email: Option<String>,
    #[db("karma,default:0")]
    pub karma: i32,
    #[db("active")]
    pub active: bool,
    #[db("created_at,created")]
    pub created_at: Option<OffsetDateTime>,
    #[db("updated_at,updated")]
    pub updated_at: Option<OffsetDateTime>,
}

fn by_name(name: &str) -> Params {
    Params::new().filter("name = ?").bind(name.to_string())
}

pub async fn authors<E: Executor>(database: &mut Database<E>) {
    database
        .attach(&mut Author::default())
        .expect("Failed to register Author")
        .create_table()
        .await
        .expect("Failed to create the authors table");
    assert!(database.last_query().starts_with("CREATE TABLE"));

    // Insert
    let before = OffsetDateTime::now_utc();
    let mut alice = Author {
        name: "alice".into(),
        email: Some("alice@example.com".into()),
        karma: 3,
        active: true,
        ..Default::default()
    };
    let affected = database
        .attach(&mut alice)
        .expect("Failed to attach alice")
        .save_new(&Params::new())
        .await
        .expect("Failed to save alice");
    assert_eq!(affected, 1);
    assert_ne!(alice.id, 0, "The generated key must be written back");
    let created_at = alice.created_at.expect("created_at must be stamped");
    assert!(created_at >= before);
    assert_eq!(alice.updated_at, Some(created_at));

    let mut bob = Author {
        name: "bob".into(),
        ..Default::default()
    };
    database
        .attach(&mut bob)
        .expect("Failed to attach bob")
        .save_new(&Params::new())
        .await
        .expect("Failed to save bob");
    assert!(bob.id > alice.id);

    // Unique violation
    let mut twin = Author {
        name: "alice".into(),
        ..Default::default()
    };
    silent_logs! {
        let result = database
            .attach(&mut twin)
            .expect("Failed to attach the twin")
            .save_new(&Params::new())
            .await;
        assert!(
            matches!(result, Err(Error::ExecutionFailure { .. })),
            "Expected a failure, found {:?}",
            result
        );
    }
    assert_eq!(twin.id, 0);
    assert_eq!(twin.created_at, None, "Failed inserts must not stamp the record");
    let affected = database
        .attach(&mut twin)
        .expect("Failed to attach the twin")
        .save_new(&Params::new().or_ignore(true))
        .await
        .expect("Insert or ignore must not fail");
    assert_eq!(affected, 0);
    assert_eq!(twin.id, 0);
    assert_eq!(twin.created_at, None, "Ignored inserts must not stamp the record");

    // Select
    let mut found = Author::default();
    let count = database
        .attach(&mut found)
        .expect("Failed to attach")
        .get_existing(&by_name("alice"))
        .await
        .expect("Failed to find alice");
    assert_eq!(count, 1);
    assert!(database.last_query().ends_with("LIMIT 1"));
    assert_eq!(found.id, alice.id);
    assert_eq!(found.email.as_deref(), Some("alice@example.com"));
    assert_eq!(found.karma, 3);
    assert!(found.active);
    assert_eq!(
        found.created_at.map(|v| v.unix_timestamp()),
        Some(created_at.unix_timestamp())
    );

    let mut missing = Author::default();
    silent_logs! {
        let result = database
            .attach(&mut missing)
            .expect("Failed to attach")
            .get_existing(&by_name("carol"))
            .await;
        assert!(
            matches!(result, Err(Error::NoMatchingRow { .. })),
            "Expected no row, found {:?}",
            result
        );
    }
    assert_eq!(missing, Author::default());

    // Update
    bob.karma = 10;
    bob.email = Some("bob@example.com".into());
    let affected = database
        .attach(&mut bob)
        .expect("Failed to attach bob")
        .save_existing(&Params::new())
        .await
        .expect("Failed to update bob");
    assert_eq!(affected, 1);

    let mut partial = Author {
        id: bob.id,
        karma: 99,
        ..Default::default()
    };
    database
        .attach(&mut partial)
        .expect("Failed to attach")
        .save_existing(&Params::new().skip_empty(true))
        .await
        .expect("Failed to update bob skipping empty fields");
    assert!(partial.updated_at.is_some());
    assert!(!database.last_query().contains("name"));

    // Refresh
    let mut reloaded = Author {
        id: bob.id,
        ..Default::default()
    };
    database
        .attach(&mut reloaded)
        .expect("Failed to attach")
        .refresh()
        .await
        .expect("Failed to refresh bob");
    assert!(database.last_query().contains("ORDER BY id DESC"));
    assert_eq!(reloaded.name, "bob");
    assert_eq!(reloaded.karma, 99);
    assert_eq!(reloaded.email.as_deref(), Some("bob@example.com"));

    // Many
    let mut all = Vec::new();
    let count = database
        .get_many::<Author>(&Params::new().order_by("name"), &mut all)
        .await
        .expect("Failed to list the authors");
    assert_eq!(count, 2);
    assert_eq!(
        all.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        ["alice", "bob"]
    );

    // Delete
    let affected = database
        .attach(&mut bob)
        .expect("Failed to attach bob")
        .delete()
        .await
        .expect("Failed to delete bob");
    assert_eq!(affected, 1);
    let affected = database
        .attach(&mut bob)
        .expect("Failed to attach bob")
        .delete()
        .await
        .expect("Deleting a missing row must not fail");
    assert_eq!(affected, 0);
    let mut all = Vec::new();
    database
        .get_many::<Author>(&Params::new(), &mut all)
        .await
        .expect("Failed to list the authors");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, alice.id);
}
