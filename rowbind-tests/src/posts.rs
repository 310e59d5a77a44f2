use crate::Author;
use rowbind::{Database, Error, Executor, Params, Record, Ref, Registry};

#[derive(Default, Debug, Record)]
pub struct Post {
    #[db("id,primary,autoinc,table:posts")]
    pub id: i64,
    #[db("author_id,foreign")]
    pub author: Ref<Author>,
    #[db("title")]
    pub title: String,
    #[db("score")]
    pub score: f64,
}

pub async fn posts<E: Executor>(database: &mut Database<E>) {
    let result = Registry::new().schema_of::<Post>();
    assert!(
        matches!(result, Err(Error::ForeignKeyNotYetDefined { .. })),
        "Expected the missing author schema to be reported, found {:?}",
        result
    );

    database
        .register::<Author>()
        .expect("Failed to register Author");
    let schema = database
        .register::<Post>()
        .expect("Failed to register Post");
    let target = schema.columns[1]
        .references
        .as_ref()
        .expect("author_id must reference the authors");
    assert_eq!(target.table, "authors");
    assert_eq!(target.name, "id");

    database
        .attach(&mut Post::default())
        .expect("Failed to attach")
        .create_table()
        .await
        .expect("Failed to create the posts table");
    assert!(
        database
            .last_query()
            .contains("FOREIGN KEY (author_id) REFERENCES authors(id)")
            || database
                .last_query()
                .contains("FOREIGN KEY (`author_id`) REFERENCES `authors`(`id`)")
    );

    let mut alice = Vec::new();
    database
        .get_many::<Author>(&Params::new().filter("name = ?").bind("alice".to_string()), &mut alice)
        .await
        .expect("Failed to find alice");
    let alice = alice.pop().expect("alice must exist");

    for (title, score) in [("first", 1.5), ("second", 3.25), ("third", 2.5)] {
        let mut post = Post {
            author: alice.id.into(),
            title: title.into(),
            score,
            ..Default::default()
        };
        database
            .attach(&mut post)
            .expect("Failed to attach")
            .save_new(&Params::new())
            .await
            .expect("Failed to save the post");
        assert_ne!(post.id, 0);
    }

    let mut best = Vec::new();
    let count = database
        .get_many::<Post>(
            &Params::new()
                .filter("author_id = ?")
                .bind(alice.id)
                .order_by("score DESC")
                .limit(2),
            &mut best,
        )
        .await
        .expect("Failed to list the posts");
    assert_eq!(count, 2);
    assert_eq!(best[0].title, "second");
    assert_eq!(best[0].score, 3.25);
    assert_eq!(best[1].title, "third");
    assert_eq!(best[1].author, Ref::new(alice.id));

    let mut all = Vec::new();
    let query = database.last_query().to_owned();
    let result = database
        .get_many::<Post>(&Params::new().filter("WHERE id > 0"), &mut all)
        .await;
    assert!(matches!(result, Err(Error::InvalidParams(..))));
    assert_eq!(
        database.last_query(),
        query,
        "Rejected parameters must not reach the database"
    );
}
