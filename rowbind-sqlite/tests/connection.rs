#[cfg(test)]
mod tests {
    use rowbind_core::{Connection, Executor, QueryResult, stream::TryStreamExt};
    use rowbind_sqlite::SqliteConnection;
    use rowbind_tests::{init_logs, silent_logs};
    use std::{env, fs, path::PathBuf, process};

    fn database_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("rowbind-{}-{}.sqlite", name, process::id()))
    }

    #[tokio::test]
    async fn create_database() {
        init_logs();
        let path = database_path("creation");
        let _ = fs::remove_file(&path);
        assert!(!path.exists(), "Database file should not exist before test");
        SqliteConnection::connect(&format!("sqlite://{}", path.display()))
            .await
            .expect("Could not open the database");
        assert!(
            path.exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", path.display()))
            .await
            .expect("Could not open the database read only");
        fs::remove_file(&path).expect("Failed to remove the test database file");
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", path.display()))
                    .await
                    .is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("mysql://some_value").await.is_err());
        };
    }

    #[tokio::test]
    async fn rows_and_affected() {
        init_logs();
        let mut connection = SqliteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let affected = connection
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)".into())
            .await
            .expect("Failed to create the table");
        assert_eq!(affected.rows_affected, 0);
        let affected = connection
            .execute(
                rowbind_core::Query::new(
                    "INSERT INTO t (name) VALUES (?), (?)",
                    vec!["a".into(), "b".into()],
                ),
            )
            .await
            .expect("Failed to insert");
        assert_eq!(affected.rows_affected, 2);
        assert_eq!(affected.last_affected_id, Some(2));
        let results = connection
            .run("SELECT id, name FROM t ORDER BY id".into())
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to select");
        assert_eq!(results.len(), 2);
        let QueryResult::Row(row) = &results[1] else {
            panic!("Expected a row, found {:?}", results[1]);
        };
        assert_eq!(&*row.labels, ["id".to_string(), "name".to_string()]);
        assert_eq!(row.values[1], rowbind_core::Value::Varchar(Some("b".into())));
    }

    #[tokio::test]
    async fn rejects_multiple_statements() {
        let mut connection = SqliteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        silent_logs! {
            let result = connection
                .execute("SELECT 1; SELECT 2".into())
                .await;
            assert!(result.is_err());
        }
    }
}
