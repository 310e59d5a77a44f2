#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use rowbind::{
        Database, Driver, Error, Executor, GenericSqlWriter, Params, Query, QueryResult, Record,
        Ref, RowLabeled, RowsAffected, Value,
        stream::{self, Stream},
    };
    use serde::{Deserialize, Serialize};
    use std::{collections::VecDeque, sync::Arc};
    use time::OffsetDateTime;

    struct MockDriver;

    impl Driver for MockDriver {
        type SqlWriter = GenericSqlWriter;

        const NAME: &'static str = "mock";

        fn sql_writer(&self) -> GenericSqlWriter {
            GenericSqlWriter::new()
        }
    }

    /// Records every query and answers with the queued results, in order.
    #[derive(Default)]
    struct MockExecutor {
        queries: Vec<Query>,
        results: VecDeque<anyhow::Result<Vec<QueryResult>>>,
    }

    impl MockExecutor {
        fn answer(mut self, result: anyhow::Result<Vec<QueryResult>>) -> Self {
            self.results.push_back(result);
            self
        }
    }

    impl Executor for MockExecutor {
        type Driver = MockDriver;

        fn driver(&self) -> &MockDriver {
            &MockDriver
        }

        fn run(&mut self, query: Query) -> impl Stream<Item = anyhow::Result<QueryResult>> + Send {
            self.queries.push(query);
            let results = match self.results.pop_front() {
                Some(Ok(v)) => v.into_iter().map(Ok).collect(),
                Some(Err(e)) => vec![Err(e)],
                None => vec![Ok(RowsAffected::default().into())],
            };
            stream::iter(results)
        }
    }

    fn affected(rows_affected: u64, last_affected_id: Option<i64>) -> QueryResult {
        RowsAffected {
            rows_affected,
            last_affected_id,
        }
        .into()
    }

    fn row(values: Vec<Value>) -> QueryResult {
        let labels: Arc<[String]> = ["id", "login", "balance", "settings", "tags", "created", "updated"]
            .into_iter()
            .map(String::from)
            .collect();
        RowLabeled::new(labels, values.into()).into()
    }

    #[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        theme: String,
    }

    #[derive(Default, Debug, Record)]
    struct Account {
        #[db("id,primary,autoinc,table:accounts,refresh:updated DESC")]
        id: i64,
        #[db("login,unique")]
        login: String,
        #[db("balance,default:0")]
        balance: i64,
        #[db("settings,json")]
        settings: Settings,
        #[db("tags")]
        tags: Vec<String>,
        #[db("created,created")]
        created: Option<OffsetDateTime>,
        #[db("updated,updated")]
        updated: Option<OffsetDateTime>,
    }

    #[derive(Default, Debug, Record)]
    struct Order {
        #[db("id,primary,table:orders")]
        id: i64,
        #[db("account_id,foreign")]
        account: Ref<Account>,
    }

    #[derive(Default, Debug, Record)]
    struct Draft {
        #[db("id,primary")]
        id: i64,
    }

    #[tokio::test]
    async fn create_table() {
        let mut database = Database::new(MockExecutor::default());
        database
            .attach(&mut Account::default())
            .expect("Failed to attach")
            .create_table()
            .await
            .expect("Failed to create the table");
        assert_eq!(
            database.last_query(),
            "CREATE TABLE accounts (\
            id INT NOT NULL PRIMARY KEY AUTOINCREMENT, \
            login VARCHAR(255) UNIQUE, \
            balance INT DEFAULT 0, \
            settings TEXT, \
            tags TEXT, \
            created DATETIME, \
            updated DATETIME)"
        );
        assert!(database.executor().queries[0].params.is_empty());
    }

    #[tokio::test]
    async fn foreign_keys_need_the_target_first() {
        let mut database = Database::new(MockExecutor::default());
        assert!(matches!(
            database.register::<Order>(),
            Err(Error::ForeignKeyNotYetDefined { .. })
        ));
        assert!(!database.registry().contains::<Order>());
        database
            .register::<Account>()
            .expect("Failed to register Account");
        database
            .attach(&mut Order::default())
            .expect("Failed to attach")
            .create_table()
            .await
            .expect("Failed to create the table");
        assert_eq!(
            database.last_query(),
            "CREATE TABLE orders (id INT NOT NULL PRIMARY KEY, account_id INT, \
            FOREIGN KEY (account_id) REFERENCES accounts(id))"
        );
    }

    #[tokio::test]
    async fn invalid_schema_runs_nothing() {
        let mut database = Database::new(MockExecutor::default());
        let result = database
            .attach(&mut Draft::default())
            .expect("Building succeeds without a table")
            .create_table()
            .await;
        assert!(matches!(result, Err(Error::MissingTableName { .. })));
        assert!(database.executor().queries.is_empty());
        assert_eq!(database.last_query(), "");
    }

    #[tokio::test]
    async fn save_new_stamps_after_success() {
        let executor = MockExecutor::default().answer(Ok(vec![affected(1, Some(42))]));
        let mut database = Database::new(executor);
        let mut account = Account {
            login: "root".into(),
            settings: Settings {
                theme: "dark".into(),
            },
            ..Default::default()
        };
        let affected = database
            .attach(&mut account)
            .expect("Failed to attach")
            .save_new(&Params::new())
            .await
            .expect("Failed to save");
        assert_eq!(affected, 1);
        assert_eq!(account.id, 42);
        assert!(account.created.is_some());
        assert_eq!(account.created, account.updated);
        let query = &database.executor().queries[0];
        assert_eq!(
            query.sql,
            "INSERT INTO accounts (login, balance, settings, tags, created, updated) \
            VALUES (?, ?, ?, ?, ?, ?)"
        );
        assert_eq!(query.params[2], Value::Varchar(Some(r#"{"theme":"dark"}"#.into())));
        assert_eq!(
            query.params[4],
            Value::Int64(account.created.map(|v| v.unix_timestamp()))
        );
    }

    #[tokio::test]
    async fn save_new_writes_back_a_left_out_key() {
        let executor = MockExecutor::default().answer(Ok(vec![affected(1, Some(17))]));
        let mut database = Database::new(executor);
        database
            .register::<Account>()
            .expect("Failed to register Account");
        let mut order = Order {
            id: 0,
            account: Ref::new(5),
        };
        database
            .attach(&mut order)
            .expect("Failed to attach")
            .save_new(&Params::new())
            .await
            .expect("Failed to save");
        assert_eq!(order.id, 17);
        assert_eq!(
            database.last_query(),
            "INSERT INTO orders (account_id) VALUES (?)"
        );
    }

    #[tokio::test]
    async fn ignored_insert_leaves_the_record() {
        let executor = MockExecutor::default().answer(Ok(vec![affected(0, Some(9))]));
        let mut database = Database::new(executor);
        let mut account = Account {
            login: "root".into(),
            ..Default::default()
        };
        let affected = database
            .attach(&mut account)
            .expect("Failed to attach")
            .save_new(&Params::new().or_ignore(true))
            .await
            .expect("Insert or ignore must not fail");
        assert_eq!(affected, 0);
        assert_eq!(account.id, 0);
        assert_eq!(account.created, None);
        assert_eq!(account.updated, None);
        assert!(database.last_query().starts_with("INSERT OR IGNORE INTO accounts"));
    }

    #[tokio::test]
    async fn failed_save_leaves_the_record() {
        let executor = MockExecutor::default().answer(Err(anyhow!("disk full")));
        let mut database = Database::new(executor);
        let mut account = Account {
            login: "root".into(),
            ..Default::default()
        };
        let result = database
            .attach(&mut account)
            .expect("Failed to attach")
            .save_new(&Params::new())
            .await;
        let error = result.expect_err("Expected an execution failure");
        assert!(matches!(error, Error::ExecutionFailure { .. }));
        assert!(error.to_string().contains("disk full"));
        assert!(database.last_query().starts_with("INSERT INTO accounts"));
        assert_eq!(account.id, 0);
        assert_eq!(account.created, None);
        assert_eq!(account.updated, None);
    }

    #[tokio::test]
    async fn save_existing_skip_empty() {
        let mut database = Database::new(MockExecutor::default().answer(Ok(vec![affected(1, None)])));
        let mut account = Account {
            id: 5,
            balance: 10,
            ..Default::default()
        };
        let affected = database
            .attach(&mut account)
            .expect("Failed to attach")
            .save_existing(&Params::new().skip_empty(true))
            .await
            .expect("Failed to update");
        assert_eq!(affected, 1);
        assert_eq!(
            database.last_query(),
            "UPDATE accounts SET balance = ?, updated = ? WHERE id = ?"
        );
        assert!(account.updated.is_some());
        assert_eq!(account.created, None);
        assert_eq!(
            database.executor().queries[0].params[2],
            Value::Int64(Some(5))
        );
    }

    fn root_row() -> Vec<Value> {
        vec![
            Value::Int64(Some(5)),
            Value::Varchar(Some("root".into())),
            Value::Int64(Some(10)),
            Value::Varchar(Some(r#"{"theme":"light"}"#.into())),
            Value::Varchar(Some(r#"["admin"]"#.into())),
            Value::Int64(Some(1_700_000_000)),
            Value::Null,
        ]
    }

    #[tokio::test]
    async fn get_existing_and_refresh() {
        let executor = MockExecutor::default()
            .answer(Ok(vec![row(root_row())]))
            .answer(Ok(vec![row(root_row())]))
            .answer(Ok(vec![]));
        let mut database = Database::new(executor);
        let mut account = Account::default();
        let count = database
            .attach(&mut account)
            .expect("Failed to attach")
            .get_existing(&Params::new().filter("login = ?").bind("root".to_string()))
            .await
            .expect("Failed to select");
        assert_eq!(count, 1);
        assert_eq!(
            database.last_query(),
            "SELECT * FROM accounts WHERE login = ? LIMIT 1"
        );
        assert_eq!(account.id, 5);
        assert_eq!(account.settings.theme, "light");
        assert_eq!(account.tags, ["admin"]);
        assert_eq!(
            account.created,
            OffsetDateTime::from_unix_timestamp(1_700_000_000).ok()
        );
        assert_eq!(account.updated, None);

        let mut stale = Account {
            id: 5,
            ..Default::default()
        };
        database
            .attach(&mut stale)
            .expect("Failed to attach")
            .refresh()
            .await
            .expect("Failed to refresh");
        assert_eq!(
            database.last_query(),
            "SELECT * FROM accounts WHERE id = ? ORDER BY updated DESC LIMIT 1"
        );
        assert_eq!(database.executor().queries[1].params, [Value::Int64(Some(5))]);
        assert_eq!(stale.login, "root");

        let mut missing = Account::default();
        let result = database
            .attach(&mut missing)
            .expect("Failed to attach")
            .get_existing(&Params::new().filter("id = 6"))
            .await;
        assert!(matches!(
            result,
            Err(Error::NoMatchingRow { table, .. }) if table == "accounts"
        ));
    }

    #[tokio::test]
    async fn get_many_keeps_the_rows_read() {
        let mut broken = root_row();
        broken[1] = Value::Float64(Some(1.5));
        let executor = MockExecutor::default().answer(Ok(vec![
            row(root_row()),
            row(broken),
            row(root_row()),
        ]));
        let mut database = Database::new(executor);
        let mut accounts = Vec::<Account>::new();
        let result = database
            .get_many(&Params::new().order_by("id").limit(3), &mut accounts)
            .await;
        assert!(matches!(
            result,
            Err(Error::TypeMismatch { column, .. }) if column == "login"
        ));
        assert_eq!(accounts.len(), 1);
        assert_eq!(
            database.last_query(),
            "SELECT * FROM accounts ORDER BY id LIMIT 3"
        );
    }

    #[tokio::test]
    async fn delete() {
        let mut database = Database::new(MockExecutor::default().answer(Ok(vec![affected(1, None)])));
        let mut account = Account {
            id: 9,
            ..Default::default()
        };
        let affected = database
            .attach(&mut account)
            .expect("Failed to attach")
            .delete()
            .await
            .expect("Failed to delete");
        assert_eq!(affected, 1);
        assert_eq!(database.last_query(), "DELETE FROM accounts WHERE id = ?");
    }
}
