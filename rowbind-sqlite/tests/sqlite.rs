#[cfg(test)]
mod tests {
    use rowbind_core::Connection;
    use rowbind_sqlite::SqliteConnection;
    use rowbind_tests::{execute_tests, init_logs};

    #[tokio::test]
    async fn sqlite() {
        init_logs();
        let connection = SqliteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        execute_tests(connection).await;
    }
}
