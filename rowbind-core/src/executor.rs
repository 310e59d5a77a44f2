use crate::{
    Driver, Query, QueryResult, RowLabeled, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

/// Runs statements against a database. This is the only capability the
/// binder requires from a backend.
pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// General method to send any query and return any result type (either row or count)
    fn run(&mut self, query: Query) -> impl Stream<Item = anyhow::Result<QueryResult>> + Send;

    /// Execute the query and returns the rows.
    fn fetch(&mut self, query: Query) -> impl Stream<Item = anyhow::Result<RowLabeled>> + Send {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: Query) -> impl Future<Output = anyhow::Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}
