use crate::Executor;
use std::future::Future;

pub trait Connection: Executor {
    /// Open a connection to the database at the given url, whose scheme is the driver name.
    fn connect(url: &str) -> impl Future<Output = anyhow::Result<Self>> + Send;
}
