use crate::SqlWriter;

/// A database backend: names the dialect used to write its statements.
pub trait Driver {
    type SqlWriter: SqlWriter;

    /// Scheme of the connection urls, `sqlite` accepts `sqlite://...`.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
