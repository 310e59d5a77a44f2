use crate::SqliteSqlWriter;
use rowbind_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteDriver;

impl SqliteDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for SqliteDriver {
    type SqlWriter = SqliteSqlWriter;

    const NAME: &'static str = "sqlite";
    fn sql_writer(&self) -> SqliteSqlWriter {
        SqliteSqlWriter::default()
    }
}
