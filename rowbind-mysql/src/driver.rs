use crate::MySqlSqlWriter;
use rowbind_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlDriver;

impl MySqlDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MySqlDriver {
    type SqlWriter = MySqlSqlWriter;

    const NAME: &'static str = "mysql";
    fn sql_writer(&self) -> Self::SqlWriter {
        MySqlSqlWriter::default()
    }
}
