mod authors;
mod notes;
mod posts;

pub use authors::Author;
pub use notes::{Audit, Note};
pub use posts::Post;

use crate::{authors::authors, notes::notes, posts::posts};
use log::LevelFilter;
use rowbind::{Connection, Database};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs the whole suite on a connection to an empty database.
pub async fn execute_tests<C: Connection>(connection: C) {
    let mut database = Database::new(connection);
    authors(&mut database).await;
    posts(&mut database).await;
    notes(&mut database).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
