use crate::{
    CBox, SqliteDriver,
    bind::bind_params,
    error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use anyhow::{Context, Error, Result};
use async_stream::try_stream;
use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI,
    SQLITE_ROW, sqlite3, sqlite3_busy_timeout, sqlite3_changes64, sqlite3_close,
    sqlite3_column_count, sqlite3_errmsg, sqlite3_finalize, sqlite3_last_insert_rowid,
    sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt,
};
use rowbind_core::{
    Connection, Driver, Executor, Query, QueryResult, Row, RowLabeled, RowNames, RowsAffected,
    stream::{Stream, TryStreamExt},
    truncate_long,
};
use std::{
    ffi::{CString, c_char, c_int},
    ptr,
    sync::Arc,
};
use tokio::task::spawn_blocking;

const BUSY_TIMEOUT_MS: c_int = 5000;

pub struct SqliteConnection {
    pub(crate) connection: CBox<sqlite3>,
}

impl SqliteConnection {
    async fn prepare(&self, sql: String) -> Result<CBox<sqlite3_stmt>> {
        let connection = self.connection.borrowed();
        spawn_blocking(move || unsafe {
            let mut statement = CBox::null(|p| {
                sqlite3_finalize(p);
            });
            let mut tail = ptr::null();
            let rc = sqlite3_prepare_v2(
                *connection,
                sql.as_ptr() as *const c_char,
                sql.len() as c_int,
                &mut *statement,
                &mut tail,
            );
            if rc != SQLITE_OK {
                return Err(Error::msg(
                    error_message_from_ptr(&sqlite3_errmsg(*connection)).to_string(),
                ));
            }
            let consumed = (tail as usize).saturating_sub(sql.as_ptr() as usize);
            if sql.get(consumed..).is_some_and(|v| !v.trim().is_empty()) {
                return Err(Error::msg("Cannot run more than one statement at a time"));
            }
            Ok(statement)
        })
        .await?
    }

    fn affected(&self) -> RowsAffected {
        unsafe {
            RowsAffected {
                rows_affected: sqlite3_changes64(*self.connection).max(0) as u64,
                last_affected_id: Some(sqlite3_last_insert_rowid(*self.connection)),
            }
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver {}
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        let this = &*self;
        try_stream! {
            let statement = this.prepare(query.sql).await?;
            bind_params(*statement, &query.params)?;
            let count = unsafe { sqlite3_column_count(*statement) };
            let labels = (0..count)
                .map(|i| extract_name(*statement, i))
                .collect::<Result<RowNames>>()?;
            loop {
                let rc = unsafe { sqlite3_step(*statement) };
                if rc == SQLITE_DONE {
                    break;
                }
                if rc != SQLITE_ROW {
                    let message =
                        error_message_from_ptr(&unsafe { sqlite3_errmsg(*this.connection) })
                            .to_string();
                    Err(Error::msg(message))?;
                }
                let values = (0..count)
                    .map(|i| extract_value(*statement, i))
                    .collect::<Result<Row>>()?;
                yield QueryResult::Row(RowLabeled::new(labels.clone(), values));
            }
            if count == 0 {
                yield QueryResult::Affected(this.affected());
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for SqliteConnection {
    /// Opens `sqlite://<path>[?<uri parameters>]`, creating the file when missing.
    async fn connect(url: &str) -> Result<SqliteConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        };
        let path = CString::new(format!("file:{path}")).with_context(context)?;
        let mut connection = CBox::null(|p| unsafe {
            sqlite3_close(p);
        });
        let rc = unsafe {
            sqlite3_open_v2(
                path.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        if rc != SQLITE_OK {
            let error = Error::msg(
                error_message_from_ptr(&unsafe { sqlite3_errmsg(*connection) }).to_string(),
            )
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        unsafe {
            sqlite3_busy_timeout(*connection, BUSY_TIMEOUT_MS);
        }
        Ok(Self { connection })
    }
}
