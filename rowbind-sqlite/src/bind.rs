use crate::error_message_from_ptr;
use anyhow::{Error, Result};
use libsqlite3_sys::*;
use rowbind_core::{Value, truncate_long};
use std::{
    ffi::{CStr, c_int},
    os::raw::{c_char, c_void},
};

/// Binds `params` to the placeholders of `statement`, in order.
pub(crate) fn bind_params(statement: *mut sqlite3_stmt, params: &[Value]) -> Result<()> {
    let expected = unsafe { sqlite3_bind_parameter_count(statement) } as usize;
    if expected != params.len() {
        return Err(Error::msg(format!(
            "The query has {} parameters but {} values were provided",
            expected,
            params.len()
        )));
    }
    for (i, value) in params.iter().enumerate() {
        bind_value(statement, i as c_int + 1, value)?;
    }
    Ok(())
}

fn bind_value(statement: *mut sqlite3_stmt, index: c_int, value: &Value) -> Result<()> {
    unsafe {
        let rc = match value {
            _ if value.is_null() => sqlite3_bind_null(statement, index),
            Value::Boolean(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
            Value::Int64(Some(v)) => sqlite3_bind_int64(statement, index, *v),
            Value::Float64(Some(v)) => sqlite3_bind_double(statement, index, *v),
            Value::Varchar(Some(v)) => sqlite3_bind_text(
                statement,
                index,
                v.as_ptr() as *const c_char,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
            Value::Blob(Some(v)) => sqlite3_bind_blob(
                statement,
                index,
                v.as_ptr() as *const c_void,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
            _ => sqlite3_bind_null(statement, index),
        };
        if rc != SQLITE_OK {
            let db = sqlite3_db_handle(statement);
            let query = sqlite3_sql(statement);
            let error = Error::msg(error_message_from_ptr(&sqlite3_errmsg(db)).to_string())
                .context(format!(
                    "Cannot bind parameter {} to query:\n{}",
                    index,
                    truncate_long!(CStr::from_ptr(query).to_string_lossy())
                ));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(())
    }
}
