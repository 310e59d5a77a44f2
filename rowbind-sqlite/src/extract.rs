use anyhow::{Error, Result};
use libsqlite3_sys::*;
use rowbind_core::{AsValue, Value};
use std::{
    ffi::{CStr, c_int},
    slice,
};

pub(crate) fn extract_value(statement: *mut sqlite3_stmt, index: c_int) -> Result<Value> {
    unsafe {
        let column_type = sqlite3_column_type(statement, index);
        Ok(match column_type {
            SQLITE_NULL => Value::Null,
            SQLITE_INTEGER => sqlite3_column_int64(statement, index).as_value(),
            SQLITE_FLOAT => sqlite3_column_double(statement, index).as_value(),
            SQLITE_BLOB => {
                let ptr = sqlite3_column_blob(statement, index) as *const u8;
                let len = sqlite3_column_bytes(statement, index) as usize;
                if ptr.is_null() {
                    Value::Blob(Some(Box::default()))
                } else {
                    Value::Blob(Some(slice::from_raw_parts(ptr, len).into()))
                }
            }
            SQLITE_TEXT => {
                let ptr = sqlite3_column_text(statement, index);
                let len = sqlite3_column_bytes(statement, index) as usize;
                if ptr.is_null() {
                    Value::Varchar(Some(String::new()))
                } else {
                    String::from_utf8_lossy(slice::from_raw_parts(ptr, len))
                        .into_owned()
                        .as_value()
                }
            }
            _ => {
                return Err(Error::msg(format!(
                    "Unexpected column type {}",
                    column_type
                )));
            }
        })
    }
}

pub(crate) fn extract_name(statement: *mut sqlite3_stmt, index: c_int) -> Result<String> {
    unsafe {
        Ok(CStr::from_ptr(sqlite3_column_name(statement, index))
            .to_str()?
            .into())
    }
}
