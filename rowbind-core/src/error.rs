use std::{fmt::Write, sync::Arc};

/// Everything that can go wrong between a tagged struct and a database row.
///
/// Variants carry the names of the record, column or table involved so that
/// the message alone locates the problem. The type is `Clone` because the
/// outcome of a schema validation is memoized and returned on every later
/// call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Malformed tag `{tag}`: {reason}")]
    MalformedTag { tag: String, reason: String },
    #[error("Field `{field}` of `{record}` is marked `{flag}` but it is not {expected}")]
    InvalidFieldType {
        record: String,
        field: String,
        flag: &'static str,
        expected: &'static str,
    },
    #[error(
        "Column `{column}` of `{record}` is a foreign key to `{target}`, which must be registered first"
    )]
    ForeignKeyNotYetDefined {
        record: String,
        column: String,
        target: String,
    },
    #[error("`{record}` does not declare a table name (use `table:<name>` in one of its tags)")]
    MissingTableName { record: String },
    #[error("`{record}` does not declare a primary key")]
    MissingPrimaryKey { record: String },
    #[error("Column `{column}` of `{record}` cannot take the `{role}` role: it is already assigned")]
    DuplicateOrConflictingKeyRole {
        record: String,
        column: String,
        role: &'static str,
    },
    #[error("Column `{column}` appears more than once in `{record}`")]
    DuplicateColumn { record: String, column: String },
    #[error("`{record}` embeds `{embedded}` that is already being expanded")]
    CyclicEmbedding { record: String, embedded: String },
    #[error("Field `{field}` of `{record}` cannot be flattened, tag it with a column name and `json`")]
    NotFlattenable { record: String, field: String },
    #[error("No row of `{table}` matches the query:\n{query}")]
    NoMatchingRow { table: String, query: String },
    #[error("Could not decode the JSON stored in column `{column}`: {reason}")]
    JsonDecodeFailure { column: String, reason: String },
    #[error("Could not encode column `{column}` as JSON: {reason}")]
    JsonEncodeFailure { column: String, reason: String },
    #[error("Column `{column}` holds `{value}` which is not a unix timestamp in seconds")]
    InvalidTimeEncoding { column: String, value: String },
    #[error("Column `{column}` is a structure: structs must be marked as json or embedded")]
    UnsupportedStructColumn { column: String },
    #[error("Column `{column}` expected {expected} but the database returned {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },
    #[error("Table `{table}` has {expected} columns but the row has {found}")]
    RowShapeMismatch {
        table: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid query parameters: {0}")]
    InvalidParams(String),
    #[error("`{record}` has no field at path {path:?}")]
    InvalidFieldPath {
        record: &'static str,
        path: Vec<usize>,
    },
    #[error("Error while executing the query:\n{query}\n{cause:#}")]
    ExecutionFailure {
        query: String,
        cause: Arc<anyhow::Error>,
    },
}

impl Error {
    pub fn execution(query: impl Into<String>, cause: anyhow::Error) -> Self {
        Error::ExecutionFailure {
            query: query.into(),
            cause: Arc::new(cause),
        }
    }

    pub fn type_mismatch(expected: &'static str, found: impl std::fmt::Debug) -> Self {
        let mut text = String::new();
        let _ = write!(text, "{:?}", found);
        Error::TypeMismatch {
            column: String::new(),
            expected,
            found: text,
        }
    }

    /// Fills the column name of errors raised by conversions that do not know it.
    pub fn for_column(mut self, name: &str) -> Self {
        match &mut self {
            Error::JsonDecodeFailure { column, .. }
            | Error::JsonEncodeFailure { column, .. }
            | Error::InvalidTimeEncoding { column, .. }
            | Error::UnsupportedStructColumn { column }
            | Error::TypeMismatch { column, .. } => {
                if column.is_empty() {
                    *column = name.to_owned();
                }
            }
            _ => {}
        }
        self
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
