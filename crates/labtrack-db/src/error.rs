use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the store, loader, write operations and queries.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying SQLite database, including constraint
    /// violations (duplicate key, missing foreign-key target).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A bulk-load source file could not be opened.
    #[error("cannot read source file {path}: {source}")]
    SourceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bulk-load source file could not be parsed.
    #[error("malformed source file {path}: {source}")]
    SourceFormat {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A source row's field count disagrees with the table's declared
    /// column count. The loader rejects such rows rather than adapting.
    #[error("row {line} of {table} has {got} fields, expected {expected}")]
    RowArity {
        table: &'static str,
        line: usize,
        expected: usize,
        got: usize,
    },

    /// A write operation targeted a key with no matching row.
    #[error("no {entity} row for key '{key}'")]
    NotFound { entity: &'static str, key: String },

    /// A query argument was rejected before execution.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
