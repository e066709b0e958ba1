use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Import error at record {record}: {message}")]
    Import { record: usize, message: String },
}

impl From<std::io::Error> for DbError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Sorts MongoDB driver failures into the crate's error variants.
pub(crate) fn convert_mongodb_error(err: mongodb::error::Error) -> DbError {
    use mongodb::error::ErrorKind;
    match err.kind.as_ref() {
        ErrorKind::Authentication { .. } => {
            DbError::Connection(format!("authentication failed: {err}"))
        }
        ErrorKind::ServerSelection { .. } | ErrorKind::DnsResolve { .. } => {
            DbError::Connection(err.to_string())
        }
        ErrorKind::InvalidArgument { .. } => DbError::QueryError(err.to_string()),
        _ => DbError::Store(err.to_string()),
    }
}

impl From<mongodb::error::Error> for DbError {
    fn from(err: mongodb::error::Error) -> Self {
        convert_mongodb_error(err)
    }
}
