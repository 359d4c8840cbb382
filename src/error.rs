use thiserror::Error;

/// Failures of the backing store. Never shown to HTTP clients verbatim.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("failed to encode tags: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("{context}: blocking task failed: {message}")]
    Blocking {
        context: &'static str,
        message: String,
    },

    #[error("store is closed")]
    Closed,

    #[error("store handle lock poisoned")]
    Poisoned,
}

/// Error taxonomy shared by the store, the services and the handlers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("date '{value}' is not valid: {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("tag is not valid: {0}")]
    InvalidTag(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Store,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Validation(_) | Error::InvalidDate { .. } | Error::InvalidTag(_) => {
                ErrorKind::Validation
            }
            Error::Store(_) => ErrorKind::Store,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    pub fn invalid_date(value: &str, reason: impl Into<String>) -> Self {
        Error::InvalidDate {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(StoreError::Query(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Store(StoreError::Pool(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(StoreError::Codec(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(Error::not_found("gone").kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::Validation(vec!["title: title is required".into()]).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::invalid_date("20231340", "no such month").kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::InvalidTag("empty".into()).kind(), ErrorKind::Validation);
        assert_eq!(Error::Store(StoreError::Closed).kind(), ErrorKind::Store);
    }

    #[test]
    fn sqlite_errors_become_store_errors() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Store(StoreError::Query(_))));
    }

    #[test]
    fn validation_display_joins_messages() {
        let err = Error::Validation(vec!["body: body is required".into(), "title: title is required".into()]);
        assert_eq!(
            err.to_string(),
            "validation failed: body: body is required; title: title is required"
        );
    }
}
