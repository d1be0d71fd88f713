use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    /// A referenced record (post, comment, parent) does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint rejected the write.
    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("connection lock poisoned")]
    Poisoned,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl DbError {
    /// Turn a unique-constraint failure into [`DbError::Conflict`], pass anything else through.
    pub(crate) fn unique(err: rusqlite::Error, what: &'static str) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DbError::Conflict(what)
            }
            other => DbError::Sqlite(other),
        }
    }
}
