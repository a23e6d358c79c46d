use thiserror::Error;

/// Every way a trivia operation can fail.
#[derive(Debug, Error)]
pub enum TriviaError {
    /// The request itself is malformed.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Nothing matched where something was expected.
    #[error("not found: {0}")]
    NotFound(String),
    /// A mutation was rejected by validation or by the store.
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
}

pub type TriviaResult<T> = Result<T, TriviaError>;
