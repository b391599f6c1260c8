use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user {0} already exists")]
    Duplicate(String),
    #[error("user {0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}
