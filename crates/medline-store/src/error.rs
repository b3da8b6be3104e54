use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("migration error: {0}")]
    Migration(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl medline_core::Retryable for Error {
    fn is_retryable(&self) -> bool {
        matches!(self, Error::Pool(_))
    }
}
