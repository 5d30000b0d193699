//! Document store error types.

/// Errors that can occur when querying a document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or refused the query
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document or data file could not be decoded
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Reading a data file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
