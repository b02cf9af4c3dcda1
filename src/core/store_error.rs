use thiserror::Error;

/// Failure of the underlying storage engine.
///
/// Missing rows are never reported through this type: lookups return
/// `Option`, mutations return whether a row was affected.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}
