use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown constant value: {0}")]
    Lookup(i64),

    #[error("Attribute `{0}` is not translatable")]
    InvalidField(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Could not decode image source")]
    Decode,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
