use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Calculator is in read-only mode for record {0}")]
    ReadOnly(String),

    #[error("Expense item '{id}' not found in {list} list")]
    ItemNotFound { list: String, id: String },

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("At least one saved record is required to generate insights")]
    EmptyHistory,

    #[error("Store request failed: {0}")]
    Store(String),

    #[error("Insight generation failed: {0}")]
    Insight(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(any(feature = "gemini", feature = "supabase"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
