use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store error {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Todo has no id yet")]
    NotPersisted,

    #[error("No task selected")]
    NoActiveRecord,

    #[error("No row {0}")]
    NoSuchRow(usize),

    #[error("Another change is still in progress")]
    Busy,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
