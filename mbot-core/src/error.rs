use thiserror::Error;

#[derive(Error, Debug)]
pub enum MbotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Live connection closed: {0}")]
    ConnectionClosed(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),
}

impl From<serde_json::Error> for MbotError {
    fn from(e: serde_json::Error) -> Self {
        MbotError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MbotError>;
