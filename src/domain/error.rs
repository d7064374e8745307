use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Device error: {0}")]
    Device(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store has been destroyed")]
    Destroyed,
}

impl ClipError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ClipError::InvalidArgument(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, ClipError::Storage(_))
    }
}

impl From<rusqlite::Error> for ClipError {
    fn from(e: rusqlite::Error) -> Self {
        ClipError::Storage(format!("sqlite: {e}"))
    }
}

impl From<std::io::Error> for ClipError {
    fn from(e: std::io::Error) -> Self {
        ClipError::Storage(format!("io: {e}"))
    }
}
