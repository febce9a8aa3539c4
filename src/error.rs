use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at byte {position}: {message}")]
    Parse { message: String, position: usize },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("project error: {0}")]
    Project(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn parse(message: impl Into<String>, position: usize) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }
}
