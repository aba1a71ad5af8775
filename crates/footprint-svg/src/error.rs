use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported draw type")]
    UnsupportedDraw,

    #[error("unsupported pad shape '{0}'")]
    UnsupportedPadShape(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
