/// Error types for the annotation core.

#[derive(Debug)]
pub enum AppError {
    ImageDecode(String),
    Detector(String),
    Persistence(String),
    Config(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ImageDecode(msg) => write!(f, "Image decode error: {msg}"),
            AppError::Detector(msg) => write!(f, "Detector error: {msg}"),
            AppError::Persistence(msg) => write!(f, "Persistence error: {msg}"),
            AppError::Config(msg) => write!(f, "Config error: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {err}"))
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => AppError::ImageDecode(e.to_string()),
            image::ImageError::Unsupported(e) => AppError::ImageDecode(e.to_string()),
            other => AppError::Internal(format!("Image error: {other}")),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Join error: {err}"))
    }
}
