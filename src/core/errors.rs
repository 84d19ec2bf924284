use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanjiGridError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HJson error: {0}")]
    HJson(#[from] serde_hjson::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Image error: {0}")]
    Image(Box<image::ImageError>),

    #[error("Invalid grouping selector: group {index} requested but only {available} defined")]
    InvalidGroupSelector { index: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("AnkiConnect error: {0}")]
    AnkiConnect(String),

    #[error("KanjiGridError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for KanjiGridError {
    fn from(error: std::io::Error) -> Self {
        KanjiGridError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for KanjiGridError {
    fn from(error: reqwest::Error) -> Self {
        KanjiGridError::Reqwest(Box::new(error))
    }
}

impl From<image::ImageError> for KanjiGridError {
    fn from(error: image::ImageError) -> Self {
        KanjiGridError::Image(Box::new(error))
    }
}
