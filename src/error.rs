use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuneError {
    #[error("Unsupported model family: {0}")]
    UnsupportedFamily(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, TuneError>;
