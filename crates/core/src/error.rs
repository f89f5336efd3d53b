use thiserror::Error;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid proportions: {0}")]
    InvalidProportions(String),

    #[error("Frame must contain exactly one Background item, found {found}")]
    MissingOrDuplicateBackground { found: usize },

    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("Invalid padding: {0}")]
    InvalidPadding(f64),

    #[error("Invalid policy table: {0}")]
    InvalidPolicy(String),

    #[error("Invalid band index {0}, expected 1, 2 or 3")]
    InvalidBand(u8),

    #[error("Element {index} has no candidate positions")]
    EmptyCandidates { index: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for LayoutError {
    fn from(err: config::ConfigError) -> Self {
        LayoutError::Config(err.to_string())
    }
}
