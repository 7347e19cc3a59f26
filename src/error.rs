use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Image loading error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No such file or directory: {0}")]
    MissingInput(String),
}

pub type Result<T> = std::result::Result<T, DiffError>;
