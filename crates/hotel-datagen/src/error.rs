use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatagenError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("generation error: {0}")]
    Generation(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type DatagenResult<T> = Result<T, DatagenError>;
