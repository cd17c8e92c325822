use thiserror::Error;

#[derive(Debug, Error)]
pub enum DojoError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("no DefectDojo test type known for scan type: {0}")]
    Lookup(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unable to format timestamp: {0}")]
    Format(String),
}

impl From<time::error::Format> for DojoError {
    fn from(err: time::error::Format) -> Self {
        DojoError::Format(err.to_string())
    }
}
