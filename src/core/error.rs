use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn configuration(message: String) -> Self {
        Self::Configuration(message)
    }

    pub fn upstream(message: String) -> Self {
        Self::Upstream(message)
    }

    pub fn decode(message: String) -> Self {
        Self::Decode(message)
    }

    pub fn internal(message: String) -> Self {
        Self::Internal(message)
    }
}
