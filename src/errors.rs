use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlimsGraphError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("snapshot error: {0}")]
    Snapshot(String),
    #[error("attachment error: {0}")]
    Attachment(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SlimsGraphError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SlimsGraphError::Validation(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        SlimsGraphError::Store(msg.into())
    }

    pub fn snapshot<T: Into<String>>(msg: T) -> Self {
        SlimsGraphError::Snapshot(msg.into())
    }

    pub fn attachment<T: Into<String>>(msg: T) -> Self {
        SlimsGraphError::Attachment(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        SlimsGraphError::InvalidInput(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SlimsGraphError::Serialization(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SlimsGraphError::Validation(_))
    }
}
