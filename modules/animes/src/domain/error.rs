use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Anime not found: {id}")]
    AnimeNotFound { id: i32 },

    #[error("Invalid name: anime at position {position} has a blank name")]
    InvalidName { position: usize, id: Option<i32> },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn anime_not_found(id: i32) -> Self {
        Self::AnimeNotFound { id }
    }

    pub fn invalid_name(position: usize, id: Option<i32>) -> Self {
        Self::InvalidName { position, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
