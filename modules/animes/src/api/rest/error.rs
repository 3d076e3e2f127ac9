use api_errors::ApiError;

use crate::domain::error::DomainError;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::AnimeNotFound { .. } => ApiError::not_found(e.to_string()),
            DomainError::InvalidName { .. } | DomainError::Validation { .. } => {
                ApiError::invalid_input(e.to_string())
            }
            DomainError::Storage { .. } => ApiError::internal(e),
        }
    }
}
