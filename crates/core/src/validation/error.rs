use thiserror::Error;

use crate::storage::RepositoryError;

/// Reasons a validation chain can stop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Invalid {field} format")]
    InvalidId { field: String },
    #[error("Pet not found or does not belong to this user")]
    PetNotFound,
    #[error("Veterinarian not found")]
    VeterinarianNotFound,
    #[error("Veterinarian is not approved")]
    VeterinarianNotApproved,
    #[error("Invalid date in {field}")]
    InvalidDate { field: String },
    #[error("{field} must be in the future")]
    DateNotInFuture { field: String },
    #[error("Invalid time in {field}, expected HH:MM")]
    InvalidTime { field: String },
    /// A lookup needed by a validator failed in the store itself.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl ValidationError {
    /// HTTP status a controller should answer with.
    ///
    /// Validation failures are client errors; store failures keep the
    /// repository's own mapping.
    pub fn status_code(&self) -> u16 {
        match self {
            ValidationError::Storage(err) => err.status_code(),
            _ => 400,
        }
    }
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_every_field() {
        let error = ValidationError::MissingFields(vec!["petId".to_string(), "time".to_string()]);
        assert_eq!(error.to_string(), "Missing required fields: petId, time");
    }

    #[test]
    fn test_validation_failures_are_bad_requests() {
        assert_eq!(ValidationError::PetNotFound.status_code(), 400);
        assert_eq!(
            ValidationError::InvalidTime {
                field: "time".to_string()
            }
            .status_code(),
            400
        );
    }

    #[test]
    fn test_storage_failures_keep_repository_status() {
        let error: ValidationError = RepositoryError::ConnectionFailed("down".to_string()).into();
        assert_eq!(error.status_code(), 503);
        assert_eq!(error.to_string(), "Connection failed: down");
    }
}
