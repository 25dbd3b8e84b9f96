use thiserror::Error;

/// Errors raised by repositories and the document store behind them.
///
/// Repositories never translate these into something friendlier; callers
/// decide how to present them (see [`RepositoryError::status_code`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity_type: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Maps the error to the HTTP status a controller should answer with.
    ///
    /// - `NotFound` -> 404
    /// - `AlreadyExists` -> 409
    /// - `ConnectionFailed` -> 503
    /// - `QueryFailed`, `Serialization` -> 500
    /// - `InvalidData` -> 400
    pub fn status_code(&self) -> u16 {
        match self {
            RepositoryError::NotFound { .. } => 404,
            RepositoryError::AlreadyExists { .. } => 409,
            RepositoryError::ConnectionFailed(_) => 503,
            RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => 500,
            RepositoryError::InvalidData(_) => 400,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
