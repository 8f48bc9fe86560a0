use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Space {0} already has an open session")]
    SpaceOccupied(i32),

    #[error("Session {0} is already closed")]
    AlreadyClosed(i32),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("{entity} {id} is referenced by an open session")]
    ReferencedByOpenSession { entity: &'static str, id: i32 },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
