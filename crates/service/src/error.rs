use core_types::CoreError;
use database::DbError;
use thiserror::Error;

/// The three distinguishable failure signals the facade exposes to callers:
/// a rejected argument (no store access attempted), a lookup that matched
/// nothing, and a store failure carrying its cause.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Project with ID={0} does not exist.")]
    NotFound(i32),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        ServiceError::InvalidArgument(err.to_string())
    }
}
