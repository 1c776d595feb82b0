//! Error conversion utilities between `AppError` and `tonic::Status`.
//!
//! | AppError | gRPC Status |
//! |----------|-------------|
//! | `BadRequest` | `INVALID_ARGUMENT` |
//! | `NotFound` | `NOT_FOUND` |
//! | `Conflict` | `ALREADY_EXISTS` |
//! | `InternalError` | `INTERNAL` |
//! | `ServiceUnavailable` | `UNAVAILABLE` |
//! | `DatabaseError` | `INTERNAL` |
//! | `ConfigError` | `INTERNAL` |

use tonic::Status;

use crate::error::AppError;

/// Extension trait for converting types into `tonic::Status`.
pub trait IntoStatus {
    /// Convert into a `tonic::Status`.
    fn into_status(self) -> Status;
}

impl IntoStatus for AppError {
    fn into_status(self) -> Status {
        match self {
            AppError::BadRequest(err) => Status::invalid_argument(err.to_string()),
            AppError::NotFound(err) => Status::not_found(err.to_string()),
            AppError::Conflict(err) => Status::already_exists(err.to_string()),
            AppError::InternalError(err) => {
                // Log the full error but don't expose it to clients
                tracing::error!(error = %err, "Internal error");
                Status::internal("Internal server error")
            }
            AppError::ServiceUnavailable => Status::unavailable("Service unavailable"),
            AppError::DatabaseError(err) => {
                tracing::error!(error = %err, "Database error");
                Status::internal("Database error")
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Configuration error");
                Status::internal("Configuration error")
            }
        }
    }
}

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        err.into_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_bad_request_maps_to_invalid_argument() {
        let err = AppError::BadRequest(anyhow::anyhow!("quantity must be at least 1"));
        assert_eq!(err.into_status().code(), Code::InvalidArgument);
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err = AppError::NotFound(anyhow::anyhow!("no such order"));
        assert_eq!(err.into_status().code(), Code::NotFound);
    }

    #[test]
    fn test_conflict_maps_to_already_exists() {
        let err = AppError::Conflict(anyhow::anyhow!("duplicate code"));
        assert_eq!(err.into_status().code(), Code::AlreadyExists);
    }

    #[test]
    fn test_internal_error_message_is_not_leaked() {
        let err = AppError::InternalError(anyhow::anyhow!("connection pool exhausted"));
        let status = err.into_status();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "Internal server error");
    }
}
