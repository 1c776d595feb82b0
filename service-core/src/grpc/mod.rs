//! gRPC utilities shared across the back-office services.
//!
//! Provides error conversion between `AppError` and `tonic::Status`.

pub mod error;

pub use error::IntoStatus;

// Re-export commonly used tonic types
pub use tonic::{Code, Request, Response, Status};
