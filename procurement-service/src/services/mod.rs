//! Services module for procurement-service.

pub mod database;
pub mod metrics;
pub mod repository;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
pub use repository::OrderRepository;
