//! Line-item pricing and document numbering.
//!
//! Everything in here is pure: no I/O, no clocks, no hidden counters. The
//! gRPC layer and the order-entry forms own all mutable state (the line
//! list, the tax toggle, the amount paid) and pass it in on every call.

pub mod engine;
pub mod numbering;

pub use engine::{
    compute_summary, price_line, remove_line, DocumentSummary, LineInput, PricedLine,
    PricingError, ProductRef,
};
pub use numbering::{generate_sku, DocumentNumber, MonthYear};
