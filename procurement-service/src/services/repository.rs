//! Order persistence abstraction.
//!
//! The gRPC layer depends on this trait rather than on a concrete store,
//! so the document workflow can be backed by Postgres in production and by
//! anything else a harness wants to inject. `Database` is the sole
//! implementation in this crate.

use async_trait::async_trait;
use rust_decimal::Decimal;
use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{CreatePurchaseOrder, ListOrdersFilter, OrderLine, PurchaseOrder};
use crate::pricing::{DocumentSummary, PricedLine};

/// Persistence seam for purchase documents.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new document with its engine-priced lines and summary.
    /// Assigns the durable sequence, order reference and invoice number.
    async fn save(
        &self,
        input: &CreatePurchaseOrder,
        lines: &[PricedLine],
        summary: &DocumentSummary,
    ) -> Result<(PurchaseOrder, Vec<OrderLine>), AppError>;

    /// Fetch a document and its lines.
    async fn get(&self, order_id: Uuid)
        -> Result<Option<(PurchaseOrder, Vec<OrderLine>)>, AppError>;

    /// List document headers matching the filter, cursor-paginated.
    async fn list(&self, filter: &ListOrdersFilter) -> Result<Vec<PurchaseOrder>, AppError>;

    /// Delete a document (lines cascade). Returns whether a row existed.
    async fn delete(&self, order_id: Uuid) -> Result<bool, AppError>;

    /// Add a payment against the document and return the updated header.
    async fn record_payment(
        &self,
        order_id: Uuid,
        amount: Decimal,
    ) -> Result<Option<PurchaseOrder>, AppError>;
}
