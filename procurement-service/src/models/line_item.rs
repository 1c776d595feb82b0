//! Line item model for procurement-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted line of a purchase document. Immutable once written; editing
/// a document replaces its lines wholesale. The columns are the flat row
/// the invoice/PDF renderers consume, already rounded to 2 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderLine {
    pub line_id: Uuid,
    pub order_id: Uuid,
    /// 1-based position within the document.
    pub line_no: i32,
    pub product_id: Uuid,
    pub product_name: String,
    pub hsn_code: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub line_total: Decimal,
    pub created_utc: DateTime<Utc>,
}
