//! Purchase document model for procurement-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of purchase document. All three share the pricing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Purchase,
    GoodsReceived,
    GoodsReturned,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "purchase",
            OrderKind::GoodsReceived => "goods_received",
            OrderKind::GoodsReturned => "goods_returned",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "goods_received" => OrderKind::GoodsReceived,
            "goods_returned" => OrderKind::GoodsReturned,
            _ => OrderKind::Purchase,
        }
    }
}

/// Workflow status of a purchase document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    InProgress,
    Complete,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Complete => "complete",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "in_progress" => OrderStatus::InProgress,
            "complete" => OrderStatus::Complete,
            _ => OrderStatus::New,
        }
    }
}

/// Payment state of a document. Always derived from amounts, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn for_amounts(grand_total: Decimal, amount_paid: Decimal) -> Self {
        if amount_paid < grand_total {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Paid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// Purchase document header. Summary fields are written by the pricing
/// engine at save time and are replaced wholesale whenever the lines
/// change; they are never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrder {
    pub order_id: Uuid,
    pub order_seq: i64,
    pub order_ref: String,
    pub invoice_no: String,
    pub kind: String,
    pub status: String,
    pub supplier_id: Uuid,
    pub branch_id: Uuid,
    pub tax_enabled: bool,
    pub tax_rate: Decimal,
    pub sub_total: Decimal,
    pub discount_total: Decimal,
    pub taxable_amount: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
    pub amount_paid: Decimal,
    pub credited_days: i32,
    pub credited_date: NaiveDate,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl PurchaseOrder {
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::for_amounts(self.grand_total, self.amount_paid)
    }
}

/// Input for creating a purchase document. Lines and the computed summary
/// travel separately (see `OrderRepository::save`).
#[derive(Debug, Clone)]
pub struct CreatePurchaseOrder {
    pub kind: OrderKind,
    pub supplier_id: Uuid,
    pub branch_id: Uuid,
    pub tax_enabled: bool,
    pub tax_rate: Decimal,
    pub amount_paid: Decimal,
    pub credited_days: i32,
    pub notes: Option<String>,
}

/// Filters for listing purchase documents.
#[derive(Debug, Clone, Default)]
pub struct ListOrdersFilter {
    pub kind: Option<OrderKind>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub page_size: i32,
    pub page_token: Option<Uuid>,
}
