//! Product model for procurement-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog product offered on purchase documents.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub hsn_code: String,
    pub unit_price: Decimal,
    /// Default discount offered when the product is picked on a form.
    pub discount_percent: Decimal,
    pub sku: String,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a product. The SKU is assigned by the store.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub hsn_code: String,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
}

/// Input for updating a product.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub hsn_code: Option<String>,
    pub unit_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub active: Option<bool>,
}
