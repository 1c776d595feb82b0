//! Supplier model for procurement-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Supplier master record, with the contact and banking details the
/// settings screen captures.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub supplier_id: Uuid,
    pub code: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub door_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gst_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc: Option<String>,
    pub upi: Option<String>,
    pub payment_terms: Option<String>,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplier {
    pub code: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub door_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gst_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc: Option<String>,
    pub upi: Option<String>,
    pub payment_terms: Option<String>,
}

/// Input for updating a supplier.
#[derive(Debug, Clone, Default)]
pub struct UpdateSupplier {
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub door_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gst_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc: Option<String>,
    pub upi: Option<String>,
    pub payment_terms: Option<String>,
    pub active: Option<bool>,
}
