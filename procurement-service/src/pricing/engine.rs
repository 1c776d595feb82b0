//! Pricing engine for purchase documents.
//!
//! Computes per-line discount and totals and the document-level summary
//! (subtotal, discount, tax, grand total, pending payment) for purchase
//! orders, goods-received and goods-returned documents. All monetary values
//! are rounded to 2 decimal places, half-up. Per-unit amounts are rounded
//! before multiplying by quantity, so summary totals are sums of
//! already-rounded line values.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::pricing::numbering::{generate_sku, MonthYear};

/// Validation failures raised when pricing a candidate line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(i32),

    #[error("invalid unit price {0}: must be greater than zero")]
    InvalidPrice(Decimal),

    #[error("invalid discount percent {0}: must be between 0 and 100")]
    InvalidDiscount(Decimal),

    #[error("line index {index} out of range for {len} line(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Product reference carried on a line. Opaque to the engine: master-data
/// validation is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: Uuid,
    pub name: String,
    pub hsn_code: String,
}

/// Candidate line as entered on an order form.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub product: ProductRef,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
}

/// A priced, immutable line. Editing a line means re-pricing a fresh input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product: ProductRef,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    /// Per-unit discount, rounded to 2 decimals.
    pub discount_amount: Decimal,
    /// `(unit_price - discount_amount) * quantity`, rounded to 2 decimals.
    pub line_total: Decimal,
}

/// Document-level totals. A pure projection of the line list and payment
/// state; recomputed on every call, never stored as the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub sub_total: Decimal,
    pub discount_total: Decimal,
    pub taxable_amount: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
    pub pending_payment: Decimal,
}

/// Round a monetary value to 2 decimal places, half-up.
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate and price a candidate line.
///
/// The SKU is derived from the line's position within the document and the
/// document date; appending the returned line to the document's list is the
/// caller's responsibility.
pub fn price_line(
    input: LineInput,
    sequence_index: usize,
    month_year: MonthYear,
) -> Result<PricedLine, PricingError> {
    if input.quantity < 1 {
        return Err(PricingError::InvalidQuantity(input.quantity));
    }
    if input.unit_price <= Decimal::ZERO {
        return Err(PricingError::InvalidPrice(input.unit_price));
    }
    if input.discount_percent < Decimal::ZERO || input.discount_percent > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidDiscount(input.discount_percent));
    }

    let unit_price = round_money(input.unit_price);
    let discount_amount = round_money(unit_price * input.discount_percent / Decimal::ONE_HUNDRED);
    let line_total = round_money((unit_price - discount_amount) * Decimal::from(input.quantity));
    let sku = generate_sku(sequence_index, month_year);

    Ok(PricedLine {
        product: input.product,
        sku,
        quantity: input.quantity,
        unit_price,
        discount_percent: input.discount_percent,
        discount_amount,
        line_total,
    })
}

/// Remove the line at `index`, returning the new list.
///
/// `IndexOutOfRange` indicates a stale index from the caller, not a
/// user-facing condition.
pub fn remove_line(lines: &[PricedLine], index: usize) -> Result<Vec<PricedLine>, PricingError> {
    if index >= lines.len() {
        return Err(PricingError::IndexOutOfRange {
            index,
            len: lines.len(),
        });
    }
    let mut out = lines.to_vec();
    out.remove(index);
    Ok(out)
}

/// Fold the line list into a document summary.
///
/// Never fails: an empty list yields all-zero totals. `tax_rate` is a
/// fraction (0.05 for 5%) and only applies when `tax_enabled` is set; the
/// tax base is the taxable amount (post-discount). A negative pending
/// payment means the document is overpaid and is reported as-is.
pub fn compute_summary(
    lines: &[PricedLine],
    tax_enabled: bool,
    tax_rate: Decimal,
    amount_paid: Decimal,
) -> DocumentSummary {
    let mut sub_total = Decimal::ZERO;
    let mut discount_total = Decimal::ZERO;

    for line in lines {
        let quantity = Decimal::from(line.quantity);
        sub_total += line.unit_price * quantity;
        discount_total += line.discount_amount * quantity;
    }

    let taxable_amount = sub_total - discount_total;
    let tax_total = if tax_enabled {
        round_money(taxable_amount * tax_rate)
    } else {
        Decimal::ZERO
    };
    let grand_total = taxable_amount + tax_total;
    let pending_payment = grand_total - amount_paid;

    DocumentSummary {
        sub_total,
        discount_total,
        taxable_amount,
        tax_total,
        grand_total,
        pending_payment,
    }
}
