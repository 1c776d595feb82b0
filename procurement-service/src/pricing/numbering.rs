//! Document number formatting.
//!
//! The back office uses three number schemes: `POINV-DD-MM-{1000+n}` for
//! purchase invoices, `SS-MM-YY-{serial}` for line SKUs, and
//! `PO-{epochMillis}` for order references. They are consolidated here as
//! one variant enum so every caller formats numbers the same way. Date
//! components and timestamps are supplied by the caller; nothing in this
//! module reads a clock.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Two-digit month/year pair used by the SKU scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthYear {
    /// Calendar month, 1-12.
    pub month: u32,
    /// Two-digit year, 0-99.
    pub year: u32,
}

impl MonthYear {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year().rem_euclid(100) as u32,
        }
    }
}

/// Generate the SKU for the line at `sequence_index` within a document.
///
/// The serial is the zero-based index plus one, zero-padded to four digits.
/// This is deterministic per `(date, index)` and does not promise global
/// uniqueness across documents.
pub fn generate_sku(sequence_index: usize, month_year: MonthYear) -> String {
    format!(
        "SS-{:02}-{:02}-{:04}",
        month_year.month,
        month_year.year,
        sequence_index + 1
    )
}

/// A formatted document number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentNumber {
    /// `POINV-DD-MM-{1000+sequence}` - the displayed purchase invoice number.
    PurchaseInvoice { day: u32, month: u32, sequence: u32 },
    /// `SS-MM-YY-{serial}` - line SKU.
    Sku {
        sequence_index: usize,
        month_year: MonthYear,
    },
    /// `PO-{epochMillis}` - order reference assigned at creation.
    OrderRef { epoch_millis: i64 },
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DocumentNumber::PurchaseInvoice {
                day,
                month,
                sequence,
            } => write!(f, "POINV-{:02}-{:02}-{}", day, month, 1000 + sequence),
            DocumentNumber::Sku {
                sequence_index,
                month_year,
            } => f.write_str(&generate_sku(sequence_index, month_year)),
            DocumentNumber::OrderRef { epoch_millis } => write!(f, "PO-{}", epoch_millis),
        }
    }
}
