//! Monetary computation for invoices.
//!
//! One computation site shared by invoice display, checkout, and the
//! dashboard aggregates, so the three can never disagree. Arithmetic is
//! plain f64 to match the amounts the gateway and the store carry; no
//! rounding happens here. Callers that display or transmit an amount
//! round with [`round2`] at that boundary.

use crate::models::InvoiceLineItem;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute subtotal, tax, and total for a set of line items at the given
/// percent tax rate. A missing rate means no tax.
pub fn invoice_totals(line_items: &[InvoiceLineItem], tax_rate_percent: Option<f64>) -> Totals {
    let subtotal: f64 = line_items
        .iter()
        .map(|li| li.quantity * li.unit_price)
        .sum();
    let tax = subtotal * (tax_rate_percent.unwrap_or(0.0) / 100.0);
    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
