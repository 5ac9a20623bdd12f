//! Request and response shapes for the HTTP surface.
//!
//! CRUD bodies use snake_case like the stored records; the payment and
//! registration endpoints speak the gateway-facing camelCase of the
//! original API.

use crate::models::{Customer, Invoice, InvoiceStatus};
use crate::services::totals::Totals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct CompanyPatch {
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub contact_phone: Option<String>,
    pub registration_number: Option<String>,
    #[validate(range(min = 0.0, message = "tax rate must not be negative"))]
    pub default_tax_rate: Option<f64>,
    #[validate(length(min = 1, message = "invoice prefix must not be empty"))]
    pub invoice_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LineItemInput {
    pub description: String,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: f64,
    #[validate(range(min = 0.0, message = "unit price must not be negative"))]
    pub unit_price: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub customer_id: Uuid,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    #[validate(nested)]
    pub line_items: Vec<LineItemInput>,
    /// Defaults to the company's current rate when omitted; the chosen rate
    /// is snapshotted onto the invoice.
    #[validate(range(min = 0.0))]
    pub tax_rate_applied: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct InvoicePatch {
    pub status: Option<InvoiceStatus>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[validate(nested)]
    pub line_items: Option<Vec<LineItemInput>>,
    #[validate(range(min = 0.0))]
    pub tax_rate_applied: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    pub category: Option<String>,
    pub receipt_url: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Invoice as served to clients: the record, its customer (which may be
/// gone — deleting a customer orphans their invoices), and the computed
/// totals so every display agrees with checkout.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub customer: Option<Customer>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, customer: Option<Customer>, totals: Totals) -> Self {
        Self {
            invoice,
            customer,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub invoice_id: Option<Uuid>,
    pub msisdn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub ok: bool,
    pub transaction_id: String,
    /// Raw gateway response, passed through for user-facing display.
    pub gateway: serde_json::Value,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterInitiateRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInitiateResponse {
    pub transaction_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompleteRequest {
    pub transaction_id: Option<String>,
    pub otp: Option<String>,
}

/// Dashboard aggregates, all computed through the shared totals module.
#[derive(Debug, Serialize)]
pub struct ReportSummaryResponse {
    pub outstanding: f64,
    pub overdue: f64,
    pub paid_last_30_days: f64,
    pub expenses_last_30_days: f64,
    pub net_last_30_days: f64,
}
