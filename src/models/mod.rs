use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered account owner. Identity provisioning proper lives with an
/// external provider; this record is what the ledger keeps about an owner.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone_number: String,
}

/// Company profile, at most one per owning user. Created lazily on the
/// first settings write.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Company {
    pub id: Uuid,
    pub user_id: String,
    pub company_name: String,
    pub address: String,
    pub contact_phone: String,
    pub registration_number: String,
    /// Default tax rate in percent, snapshotted onto invoices at creation.
    pub default_tax_rate: f64,
    /// Prefix for generated invoice numbers, e.g. "PF" -> "PF-001".
    pub invoice_prefix: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Invoice financial state.
///
/// All mutation funnels through `LedgerStore::update_invoice_status`, so a
/// stricter transition table has exactly one place to live. The current
/// policy is that any state may move to any other via explicit action; the
/// webhook reconciler only ever assigns the terminal `Paid`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Draft,
    Sent,
    #[serde(rename = "Payment Pending")]
    PaymentPending,
    Paid,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InvoiceLineItem {
    /// Identity is for list keys only; line items have no life outside
    /// their invoice.
    pub id: Uuid,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// `{prefix}-{seq:03}`, unique within its prefix, immutable once assigned.
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub line_items: Vec<InvoiceLineItem>,
    /// Percent rate captured at creation; later changes to the company
    /// default do not touch existing invoices.
    pub tax_rate_applied: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub receipt_url: String,
    pub date: NaiveDate,
}
