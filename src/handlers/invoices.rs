use crate::dtos::{CreateInvoiceRequest, InvoicePatch, InvoiceResponse};
use crate::error::AppError;
use crate::middleware::OwnerContext;
use crate::models::Invoice;
use crate::services::totals::invoice_totals;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

fn with_totals(invoice: Invoice, customer: Option<crate::models::Customer>) -> InvoiceResponse {
    let totals = invoice_totals(&invoice.line_items, Some(invoice.tax_rate_applied));
    InvoiceResponse::new(invoice, customer, totals)
}

pub async fn list_invoices(
    State(state): State<AppState>,
    owner: OwnerContext,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let rows = state.ledger.list_invoices(&owner.user_id).await?;
    let rows = rows
        .into_iter()
        .map(|(invoice, customer)| with_totals(invoice, customer))
        .collect();
    Ok(Json(rows))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let (invoice, customer) = state
        .ledger
        .get_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;
    Ok(Json(with_totals(invoice, customer)))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    payload.validate()?;

    let created = state.ledger.create_invoice(&owner.user_id, payload).await?;
    tracing::info!(
        invoice_id = %created.id,
        invoice_number = %created.invoice_number,
        "Invoice created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvoicePatch>,
) -> Result<Json<Invoice>, AppError> {
    payload.validate()?;

    let updated = state
        .ledger
        .update_invoice(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;
    Ok(Json(updated))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ok = state.ledger.delete_invoice(id).await?;
    Ok(Json(json!({ "ok": ok })))
}

/// Log a payment reminder dispatch. Actual delivery (SMS/email) is an
/// external collaborator to be wired in later.
pub async fn remind(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (invoice, customer) = state
        .ledger
        .get_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    tracing::info!(
        invoice_number = %invoice.invoice_number,
        customer_email = customer.as_ref().map(|c| c.email.as_str()).unwrap_or("-"),
        "Reminder dispatched"
    );
    Ok(Json(json!({ "ok": true })))
}
