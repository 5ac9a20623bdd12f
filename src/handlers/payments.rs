//! Checkout initiation against the carrier-billing gateway.

use crate::dtos::{CheckoutRequest, CheckoutResponse};
use crate::error::AppError;
use crate::services::intents::PaymentIntent;
use crate::services::metrics::record_checkout;
use crate::services::orange::{CheckoutCall, GatewayError};
use crate::services::totals::{invoice_totals, round2};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use uuid::Uuid;

/// `POST /payments/checkout` — start a carrier-billing checkout for an
/// invoice.
///
/// The payment intent is registered before the outbound call so a webhook
/// racing ahead of the HTTP response can still be resolved. The invoice
/// itself is not touched here; its status only changes on reconciliation.
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let invoice_id = payload
        .invoice_id
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("invoiceId is required")))?;

    let (invoice, customer) = state
        .ledger
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    let totals = invoice_totals(&invoice.line_items, Some(invoice.tax_rate_applied));
    let amount = round2(totals.total);

    let access_token = state.orange.get_access_token().await.map_err(|e| {
        record_checkout("auth_error");
        tracing::error!(error = %e, "Gateway credential fetch failed");
        match e {
            GatewayError::NotConfigured => AppError::ConfigError(e.into()),
            other => AppError::InternalError(other.into()),
        }
    })?;

    let transaction_id = Uuid::new_v4().to_string();
    let msisdn = payload
        .msisdn
        .or_else(|| customer.as_ref().map(|c| c.phone_number.clone()))
        .filter(|p| !p.is_empty());

    // Correlation must exist before the remote call; the gateway may
    // notify us before this request returns.
    state.intents.register(
        &transaction_id,
        PaymentIntent {
            invoice_id: invoice.id,
            amount,
            msisdn: msisdn.clone(),
            created_at: Utc::now(),
        },
    );

    let call = CheckoutCall {
        transaction_id: transaction_id.clone(),
        amount,
        currency: state.config.orange.currency.clone(),
        msisdn,
        description: format!("Invoice {}", invoice.invoice_number),
        notify_url: state.config.orange.notify_url(),
    };

    let gateway = state
        .orange
        .checkout(&access_token, &call)
        .await
        .map_err(|e| {
            record_checkout("gateway_error");
            tracing::error!(
                transaction_id = %transaction_id,
                error = %e,
                "Gateway checkout failed; intent left to expire unused"
            );
            AppError::BadGateway(format!("Orange checkout error: {e}"))
        })?;

    record_checkout("initiated");
    tracing::info!(
        transaction_id = %transaction_id,
        invoice_number = %invoice.invoice_number,
        amount,
        "Checkout initiated"
    );

    Ok(Json(CheckoutResponse {
        ok: true,
        transaction_id,
        gateway,
        message: "If prompted, approve the Orange Money request on your phone.".to_string(),
    }))
}
