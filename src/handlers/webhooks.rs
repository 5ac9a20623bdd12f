//! Reconciliation of asynchronous gateway payment notifications.

use crate::error::AppError;
use crate::models::InvoiceStatus;
use crate::services::metrics::record_webhook;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;

/// Gateway notification body. Different contracts name the correlation id
/// differently, so the known spellings are accepted as aliases.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayNotification {
    #[serde(alias = "orderId", alias = "txId")]
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<f64>,
    /// Gateway-side reference, logged for operator correlation.
    pub reference: Option<String>,
}

const SUCCESS_STATUSES: [&str; 3] = ["SUCCESS", "PAID", "COMPLETED"];

/// `POST /webhooks/payment-gateway` — resolve a gateway notification
/// against its payment intent and apply the resulting invoice transition.
///
/// Once the payload is structurally valid and the transaction is known,
/// the response is an acknowledgement whether or not anything changed —
/// otherwise the gateway would retry delivery forever. Re-delivery of a
/// success notification is a no-op to the same terminal state.
///
/// Payloads are trusted as-is; signature verification against a gateway
/// shared secret is required hardening before any real deployment.
pub async fn payment_gateway(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>, AppError> {
    let payload: GatewayNotification = serde_json::from_str(&body).map_err(|_| {
        record_webhook("invalid_payload");
        AppError::BadRequest(anyhow::anyhow!("Invalid JSON"))
    })?;

    let transaction_id = payload.transaction_id.as_deref().ok_or_else(|| {
        record_webhook("missing_correlation_id");
        AppError::BadRequest(anyhow::anyhow!("Missing transaction identifier"))
    })?;

    let intent = state.intents.lookup(transaction_id).ok_or_else(|| {
        record_webhook("unknown_transaction");
        // Not necessarily a client error: the notification may simply have
        // arrived after the intent's 30-minute window.
        tracing::warn!(transaction_id, "Webhook for unknown or expired transaction");
        AppError::NotFound(anyhow::anyhow!("Unknown transaction"))
    })?;

    if let Some(reported) = payload.amount {
        if (reported - intent.amount).abs() > 0.005 {
            tracing::warn!(
                transaction_id,
                expected = intent.amount,
                reported,
                "Webhook amount differs from the registered intent"
            );
        }
    }

    let status = payload.status.as_deref().unwrap_or("").to_uppercase();
    if SUCCESS_STATUSES.contains(&status.as_str()) {
        match state
            .ledger
            .update_invoice_status(intent.invoice_id, InvoiceStatus::Paid)
            .await?
        {
            Some(invoice) => {
                record_webhook("applied");
                tracing::info!(
                    transaction_id,
                    invoice_number = %invoice.invoice_number,
                    reference = payload.reference.as_deref().unwrap_or("-"),
                    "Payment confirmed; invoice marked Paid"
                );
            }
            None => {
                // The invoice was deleted while the payment was in flight.
                // The transaction itself resolved, so still acknowledge.
                record_webhook("invoice_missing");
                tracing::warn!(
                    transaction_id,
                    invoice_id = %intent.invoice_id,
                    "Payment confirmed but the invoice no longer exists"
                );
            }
        }
    } else {
        // Failure and unrecognized statuses are acknowledged without
        // touching the invoice.
        record_webhook("ignored_status");
        tracing::info!(
            transaction_id,
            status = %status,
            "Webhook acknowledged without invoice mutation"
        );
    }

    Ok(Json(json!({ "ok": true })))
}
