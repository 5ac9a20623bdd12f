//! Registration with phone-number verification.
//!
//! Initiate stores the registration details under a fresh transaction id
//! and dispatches a one-time code through the gateway's number
//! verification API. Complete checks the submitted code, consumes the
//! record on first success, and writes the user to the ledger (the
//! original handed off to an external identity provider here).

use crate::dtos::{RegisterCompleteRequest, RegisterInitiateRequest, RegisterInitiateResponse};
use crate::error::AppError;
use crate::services::orange::GatewayError;
use crate::services::otp::PendingRegistration;
use crate::AppState;
use axum::{extract::State, Json};
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

/// Orange Botswana numbers: +2677 followed by seven digits.
fn is_orange_msisdn(phone: &str) -> bool {
    phone
        .strip_prefix("+2677")
        .is_some_and(|rest| rest.len() == 7 && rest.chars().all(|c| c.is_ascii_digit()))
}

fn random_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

pub async fn register_initiate(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInitiateRequest>,
) -> Result<Json<RegisterInitiateResponse>, AppError> {
    let (Some(email), Some(password), Some(phone)) =
        (payload.email, payload.password, payload.phone)
    else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing email, password, or phone"
        )));
    };

    if !is_orange_msisdn(&phone) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Phone must be an Orange Botswana number (+2677xxxxxxx)"
        )));
    }

    let access_token = state.orange.get_access_token().await.map_err(|e| match e {
        GatewayError::NotConfigured => AppError::ConfigError(e.into()),
        other => AppError::BadGateway(format!("Orange token error: {other}")),
    })?;

    let otp = random_otp();
    state
        .orange
        .send_verification_otp(&access_token, &phone, &otp)
        .await
        .map_err(|e| AppError::BadGateway(format!("Orange verification error: {e}")))?;

    let transaction_id = Uuid::new_v4().to_string();
    state.otp.put(
        &transaction_id,
        PendingRegistration {
            email,
            password,
            phone,
            otp,
        },
    );

    tracing::info!(transaction_id = %transaction_id, "Registration OTP dispatched");
    Ok(Json(RegisterInitiateResponse { transaction_id }))
}

pub async fn register_complete(
    State(state): State<AppState>,
    Json(payload): Json<RegisterCompleteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(transaction_id), Some(otp)) = (payload.transaction_id, payload.otp) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing transactionId or otp"
        )));
    };

    let record = state.otp.get(&transaction_id).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("OTP expired or invalid transaction"))
    })?;

    if otp.trim() != record.otp {
        return Err(AppError::Unauthorized(anyhow::anyhow!("Invalid OTP")));
    }

    // First successful use consumes the code; replays get the 400 above.
    state.otp.consume(&transaction_id);

    let user = state
        .ledger
        .create_user(&record.email, &record.password, &record.phone)
        .await?;
    tracing::info!(user_id = %user.id, "Registration completed");

    Ok(Json(json!({ "ok": true })))
}
