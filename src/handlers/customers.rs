use crate::dtos::{CreateCustomerRequest, CustomerPatch};
use crate::error::AppError;
use crate::middleware::OwnerContext;
use crate::models::Customer;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

pub async fn list_customers(
    State(state): State<AppState>,
    owner: OwnerContext,
) -> Result<Json<Vec<Customer>>, AppError> {
    let rows = state.ledger.list_customers(&owner.user_id).await?;
    Ok(Json(rows))
}

pub async fn create_customer(
    State(state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    payload.validate()?;

    let created = state.ledger.create_customer(&owner.user_id, payload).await?;
    tracing::info!(customer_id = %created.id, name = %created.name, "Customer created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerPatch>,
) -> Result<Json<Customer>, AppError> {
    payload.validate()?;

    let updated = state
        .ledger
        .update_customer(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;
    Ok(Json(updated))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ok = state.ledger.delete_customer(id).await?;
    if ok {
        tracing::info!(customer_id = %id, "Customer deleted; their invoices are now orphaned");
    }
    Ok(Json(json!({ "ok": ok })))
}
