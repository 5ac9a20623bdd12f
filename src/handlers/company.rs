use crate::dtos::CompanyPatch;
use crate::error::AppError;
use crate::middleware::OwnerContext;
use crate::models::Company;
use crate::AppState;
use axum::{extract::State, Json};
use validator::Validate;

pub async fn get_company(
    State(state): State<AppState>,
    owner: OwnerContext,
) -> Result<Json<Option<Company>>, AppError> {
    let company = state.ledger.get_company(&owner.user_id).await?;
    Ok(Json(company))
}

/// Partial settings update; the company record is created on the first
/// write.
pub async fn patch_company(
    State(state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<CompanyPatch>,
) -> Result<Json<Company>, AppError> {
    payload.validate()?;

    let company = state.ledger.patch_company(&owner.user_id, payload).await?;
    tracing::info!(
        company_id = %company.id,
        invoice_prefix = %company.invoice_prefix,
        "Company profile updated"
    );
    Ok(Json(company))
}
