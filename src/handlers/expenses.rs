use crate::dtos::CreateExpenseRequest;
use crate::error::AppError;
use crate::middleware::OwnerContext;
use crate::models::Expense;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

pub async fn list_expenses(
    State(state): State<AppState>,
    owner: OwnerContext,
) -> Result<Json<Vec<Expense>>, AppError> {
    let rows = state.ledger.list_expenses(&owner.user_id).await?;
    Ok(Json(rows))
}

pub async fn create_expense(
    State(state): State<AppState>,
    owner: OwnerContext,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    payload.validate()?;

    let created = state.ledger.create_expense(&owner.user_id, payload).await?;
    tracing::info!(
        expense_id = %created.id,
        amount = created.amount,
        category = %created.category,
        "Expense recorded"
    );
    Ok((StatusCode::CREATED, Json(created)))
}
