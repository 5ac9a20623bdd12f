use crate::dtos::ReportSummaryResponse;
use crate::error::AppError;
use crate::middleware::OwnerContext;
use crate::models::InvoiceStatus;
use crate::services::totals::{invoice_totals, round2};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{Duration, Utc};

/// `GET /reports/summary` — dashboard aggregates.
///
/// Runs every invoice through the same totals computation as display and
/// checkout so the three sites can never disagree.
pub async fn summary(
    State(state): State<AppState>,
    owner: OwnerContext,
) -> Result<Json<ReportSummaryResponse>, AppError> {
    let today = Utc::now().date_naive();
    let cutoff = today - Duration::days(30);

    let mut outstanding = 0.0;
    let mut overdue = 0.0;
    let mut paid_30 = 0.0;

    for (invoice, _) in state.ledger.list_invoices(&owner.user_id).await? {
        let total = invoice_totals(&invoice.line_items, Some(invoice.tax_rate_applied)).total;
        if invoice.status != InvoiceStatus::Paid {
            outstanding += total;
            if invoice.due_date < today {
                overdue += total;
            }
        } else if invoice.issue_date >= cutoff {
            paid_30 += total;
        }
    }

    let expenses_30: f64 = state
        .ledger
        .list_expenses(&owner.user_id)
        .await?
        .iter()
        .filter(|e| e.date >= cutoff)
        .map(|e| e.amount)
        .sum();

    Ok(Json(ReportSummaryResponse {
        outstanding: round2(outstanding),
        overdue: round2(overdue),
        paid_last_30_days: round2(paid_30),
        expenses_last_30_days: round2(expenses_30),
        net_last_30_days: round2(paid_30 - expenses_30),
    }))
}
