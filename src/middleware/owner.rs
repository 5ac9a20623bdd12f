//! Owner attribution for requests.
//!
//! Authentication proper lives with an external identity provider; this
//! service only needs to know which owner a request acts for. The owner id
//! arrives in the `X-User-ID` header, and absent one the request is
//! attributed to the demo owner — matching the demo-grade single-user
//! behavior of the original application.

use crate::error::AppError;
use crate::services::ledger::DEMO_USER_ID;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

#[derive(Debug, Clone)]
pub struct OwnerContext {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for OwnerContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEMO_USER_ID)
            .to_string();

        Ok(OwnerContext { user_id })
    }
}
