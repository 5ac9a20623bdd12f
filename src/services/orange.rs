//! Orange Money carrier-billing gateway client.
//!
//! Two-step flow: an OAuth client-credentials token fetch, then the
//! checkout call with our transaction id as the correlation key. The same
//! token flow also backs the number-verification OTP dispatch used during
//! registration.

use crate::config::OrangeConfig;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Orange API credentials are not configured")]
    NotConfigured,
    /// Credential fetch was rejected or unreachable.
    #[error("Orange token error: {0}")]
    Auth(String),
    /// The checkout call itself failed.
    #[error("Orange checkout error: {0}")]
    Checkout(String),
    /// The number-verification call failed.
    #[error("Orange verification error: {0}")]
    Verification(String),
}

/// Checkout request body, in the gateway's camelCase wire shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCall {
    /// Our correlation id; it comes back on the webhook.
    pub transaction_id: String,
    /// Rounded to two decimals before transmission.
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    pub description: String,
    pub notify_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct OrangeClient {
    client: Client,
    config: OrangeConfig,
}

impl OrangeClient {
    pub fn new(config: OrangeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty() && !self.config.api_secret.expose_secret().is_empty()
    }

    /// Fetch a bearer token via the client-credentials grant.
    pub async fn get_access_token(&self) -> Result<String, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.api_key, Some(self.config.api_secret.expose_secret()))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| GatewayError::Auth(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Auth(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Orange token request rejected");
            return Err(GatewayError::Auth(body));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Auth(e.to_string()))?;
        Ok(token.access_token)
    }

    /// Issue the carrier-billing checkout call. Returns the raw gateway
    /// response body for user-facing display; some contracts return a
    /// payment URL, others push an approval prompt to the payer's phone.
    pub async fn checkout(
        &self,
        access_token: &str,
        call: &CheckoutCall,
    ) -> Result<serde_json::Value, GatewayError> {
        tracing::info!(
            transaction_id = %call.transaction_id,
            amount = call.amount,
            currency = %call.currency,
            "Calling Orange carrier-billing checkout"
        );

        let response = self
            .client
            .post(&self.config.checkout_url)
            .bearer_auth(access_token)
            .json(call)
            .send()
            .await
            .map_err(|e| GatewayError::Checkout(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Checkout(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Orange checkout rejected");
            return Err(GatewayError::Checkout(body));
        }

        // Not every contract returns JSON on success.
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| serde_json::json!({})))
    }

    /// Dispatch a one-time code over the gateway's number-verification API.
    pub async fn send_verification_otp(
        &self,
        access_token: &str,
        msisdn: &str,
        otp: &str,
    ) -> Result<(), GatewayError> {
        let payload = serde_json::json!({
            "msisdn": msisdn,
            "pin": otp,
            "message": format!("Your PulaFlow OTP is {otp}"),
        });

        let response = self
            .client
            .post(&self.config.verify_url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Verification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Orange OTP dispatch rejected");
            return Err(GatewayError::Verification(body));
        }
        Ok(())
    }
}
