use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub orange: OrangeConfig,
    /// Seed the ledger with the demo fixtures on startup.
    pub seed_demo_data: bool,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Orange Money carrier-billing gateway settings.
#[derive(Deserialize, Clone, Debug)]
pub struct OrangeConfig {
    pub api_key: String,
    pub api_secret: Secret<String>,
    /// OAuth client-credentials token endpoint.
    pub token_url: String,
    /// Carrier Billing checkout endpoint.
    pub checkout_url: String,
    /// Number Verification OTP endpoint, used during registration.
    pub verify_url: String,
    pub currency: String,
    /// Public base URL of this deployment; the webhook callback is derived
    /// from it.
    pub public_base_url: String,
}

impl OrangeConfig {
    /// Callback URL handed to the gateway on checkout.
    pub fn notify_url(&self) -> String {
        format!(
            "{}/webhooks/payment-gateway",
            self.public_base_url.trim_end_matches('/')
        )
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("PULAFLOW_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PULAFLOW_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let api_key = env::var("ORANGE_API_KEY").unwrap_or_default();
        let api_secret = env::var("ORANGE_API_SECRET").unwrap_or_default();
        let token_url = env::var("ORANGE_TOKEN_URL")
            .unwrap_or_else(|_| "https://api.orange.com/oauth/v3/token".to_string());
        let checkout_url = env::var("ORANGE_CHECKOUT_URL").unwrap_or_else(|_| {
            "https://api.orange.com/telephony/v3/carrierbilling/checkout".to_string()
        });
        let verify_url = env::var("ORANGE_VERIFY_URL").unwrap_or_else(|_| {
            "https://api.orange.com/telephony/v3/numberverification/otp".to_string()
        });
        let currency = env::var("PULAFLOW_CURRENCY").unwrap_or_else(|_| "BWP".to_string());
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let seed_demo_data = env::var("PULAFLOW_SEED_DEMO")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            server: ServerConfig { host, port },
            orange: OrangeConfig {
                api_key,
                api_secret: Secret::new(api_secret),
                token_url,
                checkout_url,
                verify_url,
                currency,
                public_base_url,
            },
            seed_demo_data,
            service_name: "pulaflow".to_string(),
        })
    }
}
