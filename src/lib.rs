pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use error::AppError;
use services::{init_metrics, LedgerStore, OrangeClient, OtpStore, PaymentIntentTracker};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ledger: LedgerStore,
    pub intents: PaymentIntentTracker,
    pub otp: OtpStore,
    pub orange: OrangeClient,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application: state, demo seed, and a bound listener
    /// (port 0 yields a random port for tests).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        init_metrics();

        let ledger = LedgerStore::new();
        if config.seed_demo_data {
            ledger.seed_demo().await?;
        }

        let orange = OrangeClient::new(config.orange.clone());
        if orange.is_configured() {
            tracing::info!("Orange gateway client initialized");
        } else {
            tracing::warn!("Orange credentials not configured - checkout will be unavailable");
        }

        let state = AppState {
            config: config.clone(),
            ledger,
            intents: PaymentIntentTracker::new(),
            otp: OtpStore::new(),
            orange,
        };

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(service = %config.service_name, "listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            // Registration (phone verification via the gateway)
            .route("/auth/register/initiate", post(handlers::auth::register_initiate))
            .route("/auth/register/complete", post(handlers::auth::register_complete))
            // Company profile / settings
            .route(
                "/company",
                get(handlers::company::get_company).patch(handlers::company::patch_company),
            )
            // Customers
            .route(
                "/customers",
                get(handlers::customers::list_customers).post(handlers::customers::create_customer),
            )
            .route(
                "/customers/:id",
                patch(handlers::customers::update_customer)
                    .delete(handlers::customers::delete_customer),
            )
            // Invoices
            .route(
                "/invoices",
                get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
            )
            .route(
                "/invoices/:id",
                get(handlers::invoices::get_invoice)
                    .patch(handlers::invoices::update_invoice)
                    .delete(handlers::invoices::delete_invoice),
            )
            .route("/invoices/:id/remind", post(handlers::invoices::remind))
            // Expenses
            .route(
                "/expenses",
                get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
            )
            // Reports
            .route("/reports/summary", get(handlers::reports::summary))
            // Payments
            .route("/payments/checkout", post(handlers::payments::checkout))
            .route("/webhooks/payment-gateway", post(handlers::webhooks::payment_gateway))
            .layer(CorsLayer::permissive())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }),
            )
            .with_state(state)
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        let router = Self::router(self.state);
        axum::serve(self.listener, router)
            .await
            .map_err(|e| AppError::InternalError(e.into()))?;
        Ok(())
    }
}
