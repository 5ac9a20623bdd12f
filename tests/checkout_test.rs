mod common;

use common::TestApp;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_token(app: &TestApp) {
    Mock::given(method("POST"))
        .and(path("/oauth/v3/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "test-token" })),
        )
        .mount(&app.gateway)
        .await;
}

async fn kalahari_invoice(app: &TestApp) -> String {
    app.patch("/company", &json!({ "default_tax_rate": 14.0, "invoice_prefix": "PF" }))
        .await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let invoice = app
        .create_invoice(
            customer["id"].as_str().unwrap(),
            json!({
                "line_items": [
                    { "description": "Consulting - Setup", "quantity": 1, "unit_price": 1500 },
                    { "description": "Support - Month 1", "quantity": 1, "unit_price": 600 }
                ]
            }),
        )
        .await;
    invoice["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn checkout_returns_a_transaction_id_and_leaves_the_invoice_draft() {
    let app = TestApp::spawn().await;
    mount_token(&app).await;
    Mock::given(method("POST"))
        .and(path("/carrierbilling/checkout"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PENDING" })))
        .mount(&app.gateway)
        .await;

    let invoice_id = kalahari_invoice(&app).await;
    let response = app
        .post("/payments/checkout", &json!({ "invoiceId": invoice_id }))
        .await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(!body["transactionId"].as_str().unwrap().is_empty());
    assert_eq!(body["gateway"]["status"], "PENDING");

    // Initiation never touches the invoice; only reconciliation does.
    let fetched: serde_json::Value = app
        .get(&format!("/invoices/{invoice_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["status"], "Draft");

    // The outbound call carried the rounded total, our correlation id, and
    // the webhook callback.
    let requests = app.gateway.received_requests().await.unwrap();
    let checkout_request = requests
        .iter()
        .find(|r| r.url.path() == "/carrierbilling/checkout")
        .expect("checkout call not received");
    let sent: serde_json::Value = serde_json::from_slice(&checkout_request.body).unwrap();
    assert_eq!(sent["transactionId"], body["transactionId"]);
    assert_eq!(sent["amount"], 2394.0);
    assert_eq!(sent["currency"], "BWP");
    assert_eq!(sent["msisdn"], "+26773000000");
    assert_eq!(sent["description"], "Invoice PF-001");
    assert_eq!(
        sent["notifyUrl"],
        "https://pulaflow.example/webhooks/payment-gateway"
    );
}

#[tokio::test]
async fn explicit_msisdn_overrides_the_customer_phone() {
    let app = TestApp::spawn().await;
    mount_token(&app).await;
    Mock::given(method("POST"))
        .and(path("/carrierbilling/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&app.gateway)
        .await;

    let invoice_id = kalahari_invoice(&app).await;
    let response = app
        .post(
            "/payments/checkout",
            &json!({ "invoiceId": invoice_id, "msisdn": "+26779999999" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let requests = app.gateway.received_requests().await.unwrap();
    let checkout_request = requests
        .iter()
        .find(|r| r.url.path() == "/carrierbilling/checkout")
        .unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&checkout_request.body).unwrap();
    assert_eq!(sent["msisdn"], "+26779999999");
}

#[tokio::test]
async fn missing_invoice_id_is_400() {
    let app = TestApp::spawn().await;

    let response = app.post("/payments/checkout", &json!({})).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn unknown_invoice_is_404() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/payments/checkout",
            &json!({ "invoiceId": uuid::Uuid::new_v4().to_string() }),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn gateway_rejection_surfaces_as_bad_gateway() {
    let app = TestApp::spawn().await;
    mount_token(&app).await;
    Mock::given(method("POST"))
        .and(path("/carrierbilling/checkout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("insufficient balance"))
        .mount(&app.gateway)
        .await;

    let invoice_id = kalahari_invoice(&app).await;
    let response = app
        .post("/payments/checkout", &json!({ "invoiceId": invoice_id }))
        .await;
    assert_eq!(response.status(), 502);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("insufficient balance"));
}

#[tokio::test]
async fn rejected_credentials_fail_the_whole_operation() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v3/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&app.gateway)
        .await;

    let invoice_id = kalahari_invoice(&app).await;
    let response = app
        .post("/payments/checkout", &json!({ "invoiceId": invoice_id }))
        .await;
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn unconfigured_credentials_are_a_server_misconfiguration() {
    let app = TestApp::spawn_with(|config| {
        config.orange.api_key = String::new();
    })
    .await;

    let invoice_id = kalahari_invoice(&app).await;
    let response = app
        .post("/payments/checkout", &json!({ "invoiceId": invoice_id }))
        .await;
    assert_eq!(response.status(), 500);
}
