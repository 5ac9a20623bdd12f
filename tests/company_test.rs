mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn company_is_null_until_first_settings_write() {
    let app = TestApp::spawn().await;

    let body: serde_json::Value = app.get("/company").await.json().await.unwrap();
    assert!(body.is_null());

    let response = app
        .patch("/company", &json!({ "company_name": "Gaborone Tools" }))
        .await;
    assert_eq!(response.status(), 200);
    let company: serde_json::Value = response.json().await.unwrap();
    assert_eq!(company["company_name"], "Gaborone Tools");
    assert_eq!(company["invoice_prefix"], "INV");
    assert_eq!(company["default_tax_rate"], 0.0);

    let body: serde_json::Value = app.get("/company").await.json().await.unwrap();
    assert_eq!(body["company_name"], "Gaborone Tools");
}

#[tokio::test]
async fn patch_only_touches_the_given_fields() {
    let app = TestApp::spawn().await;
    app.patch(
        "/company",
        &json!({ "company_name": "Gaborone Tools", "default_tax_rate": 14.0 }),
    )
    .await;

    let company: serde_json::Value = app
        .patch("/company", &json!({ "invoice_prefix": "GT" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(company["company_name"], "Gaborone Tools");
    assert_eq!(company["default_tax_rate"], 14.0);
    assert_eq!(company["invoice_prefix"], "GT");
}

#[tokio::test]
async fn negative_tax_rate_and_empty_prefix_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .patch("/company", &json!({ "default_tax_rate": -5.0 }))
        .await;
    assert_eq!(response.status(), 422);

    let response = app.patch("/company", &json!({ "invoice_prefix": "" })).await;
    assert_eq!(response.status(), 422);
}
