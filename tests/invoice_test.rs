mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn invoice_numbers_follow_the_company_prefix() {
    let app = TestApp::spawn().await;
    app.patch("/company", &json!({ "invoice_prefix": "PF" })).await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let customer_id = customer["id"].as_str().unwrap();

    let first = app.create_invoice(customer_id, json!({})).await;
    let second = app.create_invoice(customer_id, json!({})).await;

    assert_eq!(first["invoice_number"], "PF-001");
    assert_eq!(second["invoice_number"], "PF-002");
    assert_eq!(first["status"], "Draft");
}

#[tokio::test]
async fn prefix_change_restarts_the_sequence() {
    let app = TestApp::spawn().await;
    app.patch("/company", &json!({ "invoice_prefix": "PF" })).await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let customer_id = customer["id"].as_str().unwrap();
    app.create_invoice(customer_id, json!({})).await;

    app.patch("/company", &json!({ "invoice_prefix": "ACME" })).await;
    let restarted = app.create_invoice(customer_id, json!({})).await;
    assert_eq!(restarted["invoice_number"], "ACME-001");
}

#[tokio::test]
async fn invoice_response_carries_consistent_totals() {
    let app = TestApp::spawn().await;
    app.patch("/company", &json!({ "default_tax_rate": 14.0, "invoice_prefix": "PF" }))
        .await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let customer_id = customer["id"].as_str().unwrap();

    let invoice = app
        .create_invoice(
            customer_id,
            json!({
                "line_items": [
                    { "description": "Consulting - Setup", "quantity": 1, "unit_price": 1500 },
                    { "description": "Support - Month 1", "quantity": 1, "unit_price": 600 }
                ]
            }),
        )
        .await;
    assert_eq!(invoice["tax_rate_applied"], 14.0);

    let id = invoice["id"].as_str().unwrap();
    let fetched: serde_json::Value =
        app.get(&format!("/invoices/{id}")).await.json().await.unwrap();
    assert_eq!(fetched["subtotal"], 2100.0);
    assert!((fetched["tax"].as_f64().unwrap() - 294.0).abs() < 1e-9);
    assert!((fetched["total"].as_f64().unwrap() - 2394.0).abs() < 1e-9);
    assert_eq!(fetched["customer"]["name"], "Kalahari Supplies");
}

#[tokio::test]
async fn status_can_be_changed_by_explicit_action() {
    let app = TestApp::spawn().await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let invoice = app
        .create_invoice(customer["id"].as_str().unwrap(), json!({}))
        .await;
    let id = invoice["id"].as_str().unwrap();

    for status in ["Sent", "Payment Pending", "Paid", "Draft"] {
        let response = app
            .patch(&format!("/invoices/{id}"), &json!({ "status": status }))
            .await;
        assert_eq!(response.status(), 200);
        let updated: serde_json::Value = response.json().await.unwrap();
        assert_eq!(updated["status"], status);
    }
}

#[tokio::test]
async fn negative_quantities_are_rejected() {
    let app = TestApp::spawn().await;
    let customer = app.create_customer("Kalahari Supplies").await;

    let response = app
        .post(
            "/invoices",
            &json!({
                "customer_id": customer["id"],
                "issue_date": "2026-08-01",
                "due_date": "2026-08-08",
                "line_items": [
                    { "description": "Refund?", "quantity": -1, "unit_price": 100 }
                ]
            }),
        )
        .await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn deleting_a_customer_orphans_their_invoices() {
    let app = TestApp::spawn().await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let customer_id = customer["id"].as_str().unwrap().to_string();
    let invoice = app.create_invoice(&customer_id, json!({})).await;
    let invoice_id = invoice["id"].as_str().unwrap();

    app.delete(&format!("/customers/{customer_id}")).await;

    // Out of the owner-scoped listing, still fetchable by id without a
    // customer join.
    let listed: Vec<serde_json::Value> = app.get("/invoices").await.json().await.unwrap();
    assert!(listed.is_empty());
    let fetched: serde_json::Value = app
        .get(&format!("/invoices/{invoice_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert!(fetched["customer"].is_null());
}

#[tokio::test]
async fn remind_logs_and_acknowledges() {
    let app = TestApp::spawn().await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let invoice = app
        .create_invoice(customer["id"].as_str().unwrap(), json!({}))
        .await;

    let response = app
        .post(
            &format!("/invoices/{}/remind", invoice["id"].as_str().unwrap()),
            &json!({}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);

    let response = app
        .post(&format!("/invoices/{}/remind", uuid::Uuid::new_v4()), &json!({}))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn deleted_invoice_is_gone() {
    let app = TestApp::spawn().await;
    let customer = app.create_customer("Kalahari Supplies").await;
    let invoice = app
        .create_invoice(customer["id"].as_str().unwrap(), json!({}))
        .await;
    let id = invoice["id"].as_str().unwrap();

    let response = app.delete(&format!("/invoices/{id}")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(app.get(&format!("/invoices/{id}")).await.status(), 404);
}
