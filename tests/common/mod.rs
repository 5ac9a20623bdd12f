use pulaflow::config::{Config, OrangeConfig, ServerConfig};
use pulaflow::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct TestApp {
    pub address: String,
    /// Stand-in for the Orange gateway; tests mount their own expectations.
    pub gateway: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the app on a random port with an empty ledger, pointed at a
    /// fresh mock gateway with valid-looking credentials.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_config| {}).await
    }

    /// Spawn with a hook for bending the configuration (e.g. blank
    /// credentials).
    pub async fn spawn_with(customize: impl FnOnce(&mut Config)) -> Self {
        let gateway = MockServer::start().await;

        let mut config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            orange: OrangeConfig {
                api_key: "test-key".to_string(),
                api_secret: Secret::new("test-secret".to_string()),
                token_url: format!("{}/oauth/v3/token", gateway.uri()),
                checkout_url: format!("{}/carrierbilling/checkout", gateway.uri()),
                verify_url: format!("{}/numberverification/otp", gateway.uri()),
                currency: "BWP".to_string(),
                public_base_url: "https://pulaflow.example".to_string(),
            },
            seed_demo_data: false,
            service_name: "pulaflow-test".to_string(),
        };
        customize(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to come up.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            gateway,
            client,
        }
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a customer and return its record.
    pub async fn create_customer(&self, name: &str) -> Value {
        let response = self
            .post(
                "/customers",
                &json!({ "name": name, "phone_number": "+26773000000" }),
            )
            .await;
        assert_eq!(response.status(), 201);
        response.json().await.expect("Failed to parse customer")
    }

    /// Create an invoice for the customer and return its record.
    pub async fn create_invoice(&self, customer_id: &str, body_extra: Value) -> Value {
        let mut body = json!({
            "customer_id": customer_id,
            "issue_date": "2026-08-01",
            "due_date": "2026-08-08",
            "line_items": [],
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), body_extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        let response = self.post("/invoices", &body).await;
        assert_eq!(response.status(), 201);
        response.json().await.expect("Failed to parse invoice")
    }
}
