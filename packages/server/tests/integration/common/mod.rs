use std::net::SocketAddr;

use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, AuthConfig, CorsConfig, SeedConfig, ServerConfig, StoreConfig};
use server::state::AppState;
use store::Store;

pub mod routes {
    pub const SIGNUP: &str = "/api/auth/signup";
    pub const SIGNIN: &str = "/api/auth/signin";
    pub const ME: &str = "/api/auth/me";
    pub const CROPS: &str = "/api/crops";

    pub fn crop(id: &str) -> String {
        format!("/api/crops/{id}")
    }

    pub fn crop_acquire(id: &str) -> String {
        format!("/api/crops/{id}/acquire")
    }

    pub fn crop_handoff(id: &str) -> String {
        format!("/api/crops/{id}/handoff")
    }

    pub fn crop_trace(id: &str) -> String {
        format!("/api/crops/{id}/trace")
    }

    pub fn scan(payload: &str) -> String {
        format!("/api/crops/scan/{payload}")
    }

    pub fn farmer_crops(farmer_id: &str) -> String {
        format!("/api/crops/farmer/{farmer_id}")
    }

    pub fn distributor_crops(distributor_id: &str) -> String {
        format!("/api/crops/distributor/{distributor_id}")
    }

    pub const WEATHER: &str = "/api/insights/weather";
    pub const PRICES: &str = "/api/insights/prices";
    pub const ANALYZE: &str = "/api/insights/analyze";
    pub const CHAT: &str = "/api/insights/chat";

    pub const ADMIN_USERS: &str = "/api/admin/users";
    pub const ADMIN_EXPORT: &str = "/api/admin/export";
    pub const ADMIN_IMPORT: &str = "/api/admin/import";
}

/// A running test server backed by a store file in a temp directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    _store_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store_dir = TempDir::new().expect("Failed to create temp dir");
        let store_path = store_dir.path().join("farmchainx.json");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
            },
            store: StoreConfig {
                path: store_path.clone(),
            },
            seed: SeedConfig::default(),
        };

        let store = Store::open(store_path).expect("Failed to open test store");
        let state = AppState::new(store, config);
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            _store_dir: store_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Sign up a user with the given role, returning the auth token and the
    /// profile from the signup response.
    pub async fn sign_up_user(&self, email: &str, role: &str) -> (String, Value) {
        let res = self
            .post_without_token(
                routes::SIGNUP,
                &serde_json::json!({
                    "email": email,
                    "password": "securepass",
                    "role": role,
                    "name": email.split('@').next().unwrap(),
                    "location": "Punjab, India",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "Signup failed: {}", res.text);

        let token = res.body["token"]
            .as_str()
            .expect("Signup response missing token")
            .to_string();
        (token, res.body["user"].clone())
    }

    /// Create a crop as the given user and return its JSON representation.
    pub async fn create_crop(&self, token: &str, name: &str, crop_type: &str) -> Value {
        let res = self
            .post_with_token(
                routes::CROPS,
                &serde_json::json!({
                    "name": name,
                    "crop_type": crop_type,
                    "soil_type": "Loamy",
                    "pesticides_used": "None",
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "Crop creation failed: {}", res.text);
        res.body.clone()
    }
}
