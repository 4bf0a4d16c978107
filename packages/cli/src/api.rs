//! Blocking client for the FarmChainX REST API.
//!
//! Network failures and application errors are kept apart: only the former
//! trigger the local-store fallback, application errors (bad credentials,
//! missing crops) are surfaced to the user as-is.

use common::insights::{CropAnalysis, PriceTrend, WeatherReport};
use common::{Crop, SupplyChainEntry, UserProfile};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

#[derive(Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Deserialize)]
pub struct Provenance {
    pub crop: Crop,
    pub supply_chain: Vec<SupplyChainEntry>,
}

pub struct ApiClient {
    base: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base: base.into(),
            token,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let res = self.authed(req).send()?;
        Self::parse(res)
    }

    fn execute_empty(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let res = self.authed(req).send()?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(res))
    }

    fn parse<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
        if res.status().is_success() {
            return Ok(res.json()?);
        }
        Err(Self::error_from(res))
    }

    fn error_from(res: Response) -> ApiError {
        let status = res.status().as_u16();
        let body: Value = res.json().unwrap_or(Value::Null);
        ApiError::Api {
            status,
            code: body["code"].as_str().unwrap_or("UNKNOWN").to_string(),
            message: body["message"]
                .as_str()
                .unwrap_or("Request failed")
                .to_string(),
        }
    }

    // ---- Auth ----

    pub fn sign_up(&self, body: &Value) -> Result<AuthResponse, ApiError> {
        self.execute(self.http.post(self.url("/api/auth/signup")).json(body))
    }

    pub fn sign_in(&self, body: &Value) -> Result<AuthResponse, ApiError> {
        self.execute(self.http.post(self.url("/api/auth/signin")).json(body))
    }

    pub fn me(&self) -> Result<UserProfile, ApiError> {
        self.execute(self.http.get(self.url("/api/auth/me")))
    }

    // ---- Crops ----

    pub fn list_crops(&self) -> Result<Vec<Crop>, ApiError> {
        self.execute(self.http.get(self.url("/api/crops")))
    }

    pub fn create_crop(&self, body: &Value) -> Result<Crop, ApiError> {
        self.execute(self.http.post(self.url("/api/crops")).json(body))
    }

    pub fn get_crop(&self, id: Uuid) -> Result<Crop, ApiError> {
        self.execute(self.http.get(self.url(&format!("/api/crops/{id}"))))
    }

    pub fn update_crop(&self, id: Uuid, body: &Value) -> Result<Crop, ApiError> {
        self.execute(
            self.http
                .put(self.url(&format!("/api/crops/{id}")))
                .json(body),
        )
    }

    pub fn delete_crop(&self, id: Uuid) -> Result<(), ApiError> {
        self.execute_empty(self.http.delete(self.url(&format!("/api/crops/{id}"))))
    }

    pub fn crops_by_farmer(&self, code: &str) -> Result<Vec<Crop>, ApiError> {
        self.execute(self.http.get(self.url(&format!("/api/crops/farmer/{code}"))))
    }

    pub fn crops_by_distributor(&self, code: &str) -> Result<Vec<Crop>, ApiError> {
        self.execute(
            self.http
                .get(self.url(&format!("/api/crops/distributor/{code}"))),
        )
    }

    pub fn scan(&self, payload: &str) -> Result<Provenance, ApiError> {
        let encoded: String = url_encode(payload);
        self.execute(self.http.get(self.url(&format!("/api/crops/scan/{encoded}"))))
    }

    pub fn acquire_crop(&self, id: Uuid, supplier_id: &str) -> Result<Crop, ApiError> {
        self.execute(
            self.http
                .post(self.url(&format!("/api/crops/{id}/acquire")))
                .json(&serde_json::json!({ "supplier_id": supplier_id })),
        )
    }

    pub fn handoff_crop(&self, id: Uuid, body: &Value) -> Result<Crop, ApiError> {
        self.execute(
            self.http
                .post(self.url(&format!("/api/crops/{id}/handoff")))
                .json(body),
        )
    }

    pub fn trace_crop(&self, id: Uuid) -> Result<Vec<SupplyChainEntry>, ApiError> {
        self.execute(self.http.get(self.url(&format!("/api/crops/{id}/trace"))))
    }

    // ---- Insights ----

    pub fn weather(&self, location: Option<&str>) -> Result<WeatherReport, ApiError> {
        let mut req = self.http.get(self.url("/api/insights/weather"));
        if let Some(location) = location {
            req = req.query(&[("location", location)]);
        }
        self.execute(req)
    }

    pub fn prices(&self, crop_type: Option<&str>, days: Option<u32>) -> Result<PriceTrend, ApiError> {
        let mut req = self.http.get(self.url("/api/insights/prices"));
        if let Some(crop_type) = crop_type {
            req = req.query(&[("crop_type", crop_type)]);
        }
        if let Some(days) = days {
            req = req.query(&[("days", days.to_string())]);
        }
        self.execute(req)
    }

    pub fn analyze(&self, crop_id: Uuid) -> Result<CropAnalysis, ApiError> {
        self.execute(
            self.http
                .post(self.url("/api/insights/analyze"))
                .json(&serde_json::json!({ "crop_id": crop_id })),
        )
    }

    pub fn chat(&self, message: &str) -> Result<String, ApiError> {
        let res: Value = self.execute(
            self.http
                .post(self.url("/api/insights/chat"))
                .json(&serde_json::json!({ "message": message })),
        )?;
        Ok(res["reply"].as_str().unwrap_or_default().to_string())
    }

    // ---- Admin data set ----

    pub fn export_data(&self) -> Result<Value, ApiError> {
        self.execute(self.http.get(self.url("/api/admin/export")))
    }

    pub fn import_data(&self, blob: &Value) -> Result<(), ApiError> {
        self.execute_empty(self.http.post(self.url("/api/admin/import")).json(blob))
    }
}

/// Percent-encode a QR payload for use as a path segment. Payloads can be
/// raw JSON, so everything outside the unreserved set is escaped.
fn url_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
