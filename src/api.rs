use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::{
    ApiErrorBody, CheckRequest, CheckResponse, GenerateResponse, RegenerateRequest, VoucherRequest,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const BASE_URL_ENV: &str = "VOUCHER_API_URL";

#[mockall::automock]
#[async_trait]
pub trait VoucherApi: Send + Sync {
    async fn check_exists(&self, flight_number: &str, date: &str) -> Result<CheckResponse>;
    async fn generate(&self, request: &VoucherRequest) -> Result<GenerateResponse>;
    async fn regenerate(
        &self,
        request: &VoucherRequest,
        seats: &[String],
    ) -> Result<GenerateResponse>;
    async fn health_check(&self) -> Result<Value>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Non-2xx responses carry {"success":false,"error":"..."}; only the
    // message survives this layer.
    async fn failure(response: reqwest::Response, fallback: &str) -> anyhow::Error {
        match response.json::<ApiErrorBody>().await {
            Ok(ApiErrorBody {
                error: Some(message),
            }) if !message.is_empty() => anyhow!(message),
            _ => anyhow!(fallback.to_string()),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|_| anyhow!(fallback.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::failure(response, fallback).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|_| anyhow!(fallback.to_string()))
    }
}

#[async_trait]
impl VoucherApi for ApiClient {
    async fn check_exists(&self, flight_number: &str, date: &str) -> Result<CheckResponse> {
        let request = CheckRequest {
            flight_number: flight_number.to_string(),
            date: date.to_string(),
        };

        self.post_json("/check", &request, "Failed to check voucher existence")
            .await
    }

    async fn generate(&self, request: &VoucherRequest) -> Result<GenerateResponse> {
        self.post_json("/generate", request, "Failed to generate vouchers")
            .await
    }

    async fn regenerate(
        &self,
        request: &VoucherRequest,
        seats: &[String],
    ) -> Result<GenerateResponse> {
        let body = RegenerateRequest {
            voucher: request.clone(),
            is_regenerate: true,
            updated_seats: seats.to_vec(),
        };

        self.post_json("/generate", &body, "Failed to regenerate vouchers")
            .await
    }

    async fn health_check(&self) -> Result<Value> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|_| anyhow!("Health check failed"))?;

        if !response.status().is_success() {
            return Err(anyhow!("Health check failed"));
        }

        response
            .json::<Value>()
            .await
            .map_err(|_| anyhow!("Health check failed"))
    }
}
