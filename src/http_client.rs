use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};
use crate::session::Session;

const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Response envelope every API endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T = Value> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: T,
}

/// Sends a JSON request and returns the envelope's `data` on success.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, method: Method, endpoint: &str, body: Option<Value>)
        -> ApiResult<Value>;

    async fn get(&self, endpoint: &str) -> ApiResult<Value> {
        self.request(Method::GET, endpoint, None).await
    }

    async fn post(&self, endpoint: &str, body: Option<Value>) -> ApiResult<Value> {
        self.request(Method::POST, endpoint, body).await
    }

    async fn put(&self, endpoint: &str, body: Value) -> ApiResult<Value> {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    async fn patch(&self, endpoint: &str, body: Value) -> ApiResult<Value> {
        self.request(Method::PATCH, endpoint, Some(body)).await
    }

    async fn delete(&self, endpoint: &str) -> ApiResult<Value> {
        self.request(Method::DELETE, endpoint, None).await
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn classify_send_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_connect() {
            tracing::error!(
                base_url = %self.base_url,
                "Could not connect to server: {}",
                err
            );
            ApiError::ConnectionFailed {
                base_url: self.base_url.clone(),
                source: err,
            }
        } else {
            ApiError::Unknown(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let url = self.url(endpoint);
        tracing::debug!("Request: {} {}", method, url);

        let mut builder = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.session.token().await {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("Session rejected with HTTP {}, clearing session", status.as_u16());
            if let Err(e) = self.session.clear().await {
                tracing::error!("Failed to clear session: {}", e);
            }
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to read non-JSON response body: {}", e);
                    String::new()
                }
            };
            let message = if text.trim().is_empty() {
                DEFAULT_ERROR_MESSAGE.to_string()
            } else {
                text
            };
            return Err(ApiError::request(Some(status.as_u16()), message));
        }

        let payload: Value = response.json().await.map_err(|e| {
            ApiError::request(Some(status.as_u16()), format!("Invalid JSON response: {}", e))
        })?;
        let envelope: ApiEnvelope = serde_json::from_value(payload).map_err(|e| {
            ApiError::request(Some(status.as_u16()), format!("Malformed response: {}", e))
        })?;
        let message = envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::request(Some(status.as_u16()), message));
        }

        if envelope.success == Some(false) {
            return Err(ApiError::request(Some(status.as_u16()), message));
        }

        Ok(envelope.data)
    }
}
