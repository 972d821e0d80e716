//! REST client for the lock backend.
//!
//! One `ApiClient` wraps a `reqwest::Client`; endpoint groups add methods to it
//! from their own files. Every response goes through [`parse_response`], so all
//! endpoints share one success rule: a 2xx status, and a body `status` field
//! that is either absent or `"success"`.

mod auth;
mod devices;
mod uploads;
mod visits;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ClientError;

/// Header carrying the API key on enrollment endpoints.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Page size used by the visit history.
pub const VISITS_PAGE_SIZE: u32 = 10;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn api_key(&self) -> Result<&str, ClientError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ClientError::Unauthenticated("API key not configured".to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        parse_response(response).await
    }
}

/// Apply the shared success rule and decode the body.
pub(crate) async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body: Option<Value> = serde_json::from_slice(&bytes).ok();

    if !status.is_success() {
        let message = body
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        return Err(ClientError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let body = body.unwrap_or(Value::Null);
    if let Some(flag) = body.get("status").and_then(Value::as_str) {
        if flag != "success" {
            let message =
                error_message(&body).unwrap_or_else(|| format!("Server reported status {}", flag));
            return Err(ClientError::Api(message));
        }
    }

    Ok(serde_json::from_value(body)?)
}

/// Pull a human-readable message out of an error body (`detail` or `message`).
fn error_message(body: &Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|field| match body.get(*field)? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_prefers_detail() {
        let body = json!({"detail": "Invalid credentials", "message": "other"});
        assert_eq!(error_message(&body).as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_error_message_falls_back_to_message() {
        let body = json!({"detail": null, "message": "Visit not found"});
        assert_eq!(error_message(&body).as_deref(), Some("Visit not found"));
    }

    #[test]
    fn test_error_message_structured_detail() {
        let body = json!({"detail": [{"msg": "field required"}]});
        assert_eq!(
            error_message(&body).as_deref(),
            Some(r#"[{"msg":"field required"}]"#)
        );
        assert_eq!(error_message(&json!({})), None);
    }
}
