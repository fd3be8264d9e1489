use actix_web::HttpResponse;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::api::ErrorResponse;
use crate::config::BackendConfig;

const FALLBACK_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum ProxyError {
    /// The backend answered with a non-2xx status; `message` is whatever
    /// human-readable detail its error body carried.
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// The backend was unreachable or the response could not be read.
    #[error("{0}")]
    Transport(String),
}

/// A successful backend response carried through verbatim.
#[derive(Debug)]
pub struct BackendResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Thin client over the SafeRemediate analysis backend. Every local API
/// route forwards through here; no retries, no auth, no added semantics.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .user_agent("saferemediate-dashboard")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(BackendClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.base_url, path, q),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    /// Forward a request to the backend and return its response verbatim on
    /// success. On a non-2xx response the error body is parsed (falling back
    /// to `{}`) and reduced to a single message string.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<BackendResponse, ProxyError> {
        let url = self.url(path, query);
        log::debug!("Forwarding {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(bytes) = body {
            request = request
                .header("content-type", FALLBACK_CONTENT_TYPE)
                .body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        if status < 300 {
            Ok(BackendResponse {
                status,
                content_type,
                body: bytes.to_vec(),
            })
        } else {
            Err(ProxyError::Backend {
                status,
                message: extract_error_message(status, &bytes),
            })
        }
    }

    /// Typed GET used by the flow builder's data sources.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<T, ProxyError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 300 {
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(ProxyError::Backend {
                status,
                message: extract_error_message(status, &bytes),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))
    }
}

/// Reduce a backend error body to a display string: `detail`, then `error`,
/// then a generic message carrying the status code.
pub fn extract_error_message(status: u16, body: &[u8]) -> String {
    let parsed: serde_json::Value =
        serde_json::from_slice(body).unwrap_or_else(|_| serde_json::json!({}));
    parsed
        .get("detail")
        .and_then(|v| v.as_str())
        .or_else(|| parsed.get("error").and_then(|v| v.as_str()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Backend request failed with status {}", status))
}

/// Translate a forward result into the uniform response shape: success body
/// passed through unchanged at the backend's status, errors as `{ error }`
/// at the backend's status or 500 for transport failures.
pub fn to_http_response(result: Result<BackendResponse, ProxyError>) -> HttpResponse {
    match result {
        Ok(response) => {
            let status = actix_web::http::StatusCode::from_u16(response.status)
                .unwrap_or(actix_web::http::StatusCode::OK);
            HttpResponse::build(status)
                .content_type(response.content_type)
                .body(response.body)
        }
        Err(ProxyError::Backend { status, message }) => {
            let status = actix_web::http::StatusCode::from_u16(status)
                .unwrap_or(actix_web::http::StatusCode::BAD_GATEWAY);
            HttpResponse::build(status).json(ErrorResponse { error: message })
        }
        Err(ProxyError::Transport(message)) => {
            log::warn!("Backend unreachable: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse { error: message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_detail_field() {
        let body = br#"{"detail": "Role not found", "error": "other"}"#;
        assert_eq!(extract_error_message(404, body), "Role not found");
    }

    #[test]
    fn error_message_falls_back_to_error_field() {
        let body = br#"{"error": "boom"}"#;
        assert_eq!(extract_error_message(500, body), "boom");
    }

    #[test]
    fn error_message_generic_on_unparsable_body() {
        let body = b"<html>gateway timeout</html>";
        assert_eq!(
            extract_error_message(504, body),
            "Backend request failed with status 504"
        );
    }
}
