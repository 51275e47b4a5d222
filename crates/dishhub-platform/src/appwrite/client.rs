//! HTTP client shared by the hosted platform services.
//!
//! The client holds the session credential. It is captured from the
//! fallback-cookie response header and replayed on every later request.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use dishhub_core::config::PlatformConfig;
use dishhub_core::error::{AppError, ErrorKind, PlatformError};
use dishhub_core::result::{AppResult, PlatformResult};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const RESPONSE_FORMAT_HEADER: &str = "X-Appwrite-Response-Format";
const RESPONSE_FORMAT: &str = "1.5.0";
const SESSION_HEADER: &str = "X-Fallback-Cookies";

/// Error payload returned by the platform.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: u16,
    #[serde(default, rename = "type")]
    error_type: String,
}

/// Shared HTTP client for one platform project.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    session: Arc<RwLock<Option<String>>>,
}

impl AppwriteClient {
    /// Build a client from platform configuration.
    pub fn new(config: &PlatformConfig) -> AppResult<Self> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        Url::parse(&endpoint).map_err(|e| {
            AppError::configuration(format!("Invalid platform endpoint '{endpoint}': {e}"))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            endpoint,
            project_id: config.project_id.clone(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Project id sent with every request.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Absolute URL of an API path such as `/account`.
    pub fn url(&self, path: &str) -> PlatformResult<Url> {
        Url::parse(&format!("{}{path}", self.endpoint))
            .map_err(|e| PlatformError::InvalidRequest(format!("{path}: {e}")))
    }

    /// Session credential currently held, if any.
    pub fn session(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the held session credential.
    pub fn set_session(&self, credential: Option<String>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = credential;
    }

    /// Start a request carrying the project and session headers.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id)
            .header(RESPONSE_FORMAT_HEADER, RESPONSE_FORMAT);
        if let Some(credential) = self.session() {
            builder = builder.header(SESSION_HEADER, credential);
        }
        builder
    }

    /// Send a request, capture a returned session credential, and turn
    /// non-success statuses into [`PlatformError::Api`].
    pub async fn execute(&self, builder: RequestBuilder) -> PlatformResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        let credential = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty() && *value != "[]")
            .map(str::to_string);
        if let Some(credential) = credential {
            debug!("Captured session credential");
            self.set_session(Some(credential));
        }

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }

    /// Send a request and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PlatformResult<T> {
        self.execute(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))
    }

    /// Send a request whose response body is ignored.
    pub async fn send_empty(&self, builder: RequestBuilder) -> PlatformResult<()> {
        self.execute(builder).await.map(|_| ())
    }
}

/// Decode an error response. Bodies that are not the platform's error
/// shape keep the HTTP status and the raw text.
pub(crate) fn error_from_body(status: u16, body: &str) -> PlatformError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => {
            let code = if err.code == 0 { status } else { err.code };
            PlatformError::api(code, err.error_type, err.message)
        }
        Err(_) => PlatformError::api(status, "unknown", body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlatformConfig {
        PlatformConfig {
            endpoint: "https://cloud.example.io/v1/".to_string(),
            project_id: "proj".to_string(),
            ..PlatformConfig::default()
        }
    }

    #[test]
    fn test_error_body_is_decoded() {
        let err = error_from_body(
            401,
            r#"{"message":"Invalid credentials","code":401,"type":"user_invalid_credentials","version":"1.5.7"}"#,
        );
        assert_eq!(
            err,
            PlatformError::api(401, "user_invalid_credentials", "Invalid credentials")
        );
    }

    #[test]
    fn test_unstructured_error_keeps_status() {
        let err = error_from_body(502, "Bad Gateway\n");
        assert_eq!(err.code(), Some(502));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_url_joins_endpoint_and_path() {
        let client = AppwriteClient::new(&config()).expect("client");
        assert_eq!(
            client.url("/account").expect("url").as_str(),
            "https://cloud.example.io/v1/account"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_configuration_error() {
        let mut cfg = config();
        cfg.endpoint = "not a url".to_string();
        let err = AppwriteClient::new(&cfg).expect_err("invalid");
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_session_credential_round_trip() {
        let client = AppwriteClient::new(&config()).expect("client");
        assert!(client.session().is_none());
        client.set_session(Some("{\"a_session_proj\":\"secret\"}".to_string()));
        assert!(client.clone().session().is_some());
    }
}
