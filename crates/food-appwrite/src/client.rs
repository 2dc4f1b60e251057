//! # Appwrite REST Client
//!
//! Thin wrapper over `reqwest` that adds project/session headers and maps
//! Appwrite error bodies into `FoodError`.

use crate::config::AppwriteConfig;
use food_core::{FoodError, FoodResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

/// Response format the document mappings are written against
const RESPONSE_FORMAT: &str = "1.5.0";

pub(crate) const PROVIDER: &str = "appwrite";

/// Shared HTTP client for all Appwrite services
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    config: AppwriteConfig,
    http: Client,
}

impl AppwriteClient {
    /// Create a new client
    pub fn new(config: AppwriteConfig) -> FoodResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FoodError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Create from environment variables
    pub fn from_env() -> FoodResult<Self> {
        Self::new(AppwriteConfig::from_env()?)
    }

    pub fn config(&self) -> &AppwriteConfig {
        &self.config
    }

    /// Start a request against an API path, optionally as a signed-in user
    pub(crate) fn request(&self, method: Method, path: &str, session: Option<&str>) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, self.config.url(path))
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Response-Format", RESPONSE_FORMAT);

        if let Some(ref key) = self.config.api_key {
            request = request.header("X-Appwrite-Key", key);
        }
        if let Some(secret) = session {
            request = request.header("X-Appwrite-Session", secret);
        }
        request
    }

    /// Send a request; only transport failures are errors here
    pub(crate) async fn execute(&self, request: RequestBuilder) -> FoodResult<ApiResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| FoodError::NetworkError(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FoodError::NetworkError(e.to_string()))?;

        debug!("Appwrite response: status={}", status);

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// Send a request and decode a successful JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> FoodResult<T> {
        self.execute(request).await?.json()
    }
}

/// Raw response from the API
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    /// Fail on a non-success status
    pub fn ensure_success(&self) -> FoodResult<()> {
        if self.status.is_success() {
            return Ok(());
        }

        let message = serde_json::from_str::<AppwriteErrorResponse>(&self.body)
            .map(|e| match e.error_type {
                Some(kind) => format!("{} ({})", e.message, kind),
                None => e.message,
            })
            .unwrap_or_else(|_| format!("HTTP {}: {}", self.status, self.body));

        if self.status == StatusCode::UNAUTHORIZED {
            return Err(FoodError::Unauthorized(message));
        }

        error!("Appwrite API error: status={}, message={}", self.status, message);
        Err(FoodError::ProviderError {
            provider: PROVIDER.to_string(),
            message,
        })
    }

    /// Decode a successful JSON body
    pub fn json<T: DeserializeOwned>(self) -> FoodResult<T> {
        self.ensure_success()?;
        serde_json::from_str(&self.body).map_err(|e| {
            FoodError::Serialization(format!("Failed to parse Appwrite response: {}", e))
        })
    }
}

#[derive(Debug, Deserialize)]
struct AppwriteErrorResponse {
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
}

/// A page of documents
#[derive(Debug, Deserialize)]
pub(crate) struct DocumentList<T> {
    #[serde(default)]
    pub total: u64,
    pub documents: Vec<T>,
}

/// Query strings understood by the list endpoints
pub mod query {
    use serde_json::json;

    /// Attribute equals value
    pub fn equal(attribute: &str, value: &str) -> String {
        json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
    }

    /// Full-text search on an indexed attribute
    pub fn search(attribute: &str, value: &str) -> String {
        json!({ "method": "search", "attribute": attribute, "values": [value] }).to_string()
    }
}

/// Whether `id` has the shape of an Appwrite document id: up to 36 of
/// `[A-Za-z0-9._-]`, starting with a letter or digit
pub(crate) fn is_document_id(id: &str) -> bool {
    id.len() <= 36
        && id.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Generate a fresh document id
pub(crate) fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_query_encoding() {
        let q: serde_json::Value = serde_json::from_str(&query::equal("accountid", "abc")).unwrap();
        assert_eq!(q["method"], "equal");
        assert_eq!(q["attribute"], "accountid");
        assert_eq!(q["values"][0], "abc");

        let q: serde_json::Value = serde_json::from_str(&query::search("name", "burger")).unwrap();
        assert_eq!(q["method"], "search");
    }

    #[test]
    fn test_error_mapping() {
        let unauthorized = response(
            401,
            r#"{"message":"Invalid credentials","code":401,"type":"user_invalid_credentials"}"#,
        );
        assert!(matches!(
            unauthorized.ensure_success(),
            Err(FoodError::Unauthorized(msg)) if msg.contains("Invalid credentials")
        ));

        let unavailable = response(503, "upstream down");
        assert!(matches!(
            unavailable.ensure_success(),
            Err(FoodError::ProviderError { message, .. }) if message.contains("upstream down")
        ));
    }

    #[test]
    fn test_document_id_shape() {
        assert!(is_document_id("6889d7ab001b82283143"));
        assert!(is_document_id("burger-1.v2_x"));
        assert!(!is_document_id(""));
        assert!(!is_document_id(".."));
        assert!(!is_document_id("../../users"));
        assert!(!is_document_id("a?limit=100"));
        assert!(!is_document_id("a/b"));
        assert!(!is_document_id(&"a".repeat(37)));
    }

    #[test]
    fn test_unique_id_shape() {
        let id = unique_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
