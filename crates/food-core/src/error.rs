//! # Error Types
//!
//! Typed errors for the boundaries of food-cart: catalog lookups,
//! authentication and customization validation.
//! The cart engine itself never fails.

use thiserror::Error;

/// Core error type for all fallible food-cart operations
#[derive(Debug, Error)]
pub enum FoodError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed customization payload
    #[error("Invalid customization: {0}")]
    InvalidCustomization(String),

    /// Same customization id appears twice in one set
    #[error("Duplicate customization id: {id}")]
    DuplicateCustomization { id: String },

    /// Negative or non-finite amount
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Menu item not found in catalog
    #[error("Menu item not found: {item_id}")]
    MenuItemNotFound { item_id: String },

    /// No valid session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with the backend
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FoodError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FoodError::NetworkError(_) | FoodError::ProviderError { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            FoodError::Configuration(_) => 500,
            FoodError::InvalidRequest(_) => 400,
            FoodError::InvalidCustomization(_) => 400,
            FoodError::DuplicateCustomization { .. } => 400,
            FoodError::InvalidPrice { .. } => 400,
            FoodError::MenuItemNotFound { .. } => 404,
            FoodError::Unauthorized(_) => 401,
            FoodError::ProviderError { .. } => 502,
            FoodError::NetworkError(_) => 503,
            FoodError::Serialization(_) => 500,
            FoodError::Internal(_) => 500,
        }
    }
}

impl From<toml::de::Error> for FoodError {
    fn from(err: toml::de::Error) -> Self {
        FoodError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for FoodError {
    fn from(err: serde_json::Error) -> Self {
        FoodError::Serialization(err.to_string())
    }
}

/// Result type alias for food-cart operations
pub type FoodResult<T> = Result<T, FoodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(FoodError::NetworkError("timeout".into()).is_retryable());
        assert!(FoodError::ProviderError {
            provider: "appwrite".into(),
            message: "bad gateway".into()
        }
        .is_retryable());
        assert!(!FoodError::InvalidRequest("bad data".into()).is_retryable());
        assert!(!FoodError::Unauthorized("no session".into()).is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(FoodError::InvalidRequest("test".into()).status_code(), 400);
        assert_eq!(
            FoodError::MenuItemNotFound {
                item_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(
            FoodError::DuplicateCustomization { id: "side-1".into() }.status_code(),
            400
        );
        assert_eq!(FoodError::Unauthorized("x".into()).status_code(), 401);
    }

    #[test]
    fn test_toml_error_is_configuration() {
        let err: FoodError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, FoodError::Configuration(_)));
    }
}
