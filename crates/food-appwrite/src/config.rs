//! # Appwrite Configuration
//!
//! Connection settings for the Appwrite project backing food-cart.
//! Endpoint and project come from the environment; database and
//! collection ids default to the production project's.

use food_core::FoodError;
use std::env;

const DEFAULT_DATABASE_ID: &str = "6881f5dd0027e07482d3";
const DEFAULT_USER_COLLECTION_ID: &str = "6888990e0001878efe53";
const DEFAULT_CATEGORY_COLLECTION_ID: &str = "6889d6a100021769bf43";
const DEFAULT_MENU_COLLECTION_ID: &str = "6889d7ab001b82283143";

/// Appwrite API configuration
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    /// API endpoint including the version segment (https://cloud.appwrite.io/v1)
    pub endpoint: String,

    /// Project identifier
    pub project_id: String,

    /// Optional server API key
    pub api_key: Option<String>,

    /// Database holding the collections below
    pub database_id: String,

    /// User profile documents
    pub user_collection_id: String,

    /// Menu categories
    pub category_collection_id: String,

    /// Menu items
    pub menu_collection_id: String,
}

impl AppwriteConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `APPWRITE_ENDPOINT`
    /// - `APPWRITE_PROJECT_ID`
    ///
    /// Optional: `APPWRITE_API_KEY`, `APPWRITE_DATABASE_ID`,
    /// `APPWRITE_USER_COLLECTION_ID`, `APPWRITE_CATEGORY_COLLECTION_ID`,
    /// `APPWRITE_MENU_COLLECTION_ID`.
    pub fn from_env() -> Result<Self, FoodError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let endpoint = env::var("APPWRITE_ENDPOINT").map_err(|_| {
            FoodError::Configuration("APPWRITE_ENDPOINT not set".to_string())
        })?;

        let project_id = env::var("APPWRITE_PROJECT_ID").map_err(|_| {
            FoodError::Configuration("APPWRITE_PROJECT_ID not set".to_string())
        })?;

        let mut config = Self::new(endpoint, project_id);
        config.validate()?;

        config.api_key = env::var("APPWRITE_API_KEY").ok().filter(|k| !k.is_empty());
        config.database_id = env_or("APPWRITE_DATABASE_ID", DEFAULT_DATABASE_ID);
        config.user_collection_id = env_or("APPWRITE_USER_COLLECTION_ID", DEFAULT_USER_COLLECTION_ID);
        config.category_collection_id =
            env_or("APPWRITE_CATEGORY_COLLECTION_ID", DEFAULT_CATEGORY_COLLECTION_ID);
        config.menu_collection_id = env_or("APPWRITE_MENU_COLLECTION_ID", DEFAULT_MENU_COLLECTION_ID);

        Ok(config)
    }

    /// Like [`AppwriteConfig::from_env`], but `None` when no endpoint is set
    pub fn from_env_optional() -> Result<Option<Self>, FoodError> {
        dotenvy::dotenv().ok();

        if env::var("APPWRITE_ENDPOINT").map_or(true, |v| v.is_empty()) {
            return Ok(None);
        }
        Self::from_env().map(Some)
    }

    /// Create config with explicit values (for testing)
    pub fn new(endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key: None,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            user_collection_id: DEFAULT_USER_COLLECTION_ID.to_string(),
            category_collection_id: DEFAULT_CATEGORY_COLLECTION_ID.to_string(),
            menu_collection_id: DEFAULT_MENU_COLLECTION_ID.to_string(),
        }
    }

    fn validate(&self) -> Result<(), FoodError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(FoodError::Configuration(
                "APPWRITE_ENDPOINT must start with http:// or https://".to_string(),
            ));
        }
        if self.project_id.trim().is_empty() {
            return Err(FoodError::Configuration(
                "APPWRITE_PROJECT_ID must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder: set database id
    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Builder: set server API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Full URL for an API path such as `/account`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Path of a collection's documents
    pub fn documents_path(&self, collection_id: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, collection_id
        )
    }

    /// Storage assets need the project id as a query parameter
    pub fn asset_url(&self, image_url: &str) -> String {
        food_core::asset_url(image_url, &self.project_id)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
