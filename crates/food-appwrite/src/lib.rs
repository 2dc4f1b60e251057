//! # food-appwrite
//!
//! Appwrite integration for food-cart-rs.
//!
//! This crate provides two providers over the Appwrite REST API:
//!
//! 1. **AppwriteCatalog** - `CatalogProvider` over the Databases API
//!    - Menu items filtered by category and name search
//!    - Categories
//!    - Storage image URLs tagged with the project id
//!
//! 2. **AppwriteAuth** - `AuthProvider` over the Account API
//!    - Account + profile document creation
//!    - Email/password sessions
//!    - Current user lookup and sign-out
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use food_appwrite::{AppwriteAuth, AppwriteCatalog, AppwriteClient};
//! use food_core::{CatalogProvider, MenuQuery};
//!
//! // Create client from environment
//! let client = AppwriteClient::from_env()?;
//! let catalog = AppwriteCatalog::new(client.clone());
//! let auth = AppwriteAuth::new(client);
//!
//! let burgers = catalog
//!     .fetch_menu(&MenuQuery::new().with_category("Burger"))
//!     .await?;
//! ```

pub mod account;
pub mod catalog;
pub mod client;
pub mod config;

// Re-exports
pub use account::AppwriteAuth;
pub use catalog::AppwriteCatalog;
pub use client::AppwriteClient;
pub use config::AppwriteConfig;
