//! # Provider Traits
//!
//! Seams to the backend-as-a-service that owns menu data and user
//! accounts. Implementations: the bundled [`StaticCatalog`], Appwrite.
//!
//! ```text
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │  CatalogProvider (trait)  │   │   AuthProvider (trait)    │
//! │  ├── fetch_menu()         │   │  ├── create_account()     │
//! │  ├── fetch_categories()   │   │  ├── create_session()     │
//! │  └── fetch_menu_item()    │   │  ├── current_user()       │
//! └─────────────▲─────────────┘   │  └── delete_session()     │
//!               │                 └─────────────▲─────────────┘
//!       ┌───────┴────────┐                      │
//!       │                │                      │
//! StaticCatalog   AppwriteCatalog          AppwriteAuth
//! ```

use crate::auth::{Credentials, NewAccount, Session, UserProfile};
use crate::error::{FoodError, FoodResult};
use crate::menu::{Category, MenuItem, MenuQuery, StaticCatalog};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of menu items and categories.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Menu items matching the query; "All" or an empty category means
    /// no category filter, a blank search means no search.
    async fn fetch_menu(&self, query: &MenuQuery) -> FoodResult<Vec<MenuItem>>;

    /// All categories.
    async fn fetch_categories(&self) -> FoodResult<Vec<Category>>;

    /// One menu item by id.
    ///
    /// # Errors
    /// `FoodError::MenuItemNotFound` if there is no such item.
    async fn fetch_menu_item(&self, id: &str) -> FoodResult<MenuItem>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Account and session management.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register an account and its profile document.
    async fn create_account(&self, account: &NewAccount) -> FoodResult<UserProfile>;

    /// Sign in with email and password.
    async fn create_session(&self, credentials: &Credentials) -> FoodResult<Session>;

    /// Profile behind a session; `None` when the session is no longer valid.
    async fn current_user(&self, session: &Session) -> FoodResult<Option<UserProfile>>;

    /// Sign out.
    async fn delete_session(&self, session: &Session) -> FoodResult<()>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared catalog provider (dynamic dispatch)
pub type BoxedCatalogProvider = Arc<dyn CatalogProvider>;

/// Type alias for a shared auth provider (dynamic dispatch)
pub type BoxedAuthProvider = Arc<dyn AuthProvider>;

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_menu(&self, query: &MenuQuery) -> FoodResult<Vec<MenuItem>> {
        Ok(self.filter(query).cloned().collect())
    }

    async fn fetch_categories(&self) -> FoodResult<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn fetch_menu_item(&self, id: &str) -> FoodResult<MenuItem> {
        self.get(id).cloned().ok_or_else(|| FoodError::MenuItemNotFound {
            item_id: id.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        let mut catalog = StaticCatalog::new();
        catalog.add(MenuItem::new("wrap-1", "Chicken Wrap", 9.5).with_kind("wrap"));
        catalog.add(MenuItem::new("burrito-1", "Beef Burrito", 11.0).with_kind("burrito"));
        catalog.categories.push(Category {
            id: "wrap".into(),
            name: "Wrap".into(),
            description: String::new(),
        });
        catalog
    }

    #[tokio::test]
    async fn test_static_catalog_fetch_menu() {
        let provider: BoxedCatalogProvider = Arc::new(catalog());

        let wraps = provider
            .fetch_menu(&MenuQuery::new().with_category("wrap"))
            .await
            .unwrap();
        assert_eq!(wraps.len(), 1);
        assert_eq!(wraps[0].id, "wrap-1");

        let all = provider.fetch_menu(&MenuQuery::new()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(provider.fetch_categories().await.unwrap().len(), 1);
        assert_eq!(provider.provider_name(), "static");
    }

    #[tokio::test]
    async fn test_static_catalog_missing_item() {
        let provider = catalog();

        assert_eq!(
            provider.fetch_menu_item("burrito-1").await.unwrap().name,
            "Beef Burrito"
        );
        assert!(matches!(
            provider.fetch_menu_item("nope").await,
            Err(FoodError::MenuItemNotFound { .. })
        ));
    }
}
