//! # Appwrite Catalog
//!
//! Menu items and categories stored as Appwrite documents.

use crate::client::{is_document_id, query, AppwriteClient, DocumentList, PROVIDER};
use async_trait::async_trait;
use food_core::{CatalogProvider, Category, FoodError, FoodResult, MenuItem, MenuQuery};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Catalog backed by the Appwrite Databases API
#[derive(Debug, Clone)]
pub struct AppwriteCatalog {
    client: AppwriteClient,
}

impl AppwriteCatalog {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn menu_path(&self) -> String {
        self.client
            .config()
            .documents_path(&self.client.config().menu_collection_id)
    }

    fn to_menu_item(&self, doc: MenuDocument) -> MenuItem {
        MenuItem {
            id: doc.id,
            name: doc.name,
            price: doc.price,
            image_url: self.client.config().asset_url(&doc.image_url),
            description: doc.description,
            calories: doc.calories,
            protein: doc.protein,
            rating: doc.rating,
            kind: doc.kind,
            categories: relation_ids(&doc.categories),
        }
    }
}

#[async_trait]
impl CatalogProvider for AppwriteCatalog {
    #[instrument(skip(self))]
    async fn fetch_menu(&self, menu_query: &MenuQuery) -> FoodResult<Vec<MenuItem>> {
        let mut queries = Vec::new();
        if let Some(category) = menu_query.category_filter() {
            queries.push(("queries[]", query::equal("categories", category)));
        }
        if let Some(search) = menu_query.search_filter() {
            queries.push(("queries[]", query::search("name", search)));
        }

        let request = self
            .client
            .request(Method::GET, &self.menu_path(), None)
            .query(&queries);
        let list: DocumentList<MenuDocument> = self.client.send_json(request).await?;

        debug!("Fetched {} of {} menu items", list.documents.len(), list.total);
        Ok(list
            .documents
            .into_iter()
            .map(|doc| self.to_menu_item(doc))
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> FoodResult<Vec<Category>> {
        let config = self.client.config();
        let path = config.documents_path(&config.category_collection_id);
        let request = self.client.request(Method::GET, &path, None);
        let list: DocumentList<CategoryDocument> = self.client.send_json(request).await?;

        Ok(list
            .documents
            .into_iter()
            .map(|doc| Category {
                id: doc.id,
                name: doc.name,
                description: doc.description,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_menu_item(&self, id: &str) -> FoodResult<MenuItem> {
        // The id becomes a path segment
        if !is_document_id(id) {
            return Err(FoodError::MenuItemNotFound {
                item_id: id.to_string(),
            });
        }

        let path = format!("{}/{}", self.menu_path(), id);
        let request = self.client.request(Method::GET, &path, None);
        let response = self.client.execute(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            return Err(FoodError::MenuItemNotFound {
                item_id: id.to_string(),
            });
        }

        let doc: MenuDocument = response.json()?;
        Ok(self.to_menu_item(doc))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Appwrite Document Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct MenuDocument {
    #[serde(rename = "$id")]
    id: String,
    name: String,
    price: f64,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    calories: u32,
    #[serde(default)]
    protein: u32,
    #[serde(default)]
    rating: f32,
    #[serde(default, rename = "type")]
    kind: String,
    /// Relationship attribute: id, nested document, or a list of either
    #[serde(default)]
    categories: Value,
}

#[derive(Debug, Deserialize)]
struct CategoryDocument {
    #[serde(rename = "$id")]
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

/// Ids referenced by a relationship attribute
fn relation_ids(value: &Value) -> Vec<String> {
    match value {
        Value::String(id) => vec![id.clone()],
        Value::Object(doc) => doc
            .get("$id")
            .and_then(Value::as_str)
            .map(|id| vec![id.to_string()])
            .unwrap_or_default(),
        Value::Array(items) => items.iter().flat_map(relation_ids).collect(),
        _ => Vec::new(),
    }
}
