//! # Routes
//!
//! Axum router configuration for the food-cart API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Menu:
///   - GET  /api/v1/menu?category=&query= - List menu items
///   - GET  /api/v1/menu/{id} - Get menu item by ID
///   - GET  /api/v1/categories - List categories
///   - GET  /api/v1/customizations - Toppings and sides
///
/// - Cart:
///   - GET    /api/v1/cart - Items and payment summary
///   - DELETE /api/v1/cart - Clear the cart
///   - POST   /api/v1/cart/items - Add an item
///   - POST   /api/v1/cart/items/{remove,increase,decrease} - Update a line
///
/// - Auth:
///   - POST /api/v1/auth/{sign-up,sign-in,sign-out}
///   - GET  /api/v1/auth/me - Current user
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let menu_routes = Router::new()
        .route("/menu", get(handlers::list_menu))
        .route("/menu/{item_id}", get(handlers::get_menu_item))
        .route("/categories", get(handlers::list_categories))
        .route("/customizations", get(handlers::list_customizations));

    let cart_routes = Router::new()
        .route("/cart", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/cart/items", post(handlers::add_item))
        .route("/cart/items/remove", post(handlers::remove_item))
        .route("/cart/items/increase", post(handlers::increase_qty))
        .route("/cart/items/decrease", post(handlers::decrease_qty));

    let auth_routes = Router::new()
        .route("/auth/sign-up", post(handlers::sign_up))
        .route("/auth/sign-in", post(handlers::sign_in))
        .route("/auth/sign-out", post(handlers::sign_out))
        .route("/auth/me", get(handlers::current_user));

    let api_routes = Router::new()
        .merge(menu_routes)
        .merge(cart_routes)
        .merge(auth_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use food_core::{
        AuthProvider, BoxedAuthProvider, Credentials, CustomizationOption, FoodError, FoodResult,
        MenuItem, NewAccount, Session, StaticCatalog, UserProfile,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct FakeAuth;

    fn profile() -> UserProfile {
        UserProfile {
            id: "doc-1".into(),
            account_id: "acc-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            avatar: "https://example.com/avatar".into(),
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuth {
        async fn create_account(&self, _account: &NewAccount) -> FoodResult<UserProfile> {
            Ok(profile())
        }

        async fn create_session(&self, credentials: &Credentials) -> FoodResult<Session> {
            if credentials.password != "secret123" {
                return Err(FoodError::Unauthorized("Invalid credentials".into()));
            }
            Ok(Session {
                id: "s1".into(),
                user_id: "acc-1".into(),
                secret: "token".into(),
                expires_at: None,
            })
        }

        async fn current_user(&self, _session: &Session) -> FoodResult<Option<UserProfile>> {
            Ok(Some(profile()))
        }

        async fn delete_session(&self, _session: &Session) -> FoodResult<()> {
            Ok(())
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    fn catalog() -> StaticCatalog {
        let mut catalog = StaticCatalog::new();
        catalog.add(MenuItem::new("burger", "Classic Burger", 10.0).with_kind("burger"));
        catalog.add(MenuItem::new("pizza", "Pepperoni Pizza", 12.5).with_kind("pizza"));
        catalog.customizations.toppings = vec![
            CustomizationOption::new("Avocado", 1.5),
            CustomizationOption::new("Bacon", 2.0),
        ];
        catalog.customizations.sides = vec![CustomizationOption::new("Fries", 3.5)];
        catalog
    }

    fn server(auth: Option<BoxedAuthProvider>) -> TestServer {
        let catalog = catalog();
        let customizations = catalog.customizations.clone();
        let state =
            AppState::with_providers(AppConfig::default(), Arc::new(catalog), auth, customizations);
        TestServer::new(create_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = server(None);
        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_menu_filtering() {
        let server = server(None);

        let all: Vec<Value> = server.get("/api/v1/menu?category=All").await.json();
        assert_eq!(all.len(), 2);

        let pizzas: Vec<Value> = server
            .get("/api/v1/menu")
            .add_query_param("category", "Pizza")
            .await
            .json();
        assert_eq!(pizzas.len(), 1);
        assert_eq!(pizzas[0]["id"], "pizza");

        let search: Vec<Value> = server
            .get("/api/v1/menu")
            .add_query_param("query", "burg")
            .await
            .json();
        assert_eq!(search.len(), 1);
    }

    #[tokio::test]
    async fn test_menu_item_not_found() {
        let server = server(None);
        server
            .get("/api/v1/menu/nope")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server.get("/api/v1/menu/burger").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let server = server(None);

        // (10 + 1.5 + 2) x 2 = 27
        let body = json!({
            "menu_item_id": "burger",
            "customizations": [
                { "kind": "topping", "index": 0 },
                { "kind": "topping", "index": 1 }
            ],
            "quantity": 2
        });
        let cart: Value = server.post("/api/v1/cart/items").json(&body).await.json();
        assert_eq!(cart["items"].as_array().unwrap().len(), 1);
        assert_eq!(cart["items"][0]["quantity"], 2);
        assert_eq!(cart["items"][0]["line_total"], 2700);
        assert_eq!(cart["summary"]["subtotal"], 2700);
        assert_eq!(cart["summary"]["total"], 3000);

        // Same item in a different order merges into the same line
        let reordered = json!({
            "id": "burger",
            "customizations": [
                { "kind": "topping", "index": 1 },
                { "kind": "topping", "index": 0 }
            ]
        });
        let cart: Value = server
            .post("/api/v1/cart/items/increase")
            .json(&reordered)
            .await
            .json();
        assert_eq!(cart["items"][0]["quantity"], 3);

        // Plain burger is a separate line
        let plain = json!({ "menu_item_id": "burger" });
        let cart: Value = server.post("/api/v1/cart/items").json(&plain).await.json();
        assert_eq!(cart["items"].as_array().unwrap().len(), 2);
        assert_eq!(cart["summary"]["total_items"], 4);

        let cart: Value = server
            .post("/api/v1/cart/items/decrease")
            .json(&json!({ "id": "burger" }))
            .await
            .json();
        assert_eq!(cart["items"].as_array().unwrap().len(), 1);

        let cart: Value = server
            .post("/api/v1/cart/items/remove")
            .json(&reordered)
            .await
            .json();
        assert!(cart["items"].as_array().unwrap().is_empty());
        assert_eq!(cart["summary"]["total"], 0);
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let server = server(None);
        server
            .post("/api/v1/cart/items")
            .json(&json!({ "menu_item_id": "pizza", "quantity": 3 }))
            .await
            .assert_status_ok();

        let cart: Value = server.delete("/api/v1/cart").await.json();
        assert!(cart["items"].as_array().unwrap().is_empty());

        let cart: Value = server.get("/api/v1/cart").await.json();
        assert_eq!(cart["summary"]["total_items"], 0);
    }

    #[tokio::test]
    async fn test_add_item_rejects_bad_requests() {
        let server = server(None);

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "menu_item_id": "missing" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/api/v1/cart/items")
            .json(&json!({
                "menu_item_id": "burger",
                "customizations": [
                    { "kind": "side", "index": 0 },
                    { "kind": "side", "index": 0 }
                ]
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "menu_item_id": "burger", "quantity": 0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "menu_item_id": "burger", "quantity": u32::MAX }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let cart: Value = server.get("/api/v1/cart").await.json();
        assert!(cart["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_max_quantity_adds_accumulate() {
        let server = server(None);
        let body = json!({ "menu_item_id": "pizza", "quantity": handlers::MAX_ADD_QUANTITY });

        for _ in 0..3 {
            server
                .post("/api/v1/cart/items")
                .json(&body)
                .await
                .assert_status_ok();
        }

        let cart: Value = server.get("/api/v1/cart").await.json();
        assert_eq!(cart["items"][0]["quantity"], 3 * handlers::MAX_ADD_QUANTITY);
    }

    #[tokio::test]
    async fn test_auth_unavailable_without_provider() {
        let server = server(None);
        server
            .post("/api/v1/auth/sign-in")
            .json(&json!({ "email": "ada@example.com", "password": "secret123" }))
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
        server
            .get("/api/v1/auth/me")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_auth_flow() {
        let server = server(Some(Arc::new(FakeAuth)));

        let me: Value = server.get("/api/v1/auth/me").await.json();
        assert_eq!(me["is_authenticated"], false);
        assert_eq!(me["is_loading"], false);

        server
            .post("/api/v1/auth/sign-in")
            .json(&json!({ "email": "ada@example.com", "password": "wrong" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let user: Value = server
            .post("/api/v1/auth/sign-in")
            .json(&json!({ "email": "ada@example.com", "password": "secret123" }))
            .await
            .json();
        assert_eq!(user["account_id"], "acc-1");

        let me: Value = server.get("/api/v1/auth/me").await.json();
        assert_eq!(me["is_authenticated"], true);
        assert_eq!(me["user"]["name"], "Ada");

        let after: Value = server.post("/api/v1/auth/sign-out").await.json();
        assert_eq!(after["is_authenticated"], false);
        assert!(after["user"].is_null());
    }

    #[tokio::test]
    async fn test_sign_up_validates_input() {
        let server = server(Some(Arc::new(FakeAuth)));
        server
            .post("/api/v1/auth/sign-up")
            .json(&json!({ "name": "", "email": "ada@example.com", "password": "secret123" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let user: Value = server
            .post("/api/v1/auth/sign-up")
            .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "secret123" }))
            .await
            .json();
        assert_eq!(user["email"], "ada@example.com");
    }
}
