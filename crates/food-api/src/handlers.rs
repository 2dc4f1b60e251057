//! # Request Handlers
//!
//! Axum request handlers for the food-cart API.
//! Menu reads go to the catalog provider, cart mutations go to the shared
//! cart, and the auth endpoints drive the shared `AuthState`.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use food_core::{
    AuthState, BoxedAuthProvider, Cart, CartLineItem, Category, Credentials, Currency,
    CustomizationKind, CustomizationMenu, CustomizationSet, FoodError, MenuItem, MenuQuery, Money,
    NewAccount, OrderSummary, UserProfile,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// One selected topping or side, by its position in the customization menu
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CustomizationSelection {
    pub kind: CustomizationKind,
    pub index: usize,
}

/// Add a menu item to the cart
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Menu item ID
    pub menu_item_id: String,
    /// Selected toppings and sides
    #[serde(default)]
    pub customizations: Vec<CustomizationSelection>,
    /// How many to add
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Largest quantity accepted in one add request
pub const MAX_ADD_QUANTITY: u32 = 99;

/// Address one cart line: catalog id plus its selection
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub id: String,
    #[serde(default)]
    pub customizations: Vec<CustomizationSelection>,
}

/// Cart line as returned to clients
#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartLineItem,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Cart contents and payment summary
#[derive(Debug, Serialize)]
pub struct CartView {
    pub currency: Currency,
    pub items: Vec<CartLineView>,
    pub summary: OrderSummary,
}

impl CartView {
    fn new(cart: &Cart, currency: Currency, summary: OrderSummary) -> Self {
        Self {
            currency,
            items: cart
                .items()
                .iter()
                .map(|line| CartLineView {
                    item: line.clone(),
                    unit_price: line.unit_price(),
                    line_total: line.line_total(),
                })
                .collect(),
            summary,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn food_error_to_response(err: FoodError) -> ApiError {
    let code = err.status_code();
    if code >= 500 {
        error!("Request failed: {}", err);
    }
    let mut response = ErrorResponse::new(err.to_string(), code);
    if err.is_retryable() {
        response = response.with_details("retryable");
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Resolve menu positions into a validated customization set
fn resolve_selection(
    menu: &CustomizationMenu,
    selections: &[CustomizationSelection],
    currency: Currency,
) -> Result<CustomizationSet, FoodError> {
    let mut set = CustomizationSet::new();
    for selection in selections {
        set.insert(menu.select(selection.kind, selection.index, currency)?)?;
    }
    Ok(set)
}

fn auth_provider(state: &AppState) -> Result<&BoxedAuthProvider, ApiError> {
    state.auth_provider.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Authentication is not configured", 503)),
        )
    })
}

fn cart_view(state: &AppState) -> CartView {
    mutate_cart(state, |_| ())
}

/// Apply one cart operation and read the resulting cart under the same lock
fn mutate_cart(state: &AppState, op: impl FnOnce(&mut Cart)) -> CartView {
    state.with_cart(|cart| {
        op(cart);
        CartView::new(cart, state.config.currency, state.summary(cart))
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "food-cart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List menu items, optionally filtered by category and name search
#[instrument(skip(state))]
pub async fn list_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = state
        .catalog
        .fetch_menu(&query)
        .await
        .map_err(food_error_to_response)?;
    Ok(Json(items))
}

/// Get one menu item
#[instrument(skip(state))]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<MenuItem>, ApiError> {
    let item = state
        .catalog
        .fetch_menu_item(&item_id)
        .await
        .map_err(food_error_to_response)?;
    Ok(Json(item))
}

/// List all categories
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state
        .catalog
        .fetch_categories()
        .await
        .map_err(food_error_to_response)?;
    Ok(Json(categories))
}

/// Topping and side options
pub async fn list_customizations(State(state): State<AppState>) -> Json<CustomizationMenu> {
    Json(state.customizations.as_ref().clone())
}

/// Cart contents and summary
pub async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    Json(cart_view(&state))
}

/// Empty the cart
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<AppState>) -> Json<CartView> {
    let view = mutate_cart(&state, Cart::clear);
    info!("Cart cleared");
    Json(view)
}

/// Add a menu item with its selection to the cart
#[instrument(skip(state, request), fields(item = %request.menu_item_id, quantity = request.quantity))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    if request.quantity == 0 || request.quantity > MAX_ADD_QUANTITY {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Quantity must be between 1 and {}", MAX_ADD_QUANTITY),
                400,
            )),
        ));
    }

    let currency = state.config.currency;
    let selection = resolve_selection(&state.customizations, &request.customizations, currency)
        .map_err(food_error_to_response)?;

    let menu_item = state
        .catalog
        .fetch_menu_item(&request.menu_item_id)
        .await
        .map_err(food_error_to_response)?;
    let draft = menu_item
        .to_cart_draft(currency, selection)
        .map_err(food_error_to_response)?;

    let view = mutate_cart(&state, |cart| cart.add_item_n(draft, request.quantity));
    info!("Added {} x {}", request.quantity, menu_item.name);

    Ok(Json(view))
}

/// Remove a line regardless of quantity
#[instrument(skip(state, request), fields(item = %request.id))]
pub async fn remove_item(
    State(state): State<AppState>,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartView>, ApiError> {
    update_line(&state, &request, Cart::remove_item)
}

/// Increase a line's quantity by one
#[instrument(skip(state, request), fields(item = %request.id))]
pub async fn increase_qty(
    State(state): State<AppState>,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartView>, ApiError> {
    update_line(&state, &request, Cart::increase_qty)
}

/// Decrease a line's quantity by one, removing it at zero
#[instrument(skip(state, request), fields(item = %request.id))]
pub async fn decrease_qty(
    State(state): State<AppState>,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartView>, ApiError> {
    update_line(&state, &request, Cart::decrease_qty)
}

fn update_line(
    state: &AppState,
    request: &LineRequest,
    op: fn(&mut Cart, &str, &CustomizationSet),
) -> Result<Json<CartView>, ApiError> {
    let selection = resolve_selection(
        &state.customizations,
        &request.customizations,
        state.config.currency,
    )
    .map_err(food_error_to_response)?;

    Ok(Json(mutate_cart(state, |cart| {
        op(cart, &request.id, &selection)
    })))
}

/// Register and sign in
#[instrument(skip(state, account), fields(email = %account.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(account): Json<NewAccount>,
) -> Result<Json<UserProfile>, ApiError> {
    let provider = auth_provider(&state)?;
    let mut auth = state.auth().lock().await;
    let profile = auth
        .sign_up(provider.as_ref(), &account)
        .await
        .map_err(food_error_to_response)?;
    Ok(Json(profile))
}

/// Sign in with email and password
#[instrument(skip(state, credentials), fields(email = %credentials.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<UserProfile>, ApiError> {
    let provider = auth_provider(&state)?;
    let mut auth = state.auth().lock().await;
    let profile = auth
        .sign_in(provider.as_ref(), &credentials)
        .await
        .map_err(food_error_to_response)?;
    Ok(Json(profile))
}

/// End the current session
#[instrument(skip(state))]
pub async fn sign_out(State(state): State<AppState>) -> Result<Json<AuthState>, ApiError> {
    let provider = auth_provider(&state)?;
    let mut auth = state.auth().lock().await;
    auth.sign_out(provider.as_ref())
        .await
        .map_err(food_error_to_response)?;
    Ok(Json(auth.clone()))
}

/// Re-validate the session and report who is signed in
#[instrument(skip(state))]
pub async fn current_user(State(state): State<AppState>) -> Result<Json<AuthState>, ApiError> {
    let provider = auth_provider(&state)?;
    let mut auth = state.auth().lock().await;
    auth.fetch_authenticated_user(provider.as_ref()).await;
    Ok(Json(auth.clone()))
}
