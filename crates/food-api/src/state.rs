//! # Application State
//!
//! Shared state for the Axum application.
//! Owns the one cart and the auth state, plus the catalog/auth providers
//! and configuration. Handlers receive it through `State`.

use food_appwrite::{AppwriteAuth, AppwriteCatalog, AppwriteClient, AppwriteConfig};
use food_core::{
    AuthState, BoxedAuthProvider, BoxedCatalogProvider, Cart, Currency, CustomizationMenu, Money,
    OrderSummary, StaticCatalog,
};
use std::sync::{Arc, Mutex};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Currency of all menu prices
    pub currency: Currency,
    /// Flat delivery fee added to non-empty orders
    pub delivery_fee: Money,
    /// Flat discount taken off non-empty orders
    pub discount: Money,
    /// Explicit path of the bundled menu file
    pub menu_config: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let currency: Currency = std::env::var("CURRENCY")
            .unwrap_or_else(|_| "usd".to_string())
            .parse()?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            currency,
            delivery_fee: money_from_env("DELIVERY_FEE", 5.0, currency)?,
            discount: money_from_env("DISCOUNT", 2.0, currency)?,
            menu_config: std::env::var("MENU_CONFIG").ok().filter(|p| !p.is_empty()),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            currency: Currency::USD,
            delivery_fee: Money::from_cents(500),
            discount: Money::from_cents(200),
            menu_config: None,
        }
    }
}

fn money_from_env(key: &str, default: f64, currency: Currency) -> anyhow::Result<Money> {
    let amount = match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e))?,
        Err(_) => default,
    };
    Ok(Money::from_decimal(amount, currency)?)
}

/// Shared application state.
///
/// The service is single-user: there is one cart and one signed-in user
/// per process, shared by every client.
#[derive(Clone)]
pub struct AppState {
    /// Menu source
    pub catalog: BoxedCatalogProvider,
    /// Account backend, absent when no backend is configured
    pub auth_provider: Option<BoxedAuthProvider>,
    /// Toppings and sides
    pub customizations: Arc<CustomizationMenu>,
    /// Application config
    pub config: AppConfig,
    cart: Arc<Mutex<Cart>>,
    auth: Arc<tokio::sync::Mutex<AuthState>>,
}

impl AppState {
    /// Create the state from the environment.
    ///
    /// Uses Appwrite when `APPWRITE_ENDPOINT` is set, otherwise serves the
    /// bundled menu without authentication.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let menu = load_static_catalog(config.menu_config.as_deref())?;

        let state = match AppwriteConfig::from_env_optional()? {
            Some(appwrite) => {
                tracing::info!("Using Appwrite at {}", appwrite.endpoint);
                let client = AppwriteClient::new(appwrite)?;
                let catalog: BoxedCatalogProvider = Arc::new(AppwriteCatalog::new(client.clone()));
                let auth: BoxedAuthProvider = Arc::new(AppwriteAuth::new(client));
                Self::with_providers(config, catalog, Some(auth), menu.customizations)
            }
            None => {
                tracing::warn!("APPWRITE_ENDPOINT not set, serving the bundled menu");
                let customizations = menu.customizations.clone();
                Self::with_providers(config, Arc::new(menu), None, customizations)
            }
        };

        Ok(state)
    }

    /// Assemble the state from explicit parts
    pub fn with_providers(
        config: AppConfig,
        catalog: BoxedCatalogProvider,
        auth_provider: Option<BoxedAuthProvider>,
        customizations: CustomizationMenu,
    ) -> Self {
        Self {
            catalog,
            auth_provider,
            customizations: Arc::new(customizations),
            config,
            cart: Arc::new(Mutex::new(Cart::new())),
            auth: Arc::new(tokio::sync::Mutex::new(AuthState::new())),
        }
    }

    /// Run one operation against the cart under its lock
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> R {
        // Cart operations cannot leave the cart half-updated, so a poisoned
        // lock still guards a valid cart.
        let mut cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut cart)
    }

    /// Payment summary with the configured fee and discount
    pub fn summary(&self, cart: &Cart) -> OrderSummary {
        OrderSummary::for_cart(cart, self.config.delivery_fee, self.config.discount)
    }

    /// The signed-in user's state
    pub fn auth(&self) -> &tokio::sync::Mutex<AuthState> {
        &self.auth
    }
}

/// Load the bundled menu from config file
fn load_static_catalog(explicit: Option<&str>) -> anyhow::Result<StaticCatalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        return parse_catalog(path, &content);
    }

    let config_paths = [
        "config/menu.toml",
        "../config/menu.toml",
        "../../config/menu.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            return parse_catalog(path, &content);
        }
    }

    // Return empty catalog if no config found
    tracing::warn!("No menu file found, using empty catalog");
    Ok(StaticCatalog::new())
}

fn parse_catalog(path: &str, content: &str) -> anyhow::Result<StaticCatalog> {
    let catalog = StaticCatalog::from_toml(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
    tracing::info!(
        "Loaded {} menu items, {} toppings, {} sides from {}",
        catalog.items.len(),
        catalog.customizations.toppings.len(),
        catalog.customizations.sides.len(),
        path
    );
    Ok(catalog)
}
