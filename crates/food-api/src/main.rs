//! # Food-Cart RS
//!
//! Food ordering cart service.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: use an Appwrite project for menu and accounts
//! export APPWRITE_ENDPOINT=https://cloud.appwrite.io/v1
//! export APPWRITE_PROJECT_ID=...
//!
//! # Optional: JSON logs
//! export LOG_FORMAT=json
//!
//! # Run the server
//! food-cart
//! ```

use food_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; LOG_FORMAT=json switches to structured output
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Currency: {}", state.config.currency);
    info!("Menu provider: {}", state.catalog.provider_name());
    match state.auth_provider {
        Some(ref auth) => info!("Auth provider: {}", auth.provider_name()),
        None => info!("Auth provider: none"),
    }

    let app = routes::create_router(state);

    info!("🍔 Food-Cart starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("📋 Menu: GET http://{}/api/v1/menu", addr);
        info!("🛒 Cart: GET http://{}/api/v1/cart", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🍔 Food-Cart RS 🍔
  ━━━━━━━━━━━━━━━━━━━━━━━
  Food ordering cart engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
