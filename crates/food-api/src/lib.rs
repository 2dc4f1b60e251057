//! # food-api
//!
//! HTTP API layer for food-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the menu, the cart and authentication
//! - A single shared cart and auth state per process
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/menu` | List menu items (`category`, `query`) |
//! | GET | `/api/v1/menu/:id` | Get menu item |
//! | GET | `/api/v1/categories` | List categories |
//! | GET | `/api/v1/customizations` | Toppings and sides |
//! | GET | `/api/v1/cart` | Cart and payment summary |
//! | DELETE | `/api/v1/cart` | Clear cart |
//! | POST | `/api/v1/cart/items` | Add item |
//! | POST | `/api/v1/cart/items/remove` | Remove line |
//! | POST | `/api/v1/cart/items/increase` | Increment line |
//! | POST | `/api/v1/cart/items/decrease` | Decrement line |
//! | POST | `/api/v1/auth/sign-up` | Register and sign in |
//! | POST | `/api/v1/auth/sign-in` | Sign in |
//! | POST | `/api/v1/auth/sign-out` | Sign out |
//! | GET | `/api/v1/auth/me` | Current user |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
