//! # food-core
//!
//! Core types and traits for the food-cart ordering service.
//!
//! This crate provides:
//! - `Cart`, `CartLineItem` and `OrderSummary`: the in-memory cart engine
//! - `CartCustomization` and `CustomizationSet` for toppings and sides
//! - `Money` and `Currency` (integer minor units)
//! - `MenuItem`, `Category`, `MenuQuery` and the bundled `StaticCatalog`
//! - `CatalogProvider` / `AuthProvider` traits for backend integrations
//! - `AuthState` for tracking the signed-in user
//! - `FoodError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use food_core::{Cart, CartItemDraft, CustomizationSet, Money};
//!
//! let mut cart = Cart::new();
//! let burger = CartItemDraft::new("burger-1", "Classic Burger", Money::from_cents(1000), "burger.png");
//!
//! cart.add_item(burger.clone());
//! cart.add_item(burger);
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price(), Money::from_cents(2000));
//!
//! cart.decrease_qty("burger-1", &CustomizationSet::new());
//! assert_eq!(cart.total_items(), 1);
//! ```

pub mod auth;
pub mod cart;
pub mod customization;
pub mod error;
pub mod menu;
pub mod money;
pub mod provider;

// Re-exports for convenience
pub use auth::{AuthState, Credentials, NewAccount, Session, UserProfile};
pub use cart::{Cart, CartItemDraft, CartLineItem, OrderSummary};
pub use customization::{
    CartCustomization, CustomizationKind, CustomizationOption, CustomizationSet,
};
pub use error::{FoodError, FoodResult};
pub use menu::{
    asset_url, Category, CustomizationMenu, MenuItem, MenuQuery, StaticCatalog, ALL_CATEGORIES,
};
pub use money::{Currency, Money};
pub use provider::{AuthProvider, BoxedAuthProvider, BoxedCatalogProvider, CatalogProvider};
