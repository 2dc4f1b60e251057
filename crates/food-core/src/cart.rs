//! # Cart Engine
//!
//! In-memory shopping cart for food-cart.
//!
//! A line item's identity is its catalog id plus its customization
//! selection: adding the same meal with the same add-ons bumps the
//! quantity, any other combination becomes a separate line.
//!
//! ```text
//! add_item ───────► existing line? ── yes ──► quantity += 1
//!                          │
//!                          no ──────────────► push (quantity = 1)
//!
//! decrease_qty ───► quantity -= 1 ──► quantity == 0 ? remove : keep
//! ```
//!
//! Every operation is total: unknown lines are ignored, nothing fails.
//! Quantities saturate at `u32::MAX`.

use crate::customization::CustomizationSet;
use crate::error::FoodError;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the caller hands to [`Cart::add_item`]: catalog fields captured
/// at add time plus the selected customizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemDraft {
    /// Catalog item id
    pub id: String,

    /// Display name
    pub name: String,

    /// Base unit price
    pub price: Money,

    /// Image reference
    pub image_url: String,

    #[serde(default)]
    pub customizations: CustomizationSet,
}

impl CartItemDraft {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: image_url.into(),
            customizations: CustomizationSet::new(),
        }
    }

    /// Builder: set customizations
    pub fn with_customizations(mut self, customizations: CustomizationSet) -> Self {
        self.customizations = customizations;
        self
    }
}

/// One distinguishable entry in the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Catalog item id (not unique within the cart)
    pub id: String,

    /// Name at time of adding (frozen)
    pub name: String,

    /// Base unit price at time of adding (frozen)
    pub price: Money,

    /// Image reference at time of adding (frozen)
    pub image_url: String,

    /// Always >= 1 while the line is in the cart
    pub quantity: u32,

    #[serde(default)]
    pub customizations: CustomizationSet,
}

impl CartLineItem {
    fn from_draft(draft: CartItemDraft) -> Self {
        Self {
            id: draft.id,
            name: draft.name,
            price: draft.price,
            image_url: draft.image_url,
            quantity: 1,
            customizations: draft.customizations,
        }
    }

    /// Whether this line is the given (id, selection) combination
    pub fn matches(&self, id: &str, customizations: &CustomizationSet) -> bool {
        self.id == id && self.customizations.same_selection(customizations)
    }

    /// Base price plus all customization prices
    pub fn unit_price(&self) -> Money {
        self.price + self.customizations.price()
    }

    /// Unit price times quantity
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - No two lines share both catalog id and customization selection
/// - Every line has quantity >= 1
///
/// Serializes as the array of its lines. Deserializing checks both
/// invariants; the creation time restarts at load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,

    /// When the cart was created or last cleared
    created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Line items in insertion order
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for an (id, selection) combination
    pub fn find(&self, id: &str, customizations: &CustomizationSet) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.matches(id, customizations))
    }

    fn find_mut(&mut self, id: &str, customizations: &CustomizationSet) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|i| i.matches(id, customizations))
    }

    /// Add one unit.
    ///
    /// Bumps the matching line if there is one (its name, price and image
    /// stay as first captured); otherwise appends a new line.
    pub fn add_item(&mut self, item: CartItemDraft) {
        if let Some(line) = self.find_mut(&item.id, &item.customizations) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.items.push(CartLineItem::from_draft(item));
    }

    /// Add `count` units, same as calling [`Cart::add_item`] `count` times
    pub fn add_item_n(&mut self, item: CartItemDraft, count: u32) {
        if count == 0 {
            return;
        }
        match self.find_mut(&item.id, &item.customizations) {
            Some(line) => line.quantity = line.quantity.saturating_add(count),
            None => {
                let mut line = CartLineItem::from_draft(item);
                line.quantity = count;
                self.items.push(line);
            }
        }
    }

    /// Drop the matching line regardless of its quantity
    pub fn remove_item(&mut self, id: &str, customizations: &CustomizationSet) {
        self.items.retain(|i| !i.matches(id, customizations));
    }

    /// Add one unit to an existing line; never creates a line
    pub fn increase_qty(&mut self, id: &str, customizations: &CustomizationSet) {
        if let Some(line) = self.find_mut(id, customizations) {
            line.quantity = line.quantity.saturating_add(1);
        }
    }

    /// Take one unit off an existing line, removing it at zero
    pub fn decrease_qty(&mut self, id: &str, customizations: &CustomizationSet) {
        if let Some(line) = self.find_mut(id, customizations) {
            line.quantity = line.quantity.saturating_sub(1);
        }
        self.items.retain(|i| i.quantity > 0);
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Sum of quantities, saturating at `u32::MAX`
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, i| total.saturating_add(i.quantity))
    }

    /// Sum of `(base + customizations) * quantity` over all lines
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = FoodError;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        let mut cart = Cart::new();
        for line in items {
            if line.quantity == 0 {
                return Err(FoodError::InvalidRequest(format!(
                    "cart line {} has quantity 0",
                    line.id
                )));
            }
            if cart.find(&line.id, &line.customizations).is_some() {
                return Err(FoodError::InvalidRequest(format!(
                    "cart line {} appears twice with the same customizations",
                    line.id
                )));
            }
            cart.items.push(line);
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

/// Payment summary shown under the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total_items: u32,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub discount: Money,
    pub total: Money,
}

impl OrderSummary {
    /// Summarize a cart. An empty cart carries no fee or discount.
    pub fn for_cart(cart: &Cart, delivery_fee: Money, discount: Money) -> Self {
        if cart.is_empty() {
            return Self {
                total_items: 0,
                subtotal: Money::ZERO,
                delivery_fee: Money::ZERO,
                discount: Money::ZERO,
                total: Money::ZERO,
            };
        }

        let subtotal = cart.total_price();
        Self {
            total_items: cart.total_items(),
            subtotal,
            delivery_fee,
            discount,
            total: (subtotal + delivery_fee).saturating_sub(discount),
        }
    }
}
