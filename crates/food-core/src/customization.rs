//! # Customizations
//!
//! Add-ons (toppings, sides) attached to a cart line item.
//!
//! Raw option data from the menu is turned into a [`CartCustomization`]
//! through a validated constructor; a line item's customizations live in a
//! [`CustomizationSet`], which is keyed by id and never holds duplicates.

use crate::error::{FoodError, FoodResult};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of add-on offered on the meal details screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomizationKind {
    Topping,
    Side,
}

impl CustomizationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomizationKind::Topping => "topping",
            CustomizationKind::Side => "side",
        }
    }
}

impl std::fmt::Display for CustomizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable add-on as it appears in the menu data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOption {
    /// Display name (e.g., "Avocado")
    pub name: String,

    /// Decimal price
    pub price: f64,

    /// Optional image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CustomizationOption {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            image: None,
        }
    }
}

/// A modifier on one cart line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCustomization {
    /// Unique within one line item's set (e.g., "topping-2")
    pub id: String,

    /// Display label
    pub name: String,

    /// Added once per unit of quantity
    pub price: Money,

    /// Free-form tag ("topping", "side", ...); not interpreted by the cart
    #[serde(rename = "type")]
    pub kind: String,
}

impl CartCustomization {
    /// Build a customization from raw fields, rejecting malformed input.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        kind: impl Into<String>,
    ) -> FoodResult<Self> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(FoodError::InvalidCustomization(
                "customization id must not be empty".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(FoodError::InvalidCustomization(format!(
                "customization {} has no name",
                id
            )));
        }
        if price < Money::ZERO {
            return Err(FoodError::InvalidPrice {
                message: format!("customization {} has a negative price", id),
            });
        }

        Ok(Self {
            id,
            name,
            price,
            kind: kind.into(),
        })
    }

    /// Build from a menu option at its display position.
    ///
    /// The id is `"{kind}-{index}"`, so toggling the same option twice
    /// always produces the same identity.
    pub fn from_option(
        kind: CustomizationKind,
        index: usize,
        option: &CustomizationOption,
        currency: Currency,
    ) -> FoodResult<Self> {
        let price = Money::from_decimal(option.price, currency)?;
        Self::new(
            format!("{}-{}", kind, index),
            option.name.clone(),
            price,
            kind.as_str(),
        )
    }
}

/// The customizations of one line item, keyed by id.
///
/// Serializes as a plain array; deserializing an array with a repeated id
/// fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<CartCustomization>",
    into = "Vec<CartCustomization>"
)]
pub struct CustomizationSet {
    by_id: BTreeMap<String, CartCustomization>,
}

impl CustomizationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a customization; fails if the id is already present
    pub fn insert(&mut self, customization: CartCustomization) -> FoodResult<()> {
        if self.by_id.contains_key(&customization.id) {
            return Err(FoodError::DuplicateCustomization {
                id: customization.id,
            });
        }
        self.by_id.insert(customization.id.clone(), customization);
        Ok(())
    }

    /// Builder: add a customization
    pub fn with(mut self, customization: CartCustomization) -> FoodResult<Self> {
        self.insert(customization)?;
        Ok(self)
    }

    /// Add the option if absent, drop it if present
    pub fn toggle(&mut self, customization: CartCustomization) {
        if self.by_id.remove(&customization.id).is_none() {
            self.by_id.insert(customization.id.clone(), customization);
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Customizations in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &CartCustomization> {
        self.by_id.values()
    }

    /// Ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    /// Sum of the customization prices (per unit)
    pub fn price(&self) -> Money {
        self.iter().map(|c| c.price).sum()
    }

    /// Identity comparison used by the cart.
    ///
    /// Two sets are the same selection when they hold the same ids; name,
    /// price and type are ignored. Keys are kept sorted, so this is a
    /// length check followed by a pairwise walk.
    pub fn same_selection(&self, other: &CustomizationSet) -> bool {
        self.len() == other.len() && self.ids().zip(other.ids()).all(|(a, b)| a == b)
    }
}

impl TryFrom<Vec<CartCustomization>> for CustomizationSet {
    type Error = FoodError;

    fn try_from(items: Vec<CartCustomization>) -> Result<Self, Self::Error> {
        let mut set = CustomizationSet::new();
        for item in items {
            set.insert(item)?;
        }
        Ok(set)
    }
}

impl From<CustomizationSet> for Vec<CartCustomization> {
    fn from(set: CustomizationSet) -> Self {
        set.by_id.into_values().collect()
    }
}
