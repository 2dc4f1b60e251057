//! # Menu Types
//!
//! Menu items, categories and customization options.
//! The bundled catalog is loaded from `config/menu.toml`.

use crate::cart::CartItemDraft;
use crate::customization::{CartCustomization, CustomizationKind, CustomizationOption, CustomizationSet};
use crate::error::{FoodError, FoodResult};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Category value that disables category filtering
pub const ALL_CATEGORIES: &str = "All";

/// A dish on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,

    pub name: String,

    /// Decimal base price
    pub price: f64,

    pub image_url: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub calories: u32,

    /// Grams of protein
    #[serde(default)]
    pub protein: u32,

    /// Average rating on a 0-5 scale
    #[serde(default)]
    pub rating: f32,

    /// Category type (burger, pizza, ...)
    #[serde(default, rename = "type")]
    pub kind: String,

    /// Category ids this item belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: String::new(),
            description: String::new(),
            calories: 0,
            protein: 0,
            rating: 0.0,
            kind: String::new(),
            categories: Vec::new(),
        }
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Builder: set category type
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Capture this item for the cart with the given selection
    pub fn to_cart_draft(
        &self,
        currency: Currency,
        customizations: CustomizationSet,
    ) -> FoodResult<CartItemDraft> {
        let price = Money::from_decimal(self.price, currency)?;
        Ok(
            CartItemDraft::new(self.id.clone(), self.name.clone(), price, self.image_url.clone())
                .with_customizations(customizations),
        )
    }

    fn in_category(&self, category: &str) -> bool {
        self.kind.eq_ignore_ascii_case(category)
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
    }
}

/// A menu category used for filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Menu filter: optional category and optional name search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl MenuQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Category filter, `None` for absent, empty or "All"
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Search text, `None` for absent or blank
    pub fn search_filter(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Toppings and sides offered on the details screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizationMenu {
    #[serde(default)]
    pub toppings: Vec<CustomizationOption>,
    #[serde(default)]
    pub sides: Vec<CustomizationOption>,
}

impl CustomizationMenu {
    /// Options of one kind
    pub fn options(&self, kind: CustomizationKind) -> &[CustomizationOption] {
        match kind {
            CustomizationKind::Topping => &self.toppings,
            CustomizationKind::Side => &self.sides,
        }
    }

    /// Resolve the option at `index` into a cart customization
    pub fn select(
        &self,
        kind: CustomizationKind,
        index: usize,
        currency: Currency,
    ) -> FoodResult<CartCustomization> {
        let option = self.options(kind).get(index).ok_or_else(|| {
            FoodError::InvalidCustomization(format!("no {} at index {}", kind, index))
        })?;
        CartCustomization::from_option(kind, index, option, currency)
    }
}

/// Menu bundled with the service (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    #[serde(flatten)]
    pub customizations: CustomizationMenu,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a menu item
    pub fn add(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    /// Find an item by id
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Items matching the category filter and case-insensitive name search
    pub fn filter<'a>(&'a self, query: &'a MenuQuery) -> impl Iterator<Item = &'a MenuItem> + 'a {
        let category = query.category_filter();
        let search = query.search_filter().map(str::to_lowercase);

        self.items.iter().filter(move |item| {
            category.map_or(true, |c| item.in_category(c))
                && search
                    .as_deref()
                    .map_or(true, |q| item.name.to_lowercase().contains(q))
        })
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> FoodResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

/// Append the project id to an asset URL so the storage service serves it
pub fn asset_url(image_url: &str, project_id: &str) -> String {
    if image_url.is_empty() || project_id.is_empty() {
        return image_url.to_string();
    }
    let separator = if image_url.contains('?') { '&' } else { '?' };
    format!("{}{}project={}", image_url, separator, project_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"
[[categories]]
id = "burger"
name = "Burger"

[[categories]]
id = "pizza"
name = "Pizza"

[[items]]
id = "classic-cheeseburger"
name = "Classic Cheeseburger"
price = 25.99
image_url = "https://cdn.example.com/cheeseburger.png"
type = "burger"
categories = ["burger"]

[[items]]
id = "pepperoni-pizza"
name = "Pepperoni Pizza"
price = 30.99
image_url = "https://cdn.example.com/pepperoni.png"
type = "pizza"

[[items]]
id = "bbq-bacon-burger"
name = "BBQ Bacon Burger"
price = 27.5
image_url = "https://cdn.example.com/bbq.png"
type = "burger"

[[toppings]]
name = "Avocado"
price = 1.5

[[toppings]]
name = "Bacon"
price = 2.0

[[sides]]
name = "Fries"
price = 3.5
"#;

    fn catalog() -> StaticCatalog {
        StaticCatalog::from_toml(MENU).unwrap()
    }

    fn ids<'a>(items: impl Iterator<Item = &'a MenuItem>) -> Vec<&'a str> {
        items.map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_load_catalog() {
        let catalog = catalog();
        assert_eq!(catalog.items.len(), 3);
        assert_eq!(catalog.categories.len(), 2);
        assert_eq!(catalog.customizations.toppings.len(), 2);
        assert_eq!(catalog.customizations.sides[0].name, "Fries");
        assert_eq!(catalog.get("pepperoni-pizza").unwrap().kind, "pizza");
    }

    #[test]
    fn test_all_category_returns_everything() {
        let catalog = catalog();
        let query = MenuQuery::new().with_category(ALL_CATEGORIES);
        assert_eq!(catalog.filter(&query).count(), 3);
        assert_eq!(catalog.filter(&MenuQuery::new()).count(), 3);
    }

    #[test]
    fn test_filter_by_category_and_search() {
        let catalog = catalog();

        let burgers = MenuQuery::new().with_category("Burger");
        assert_eq!(
            ids(catalog.filter(&burgers)),
            vec!["classic-cheeseburger", "bbq-bacon-burger"]
        );

        let bacon = MenuQuery::new().with_search("bacon");
        assert_eq!(ids(catalog.filter(&bacon)), vec!["bbq-bacon-burger"]);

        let both = MenuQuery::new().with_category("pizza").with_search("bacon");
        assert_eq!(catalog.filter(&both).count(), 0);

        let blank = MenuQuery::new().with_search("   ");
        assert_eq!(catalog.filter(&blank).count(), 3);
    }

    #[test]
    fn test_select_customization() {
        let catalog = catalog();
        let bacon = catalog
            .customizations
            .select(CustomizationKind::Topping, 1, Currency::USD)
            .unwrap();
        assert_eq!(bacon.id, "topping-1");
        assert_eq!(bacon.price, Money::from_cents(200));

        assert!(catalog
            .customizations
            .select(CustomizationKind::Side, 7, Currency::USD)
            .is_err());
    }

    #[test]
    fn test_to_cart_draft() {
        let item = catalog().get("classic-cheeseburger").cloned().unwrap();
        let draft = item
            .to_cart_draft(Currency::USD, CustomizationSet::new())
            .unwrap();
        assert_eq!(draft.price, Money::from_cents(2599));
        assert_eq!(draft.image_url, item.image_url);

        let broken = MenuItem::new("x", "Broken", -1.0);
        assert!(broken.to_cart_draft(Currency::USD, CustomizationSet::new()).is_err());
    }

    #[test]
    fn test_asset_url() {
        assert_eq!(
            asset_url("https://cloud.example.com/v1/storage/files/1/view", "proj"),
            "https://cloud.example.com/v1/storage/files/1/view?project=proj"
        );
        assert_eq!(
            asset_url("https://cloud.example.com/view?mode=admin", "proj"),
            "https://cloud.example.com/view?mode=admin&project=proj"
        );
        assert_eq!(asset_url("", "proj"), "");
    }
}
