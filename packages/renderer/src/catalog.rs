//! Catalog data handed to commerce blocks.
//!
//! Products and categories are owned by the store dashboard; rendering only
//! reads them.

use crate::errors::RenderError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub slug: Option<String>,

    /// Price in the currency's minor unit
    pub price_cents: i64,

    #[serde(default)]
    pub compare_at_cents: Option<i64>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub category_id: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            price_cents,
            compare_at_cents: None,
            image_url: None,
            category_id: None,
        }
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Storefront link for the product page
    pub fn href(&self) -> String {
        format!("/products/{}", self.slug.as_deref().unwrap_or(&self.id))
    }

    pub fn is_on_sale(&self) -> bool {
        self.compare_at_cents.is_some_and(|c| c > self.price_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,

    /// Digits in the minor unit (2 for USD, 0 for JPY)
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_decimals() -> u32 {
    2
}

impl Currency {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn usd() -> Self {
        Self::new("USD", "$", 2)
    }

    pub fn format_price(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let amount = cents.unsigned_abs();

        if self.decimals == 0 {
            return format!("{sign}{}{}", self.symbol, group_thousands(amount));
        }

        let scale = 10u64.pow(self.decimals);
        format!(
            "{sign}{}{}.{:0width$}",
            self.symbol,
            group_thousands(amount / scale),
            amount % scale,
            width = self.decimals as usize
        )
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub currency: Currency,
}

impl Catalog {
    pub fn new(products: Vec<Product>, currency: Currency) -> Self {
        Self {
            products,
            categories: Vec::new(),
            currency,
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn from_json(source: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products for a grid, optionally filtered to one category
    pub fn products_for_grid(&self, category_id: Option<&str>, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| match category_id {
                Some(id) => p.category_id.as_deref() == Some(id),
                None => true,
            })
            .take(limit)
            .collect()
    }

    /// Categories by id, in the order requested; unknown ids are skipped
    pub fn categories_by_id<'a>(&'a self, ids: &[&str]) -> Vec<&'a Category> {
        if ids.is_empty() {
            return self.categories.iter().collect();
        }
        ids.iter()
            .filter_map(|id| self.categories.iter().find(|c| c.id == *id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        let usd = Currency::usd();
        assert_eq!(usd.format_price(1999), "$19.99");
        assert_eq!(usd.format_price(5), "$0.05");
        assert_eq!(usd.format_price(123_456_789), "$1,234,567.89");
        assert_eq!(usd.format_price(-250), "-$2.50");

        let yen = Currency::new("JPY", "¥", 0);
        assert_eq!(yen.format_price(1500), "¥1,500");
    }

    #[test]
    fn test_grid_filters_and_limits() {
        let catalog = Catalog::new(
            vec![
                Product::new("p1", "Mug", 1200).in_category("kitchen"),
                Product::new("p2", "Shirt", 2500).in_category("apparel"),
                Product::new("p3", "Plate", 900).in_category("kitchen"),
                Product::new("p4", "Bowl", 800).in_category("kitchen"),
            ],
            Currency::usd(),
        );

        let kitchen: Vec<&str> = catalog
            .products_for_grid(Some("kitchen"), 2)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(kitchen, vec!["p1", "p3"]);
        assert_eq!(catalog.products_for_grid(None, 10).len(), 4);
    }

    #[test]
    fn test_catalog_from_json_defaults() {
        let catalog = Catalog::from_json(r#"{"products":[{"id":"p1","name":"Mug","priceCents":1200}]}"#).unwrap();
        assert_eq!(catalog.currency, Currency::usd());
        assert_eq!(catalog.product("p1").unwrap().href(), "/products/p1");
    }
}
