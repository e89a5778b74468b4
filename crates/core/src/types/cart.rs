//! Cart line items.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::DisplayPrice;
use super::product::Product;

/// A single product entry held in the cart.
///
/// Derived from a [`Product`] at add-time and persisted as part of the cart
/// sequence. The JSON field names (`priceValue` in particular) are shared with
/// the checkout backend and with carts saved by earlier page versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    pub price: DisplayPrice,
    /// Numeric value parsed from `price` when the item was added.
    #[serde(rename = "priceValue")]
    pub price_value: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLineItem {
    /// Derive a line item from a catalog product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price.clone(),
            price_value: product.price.numeric_value(),
            image: product.image.clone(),
        }
    }
}

impl From<&Product> for CartLineItem {
    fn from(product: &Product) -> Self {
        Self::from_product(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_product_parses_price() {
        let mut product = Product::new("p1", "Phonics Pack", "$12.50");
        product.image = Some("assets/phonics.png".to_string());

        let item = CartLineItem::from_product(&product);
        assert_eq!(item.id.as_str(), "p1");
        assert_eq!(item.title, "Phonics Pack");
        assert_eq!(item.price.as_str(), "$12.50");
        assert!((item.price_value - 12.5).abs() < f64::EPSILON);
        assert_eq!(item.image.as_deref(), Some("assets/phonics.png"));
    }

    #[test]
    fn test_wire_format_uses_camel_case_price_value() {
        let item = CartLineItem::from_product(&Product::new("p1", "Pack", "$24.00"));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "p1",
                "title": "Pack",
                "price": "$24.00",
                "priceValue": 24.0,
                "image": null
            })
        );
    }

    #[test]
    fn test_decodes_item_saved_without_image() {
        let item: CartLineItem = serde_json::from_value(json!({
            "id": "p2",
            "title": "Reader",
            "price": "$9",
            "priceValue": 9
        }))
        .unwrap();
        assert!(item.image.is_none());
        assert!((item.price_value - 9.0).abs() < f64::EPSILON);
    }
}
