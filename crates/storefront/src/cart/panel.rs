//! Cart panel view-model.

use askama::Template;

use little_oat_core::{CartLineItem, ProductId, format_usd};

use crate::render::PLACEHOLDER_IMAGE;

/// Shown in place of the line list when the cart has no items.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// One row of the cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub image: String,
}

impl From<&CartLineItem> for CartLineView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            price: item.price.to_string(),
            image: item
                .image
                .clone()
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// Everything the cart UI shows: count badges, total, and rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanel {
    pub count: usize,
    /// Formatted total (e.g. `$12.50`).
    pub total: String,
    pub lines: Vec<CartLineView>,
}

impl CartPanel {
    /// Build the panel for a cart.
    #[must_use]
    pub fn from_items(items: &[CartLineItem]) -> Self {
        let total: f64 = items.iter().map(|i| i.price_value).sum();
        Self {
            count: items.len(),
            total: format_usd(total),
            lines: items.iter().map(CartLineView::from).collect(),
        }
    }

    /// Whether the empty-state message is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the panel fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_html(&self) -> askama::Result<String> {
        CartPanelTemplate {
            panel: self,
            empty_message: EMPTY_CART_MESSAGE,
        }
        .render()
    }
}

/// Cart panel fragment template.
#[derive(Template)]
#[template(path = "partials/cart_panel.html")]
struct CartPanelTemplate<'a> {
    panel: &'a CartPanel,
    empty_message: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use little_oat_core::Product;

    use super::*;

    #[test]
    fn test_empty_panel() {
        let panel = CartPanel::from_items(&[]);
        assert_eq!(panel.count, 0);
        assert_eq!(panel.total, "$0.00");
        assert!(panel.is_empty());

        let html = panel.to_html().unwrap();
        assert!(html.contains(EMPTY_CART_MESSAGE));
        assert!(!html.contains("cart-item\""));
    }

    #[test]
    fn test_panel_rows_and_total() {
        let mut with_image = Product::new("p1", "Math Bundle", "$29.00");
        with_image.image = Some("https://cdn.example.com/math.png".to_string());
        let items = vec![
            CartLineItem::from_product(&with_image),
            CartLineItem::from_product(&Product::new("p2", "Phonics", "$24.00")),
        ];

        let panel = CartPanel::from_items(&items);
        assert_eq!(panel.count, 2);
        assert_eq!(panel.total, "$53.00");
        assert_eq!(panel.lines[0].image, "https://cdn.example.com/math.png");
        assert_eq!(panel.lines[1].image, PLACEHOLDER_IMAGE);

        let html = panel.to_html().unwrap();
        assert!(html.contains("data-remove-id=\"p2\""));
        assert!(html.contains("$53.00"));
        assert!(!html.contains(EMPTY_CART_MESSAGE));
    }

    #[test]
    fn test_panel_html_escapes_titles() {
        let items = vec![CartLineItem::from_product(&Product::new(
            "p1",
            "<script>alert(1)</script>",
            "$1",
        ))];
        let html = CartPanel::from_items(&items).to_html().unwrap();
        assert!(!html.contains("<script>"));
    }
}
