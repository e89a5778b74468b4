//! Product card rendering.
//!
//! Rendering is split in two steps:
//!
//! 1. A pure transform, [`ProductCard::from_product`], turns a catalog record
//!    into a display model (badge, image fallback, pricing label, action).
//! 2. Askama templates turn display models into HTML fragments that a
//!    [`Ui`](crate::ui::Ui) applies to the page.
//!
//! A page shows either "buy now" links or "add to cart" buttons, selected by
//! [`CardMode`]. A single card never carries both.

use std::str::FromStr;

use askama::Template;

use little_oat_core::{Product, ProductId};

/// Image used when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder.png";

/// Descriptions longer than this (in characters) collapse behind a toggle.
pub const COLLAPSE_THRESHOLD: usize = 150;

/// Shown in the grid while the catalog request is in flight.
pub const LOADING_MESSAGE: &str = "Loading products...";

/// Shown when the catalog is unavailable or empty.
pub const MAINTENANCE_MESSAGE: &str =
    "Unable to load products at this time. Please try again later.";

pub const BUY_NOW_LABEL: &str = "Buy Now";
pub const ADD_TO_CART_LABEL: &str = "Add to Cart";
pub const ADDED_LABEL: &str = "Added!";
pub const ALREADY_IN_CART_LABEL: &str = "Already in Cart";

/// Which action control the page puts on its cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardMode {
    /// "Add to cart" buttons feeding the cart store.
    #[default]
    Cart,
    /// "Buy now" links to each product's external checkout.
    BuyNow,
}

impl FromStr for CardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cart" => Ok(Self::Cart),
            "buy-now" | "buy_now" | "buynow" => Ok(Self::BuyNow),
            other => Err(format!("expected 'cart' or 'buy-now', got '{other}'")),
        }
    }
}

/// A card's call-to-action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Outbound link opened in a new context.
    BuyNow { href: String },
    /// Button that adds the product to the cart.
    AddToCart,
}

impl CardAction {
    /// Link target for "buy now" cards.
    #[must_use]
    pub fn buy_now_href(&self) -> Option<&str> {
        match self {
            Self::BuyNow { href } => Some(href),
            Self::AddToCart => None,
        }
    }

    #[must_use]
    pub const fn is_add_to_cart(&self) -> bool {
        matches!(self, Self::AddToCart)
    }
}

/// Price and billing period shown on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingLine {
    pub price: String,
    /// `one-time`, `/month`, `every 3 months`, ...
    pub period: String,
}

/// State of a collapsible description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionToggle {
    #[default]
    Collapsed,
    Expanded,
}

impl DescriptionToggle {
    /// Label of the toggle control in this state.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Collapsed => "Show more",
            Self::Expanded => "Show less",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    #[must_use]
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }
}

/// Display model for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub badge: Option<String>,
    pub image: String,
    pub image_alt: String,
    pub title: String,
    pub description: String,
    pub collapsible: bool,
    pub features: Vec<String>,
    pub pricing: PricingLine,
    pub action: CardAction,
}

impl ProductCard {
    /// Build the card for a product.
    #[must_use]
    pub fn from_product(product: &Product, mode: CardMode) -> Self {
        let action = match mode {
            CardMode::BuyNow => CardAction::BuyNow {
                href: product
                    .buy_url
                    .clone()
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| "#".to_string()),
            },
            CardMode::Cart => CardAction::AddToCart,
        };

        Self {
            id: product.id.clone(),
            badge: product.category.clone().filter(|c| !c.is_empty()),
            image: product
                .image
                .clone()
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            image_alt: product.title.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            collapsible: product.description.chars().count() > COLLAPSE_THRESHOLD,
            features: product.features().to_vec(),
            pricing: PricingLine {
                price: product.price.to_string(),
                period: product.pricing_plan().period_label(),
            },
            action,
        }
    }

    /// Category badge text, if any.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    /// Render this card alone.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_html(&self) -> askama::Result<String> {
        ProductCardTemplate {
            card: self,
            collapsed_label: DescriptionToggle::Collapsed.label(),
            buy_now_label: BUY_NOW_LABEL,
            add_to_cart_label: ADD_TO_CART_LABEL,
        }
        .render()
    }
}

/// What the product grid currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductGrid {
    Loading,
    Maintenance,
    Cards(Vec<ProductCard>),
}

impl ProductGrid {
    /// Grid for a fetched catalog. No products means the maintenance state.
    #[must_use]
    pub fn from_products(products: &[Product], mode: CardMode) -> Self {
        if products.is_empty() {
            return Self::Maintenance;
        }
        Self::Cards(
            products
                .iter()
                .map(|p| ProductCard::from_product(p, mode))
                .collect(),
        )
    }

    /// Cards in the grid (empty for loading and maintenance states).
    #[must_use]
    pub fn cards(&self) -> &[ProductCard] {
        match self {
            Self::Cards(cards) => cards,
            Self::Loading | Self::Maintenance => &[],
        }
    }

    /// Render the grid contents.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_html(&self) -> askama::Result<String> {
        let message = match self {
            Self::Loading => Some(LOADING_MESSAGE),
            Self::Maintenance => Some(MAINTENANCE_MESSAGE),
            Self::Cards(_) => None,
        };
        ProductGridTemplate {
            message,
            cards: self.cards(),
            collapsed_label: DescriptionToggle::Collapsed.label(),
            buy_now_label: BUY_NOW_LABEL,
            add_to_cart_label: ADD_TO_CART_LABEL,
        }
        .render()
    }
}

/// Single product card fragment template.
#[derive(Template)]
#[template(path = "partials/product_card.html")]
struct ProductCardTemplate<'a> {
    card: &'a ProductCard,
    collapsed_label: &'a str,
    buy_now_label: &'a str,
    add_to_cart_label: &'a str,
}

/// Product grid fragment template.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
struct ProductGridTemplate<'a> {
    message: Option<&'a str>,
    cards: &'a [ProductCard],
    collapsed_label: &'a str,
    buy_now_label: &'a str,
    add_to_cart_label: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn math_bundle() -> Product {
        let mut product = Product::new("prod_123", "Grade 1 Math Mastery Bundle", "$29.00");
        product.description = "Complete curriculum for Grade 1 Math.".to_string();
        product.category = Some("math".to_string());
        product.features = Some(vec!["50+ worksheets".to_string(), "Quizzes".to_string()]);
        product.buy_url = Some("https://store.example.com/buy/123".to_string());
        product
    }

    #[test]
    fn test_card_from_product_cart_mode() {
        let card = ProductCard::from_product(&math_bundle(), CardMode::Cart);
        assert_eq!(card.badge(), Some("math"));
        assert_eq!(card.image, PLACEHOLDER_IMAGE);
        assert_eq!(card.image_alt, "Grade 1 Math Mastery Bundle");
        assert_eq!(
            card.pricing,
            PricingLine {
                price: "$29.00".to_string(),
                period: "one-time".to_string(),
            }
        );
        assert_eq!(card.action, CardAction::AddToCart);
        assert!(!card.collapsible);
    }

    #[test]
    fn test_card_from_product_buy_now_mode() {
        let card = ProductCard::from_product(&math_bundle(), CardMode::BuyNow);
        assert_eq!(
            card.action.buy_now_href(),
            Some("https://store.example.com/buy/123")
        );

        let mut no_link = math_bundle();
        no_link.buy_url = None;
        let card = ProductCard::from_product(&no_link, CardMode::BuyNow);
        assert_eq!(card.action.buy_now_href(), Some("#"));
    }

    #[test]
    fn test_subscription_pricing_labels() {
        let mut product = math_bundle();
        product.is_subscription = Some(true);
        product.interval = Some("month".to_string());
        product.interval_count = Some(1);
        let card = ProductCard::from_product(&product, CardMode::Cart);
        assert_eq!(card.pricing.period, "/month");

        product.interval_count = Some(3);
        let card = ProductCard::from_product(&product, CardMode::Cart);
        assert_eq!(card.pricing.period, "every 3 months");
    }

    #[test]
    fn test_long_description_is_collapsible() {
        let mut product = math_bundle();
        product.description = "a".repeat(COLLAPSE_THRESHOLD + 1);
        let card = ProductCard::from_product(&product, CardMode::Cart);
        assert!(card.collapsible);

        let html = card.to_html().unwrap();
        assert!(html.contains("description-toggle"));
        assert!(html.contains("Show more"));
    }

    #[test]
    fn test_description_toggle() {
        let state = DescriptionToggle::default();
        assert_eq!(state.label(), "Show more");
        assert_eq!(state.toggled().label(), "Show less");
        assert_eq!(state.toggled().toggled(), DescriptionToggle::Collapsed);
    }

    #[test]
    fn test_card_html_has_exactly_one_action() {
        let cart_html = ProductCard::from_product(&math_bundle(), CardMode::Cart)
            .to_html()
            .unwrap();
        assert!(cart_html.contains("add-to-cart-btn"));
        assert!(!cart_html.contains("buy-now-btn"));

        let buy_html = ProductCard::from_product(&math_bundle(), CardMode::BuyNow)
            .to_html()
            .unwrap();
        assert!(buy_html.contains("buy-now-btn"));
        assert!(buy_html.contains("target=\"_blank\""));
        assert!(!buy_html.contains("add-to-cart-btn"));
    }

    #[test]
    fn test_card_html_optional_sections() {
        let mut product = Product::new("bare", "Bare Product", "$1");
        product.features = Some(Vec::new());
        let html = ProductCard::from_product(&product, CardMode::Cart)
            .to_html()
            .unwrap();
        assert!(!html.contains("product-badge"));
        assert!(!html.contains("product-features"));

        let html = ProductCard::from_product(&math_bundle(), CardMode::Cart)
            .to_html()
            .unwrap();
        assert!(html.contains("<div class=\"product-badge\">math</div>"));
        assert!(html.contains("<li>50+ worksheets</li>"));
    }

    #[test]
    fn test_empty_catalog_renders_maintenance() {
        let grid = ProductGrid::from_products(&[], CardMode::Cart);
        assert_eq!(grid, ProductGrid::Maintenance);
        assert!(grid.cards().is_empty());

        let html = grid.to_html().unwrap();
        assert!(html.contains(MAINTENANCE_MESSAGE));
        assert!(!html.contains("product-card"));
    }

    #[test]
    fn test_grid_renders_one_card_per_product() {
        let products = vec![math_bundle(), Product::new("p2", "Phonics", "$24.00")];
        let grid = ProductGrid::from_products(&products, CardMode::Cart);
        assert_eq!(grid.cards().len(), 2);

        let html = grid.to_html().unwrap();
        assert_eq!(html.matches("<article class=\"product-card\"").count(), 2);
    }

    #[test]
    fn test_loading_grid() {
        let html = ProductGrid::Loading.to_html().unwrap();
        assert!(html.contains(LOADING_MESSAGE));
    }

    #[test]
    fn test_card_mode_parsing() {
        assert_eq!("cart".parse::<CardMode>().unwrap(), CardMode::Cart);
        assert_eq!("Buy-Now".parse::<CardMode>().unwrap(), CardMode::BuyNow);
        assert!("both".parse::<CardMode>().is_err());
    }
}
