//! Catalog product records.
//!
//! Products are immutable once fetched. Decoding is lenient because the
//! catalog is an external service: missing or `null` text fields default to
//! empty strings, and numeric ids are accepted and kept as strings.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::DisplayPrice;

/// A purchasable product as returned by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "string_or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub description: String,
    #[serde(default, deserialize_with = "price_or_default")]
    pub price: DisplayPrice,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    /// External checkout link used by "buy now" cards.
    #[serde(default, rename = "buyUrl")]
    pub buy_url: Option<String>,
    #[serde(default)]
    pub is_subscription: Option<bool>,
    /// Billing interval unit (e.g. `month`, `year`).
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub interval_count: Option<u32>,
}

impl Product {
    /// Create a simple one-time product.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: impl Into<DisplayPrice>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            price: price.into(),
            image: None,
            category: None,
            features: None,
            buy_url: None,
            is_subscription: None,
            interval: None,
            interval_count: None,
        }
    }

    /// How this product is billed.
    #[must_use]
    pub fn pricing_plan(&self) -> PricingPlan {
        if self.is_subscription.unwrap_or(false) {
            PricingPlan::Subscription {
                interval: self
                    .interval
                    .clone()
                    .filter(|i| !i.is_empty())
                    .unwrap_or_else(|| "month".to_string()),
                interval_count: self.interval_count.unwrap_or(1),
            }
        } else {
            PricingPlan::OneTime
        }
    }

    /// Feature bullet points, empty when the catalog provides none.
    #[must_use]
    pub fn features(&self) -> &[String] {
        self.features.as_deref().unwrap_or_default()
    }
}

/// Billing model derived from a product's subscription fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingPlan {
    OneTime,
    Subscription {
        interval: String,
        interval_count: u32,
    },
}

impl PricingPlan {
    /// The label shown next to the price.
    ///
    /// ```
    /// use little_oat_core::PricingPlan;
    ///
    /// assert_eq!(PricingPlan::OneTime.period_label(), "one-time");
    /// let monthly = PricingPlan::Subscription { interval: "month".into(), interval_count: 1 };
    /// assert_eq!(monthly.period_label(), "/month");
    /// let quarterly = PricingPlan::Subscription { interval: "month".into(), interval_count: 3 };
    /// assert_eq!(quarterly.period_label(), "every 3 months");
    /// ```
    #[must_use]
    pub fn period_label(&self) -> String {
        match self {
            Self::OneTime => "one-time".to_string(),
            Self::Subscription {
                interval,
                interval_count,
            } if *interval_count > 1 => format!("every {interval_count} {interval}s"),
            Self::Subscription { interval, .. } => format!("/{interval}"),
        }
    }
}

fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn price_or_default<'de, D>(deserializer: D) -> Result<DisplayPrice, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_default(deserializer).map(DisplayPrice::from)
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => ProductId::new(s),
        RawId::Number(n) => ProductId::new(n.to_string()),
    })
}
