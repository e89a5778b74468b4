//! Display prices as delivered by the catalog backend.
//!
//! Prices arrive as preformatted strings (`"$29.00"`, `"USD 12.50"`). The cart
//! needs a numeric value for totals, so [`DisplayPrice::numeric_value`] performs
//! a deliberately lossy extraction: every character that is not an ASCII digit
//! or `.` is dropped, and the longest leading decimal literal of what remains
//! is parsed. Anything unparseable counts as zero. There is no currency
//! awareness: `"€1.234,56"` becomes `1.23456`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A price string exactly as the catalog displays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayPrice(String);

impl DisplayPrice {
    /// Wrap a display string.
    #[must_use]
    pub fn new(display: impl Into<String>) -> Self {
        Self(display.into())
    }

    /// The string shown to shoppers.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort numeric value of the display string.
    ///
    /// ```
    /// use little_oat_core::DisplayPrice;
    ///
    /// assert!((DisplayPrice::new("$12.50").numeric_value() - 12.5).abs() < f64::EPSILON);
    /// assert!((DisplayPrice::new("1,299.99 USD").numeric_value() - 1299.99).abs() < 1e-9);
    /// assert!(DisplayPrice::new("Free").numeric_value().abs() < f64::EPSILON);
    /// ```
    #[must_use]
    pub fn numeric_value(&self) -> f64 {
        let stripped: String = self
            .0
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        // Leading literal only: "1.2.3" reads as 1.2
        let mut seen_dot = false;
        let literal: String = stripped
            .chars()
            .take_while(|c| {
                if *c == '.' {
                    if seen_dot {
                        return false;
                    }
                    seen_dot = true;
                }
                true
            })
            .collect();

        if !literal.chars().any(|c| c.is_ascii_digit()) {
            return 0.0;
        }

        literal
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

impl fmt::Display for DisplayPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayPrice {
    fn from(display: &str) -> Self {
        Self::new(display)
    }
}

impl From<String> for DisplayPrice {
    fn from(display: String) -> Self {
        Self(display)
    }
}

/// Format an amount as dollars with two decimal places (e.g. `$12.50`).
///
/// Half-cent ties round away from zero, so `0.125` shows as `$0.13`.
#[must_use]
pub fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    format!("${:.2}", cents / 100.0)
}
