//! A [`Ui`] that talks to the terminal.
//!
//! Alerts and card feedback are printed, confirmations are read from stdin,
//! and links are printed for the shopper to open. Cart and grid re-renders are
//! only logged; commands print what they need explicitly.

use std::io::{BufRead, Write};

use little_oat_core::ProductId;
use little_oat_storefront::CartPanel;
use little_oat_storefront::Ui;
use tracing::debug;

/// Terminal-backed UI.
#[derive(Debug)]
pub struct TerminalUi {
    assume_yes: bool,
}

impl TerminalUi {
    /// `assume_yes` answers every confirmation without prompting.
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// Interpret a typed answer to a yes/no prompt.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl Ui for TerminalUi {
    #[allow(clippy::print_stderr)]
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    #[allow(clippy::print_stderr)]
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{message} [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                debug!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }

    #[allow(clippy::print_stdout)]
    fn open_in_new_context(&self, url: &str) {
        println!("Open in your browser: {url}");
    }

    fn render_cart(&self, panel: &CartPanel) {
        debug!(count = panel.count, total = %panel.total, "Cart rendered");
    }

    fn set_cart_open(&self, open: bool) {
        debug!(open, "Cart panel toggled");
    }

    fn set_checkout_busy(&self, busy: bool) {
        debug!(busy, "Checkout busy");
    }

    fn render_product_grid(&self, html: &str) {
        debug!(bytes = html.len(), "Product grid rendered");
    }

    #[allow(clippy::print_stdout)]
    fn set_card_feedback(&self, product_id: &ProductId, label: Option<&str>) {
        if let Some(label) = label {
            println!("{product_id}: {label}");
        }
    }

    fn set_description_expanded(&self, product_id: &ProductId, expanded: bool, _toggle_label: &str) {
        debug!(%product_id, expanded, "Description toggled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("nope"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(TerminalUi::new(true).confirm("Are you sure?"));
    }
}
