//! Rendering of cart command results.
//!
//! Every command reports through [`Output`], which writes styled text or,
//! with `--json`, one JSON document per command on stdout.

use anyhow::Result;
use console::style;
use market_cart::cart::{Cart, CartSummary};
use market_cart::format::{CurrencyFormatter, LocaleFormatter};
use market_cart::ProductId;
use serde::Serialize;
use serde_json::json;

use crate::config::CliConfig;

/// Cart table columns and their widths.
const COLUMNS: [(&str, usize); 5] = [
    ("ID", 12),
    ("TITLE", 28),
    ("QTY", 5),
    ("UNIT", 14),
    ("SUBTOTAL", 14),
];

/// Writes command results to the terminal.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print a warning to stderr. Silent in JSON mode.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print a command failure to stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a diagnostic, only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Report a line after a mutation. `quantity` is `None` once the line
    /// has been removed.
    pub fn line_changed(
        &self,
        verb: &str,
        id: &ProductId,
        quantity: Option<u32>,
        cart_items: u64,
    ) {
        if self.json {
            self.emit(&json!({
                "id": id,
                "changed": true,
                "quantity": quantity.unwrap_or(0),
                "cart_items": cart_items,
            }));
            return;
        }

        let detail = match quantity {
            Some(quantity) => format!("quantity {quantity}"),
            None => "removed from cart".to_string(),
        };
        println!(
            "{} {} {}: {} ({} in cart)",
            style("✓").green(),
            verb,
            style(id).bold(),
            detail,
            cart_items
        );
    }

    /// Report a mutation that found no such product.
    pub fn not_in_cart(&self, id: &ProductId) {
        if self.json {
            self.emit(&json!({ "id": id, "changed": false }));
            return;
        }
        self.warn(&format!("{id} is not in the cart"));
    }

    /// Print the cart with its totals, or only the totals.
    pub fn cart(
        &self,
        cart: &Cart,
        summary: &CartSummary,
        formatter: &LocaleFormatter,
        totals_only: bool,
    ) {
        let total = formatter.format(summary.total_price);
        if self.json {
            self.emit(&json!({
                "items": cart.items(),
                "total_items": summary.total_items,
                "total_price": total,
                "total_cents": summary.total_price.amount_cents,
            }));
            return;
        }

        if !totals_only {
            println!("\n{}", style("Cart").bold().underlined());
            for row in cart_rows(cart, summary, formatter) {
                println!("  {row}");
            }
            println!();
        }
        println!("  {}: {}", style("Items").dim(), summary.total_items);
        println!("  {}: {}", style("Total").dim(), total);
    }

    /// Print the effective configuration as TOML, or JSON with `--json`.
    pub fn config(&self, config: &CliConfig) -> Result<()> {
        if self.json {
            self.emit(config);
        } else {
            print!("{}", config.to_toml()?);
        }
        Ok(())
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => self.error(&format!("Failed to render JSON: {e}")),
        }
    }
}

/// Plain-text table rows for `cart`, header first.
fn cart_rows(
    cart: &Cart,
    summary: &CartSummary,
    formatter: &LocaleFormatter,
) -> Vec<String> {
    if cart.is_empty() {
        return vec!["(empty)".to_string()];
    }

    let mut rows = vec![table_row(COLUMNS.map(|(name, _)| name.to_string()))];
    for (item, line) in cart.items().iter().zip(&summary.lines) {
        rows.push(table_row([
            item.id.to_string(),
            item.title.clone(),
            item.quantity.to_string(),
            formatter.format(line.unit_price),
            formatter.format(line.subtotal),
        ]));
    }
    rows
}

fn table_row(cells: [String; 5]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(COLUMNS)
        .map(|(cell, (_, width))| format!("{cell:width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_cart::cart::NewItem;
    use market_cart::format::Locale;
    use market_cart::money::{Currency, Price};

    fn rows_for(cart: &Cart) -> Vec<String> {
        let summary = CartSummary::of(cart, Currency::BRL).unwrap();
        cart_rows(cart, &summary, &LocaleFormatter::new(Locale::PtBr))
    }

    #[test]
    fn test_empty_cart_rows() {
        assert_eq!(rows_for(&Cart::new()), ["(empty)"]);
    }

    #[test]
    fn test_cart_rows_align_with_header() {
        let mut cart = Cart::new();
        let cap = NewItem::new("1", "Cap", "", Price::from_cents(1000));
        cart.add(cap.clone()).unwrap();
        cart.add(cap).unwrap();

        let rows = rows_for(&cart);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("ID"));
        assert_eq!(rows[1].find("R$ 10,00"), rows[0].find("UNIT"));
        assert_eq!(rows[1].find("R$ 20,00"), rows[0].find("SUBTOTAL"));
    }
}
