//! Currency display.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Renders an amount as user-facing text.
pub trait CurrencyFormatter {
    /// Format `amount` for display.
    fn format(&self, amount: Money) -> String;
}

impl<F> CurrencyFormatter for F
where
    F: Fn(Money) -> String,
{
    fn format(&self, amount: Money) -> String {
        self(amount)
    }
}

/// Number formatting conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// `R$ 1.234,50`
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// `$1,234.50`
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    fn separators(&self) -> (char, char) {
        match self {
            Locale::PtBr => ('.', ','),
            Locale::EnUs => (',', '.'),
        }
    }

    fn symbol_gap(&self) -> &'static str {
        match self {
            Locale::PtBr => " ",
            Locale::EnUs => "",
        }
    }
}

/// Formats money according to a [`Locale`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleFormatter {
    locale: Locale,
}

impl LocaleFormatter {
    /// Create a formatter for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl CurrencyFormatter for LocaleFormatter {
    fn format(&self, amount: Money) -> String {
        let (group, decimal) = self.locale.separators();
        let sign = if amount.amount_cents < 0 { "-" } else { "" };
        format!(
            "{}{}{}{}{}{:02}",
            sign,
            amount.currency.symbol(),
            self.locale.symbol_gap(),
            group_digits(amount.major().unsigned_abs(), group),
            decimal,
            amount.minor()
        )
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
