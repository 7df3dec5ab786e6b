//! Cart configuration.

use serde::{Deserialize, Serialize};

use crate::format::{Locale, LocaleFormatter};
use crate::money::Currency;

/// Namespace shared by every record the app persists.
pub const STORAGE_NAMESPACE: &str = "@GoMarketplace";

/// Record name of the cart within [`STORAGE_NAMESPACE`].
pub const CART_RECORD: &str = "cart-items";

/// Settings for a [`CartStore`](crate::store::CartStore) and its views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the cart record is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Currency cart prices are in.
    #[serde(default)]
    pub currency: Currency,

    /// Display conventions for totals.
    #[serde(default)]
    pub locale: Locale,
}

fn default_storage_key() -> String {
    market_kv::store_key!(STORAGE_NAMESPACE, CART_RECORD)
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            currency: Currency::default(),
            locale: Locale::default(),
        }
    }
}

impl CartConfig {
    /// Set the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Formatter matching the configured locale.
    pub fn formatter(&self) -> LocaleFormatter {
        LocaleFormatter::new(self.locale)
    }
}
