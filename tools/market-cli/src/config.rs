//! CLI configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use market_cart::config::CartConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart settings.
    #[serde(default)]
    pub cart: CartConfig,

    /// Storage settings.
    #[serde(default)]
    pub store: StoreConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(path, &content)
    }

    /// Parse config text, choosing the format by file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render config")
    }
}

/// Where the key-value store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("cart-store.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_cart::format::Locale;
    use market_cart::money::Currency;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = CliConfig::parse("cart.toml", "").unwrap();

        assert_eq!(config.cart, CartConfig::default());
        assert_eq!(config.store.path, PathBuf::from("cart-store.json"));
    }

    #[test]
    fn test_toml_overrides() {
        let content = r#"
            [cart]
            currency = "USD"
            locale = "en-US"
            storage_key = "shop:cart"

            [store]
            path = "/tmp/shop.json"
        "#;
        let config = CliConfig::parse("cart.toml", content).unwrap();

        assert_eq!(config.cart.currency, Currency::USD);
        assert_eq!(config.cart.locale, Locale::EnUs);
        assert_eq!(config.cart.storage_key, "shop:cart");
        assert_eq!(config.store.path, PathBuf::from("/tmp/shop.json"));
    }

    #[test]
    fn test_json_config() {
        let config = CliConfig::parse("cart.json", r#"{"cart":{"currency":"EUR"}}"#).unwrap();
        assert_eq!(config.cart.currency, Currency::EUR);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let err = CliConfig::parse("broken.toml", "cart = 5").unwrap_err();
        assert!(format!("{:#}", err).contains("broken.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[cart]\ncurrency = \"GBP\"\n").unwrap();

        let config = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.cart.currency, Currency::GBP);
    }

    #[test]
    fn test_toml_render_roundtrips() {
        let config = CliConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed = CliConfig::parse("cart.toml", &rendered).unwrap();
        assert_eq!(parsed.cart, config.cart);
    }
}
