//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use market_cart::store::{CartStore, Hydration};
use market_kv::FileStore;

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Load context from config file, applying a store path override.
    pub fn load(
        config_path: Option<&str>,
        store_path: Option<&str>,
        output: Output,
    ) -> Result<Self> {
        let mut config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Self::find_config(&cwd).unwrap_or_default()
        };

        if let Some(path) = store_path {
            config.store.path = PathBuf::from(path);
        }

        Ok(Self { config, output })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["cart.toml", ".cart.toml", "cart.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Open the cart store described by the configuration.
    pub async fn open_cart(&self) -> Result<CartStore> {
        let path = &self.config.store.path;
        let store = CartStore::open(FileStore::open(path), &self.config.cart)
            .await
            .with_context(|| format!("Failed to open cart store at {}", path.display()))?;

        match store.hydration() {
            Hydration::Discarded { reason } => self
                .output
                .warn(&format!("Stored cart was unreadable and has been reset: {}", reason)),
            Hydration::Restored { items } => self
                .output
                .debug(&format!("Restored {} cart line(s) from {}", items, path.display())),
            Hydration::Empty => self.output.debug("No stored cart, starting empty"),
        }

        Ok(store)
    }
}
