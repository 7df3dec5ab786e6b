//! CLI command implementations.

pub mod add;
pub mod adjust;
pub mod show;

use clap::Args;
use market_cart::money::Price;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id.
    #[arg(long)]
    pub id: String,

    /// Product title.
    #[arg(long)]
    pub title: String,

    /// Product image URL.
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Unit price in major units (e.g. 10.50).
    #[arg(long)]
    pub price: Price,
}

/// Arguments for the increment and decrement commands.
#[derive(Args)]
pub struct AdjustArgs {
    /// Product id.
    pub id: String,
}

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Only print the totals.
    #[arg(long)]
    pub totals: bool,
}
