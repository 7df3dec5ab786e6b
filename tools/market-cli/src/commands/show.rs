//! Print the cart and the effective configuration.

use anyhow::Result;
use market_cart::cart::CartSummary;

use super::ShowArgs;
use crate::context::Context;

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_cart().await?;
    let cart = store.products();
    let summary = CartSummary::of(&cart, store.currency())?;

    ctx.output.cart(&cart, &summary, &ctx.config.cart.formatter(), args.totals);

    store.close().await?;
    Ok(())
}

/// Print the effective configuration.
pub fn config(ctx: &Context) -> Result<()> {
    ctx.output.config(&ctx.config)
}
