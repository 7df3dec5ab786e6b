//! Add a product to the cart.

use anyhow::{Context as _, Result};
use market_cart::cart::NewItem;
use market_cart::ProductId;

use super::AddArgs;
use crate::commands::adjust::report;
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.id);
    let item = NewItem::new(id.clone(), args.title, args.image_url, args.price);

    let store = ctx.open_cart().await?;
    let write = store.add_to_cart(item).await?;
    write.await.context("Cart was updated but could not be saved")?;

    report(ctx, &store, &id, "Added");
    store.close().await?;
    Ok(())
}
