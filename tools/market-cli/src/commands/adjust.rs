//! Change the quantity of a product already in the cart.

use anyhow::{Context as _, Result};
use market_cart::store::CartStore;
use market_cart::ProductId;

use super::AdjustArgs;
use crate::context::Context;

/// Run the increment command.
pub async fn increment(args: AdjustArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.id);
    let store = ctx.open_cart().await?;

    let write = store.increment(&id).await?;
    if write.is_noop() {
        ctx.output.not_in_cart(&id);
    } else {
        write.await.context("Cart was updated but could not be saved")?;
        report(ctx, &store, &id, "Incremented");
    }

    store.close().await?;
    Ok(())
}

/// Run the decrement command.
pub async fn decrement(args: AdjustArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.id);
    let store = ctx.open_cart().await?;

    let write = store.decrement(&id).await?;
    if write.is_noop() {
        ctx.output.not_in_cart(&id);
    } else {
        write.await.context("Cart was updated but could not be saved")?;
        report(ctx, &store, &id, "Decremented");
    }

    store.close().await?;
    Ok(())
}

/// Print the state of one line after a mutation.
pub(crate) fn report(ctx: &Context, store: &CartStore, id: &ProductId, verb: &str) {
    let cart = store.products();
    let quantity = cart.get(id).map(|item| item.quantity);
    ctx.output.line_changed(verb, id, quantity, cart.item_count());
}
