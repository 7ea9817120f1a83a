use telcogen_core::{Account, EntityKind, Order, OrderChannel, OrderItem, OrderStatus};

use crate::catalog;
use crate::errors::GenerationError;
use crate::generators::GenerationContext;

const MAX_QUANTITY: i64 = 3;

/// Orders per account, each with its line items. Order totals are derived
/// from the items.
pub fn generate_orders(
    ctx: &mut GenerationContext,
    accounts: &[Account],
) -> Result<(Vec<Order>, Vec<OrderItem>), GenerationError> {
    let mut orders = Vec::new();
    let mut items = Vec::new();

    for account in accounts {
        let order_count = ctx.count(ctx.preset.orders_per_account);
        for _ in 0..order_count {
            let order_id = ctx.ids.next(EntityKind::Order)?;
            let channel = *ctx.rng.pick(&OrderChannel::ALL);
            let status = *ctx.rng.pick(&OrderStatus::ALL);
            let placed_at = ctx.window.instant_after(account.created_at, &mut ctx.rng);

            let item_count = ctx.count(ctx.preset.items_per_order);
            let mut total_cents = 0;
            for _ in 0..item_count {
                let order_item_id = ctx.ids.next(EntityKind::OrderItem)?;
                let (sku, description, unit_price_cents) = ctx.rng.pick(catalog::SKUS);
                let quantity = ctx.rng.int_in(1, MAX_QUANTITY);
                let item = OrderItem {
                    order_item_id,
                    order_id,
                    sku: sku.to_string(),
                    description: description.to_string(),
                    quantity,
                    unit_price_cents: *unit_price_cents,
                };
                total_cents += item.line_total_cents();
                items.push(item);
            }

            orders.push(Order {
                order_id,
                account_id: account.account_id,
                order_number: format!("ORD-{:08}", orders.len() + 1),
                channel,
                status,
                placed_at,
                total_cents,
            });
        }
    }

    Ok((orders, items))
}
