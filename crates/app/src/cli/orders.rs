use std::{fs, path::PathBuf};

use clap::{Args, Subcommand};
use foodiehub::{OrderRecord, RecordId, money};
use tabled::{Table, Tabled};

use crate::{
    cli::require_session,
    clients::{BillDocument, BillKind},
    context::AppContext,
    domain::orders::PaymentOutcome,
};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List your orders
    List,
    /// List your pending orders
    Pending,
    /// List your paid-ledger entries
    Paid,
    /// Settle one pending order
    Checkout(OrderIdArgs),
    /// Settle every pending order, one at a time
    PayAll,
    /// Delete a completed order (irreversible)
    Delete(DeleteArgs),
    /// Fetch an order's bill
    Bill(BillArgs),
    /// Re-settle orders stuck pending after an interrupted checkout
    Repair,
}

#[derive(Debug, Args)]
struct OrderIdArgs {
    #[arg(long)]
    order_id: String,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[arg(long)]
    order_id: String,

    /// Confirm the irreversible deletion
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Args)]
struct BillArgs {
    #[arg(long)]
    order_id: String,

    #[arg(long, value_enum, default_value = "pdf")]
    kind: BillKind,

    /// Write the document here instead of stdout (PDF always needs this)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Tabled)]
struct OrderRow {
    order_id: String,
    status: String,
    total: String,
    items: usize,
    date: String,
}

impl From<&OrderRecord> for OrderRow {
    fn from(order: &OrderRecord) -> Self {
        Self {
            order_id: order
                .order_id
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            status: order.status.to_string(),
            total: money::format_amount(order.total()),
            items: order.items.len(),
            date: order
                .order_date
                .map_or_else(String::new, |date| date.to_string()),
        }
    }
}

fn parse_order_id(raw: &str) -> Result<RecordId, String> {
    RecordId::new(raw).ok_or_else(|| "order id must not be blank".to_owned())
}

async fn find_pending(ctx: &AppContext, order_id: &RecordId) -> Result<OrderRecord, String> {
    let principal = require_session(ctx)?;
    let pending = ctx
        .orders
        .pending_orders(&principal)
        .await
        .map_err(|error| format!("failed to fetch orders: {error}"))?;

    pending
        .into_iter()
        .find(|order| order.order_id.as_ref() == Some(order_id))
        .ok_or_else(|| format!("no pending order with id {order_id}"))
}

pub(crate) async fn run(ctx: &AppContext, command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List => {
            let principal = require_session(ctx)?;
            let orders = ctx
                .orders
                .fetch_orders(&principal)
                .await
                .map_err(|error| format!("failed to fetch orders: {error}"))?;

            println!("{}", Table::new(orders.iter().map(OrderRow::from)));
            Ok(())
        }
        OrdersSubcommand::Pending => {
            let principal = require_session(ctx)?;
            let pending = ctx
                .orders
                .pending_orders(&principal)
                .await
                .map_err(|error| format!("failed to fetch orders: {error}"))?;

            println!("{}", Table::new(pending.iter().map(OrderRow::from)));
            Ok(())
        }
        OrdersSubcommand::Paid => {
            let principal = require_session(ctx)?;
            let paid = ctx
                .orders
                .paid_orders(&principal)
                .await
                .map_err(|error| format!("failed to fetch paid orders: {error}"))?;

            for entry in &paid {
                println!(
                    "payment {} order {} {}",
                    entry
                        .payment_id
                        .as_ref()
                        .map_or_else(|| "?".to_owned(), ToString::to_string),
                    entry
                        .order_id
                        .as_ref()
                        .map_or_else(|| "?".to_owned(), ToString::to_string),
                    money::format_amount(entry.total()),
                );
            }
            println!("{} paid orders", paid.len());
            Ok(())
        }
        OrdersSubcommand::Checkout(args) => {
            let order = find_pending(ctx, &parse_order_id(&args.order_id)?).await?;

            let saga = ctx
                .orders
                .checkout(&order)
                .await
                .map_err(|error| format!("checkout failed: {error}"))?;

            println!("{saga}");
            if saga.is_split_brain() {
                println!("payment recorded; the order will be settled by `orders repair`");
            }
            Ok(())
        }
        OrdersSubcommand::PayAll => {
            let principal = require_session(ctx)?;
            let pending = ctx
                .orders
                .pending_orders(&principal)
                .await
                .map_err(|error| format!("failed to fetch orders: {error}"))?;

            let summary = ctx.orders.pay_all(&pending).await;

            for result in &summary.results {
                let order_id = result
                    .order_id
                    .as_ref()
                    .map_or_else(|| "?".to_owned(), ToString::to_string);

                match &result.outcome {
                    PaymentOutcome::Settled => println!("order {order_id}: settled"),
                    PaymentOutcome::SettledUnconfirmed => {
                        println!("order {order_id}: paid, settlement pending repair");
                    }
                    PaymentOutcome::Failed(message) => {
                        println!("order {order_id}: failed ({message})");
                    }
                }
            }
            println!("{} succeeded, {} failed", summary.succeeded(), summary.failed());
            Ok(())
        }
        OrdersSubcommand::Delete(args) => {
            if !args.yes {
                return Err("deletion is irreversible; pass --yes to confirm".to_owned());
            }

            let order_id = parse_order_id(&args.order_id)?;
            ctx.orders
                .delete_order(&order_id)
                .await
                .map_err(|error| format!("failed to delete order: {error}"))?;

            println!("deleted order {order_id}");
            Ok(())
        }
        OrdersSubcommand::Bill(args) => {
            let order_id = parse_order_id(&args.order_id)?;
            let document = ctx
                .orders
                .bill(&order_id, args.kind)
                .await
                .map_err(|error| format!("failed to fetch bill: {error}"))?;

            match (document, args.out) {
                (BillDocument::Pdf(bytes), Some(path)) => {
                    fs::write(&path, bytes)
                        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                (BillDocument::Pdf(_), None) => {
                    return Err("PDF output needs --out <file>".to_owned());
                }
                (BillDocument::Json(value), Some(path)) => {
                    fs::write(&path, value.to_string())
                        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                (BillDocument::Json(value), None) => println!("{value:#}"),
                (BillDocument::Html(text), Some(path)) => {
                    fs::write(&path, text)
                        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                (BillDocument::Html(text), None) => println!("{text}"),
            }
            Ok(())
        }
        OrdersSubcommand::Repair => {
            let principal = require_session(ctx)?;
            let repaired = ctx
                .orders
                .repair_split_brain(&principal)
                .await
                .map_err(|error| format!("repair failed: {error}"))?;

            if repaired.is_empty() {
                println!("nothing to repair");
            } else {
                for order_id in repaired {
                    println!("settled order {order_id}");
                }
            }
            Ok(())
        }
    }
}
