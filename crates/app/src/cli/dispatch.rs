use clap::{Args, Subcommand};
use foodiehub::{OrderRecord, RecordId, money, orders::Driver};
use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::{cli::require_admin, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct DispatchCommand {
    #[command(subcommand)]
    command: DispatchSubcommand,
}

#[derive(Debug, Subcommand)]
enum DispatchSubcommand {
    /// List available drivers
    Drivers,
    /// List every order with its assigned driver
    Orders(OrdersArgs),
    /// Assign a driver to an order
    Assign(AssignArgs),
    /// Release an order's assigned driver
    Unassign(UnassignArgs),
}

#[derive(Debug, Args)]
struct OrdersArgs {
    /// Filter by order id, customer name or email
    #[arg(long)]
    query: Option<String>,
}

#[derive(Debug, Args)]
struct AssignArgs {
    #[arg(long)]
    order_id: String,

    #[arg(long)]
    driver_id: String,
}

#[derive(Debug, Args)]
struct UnassignArgs {
    #[arg(long)]
    order_id: String,
}

#[derive(Tabled)]
struct DriverRow {
    id: String,
    name: String,
    phone: String,
    vehicle: String,
}

impl From<&Driver> for DriverRow {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id.to_string(),
            name: driver.name.clone(),
            phone: driver.phone.clone().unwrap_or_default(),
            vehicle: driver.vehicle.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct DispatchRow {
    order_id: String,
    customer: String,
    status: String,
    total: String,
    driver: String,
}

impl From<&OrderRecord> for DispatchRow {
    fn from(order: &OrderRecord) -> Self {
        Self {
            order_id: order
                .order_id
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            customer: order.customer_name.clone().unwrap_or_default(),
            status: order.status.to_string(),
            total: money::format_amount(order.total()),
            driver: order
                .assigned_driver
                .as_ref()
                .and_then(|driver| driver.name.clone())
                .unwrap_or_else(|| "-".to_owned()),
        }
    }
}

fn parse_id(raw: &str, what: &str) -> Result<RecordId, String> {
    RecordId::new(raw).ok_or_else(|| format!("{what} must not be blank"))
}

async fn find_order(ctx: &AppContext, order_id: &RecordId) -> Result<OrderRecord, String> {
    let orders = ctx
        .orders
        .all_orders()
        .await
        .map_err(|error| format!("failed to fetch orders: {error}"))?;

    let order = orders
        .into_iter()
        .find(|order| order.order_id.as_ref() == Some(order_id))
        .ok_or_else(|| format!("no order with id {order_id}"))?;

    Ok(ctx
        .dispatch
        .enrich_orders(vec![order])
        .await
        .into_iter()
        .next()
        .unwrap_or_default())
}

pub(crate) async fn run(ctx: &AppContext, command: DispatchCommand) -> Result<(), String> {
    require_admin(ctx)?;

    match command.command {
        DispatchSubcommand::Drivers => {
            let drivers = ctx
                .dispatch
                .available_drivers()
                .await
                .map_err(|error| format!("failed to fetch drivers: {error}"))?;

            println!("{}", Table::new(drivers.iter().map(DriverRow::from)));
            Ok(())
        }
        DispatchSubcommand::Orders(args) => {
            let orders = ctx
                .orders
                .all_orders()
                .await
                .map_err(|error| format!("failed to fetch orders: {error}"))?;
            let enriched = ctx.dispatch.enrich_orders(orders).await;

            let query = args.query.unwrap_or_default();
            let shown: Vec<&OrderRecord> = enriched
                .iter()
                .filter(|order| order.matches_query(&query))
                .collect();

            let revenue: Decimal = enriched.iter().map(OrderRecord::total).sum();

            println!("{}", Table::new(shown.iter().map(|order| DispatchRow::from(*order))));
            println!(
                "{} of {} orders, total order volume {}",
                shown.len(),
                enriched.len(),
                money::format_amount(revenue),
            );
            Ok(())
        }
        DispatchSubcommand::Assign(args) => {
            let order = find_order(ctx, &parse_id(&args.order_id, "order id")?).await?;

            let driver_id = parse_id(&args.driver_id, "driver id")?;
            let drivers = ctx
                .dispatch
                .available_drivers()
                .await
                .map_err(|error| format!("failed to fetch drivers: {error}"))?;
            let driver = drivers
                .into_iter()
                .find(|driver| driver.id == driver_id)
                .ok_or_else(|| format!("no available driver with id {driver_id}"))?;

            let saga = ctx
                .dispatch
                .assign(&order, &driver)
                .await
                .map_err(|error| format!("assignment failed: {error}"))?;

            println!("{saga}");
            if saga.is_split_brain() {
                println!("order assigned; the driver pool will catch up on its next refresh");
            }
            Ok(())
        }
        DispatchSubcommand::Unassign(args) => {
            let order = find_order(ctx, &parse_id(&args.order_id, "order id")?).await?;

            let saga = ctx
                .dispatch
                .unassign(&order)
                .await
                .map_err(|error| format!("unassignment failed: {error}"))?;

            println!("{saga}");
            Ok(())
        }
    }
}
