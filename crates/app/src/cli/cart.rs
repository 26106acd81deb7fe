use clap::{Args, Subcommand};
use foodiehub::{RecordId, money};
use tabled::{Table, Tabled};

use crate::{
    cli::require_session,
    context::AppContext,
    domain::carts::{SubmissionRecord, SubmissionStatus},
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the current cart
    Show,
    /// Add an item from the menu
    Add(AddArgs),
    /// Remove a line
    Remove(LineArgs),
    /// Set a line's quantity directly
    SetQty(SetQtyArgs),
    /// Empty the cart
    Clear,
    /// Show this session's order submissions
    Submissions,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    menu_id: String,

    #[arg(long, default_value_t = 1)]
    qty: i64,
}

#[derive(Debug, Args)]
struct LineArgs {
    #[arg(long)]
    menu_id: String,
}

#[derive(Debug, Args)]
struct SetQtyArgs {
    #[arg(long)]
    menu_id: String,

    #[arg(long)]
    qty: i64,
}

#[derive(Tabled)]
struct CartRow {
    menu_id: String,
    name: String,
    qty: u32,
    unit_price: String,
    line_total: String,
}

fn parse_menu_id(raw: &str) -> Result<RecordId, String> {
    RecordId::new(raw).ok_or_else(|| "menu id must not be blank".to_owned())
}

fn print_cart(ctx: &AppContext) {
    let lines = ctx.carts.lines();

    let rows: Vec<CartRow> = lines
        .iter()
        .map(|line| CartRow {
            menu_id: line.menu_id.to_string(),
            name: line.name.clone(),
            qty: line.quantity,
            unit_price: money::format_amount(line.unit_price),
            line_total: money::format_amount(line.line_total()),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("subtotal {}", money::format_amount(ctx.carts.subtotal()));
}

fn print_submissions(ledger: &[SubmissionRecord]) {
    for record in ledger {
        let status = match &record.status {
            SubmissionStatus::Pending => "pending".to_owned(),
            SubmissionStatus::Sent => "sent".to_owned(),
            SubmissionStatus::Failed(message) => format!("failed: {message}"),
        };

        println!(
            "#{} {} -> {}",
            record.seq,
            money::format_amount(record.draft.total_amount),
            status,
        );
    }
}

pub(crate) async fn run(ctx: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => {
            print_cart(ctx);
            Ok(())
        }
        CartSubcommand::Add(args) => {
            require_session(ctx)?;

            let menu_id = parse_menu_id(&args.menu_id)?;
            let items = ctx
                .menus
                .menu()
                .await
                .map_err(|error| format!("failed to fetch menu: {error}"))?;
            let item = items
                .iter()
                .find(|item| item.id == menu_id)
                .ok_or_else(|| format!("no menu item with id {menu_id}"))?;

            let applied = ctx
                .carts
                .add(item, args.qty)
                .map_err(|error| format!("failed to add to cart: {error}"))?;

            println!("added {applied} x {}", item.name);
            print_cart(ctx);

            // The process is about to exit, so wait for the fire-and-forget
            // submission to settle and surface its outcome.
            print_submissions(&ctx.carts.flush().await);

            Ok(())
        }
        CartSubcommand::Remove(args) => {
            let removed = ctx
                .carts
                .remove(&parse_menu_id(&args.menu_id)?)
                .map_err(|error| format!("failed to update cart: {error}"))?;

            if !removed {
                println!("no such line; cart unchanged");
            }
            print_cart(ctx);
            Ok(())
        }
        CartSubcommand::SetQty(args) => {
            let changed = ctx
                .carts
                .change_qty(&parse_menu_id(&args.menu_id)?, args.qty)
                .map_err(|error| format!("failed to update cart: {error}"))?;

            if !changed {
                println!("no such line; cart unchanged");
            }
            print_cart(ctx);
            Ok(())
        }
        CartSubcommand::Clear => {
            ctx.carts
                .clear()
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            println!("cart cleared");
            Ok(())
        }
        CartSubcommand::Submissions => {
            print_submissions(&ctx.carts.submissions());
            Ok(())
        }
    }
}
