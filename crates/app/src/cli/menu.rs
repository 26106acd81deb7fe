use std::{fs, path::PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Args, Subcommand};
use foodiehub::{
    MenuItem, RecordId,
    menu::{self, Category},
    money,
};
use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::{
    cli::require_admin,
    context::AppContext,
    domain::menus::MenuItemDraft,
};

#[derive(Debug, Args)]
pub(crate) struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Debug, Subcommand)]
enum MenuSubcommand {
    /// List the catalog, optionally filtered
    List(ListArgs),
    /// Create or update a catalog entry (admin)
    Save(SaveArgs),
    /// Delete a catalog entry (admin)
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Free-text search over name and description
    #[arg(long)]
    query: Option<String>,

    /// Restrict to one category
    #[arg(long)]
    category: Option<String>,
}

#[derive(Debug, Args)]
struct SaveArgs {
    /// Existing item id; omit to create a new item
    #[arg(long)]
    id: Option<String>,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long)]
    price: Decimal,

    #[arg(long)]
    category: Option<String>,

    /// Image file, base64-encoded into the payload
    #[arg(long)]
    image_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[arg(long)]
    id: String,
}

#[derive(Tabled)]
struct MenuRow {
    id: String,
    name: String,
    category: String,
    price: String,
    sold: u32,
}

impl From<&MenuItem> for MenuRow {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            category: item
                .category
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            price: money::format_amount(item.price),
            sold: item.sold,
        }
    }
}

pub(crate) async fn run(ctx: &AppContext, command: MenuCommand) -> Result<(), String> {
    match command.command {
        MenuSubcommand::List(args) => {
            let items = ctx
                .menus
                .menu()
                .await
                .map_err(|error| format!("failed to fetch menu: {error}"))?;

            let category = args.category.as_deref().map(Category::parse);
            let filtered = menu::filter(&items, args.query.as_deref(), category.as_ref());

            let rows: Vec<MenuRow> = filtered.iter().map(|item| MenuRow::from(*item)).collect();
            println!("{}", Table::new(rows));
            println!(
                "{} of {} items, catalog revenue {}",
                filtered.len(),
                items.len(),
                money::format_amount(menu::catalog_revenue(&items)),
            );

            Ok(())
        }
        MenuSubcommand::Save(args) => {
            require_admin(ctx)?;

            let image = match args.image_file {
                Some(path) => {
                    let bytes = fs::read(&path)
                        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;
                    Some(BASE64.encode(bytes))
                }
                None => None,
            };

            let draft = MenuItemDraft {
                id: args.id.as_deref().and_then(RecordId::new),
                name: args.name,
                description: args.description,
                price: args.price,
                category: args.category.as_deref().map(Category::parse),
                image,
            };

            ctx.menus
                .save(&draft)
                .await
                .map_err(|error| format!("failed to save menu item: {error}"))?;

            println!("saved {}", draft.name);
            Ok(())
        }
        MenuSubcommand::Delete(args) => {
            require_admin(ctx)?;

            let id =
                RecordId::new(&args.id).ok_or_else(|| "menu id must not be blank".to_owned())?;

            ctx.menus
                .delete(&id)
                .await
                .map_err(|error| format!("failed to delete menu item: {error}"))?;

            println!("deleted menu item {id}");
            Ok(())
        }
    }
}
