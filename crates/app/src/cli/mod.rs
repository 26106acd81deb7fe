use clap::{Parser, Subcommand};

use crate::{config::AppConfig, context::AppContext};

mod cart;
mod dispatch;
mod menu;
mod orders;
mod reviews;
mod session;
mod users;

#[derive(Debug, Parser)]
#[command(name = "foodiehub", about = "FoodieHub ordering client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in, register, inspect or end the session
    Session(session::SessionCommand),
    /// Browse and administer the menu catalog
    Menu(menu::MenuCommand),
    /// Manage the working cart
    Cart(cart::CartCommand),
    /// View and settle orders
    Orders(orders::OrdersCommand),
    /// Operator driver-assignment workflow
    Dispatch(dispatch::DispatchCommand),
    /// Operator user administration
    Users(users::UsersCommand),
    /// Local menu-item reviews
    Reviews(reviews::ReviewsCommand),
}

impl Cli {
    /// Build the service graph and dispatch the parsed command.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when initialization or the command
    /// itself fails.
    pub async fn run(self) -> Result<(), String> {
        let ctx = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to initialize: {error}"))?;

        match self.command {
            Commands::Session(command) => session::run(&ctx, command).await,
            Commands::Menu(command) => menu::run(&ctx, command).await,
            Commands::Cart(command) => cart::run(&ctx, command).await,
            Commands::Orders(command) => orders::run(&ctx, command).await,
            Commands::Dispatch(command) => dispatch::run(&ctx, command).await,
            Commands::Users(command) => users::run(&ctx, command).await,
            Commands::Reviews(command) => reviews::run(&ctx, command).await,
        }
    }
}

/// The signed-in principal, or a uniform error for anonymous callers.
fn require_session(ctx: &AppContext) -> Result<foodiehub::Principal, String> {
    ctx.session
        .current()
        .ok_or_else(|| "not logged in; run `foodiehub session login` first".to_owned())
}

/// As [`require_session`], but also requires the admin role.
fn require_admin(ctx: &AppContext) -> Result<foodiehub::Principal, String> {
    let principal = require_session(ctx)?;

    if !principal.role.is_admin() {
        return Err("this command needs an admin session".to_owned());
    }

    Ok(principal)
}
