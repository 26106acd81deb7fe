use clap::{Args, Subcommand};
use foodiehub::Role;

use crate::{
    context::AppContext,
    domain::session::models::{ProfileUpdate, Registration},
};

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Sign in and persist the session
    Login(LoginArgs),
    /// Create an account (does not sign in)
    Register(RegisterArgs),
    /// Clear the persisted session
    Logout,
    /// Show the signed-in principal
    Whoami,
    /// Update profile fields on the signed-in account
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// Account role: user or admin
    #[arg(long, default_value = "user")]
    role: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    address: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

pub(crate) async fn run(ctx: &AppContext, command: SessionCommand) -> Result<(), String> {
    match command.command {
        SessionSubcommand::Login(args) => {
            let principal = ctx
                .session
                .login(&args.email, &args.password)
                .await
                .map_err(|error| format!("login failed: {error}"))?;

            println!("logged in as {} <{}> ({})", principal.name, principal.email, principal.role);
            Ok(())
        }
        SessionSubcommand::Register(args) => {
            let principal = ctx
                .session
                .register(Registration {
                    role: Role::parse_lossy(&args.role),
                    name: args.name,
                    email: args.email,
                    password: args.password,
                    phone: args.phone,
                    address: args.address,
                })
                .await
                .map_err(|error| format!("registration failed: {error}"))?;

            println!("registered {} <{}>; sign in to continue", principal.name, principal.email);
            Ok(())
        }
        SessionSubcommand::Logout => {
            ctx.session.logout();
            println!("logged out");
            Ok(())
        }
        SessionSubcommand::Whoami => {
            match ctx.session.current() {
                Some(principal) => println!(
                    "{} <{}> ({}, id {})",
                    principal.name,
                    principal.email,
                    principal.role,
                    principal
                        .id
                        .as_ref()
                        .map_or_else(|| "unknown".to_owned(), ToString::to_string),
                ),
                None => println!("not logged in"),
            }
            Ok(())
        }
        SessionSubcommand::Update(args) => {
            let principal = ctx
                .session
                .update_profile(ProfileUpdate {
                    name: args.name,
                    phone: args.phone,
                    address: args.address,
                })
                .await
                .map_err(|error| format!("profile update failed: {error}"))?;

            println!("profile updated for {}", principal.email);
            Ok(())
        }
    }
}
