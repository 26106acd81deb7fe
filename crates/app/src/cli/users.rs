use clap::{Args, Subcommand};
use foodiehub::{RecordId, UserAccount};
use tabled::{Table, Tabled};

use crate::{cli::require_admin, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Debug, Subcommand)]
enum UsersSubcommand {
    /// List registered accounts
    List,
    /// Delete an account (irreversible)
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[arg(long)]
    id: String,

    /// Confirm the irreversible deletion
    #[arg(long)]
    yes: bool,
}

#[derive(Tabled)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    phone: String,
}

impl From<&UserAccount> for UserRow {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account
                .principal
                .id
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            name: account.principal.name.clone(),
            email: account.principal.email.clone(),
            role: account.principal.role.to_string(),
            phone: account.phone.clone(),
        }
    }
}

pub(crate) async fn run(ctx: &AppContext, command: UsersCommand) -> Result<(), String> {
    require_admin(ctx)?;

    match command.command {
        UsersSubcommand::List => {
            let users = ctx
                .users
                .users()
                .await
                .map_err(|error| format!("failed to fetch users: {error}"))?;

            println!("{}", Table::new(users.iter().map(UserRow::from)));
            Ok(())
        }
        UsersSubcommand::Delete(args) => {
            if !args.yes {
                return Err("deletion is irreversible; pass --yes to confirm".to_owned());
            }

            let id =
                RecordId::new(&args.id).ok_or_else(|| "user id must not be blank".to_owned())?;

            ctx.users
                .delete_user(&id)
                .await
                .map_err(|error| format!("failed to delete user: {error}"))?;

            println!("deleted user {id}");
            Ok(())
        }
    }
}
