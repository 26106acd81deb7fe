use clap::{Args, Subcommand};
use foodiehub::RecordId;
use jiff::Timestamp;

use crate::{
    cli::require_session,
    context::AppContext,
    domain::reviews::Review,
};

#[derive(Debug, Args)]
pub(crate) struct ReviewsCommand {
    #[command(subcommand)]
    command: ReviewsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReviewsSubcommand {
    /// Show the local reviews of one menu item
    List(ListArgs),
    /// Add a local review
    Add(AddArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    menu_id: String,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    menu_id: String,

    /// Star rating from 1 to 5
    #[arg(long)]
    rating: u8,

    #[arg(long)]
    comment: String,
}

fn parse_menu_id(raw: &str) -> Result<RecordId, String> {
    RecordId::new(raw).ok_or_else(|| "menu id must not be blank".to_owned())
}

pub(crate) async fn run(ctx: &AppContext, command: ReviewsCommand) -> Result<(), String> {
    match command.command {
        ReviewsSubcommand::List(args) => {
            let reviews = ctx.reviews.reviews_for(&parse_menu_id(&args.menu_id)?);

            if reviews.is_empty() {
                println!("no reviews yet");
            }
            for review in reviews {
                println!(
                    "{} {}/5 by {}: {}",
                    review.written_at, review.rating, review.author, review.comment,
                );
            }
            Ok(())
        }
        ReviewsSubcommand::Add(args) => {
            let principal = require_session(ctx)?;

            let review = Review::new(
                parse_menu_id(&args.menu_id)?,
                principal.name,
                args.rating,
                args.comment,
                Timestamp::now(),
            );

            ctx.reviews
                .add_review(review)
                .map_err(|error| format!("failed to save review: {error}"))?;

            println!("review saved");
            Ok(())
        }
    }
}
