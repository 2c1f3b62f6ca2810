use clap::{Args, Subcommand};
use freight_app::{auth::PgAuthService, database};

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    Create(create::CreateSessionArgs),
    List(list::ListSessionsArgs),
    Revoke(revoke::RevokeSessionArgs),
}

pub(crate) async fn run(command: SessionCommand) -> Result<(), String> {
    match command.command {
        SessionSubcommand::Create(args) => create::run(args).await,
        SessionSubcommand::List(args) => list::run(args).await,
        SessionSubcommand::Revoke(args) => revoke::run(args).await,
    }
}

async fn service(database_url: &str) -> Result<PgAuthService, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(PgAuthService::new(pool))
}
