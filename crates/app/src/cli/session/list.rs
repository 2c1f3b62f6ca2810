use clap::Args;
use freight_app::domain::profiles::records::UserUuid;
use jiff::Timestamp;

use crate::cli::table::{or_dash, render};

#[derive(Debug, Args)]
pub(crate) struct ListSessionsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Profile UUID whose sessions should be listed
    #[arg(long)]
    user_uuid: UserUuid,
}

pub(crate) async fn run(args: ListSessionsArgs) -> Result<(), String> {
    let sessions = super::service(&args.database_url)
        .await?
        .list_sessions(args.user_uuid)
        .await
        .map_err(|error| format!("failed to list sessions: {error}"))?;

    if sessions.is_empty() {
        println!("no sessions found for user {}", args.user_uuid);
        return Ok(());
    }

    let now = Timestamp::now();

    let rows = sessions
        .into_iter()
        .map(|session| {
            [
                session.uuid.to_string(),
                session.created_at.to_string(),
                session
                    .last_used_at
                    .map_or_else(|| "never".to_string(), |at| at.to_string()),
                or_dash(session.expires_at),
                match (session.is_active(now), session.revoked_at) {
                    (true, _) => "active".to_string(),
                    (false, Some(at)) => format!("revoked {at}"),
                    (false, None) => "expired".to_string(),
                },
            ]
        })
        .collect();

    println!(
        "{}",
        render(
            ["session", "created", "last used", "expires", "status"],
            rows
        )
    );

    Ok(())
}
