use clap::Args;
use freight_app::domain::profiles::records::UserUuid;
use jiff::{Span, Timestamp};

#[derive(Debug, Args)]
pub(crate) struct CreateSessionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Profile UUID the session authenticates as
    #[arg(long)]
    user_uuid: UserUuid,

    /// Expiry as an RFC 3339 timestamp
    #[arg(long, conflicts_with = "expires_in_days")]
    expires_at: Option<Timestamp>,

    /// Expiry relative to now
    #[arg(long)]
    expires_in_days: Option<i64>,
}

pub(crate) async fn run(args: CreateSessionArgs) -> Result<(), String> {
    let now = Timestamp::now();

    let expires_at = match (args.expires_at, args.expires_in_days) {
        (Some(at), _) => Some(at),
        (None, Some(days)) => Some(
            now.checked_add(Span::new().hours(days.saturating_mul(24)))
                .map_err(|error| format!("invalid expiry: {error}"))?,
        ),
        (None, None) => None,
    };

    if expires_at.is_some_and(|at| at <= now) {
        return Err("session expiry must be in the future".to_string());
    }

    let issued = super::service(&args.database_url)
        .await?
        .issue_session(args.user_uuid, expires_at)
        .await
        .map_err(|error| format!("failed to create session: {error}"))?;

    println!("session_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("expires_at: {expires_at}");
    }
    println!("bearer_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
