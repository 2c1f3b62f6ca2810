use clap::{Args, Subcommand, ValueEnum};
use freight::{
    filters::PostingFilter, monitor::QueryStatus, postings::EndpointKind,
    visibility::VisibilityMode,
};
use freight_app::{
    context::{AppContext, AppOptions},
    query::PostingsQuery,
};
use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::{Zoned, civil::Date};

use crate::cli::table::{or_dash, render};

#[derive(Debug, Args)]
pub(crate) struct QueryCommand {
    #[command(subcommand)]
    target: Target,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    /// Partial origin province
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Partial destination province
    #[arg(long, global = true)]
    destination: Option<String>,

    /// Exact truck type
    #[arg(long, global = true)]
    truck_type: Option<String>,

    /// Day to evaluate visibility on; defaults to today
    #[arg(long, global = true)]
    today: Option<Date>,

    /// Where the visibility window is applied
    #[arg(long, value_enum, default_value_t = Mode::Server, global = true)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Target {
    /// Available cargas
    Cargas,

    /// Available trucks
    Trucks,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Server,
    Client,
}

impl From<Mode> for VisibilityMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Server => Self::Server,
            Mode::Client => Self::Client,
        }
    }
}

pub(crate) async fn run(command: QueryCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    let ctx = AppContext::from_database_url(
        &database_url,
        AppOptions {
            visibility_mode: command.mode.into(),
            ..AppOptions::default()
        },
    )
    .await
    .map_err(|error| format!("failed to initialise: {error}"))?;

    let filter = PostingFilter::new(command.origin, command.destination, command.truck_type);
    let today = command.today.unwrap_or_else(|| Zoned::now().date());

    match command.target {
        Target::Cargas => {
            let fetched = ctx.query.fetch_cargas(&filter, today).await;

            let rows = fetched
                .rows
                .into_iter()
                .map(|carga| {
                    [
                        carga.uuid.to_string(),
                        endpoint(&carga.origin, EndpointKind::Origin),
                        endpoint(&carga.destination, EndpointKind::Destination),
                        carga.truck_type,
                        or_dash(carga.rate),
                        or_dash(carga.available_until),
                    ]
                })
                .collect();

            println!(
                "{}",
                render(["carga", "origin", "destination", "truck", "rate", "until"], rows)
            );
            println!("grace: {} days", fetched.grace.as_days());
            if fetched.degraded {
                println!("query failed; see the monitor below");
            }
        }
        Target::Trucks => {
            let fetched = ctx.query.fetch_trucks(&filter, today).await;

            let rows = fetched
                .rows
                .into_iter()
                .map(|truck| {
                    [
                        truck.uuid.to_string(),
                        endpoint(&truck.origin, EndpointKind::Origin),
                        truck
                            .destination
                            .as_ref()
                            .map_or_else(|| "-".to_string(), |d| endpoint(d, EndpointKind::Destination)),
                        truck.truck_type,
                        format!("{} t", truck.capacity_tons),
                        or_dash(truck.availability.end_date()),
                    ]
                })
                .collect();

            println!(
                "{}",
                render(["truck", "origin", "destination", "type", "capacity", "until"], rows)
            );
            println!("grace: {} days", fetched.grace.as_days());
            if fetched.degraded {
                println!("query failed; see the monitor below");
            }
        }
    }

    print_monitor(&ctx.query);

    Ok(())
}

fn endpoint(location: &freight::postings::Location, kind: EndpointKind) -> String {
    let place = location.province.as_deref().unwrap_or(&location.address);

    if location.is_unresolved() {
        format!("{place} ({kind}, unresolved)")
    } else {
        place.to_string()
    }
}

fn print_monitor(query: &PostingsQuery) {
    let monitor = query.monitor();

    let rows = monitor
        .snapshot()
        .into_iter()
        .map(|event| {
            [
                event.table,
                event.operation,
                match event.status {
                    QueryStatus::Success => "success".to_string(),
                    QueryStatus::Error => "error".to_string(),
                },
                format!("{}", event.duration.human(Truncate::Nano)),
                event.error.unwrap_or_default(),
            ]
        })
        .collect();

    println!(
        "{}",
        render(["table", "operation", "status", "duration", "error"], rows)
    );

    let stats = monitor.stats();

    println!(
        "{} queries, {} errors, mean {}",
        stats.total,
        stats.errors,
        stats.mean_duration.human(Truncate::Nano)
    );
}
