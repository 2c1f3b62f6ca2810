use clap::{Parser, Subcommand};

mod db;
mod geocode;
mod query;
mod seed;
mod session;
mod settings;
mod table;

#[derive(Debug, Parser)]
#[command(name = "freight-app", about = "Freight marketplace CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database administration
    Db(db::DbCommand),

    /// Load a YAML fixture file
    Seed(seed::SeedArgs),

    /// Issue, list and revoke bearer sessions
    Session(session::SessionCommand),

    /// Read and write system variables
    Settings(settings::SettingsCommand),

    /// Resolve an address through the geocoding provider
    Geocode(geocode::GeocodeArgs),

    /// Run the map queries and show the monitor
    Query(query::QueryCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Seed(args) => seed::run(args).await,
            Commands::Session(command) => session::run(command).await,
            Commands::Settings(command) => settings::run(command).await,
            Commands::Geocode(args) => geocode::run(args).await,
            Commands::Query(command) => query::run(command).await,
        }
    }
}
