use clap::{Args, Subcommand};
use freight_app::{
    database,
    domain::settings::{PgSettingsService, SettingsService, data::NewVariable},
};

use crate::cli::table::render;

#[derive(Debug, Args)]
pub(crate) struct SettingsCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// List variables
    List {
        /// Only this category, e.g. `visibility`
        #[arg(long)]
        category: Option<String>,
    },

    /// Insert or overwrite a variable
    Set {
        #[arg(long)]
        key: String,

        #[arg(long)]
        value: String,

        #[arg(long)]
        category: String,

        /// Store the variable disabled
        #[arg(long)]
        inactive: bool,
    },
}

pub(crate) async fn run(command: SettingsCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    let pool = database::connect(&database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgSettingsService::new(pool);

    match command.command {
        SettingsSubcommand::List { category } => {
            let variables = service
                .list_variables(category)
                .await
                .map_err(|error| format!("failed to list variables: {error}"))?;

            let rows = variables
                .into_iter()
                .map(|variable| {
                    [
                        variable.category,
                        variable.key,
                        variable.value,
                        variable.active.to_string(),
                        variable.updated_at.to_string(),
                    ]
                })
                .collect();

            println!(
                "{}",
                render(["category", "key", "value", "active", "updated"], rows)
            );
        }
        SettingsSubcommand::Set {
            key,
            value,
            category,
            inactive,
        } => {
            let stored = service
                .set_variable(NewVariable {
                    key,
                    value,
                    category,
                    active: !inactive,
                })
                .await
                .map_err(|error| format!("failed to set variable: {error}"))?;

            println!("{} = {} ({})", stored.key, stored.value, stored.category);
        }
    }

    Ok(())
}
