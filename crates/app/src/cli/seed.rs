use std::path::PathBuf;

use clap::Args;
use freight_app::{
    context::{AppContext, AppOptions},
    database,
    fixtures::{FixtureSet, Seeder},
};

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// YAML fixture file
    #[arg(long, default_value = "fixtures/demo.yml")]
    file: PathBuf,

    /// Apply pending migrations first
    #[arg(long)]
    migrate: bool,
}

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let fixtures = FixtureSet::load(&args.file)
        .map_err(|error| format!("failed to load {}: {error}", args.file.display()))?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    if args.migrate {
        database::migrate(&pool)
            .await
            .map_err(|error| format!("failed to apply migrations: {error}"))?;
    }

    let ctx = AppContext::from_db(database::Db::new(pool), AppOptions::default());

    let report = Seeder {
        profiles: ctx.profiles.as_ref(),
        settings: ctx.settings.as_ref(),
        cargas: ctx.cargas.as_ref(),
        trucks: ctx.trucks.as_ref(),
    }
    .seed(&fixtures)
    .await
    .map_err(|error| format!("failed to seed fixtures: {error}"))?;

    println!("profiles: {}", report.profiles);
    println!("settings: {}", report.settings);
    println!("cargas: {}", report.cargas);
    println!("trucks: {}", report.trucks);

    Ok(())
}
