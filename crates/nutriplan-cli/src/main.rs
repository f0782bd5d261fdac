mod config;
mod generate_cmd;
mod history_cmd;
mod key_cmds;
mod show_cmd;
mod tui;

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use nutriplan_core::credential::CredentialStore;
use nutriplan_core::persistence::{PgRepository, PlanRepository};
use nutriplan_core::plan::{PlanCache, Weekday, load_snapshot};
use nutriplan_core::profile::{ActivityLevel, DietPreference, Gender};
use nutriplan_core::store::{JsonFileStore, KeyValueStore};
use nutriplan_db::config::DbConfig;
use nutriplan_db::pool;

use config::{CliOverrides, NutriplanConfig};

#[derive(Parser)]
#[command(name = "nutriplan", about = "Weekly meal plans from a text-generation model")]
struct Cli {
    /// Database URL (overrides NUTRIPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a nutriplan config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the nutriplan database (requires config file or env vars)
    DbInit,
    /// API key management
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Generate a weekly plan for a profile
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Also save the plan and profile to the database
        #[arg(long)]
        save: bool,
        /// Generation service base URL (overrides NUTRIPLAN_GENERATION_URL)
        #[arg(long)]
        generation_url: Option<String>,
        /// Model name (overrides NUTRIPLAN_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
    /// Show the cached plan
    Show {
        /// Show a single day (e.g. Monday)
        #[arg(long)]
        day: Option<Weekday>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved plans, or make one active
    History {
        /// Plan ID to make the active plan
        #[arg(long)]
        select: Option<String>,
    },
    /// Browse the cached plan interactively
    View {
        /// Also load saved plans from the database
        #[arg(long)]
        saved: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeyCommands {
    /// Store the API key (replaces any existing key)
    Set {
        /// The API key
        key: String,
    },
    /// Print the stored key, masked
    Show,
    /// Remove the stored key
    Clear,
    /// Report whether a key is configured
    Status,
}

/// Profile attributes sent to the generator.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: String,
    /// Age in years
    #[arg(long)]
    pub age: u32,
    /// male, female or other
    #[arg(long)]
    pub gender: Gender,
    /// Weight in kilograms
    #[arg(long)]
    pub weight: f64,
    /// Height in centimetres
    #[arg(long)]
    pub height: f64,
    /// sedentary, light, moderate, active or veryActive
    #[arg(long)]
    pub activity: ActivityLevel,
    /// vegetarian, nonVegetarian, vegan, jain or glutenFree
    #[arg(long)]
    pub diet: DietPreference,
}

/// Execute the `nutriplan init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let owner_id = Uuid::new_v4();
    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        owner: config::OwnerSection { id: owner_id },
        generation: config::GenerationSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  owner.id = {owner_id}");
    println!("  generation.model = {}", cfg.generation.model);
    println!();
    println!("Next: run `nutriplan key set <KEY>`, then `nutriplan db-init` to enable saving.");

    Ok(())
}

/// Execute the `nutriplan db-init` command: create database and run migrations.
async fn cmd_db_init(resolved: &NutriplanConfig) -> anyhow::Result<()> {
    println!("Initializing nutriplan database...");

    // 1. Create the database if it does not exist.
    pool::ensure_database_exists(&resolved.db_config).await?;

    // 2. Connect to the target database.
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    // 3. Run migrations.
    pool::run_migrations(&db_pool).await?;

    // 4. Print success with table counts.
    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("nutriplan db-init complete.");
    Ok(())
}

/// Execute the `nutriplan view` command.
async fn cmd_view(
    resolved: &NutriplanConfig,
    store: Arc<dyn KeyValueStore>,
    with_saved: bool,
) -> anyhow::Result<()> {
    let mut cache = PlanCache::new();
    if let Some(plan) = load_snapshot(store.as_ref()) {
        cache.set_active_plan(plan);
    }

    if with_saved {
        let owner_id = resolved.require_owner()?;
        let db_pool = pool::create_pool(&resolved.db_config).await?;
        let records = PgRepository::new(db_pool.clone())
            .select(owner_id)
            .await
            .context("failed to load saved plans");
        db_pool.close().await;
        cache.load_saved(records?);
    }

    tui::run_viewer(cache, store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let overrides = match &cli.command {
        Commands::Generate {
            generation_url,
            model,
            ..
        } => CliOverrides {
            database_url: cli.database_url.as_deref(),
            generation_url: generation_url.as_deref(),
            model: model.as_deref(),
        },
        _ => CliOverrides {
            database_url: cli.database_url.as_deref(),
            ..CliOverrides::default()
        },
    };
    let resolved = NutriplanConfig::resolve(overrides);
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::in_dir(&resolved.data_dir));

    match &cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(db_url, *force)?;
        }
        Commands::DbInit => {
            cmd_db_init(&resolved).await?;
        }
        Commands::Key { command } => {
            let creds = CredentialStore::new(store);
            key_cmds::run_key_command(command.clone(), &creds)?;
        }
        Commands::Generate { profile, save, .. } => {
            generate_cmd::run_generate(&resolved, profile, *save).await?;
        }
        Commands::Show { day, json } => {
            show_cmd::run_show(store.as_ref(), *day, *json)?;
        }
        Commands::History { select } => {
            let owner_id = resolved.require_owner()?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let repo = PgRepository::new(db_pool.clone());
            let result =
                history_cmd::run_history(&repo, owner_id, store.as_ref(), select.as_deref()).await;
            db_pool.close().await;
            result?;
        }
        Commands::View { saved } => {
            cmd_view(&resolved, store, *saved).await?;
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_parses_profile_flags() {
        let cli = Cli::try_parse_from([
            "nutriplan",
            "generate",
            "--name",
            "Ravi",
            "--age",
            "34",
            "--gender",
            "male",
            "--weight",
            "72.5",
            "--height",
            "175",
            "--activity",
            "veryActive",
            "--diet",
            "nonVegetarian",
            "--save",
        ])
        .unwrap();

        let Commands::Generate { profile, save, .. } = cli.command else {
            panic!("expected generate");
        };
        assert!(save);
        let profile = profile.to_profile().unwrap();
        assert_eq!(profile.activity_level(), ActivityLevel::VeryActive);
        assert_eq!(profile.diet_preference(), DietPreference::NonVegetarian);
        assert_eq!(profile.height_cm(), 175.0);
    }

    #[test]
    fn bad_enum_values_are_rejected() {
        let result = Cli::try_parse_from([
            "nutriplan",
            "generate",
            "--name",
            "A",
            "--age",
            "30",
            "--gender",
            "robot",
            "--weight",
            "60",
            "--height",
            "160",
            "--activity",
            "light",
            "--diet",
            "vegan",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn show_day_is_case_sensitive() {
        let cli = Cli::try_parse_from(["nutriplan", "show", "--day", "Friday"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Show {
                day: Some(Weekday::Friday),
                json: false
            }
        ));
        assert!(Cli::try_parse_from(["nutriplan", "show", "--day", "friday"]).is_err());
    }

    #[test]
    fn zero_age_fails_profile_validation() {
        let cli = Cli::try_parse_from([
            "nutriplan",
            "generate",
            "--name",
            "A",
            "--age",
            "0",
            "--gender",
            "female",
            "--weight",
            "60",
            "--height",
            "160",
            "--activity",
            "light",
            "--diet",
            "vegan",
        ])
        .unwrap();
        let Commands::Generate { profile, .. } = cli.command else {
            panic!("expected generate");
        };
        assert!(profile.to_profile().is_err());
    }
}
