//! Person Service - CLI over the person document store.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::AppError;
use domain::{
    NewPerson, PersonId, DEFAULT_AGE_TO_SET, DEFAULT_FOOD_TO_ADD, DEFAULT_FOOD_TO_SEARCH,
    DEFAULT_NAME_TO_REMOVE,
};
use person_service_lib::config::PersonServiceConfig;
use person_service_lib::service::{PersonManager, PersonService};

#[derive(Parser)]
#[command(name = "person-service")]
#[command(about = "Create, query, update and remove people in a document store")]
struct Cli {
    /// MongoDB connection string
    #[arg(long, global = true, env = "MONGO_URI")]
    mongo_uri: Option<String>,

    /// Use a process-local store instead of MongoDB (data is lost on exit)
    #[arg(long, global = true)]
    in_memory: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the store is reachable
    Ping,
    /// Store the sample person
    Seed,
    /// Store one person
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        /// Favorite food (repeatable)
        #[arg(long = "food")]
        foods: Vec<String>,
    },
    /// Store every person from a JSON array file ("-" reads stdin)
    CreateMany { path: PathBuf },
    /// List people with this name
    FindByName { name: String },
    /// Show the first person who likes this food
    FindOneByFood { food: String },
    /// Show a person by id
    FindById { id: String },
    /// Append a favorite food to a person
    AddFood {
        id: String,
        #[arg(long, default_value = DEFAULT_FOOD_TO_ADD)]
        food: String,
        /// Use a single atomic update instead of fetch-modify-save
        #[arg(long)]
        atomic: bool,
    },
    /// Set the age of the first person with this name
    SetAge {
        name: String,
        #[arg(long, default_value_t = DEFAULT_AGE_TO_SET)]
        age: i32,
    },
    /// Remove a person by id
    RemoveById { id: String },
    /// Remove every person with this name
    RemoveMany {
        #[arg(default_value = DEFAULT_NAME_TO_REMOVE)]
        name: String,
    },
    /// Two people who like this food, sorted by name, without age
    QueryChain {
        #[arg(default_value = DEFAULT_FOOD_TO_SEARCH)]
        food: String,
    },
    /// Run every operation once against the store
    Demo,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = PersonServiceConfig::from_env();
    if let Some(uri) = cli.mongo_uri.clone() {
        config = config.with_database_url(uri);
    }

    init_tracing(cli.verbose, &config.service.log_level);
    tracing::debug!(service = %config.service.service_name, "Configuration loaded");

    let service = if cli.in_memory {
        person_service_lib::in_memory()
    } else {
        match person_service_lib::connect(&config).await {
            Ok(service) => service,
            Err(e) => {
                tracing::debug!("{:?}", e);
                tracing::error!(
                    code = e.code(),
                    "Failed to connect to database: {}",
                    e.user_message()
                );
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = execute(cli.command, &service).await {
        report_failure(e.as_ref());
        std::process::exit(1);
    }

    Ok(())
}

async fn execute(
    command: Commands,
    service: &PersonManager,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Ping => {
            service.ping().await?;
            println!("ok");
        }
        Commands::Seed => print_json(&service.create(NewPerson::sample()).await?)?,
        Commands::Create { name, age, foods } => {
            let person = NewPerson {
                name,
                age,
                favorite_foods: foods,
            };
            print_json(&service.create(person).await?)?;
        }
        Commands::CreateMany { path } => {
            let raw = if path.as_os_str() == "-" {
                tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin())).await??
            } else {
                tokio::fs::read_to_string(&path).await?
            };
            let people: Vec<NewPerson> = serde_json::from_str(&raw)?;
            print_json(&service.create_many(people).await?)?;
        }
        Commands::FindByName { name } => print_json(&service.find_by_name(&name).await?)?,
        Commands::FindOneByFood { food } => {
            print_json(&service.find_one_by_food(&food).await?)?
        }
        Commands::FindById { id } => {
            print_json(&service.find_by_id(&PersonId::new(id)).await?)?
        }
        Commands::AddFood { id, food, atomic } => {
            let id = PersonId::new(id);
            let person = if atomic {
                service.add_food_atomic(&id, &food).await?
            } else {
                service.add_food_and_save(&id, &food).await?
            };
            print_json(&person)?;
        }
        Commands::SetAge { name, age } => print_json(&service.set_age_by_name(&name, age).await?)?,
        Commands::RemoveById { id } => {
            print_json(&service.remove_by_id(&PersonId::new(id)).await?)?
        }
        Commands::RemoveMany { name } => {
            let removed = service.remove_many_by_name(&name).await?;
            print_json(&serde_json::json!({ "deletedCount": removed }))?;
        }
        Commands::QueryChain { food } => print_json(&service.query_chain(&food).await?)?,
        Commands::Demo => print_json(&person_service_lib::run_demo(service).await?)?,
    }

    Ok(())
}

/// Log a failed command; expected outcomes (not found, invalid input) are warnings.
fn report_failure(err: &(dyn std::error::Error + 'static)) {
    match err.downcast_ref::<AppError>() {
        Some(e) if e.is_expected() => {
            tracing::warn!(code = e.code(), "{}", e.user_message());
        }
        Some(e) => {
            tracing::debug!("{:?}", e);
            tracing::error!(code = e.code(), "Command failed: {}", e.user_message());
        }
        None => tracing::error!("Command failed: {}", err),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize tracing subscriber (verbose mode sets debug level)
fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        default_level.to_string()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
