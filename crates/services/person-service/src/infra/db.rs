//! Database connection and initialization.

use mongodb::bson::doc;
use mongodb::{Client, Collection};
use serde::{de::DeserializeOwned, Serialize};

use common::{AppResult, DatabaseConfig};

/// Used when neither the config nor the connection string names a database
const FALLBACK_DATABASE: &str = "people_db";

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    database: mongodb::Database,
    collection: String,
}

impl Database {
    /// Open a client and verify the server answers.
    ///
    /// The driver pools connections internally; cloning `Database` shares them.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.url).await?;

        let database = match &config.database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(FALLBACK_DATABASE)),
        };

        let db = Self {
            database,
            collection: config.collection.clone(),
        };
        db.ping().await?;
        tracing::info!(
            database = db.database.name(),
            collection = %db.collection,
            "Database connected"
        );

        Ok(db)
    }

    /// Typed handle to the configured collection.
    pub fn collection<T>(&self) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.database.collection::<T>(&self.collection)
    }

    /// Check database connectivity with a `ping` command.
    pub async fn ping(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
