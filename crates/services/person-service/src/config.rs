//! Person service configuration.

use std::env;

use common::{DatabaseConfig, ServiceConfig};
use domain::PEOPLE_COLLECTION;

/// Person service configuration.
#[derive(Debug, Clone)]
pub struct PersonServiceConfig {
    /// Logging and identification
    pub service: ServiceConfig,
    /// Document store connection
    pub database: DatabaseConfig,
}

impl PersonServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service: ServiceConfig {
                service_name: defaults.service.service_name,
                log_level: env::var("RUST_LOG").unwrap_or(defaults.service.log_level),
            },
            database: DatabaseConfig {
                url: env::var("MONGO_URI")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                database: env::var("PERSON_DATABASE").ok().filter(|s| !s.is_empty()),
                collection: env::var("PERSON_COLLECTION")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(defaults.database.collection),
            },
        }
    }

    /// Override the connection string (e.g. from a CLI flag).
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = url.into();
        self
    }
}

impl Default for PersonServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "person-service".to_string(),
                ..ServiceConfig::default()
            },
            database: DatabaseConfig {
                collection: PEOPLE_COLLECTION.to_string(),
                ..DatabaseConfig::default()
            },
        }
    }
}
