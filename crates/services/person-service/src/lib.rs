//! Person Service Library
//!
//! Basic document-database operations over a single `people` collection:
//! create, read, update, delete and a chained query.
//!
//! The service can run against MongoDB ([`repository::PersonStore`]) or a
//! process-local store ([`repository::MemoryStore`]).

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use common::AppResult;
use domain::{
    NewPerson, Person, DEFAULT_AGE_TO_SET, DEFAULT_FOOD_TO_ADD, DEFAULT_FOOD_TO_SEARCH,
    DEFAULT_NAME_TO_REMOVE,
};

use crate::config::PersonServiceConfig;
use crate::infra::Database;
use crate::repository::{MemoryStore, PersonRepository, PersonStore};
use crate::service::{PersonManager, PersonService};

/// Connect to MongoDB and build the service on top of it.
pub async fn connect(config: &PersonServiceConfig) -> AppResult<PersonManager> {
    let db = Database::connect(&config.database).await?;
    let repo: Arc<dyn PersonRepository> = Arc::new(PersonStore::new(db));
    Ok(PersonManager::new(repo))
}

/// Build the service over a fresh in-memory store.
pub fn in_memory() -> PersonManager {
    PersonManager::new(Arc::new(MemoryStore::new()))
}

/// Everything produced by one walk through the exercise.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub created: Person,
    pub created_many: Vec<Person>,
    pub found_by_name: Vec<Person>,
    pub found_by_food: Option<Person>,
    pub found_by_id: Option<Person>,
    pub edited: Person,
    pub updated: Person,
    pub removed: Person,
    pub removed_count: u64,
    pub query_chain: Vec<Person>,
}

/// The people inserted in bulk by [`run_demo`].
pub fn demo_people() -> Vec<NewPerson> {
    vec![
        NewPerson::new("John").with_age(32).with_foods(["burrito", "steak"]),
        NewPerson::new("Mary").with_age(28).with_foods(["salad"]),
        NewPerson::new("Ann").with_age(41).with_foods(["burrito", "sushi"]),
        NewPerson::new("Mary").with_age(19).with_foods(["burrito"]),
        NewPerson::new("Bob").with_foods(["burrito"]),
    ]
}

/// Run every operation once, in the order of the original exercise.
pub async fn run_demo(service: &dyn PersonService) -> AppResult<DemoReport> {
    let created = service.create(NewPerson::sample()).await?;
    let created_many = service.create_many(demo_people()).await?;
    info!(count = created_many.len() + 1, "Demo data inserted");

    let found_by_name = service.find_by_name(&created.name).await?;
    let found_by_food = service.find_one_by_food("Pizza").await?;
    let found_by_id = service.find_by_id(&created.id).await?;
    let edited = service
        .add_food_and_save(&created.id, DEFAULT_FOOD_TO_ADD)
        .await?;
    let updated = service
        .set_age_by_name(&created.name, DEFAULT_AGE_TO_SET)
        .await?;
    let removed = service.remove_by_id(&created.id).await?;
    let removed_count = service.remove_many_by_name(DEFAULT_NAME_TO_REMOVE).await?;
    let query_chain = service.query_chain(DEFAULT_FOOD_TO_SEARCH).await?;

    Ok(DemoReport {
        created,
        created_many,
        found_by_name,
        found_by_food,
        found_by_id,
        edited,
        updated,
        removed,
        removed_count,
        query_chain,
    })
}
