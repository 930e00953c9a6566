//! Person service - Handles person-related use cases.
//!
//! Validation runs before any write. Operations that need an existing target
//! turn a missing document into `AppError::NotFound`; plain lookups return
//! `Option` instead. Store failures are forwarded unchanged.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use common::{AppResult, OptionExt};
use domain::{
    NewPerson, OptionalField, Person, PersonDraft, PersonId, PersonQuery, SortField, SortOrder,
    QUERY_CHAIN_LIMIT,
};

use crate::repository::PersonRepository;

/// Person service trait for dependency injection.
#[async_trait]
pub trait PersonService: Send + Sync {
    /// Validate and store one person
    async fn create(&self, person: NewPerson) -> AppResult<Person>;

    /// Validate every person, then store them all in input order
    async fn create_many(&self, people: Vec<NewPerson>) -> AppResult<Vec<Person>>;

    /// All people with this name (possibly none)
    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Person>>;

    /// First person who likes `food`, if any
    async fn find_one_by_food(&self, food: &str) -> AppResult<Option<Person>>;

    /// Person by id, if present
    async fn find_by_id(&self, id: &PersonId) -> AppResult<Option<Person>>;

    /// Fetch, append `food`, save. Not atomic: concurrent callers may lose updates.
    async fn add_food_and_save(&self, id: &PersonId, food: &str) -> AppResult<Person>;

    /// Append `food` with a single atomic update
    async fn add_food_atomic(&self, id: &PersonId, food: &str) -> AppResult<Person>;

    /// Set the age of the first person named `name`, returning the updated person
    async fn set_age_by_name(&self, name: &str, age: i32) -> AppResult<Person>;

    /// Remove by id, returning the removed person
    async fn remove_by_id(&self, id: &PersonId) -> AppResult<Person>;

    /// Remove every person with this name; zero is a valid count
    async fn remove_many_by_name(&self, name: &str) -> AppResult<u64>;

    /// Up to two people who like `food`, sorted by name, without `age`
    async fn query_chain(&self, food: &str) -> AppResult<Vec<Person>>;

    /// Execute an arbitrary chained query
    async fn run_query(&self, query: &PersonQuery) -> AppResult<Vec<Person>>;

    /// Check the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of PersonService using a repository.
pub struct PersonManager {
    repo: Arc<dyn PersonRepository>,
}

impl PersonManager {
    /// Create new person service instance with repository
    pub fn new(repo: Arc<dyn PersonRepository>) -> Self {
        Self { repo }
    }

    /// The query run by [`PersonService::query_chain`].
    pub fn query_chain_for(food: &str) -> PersonQuery {
        PersonQuery::new()
            .favorite_food(food)
            .sort_by(SortField::Name, SortOrder::Ascending)
            .limit(QUERY_CHAIN_LIMIT)
            .exclude(OptionalField::Age)
    }
}

#[async_trait]
impl PersonService for PersonManager {
    async fn create(&self, person: NewPerson) -> AppResult<Person> {
        let draft = person.into_draft()?;
        let created = self.repo.insert(draft).await?;
        info!(id = %created.id, name = %created.name, "Person created");
        Ok(created)
    }

    async fn create_many(&self, people: Vec<NewPerson>) -> AppResult<Vec<Person>> {
        // Nothing is written unless the whole batch is valid
        let drafts = people
            .into_iter()
            .map(NewPerson::into_draft)
            .collect::<Result<Vec<PersonDraft>, _>>()?;

        let created = self.repo.insert_many(drafts).await?;
        info!(count = created.len(), "People created");
        Ok(created)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Person>> {
        self.repo.find_by_name(name).await
    }

    async fn find_one_by_food(&self, food: &str) -> AppResult<Option<Person>> {
        self.repo.find_one_by_food(food).await
    }

    async fn find_by_id(&self, id: &PersonId) -> AppResult<Option<Person>> {
        self.repo.find_by_id(id).await
    }

    async fn add_food_and_save(&self, id: &PersonId, food: &str) -> AppResult<Person> {
        let mut person = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        person.add_favorite_food(food);
        debug!(%id, food, "Saving person with appended food");

        // Removed between fetch and save
        self.repo.save(&person).await?.ok_or_not_found()
    }

    async fn add_food_atomic(&self, id: &PersonId, food: &str) -> AppResult<Person> {
        self.repo
            .push_favorite_food(id, food)
            .await?
            .ok_or_not_found()
    }

    async fn set_age_by_name(&self, name: &str, age: i32) -> AppResult<Person> {
        self.repo
            .set_age_by_name(name, age)
            .await?
            .ok_or_not_found()
    }

    async fn remove_by_id(&self, id: &PersonId) -> AppResult<Person> {
        let removed = self.repo.remove_by_id(id).await?.ok_or_not_found()?;
        info!(%id, "Person removed");
        Ok(removed)
    }

    async fn remove_many_by_name(&self, name: &str) -> AppResult<u64> {
        let count = self.repo.remove_many_by_name(name).await?;
        info!(name, count, "People removed");
        Ok(count)
    }

    async fn query_chain(&self, food: &str) -> AppResult<Vec<Person>> {
        self.repo.run_query(&Self::query_chain_for(food)).await
    }

    async fn run_query(&self, query: &PersonQuery) -> AppResult<Vec<Person>> {
        self.repo.run_query(query).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}
