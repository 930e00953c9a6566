//! Person repository backed by a MongoDB collection.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use super::entities::person::{parse_id, PersonDocument};
use crate::infra::Database;
use common::AppResult;
use domain::{
    Person, PersonDraft, PersonFilter, PersonId, PersonQuery, FIELD_AGE, FIELD_FAVORITE_FOODS,
    FIELD_ID, FIELD_NAME,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Person repository trait for dependency injection.
///
/// One method per document store primitive. Lookups and targeted mutations
/// return `None` when nothing matched; deciding whether that is an error is
/// left to the service layer.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Insert one validated person and return it with its assigned id
    async fn insert(&self, person: PersonDraft) -> AppResult<Person>;

    /// Insert a batch with one ordered write, preserving input order
    async fn insert_many(&self, people: Vec<PersonDraft>) -> AppResult<Vec<Person>>;

    /// All people with exactly this name
    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Person>>;

    /// First person (natural order) whose favorite foods contain `food`
    async fn find_one_by_food(&self, food: &str) -> AppResult<Option<Person>>;

    /// Person by id; a malformed id is an error
    async fn find_by_id(&self, id: &PersonId) -> AppResult<Option<Person>>;

    /// Replace the stored document with `person`
    async fn save(&self, person: &Person) -> AppResult<Option<Person>>;

    /// Set `age` on the first person named `name`, returning the updated document
    async fn set_age_by_name(&self, name: &str, age: i32) -> AppResult<Option<Person>>;

    /// Atomically append to `favoriteFoods`, returning the updated document
    async fn push_favorite_food(&self, id: &PersonId, food: &str) -> AppResult<Option<Person>>;

    /// Delete by id, returning the removed document
    async fn remove_by_id(&self, id: &PersonId) -> AppResult<Option<Person>>;

    /// Delete every person with this name, returning the count
    async fn remove_many_by_name(&self, name: &str) -> AppResult<u64>;

    /// Execute a chained query
    async fn run_query(&self, query: &PersonQuery) -> AppResult<Vec<Person>>;

    /// Round-trip to the store
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of PersonRepository over MongoDB
pub struct PersonStore {
    db: Database,
    people: Collection<PersonDocument>,
}

impl PersonStore {
    /// Create new repository instance
    pub fn new(db: Database) -> Self {
        let people = db.collection::<PersonDocument>();
        Self { db, people }
    }
}

#[async_trait]
impl PersonRepository for PersonStore {
    async fn insert(&self, person: PersonDraft) -> AppResult<Person> {
        let document = PersonDocument::from_draft(person);
        self.people.insert_one(&document).await?;
        Ok(Person::from(document))
    }

    async fn insert_many(&self, people: Vec<PersonDraft>) -> AppResult<Vec<Person>> {
        // The server rejects an empty batch
        if people.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<PersonDocument> =
            people.into_iter().map(PersonDocument::from_draft).collect();
        self.people.insert_many(&documents).ordered(true).await?;

        Ok(documents.into_iter().map(Person::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Person>> {
        let documents: Vec<PersonDocument> = self
            .people
            .find(doc! { FIELD_NAME: name })
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(Person::from).collect())
    }

    async fn find_one_by_food(&self, food: &str) -> AppResult<Option<Person>> {
        // Equality on an array field matches any element
        let result = self
            .people
            .find_one(doc! { FIELD_FAVORITE_FOODS: food })
            .await?;

        Ok(result.map(Person::from))
    }

    async fn find_by_id(&self, id: &PersonId) -> AppResult<Option<Person>> {
        let oid = parse_id(id)?;
        let result = self.people.find_one(doc! { FIELD_ID: oid }).await?;

        Ok(result.map(Person::from))
    }

    async fn save(&self, person: &Person) -> AppResult<Option<Person>> {
        let document = PersonDocument::from_person(person)?;
        let result = self
            .people
            .replace_one(doc! { FIELD_ID: document.id }, &document)
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        Ok(Some(Person::from(document)))
    }

    async fn set_age_by_name(&self, name: &str, age: i32) -> AppResult<Option<Person>> {
        // The driver returns the pre-update document unless told otherwise
        let result = self
            .people
            .find_one_and_update(doc! { FIELD_NAME: name }, doc! { "$set": { FIELD_AGE: age } })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(result.map(Person::from))
    }

    async fn push_favorite_food(&self, id: &PersonId, food: &str) -> AppResult<Option<Person>> {
        let oid = parse_id(id)?;
        let result = self
            .people
            .find_one_and_update(
                doc! { FIELD_ID: oid },
                doc! { "$push": { FIELD_FAVORITE_FOODS: food } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(result.map(Person::from))
    }

    async fn remove_by_id(&self, id: &PersonId) -> AppResult<Option<Person>> {
        let oid = parse_id(id)?;
        let result = self.people.find_one_and_delete(doc! { FIELD_ID: oid }).await?;

        Ok(result.map(Person::from))
    }

    async fn remove_many_by_name(&self, name: &str) -> AppResult<u64> {
        let result = self.people.delete_many(doc! { FIELD_NAME: name }).await?;
        Ok(result.deleted_count)
    }

    async fn run_query(&self, query: &PersonQuery) -> AppResult<Vec<Person>> {
        // A zero limit means "no limit" to the server
        if query.max_results() == Some(0) {
            return Ok(Vec::new());
        }

        let mut find = self.people.find(filter_document(query));
        if let Some(sort) = sort_document(query) {
            find = find.sort(sort);
        }
        if let Some(limit) = query.max_results() {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        if let Some(projection) = projection_document(query) {
            find = find.projection(projection);
        }

        let documents: Vec<PersonDocument> = find.await?.try_collect().await?;
        Ok(documents.into_iter().map(Person::from).collect())
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await
    }
}

// =============================================================================
// Query translation
// =============================================================================

fn condition(filter: &PersonFilter) -> Document {
    match filter {
        PersonFilter::Name(name) => doc! { FIELD_NAME: name.as_str() },
        PersonFilter::FavoriteFood(food) => doc! { FIELD_FAVORITE_FOODS: food.as_str() },
    }
}

pub(crate) fn filter_document(query: &PersonQuery) -> Document {
    match query.filters() {
        [] => Document::new(),
        [single] => condition(single),
        many => {
            let conditions: Vec<Bson> = many
                .iter()
                .map(|f| Bson::Document(condition(f)))
                .collect();
            doc! { "$and": conditions }
        }
    }
}

pub(crate) fn sort_document(query: &PersonQuery) -> Option<Document> {
    query.sort().map(|(field, order)| {
        let mut sort = Document::new();
        sort.insert(field.as_str(), order.as_i32());
        sort
    })
}

pub(crate) fn projection_document(query: &PersonQuery) -> Option<Document> {
    if query.excluded().is_empty() {
        return None;
    }

    let mut projection = Document::new();
    for field in query.excluded() {
        projection.insert(field.as_str(), 0);
    }
    Some(projection)
}
