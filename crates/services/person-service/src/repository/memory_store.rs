//! MemoryStore - in-process person store for tests, demos and development.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::entities::person::parse_id;
use super::PersonRepository;
use common::AppResult;
use domain::{Person, PersonDraft, PersonId, PersonQuery};

/// In-memory person store kept in insertion (natural) order.
///
/// Ids are generated and parsed exactly like the MongoDB store, so malformed
/// ids fail the same way. Each method holds the lock for a single primitive
/// only; a fetch followed by a save can still interleave with other writers.
/// Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct MemoryStore {
    people: Arc<RwLock<Vec<Person>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored people.
    pub async fn len(&self) -> usize {
        self.people.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.people.read().await.is_empty()
    }

    fn assign_id(draft: PersonDraft) -> Person {
        draft.into_person(PersonId::new(ObjectId::new().to_hex()))
    }
}

#[async_trait]
impl PersonRepository for MemoryStore {
    async fn insert(&self, person: PersonDraft) -> AppResult<Person> {
        let person = Self::assign_id(person);
        self.people.write().await.push(person.clone());
        Ok(person)
    }

    async fn insert_many(&self, people: Vec<PersonDraft>) -> AppResult<Vec<Person>> {
        let created: Vec<Person> = people.into_iter().map(Self::assign_id).collect();
        self.people.write().await.extend(created.iter().cloned());
        Ok(created)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Person>> {
        let people = self.people.read().await;
        Ok(people.iter().filter(|p| p.name == name).cloned().collect())
    }

    async fn find_one_by_food(&self, food: &str) -> AppResult<Option<Person>> {
        let people = self.people.read().await;
        Ok(people.iter().find(|p| p.likes(food)).cloned())
    }

    async fn find_by_id(&self, id: &PersonId) -> AppResult<Option<Person>> {
        parse_id(id)?;
        let people = self.people.read().await;
        Ok(people.iter().find(|p| p.id == *id).cloned())
    }

    async fn save(&self, person: &Person) -> AppResult<Option<Person>> {
        parse_id(&person.id)?;
        let mut people = self.people.write().await;
        match people.iter_mut().find(|p| p.id == person.id) {
            Some(stored) => {
                *stored = person.clone();
                Ok(Some(person.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_age_by_name(&self, name: &str, age: i32) -> AppResult<Option<Person>> {
        let mut people = self.people.write().await;
        Ok(people.iter_mut().find(|p| p.name == name).map(|p| {
            p.set_age(age);
            p.clone()
        }))
    }

    async fn push_favorite_food(&self, id: &PersonId, food: &str) -> AppResult<Option<Person>> {
        parse_id(id)?;
        let mut people = self.people.write().await;
        Ok(people.iter_mut().find(|p| p.id == *id).map(|p| {
            p.add_favorite_food(food);
            p.clone()
        }))
    }

    async fn remove_by_id(&self, id: &PersonId) -> AppResult<Option<Person>> {
        parse_id(id)?;
        let mut people = self.people.write().await;
        let position = people.iter().position(|p| p.id == *id);
        Ok(position.map(|index| people.remove(index)))
    }

    async fn remove_many_by_name(&self, name: &str) -> AppResult<u64> {
        let mut people = self.people.write().await;
        let before = people.len();
        people.retain(|p| p.name != name);
        Ok((before - people.len()) as u64)
    }

    async fn run_query(&self, query: &PersonQuery) -> AppResult<Vec<Person>> {
        let people = self.people.read().await;
        Ok(query.apply(people.iter()))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use domain::NewPerson;

    fn draft(name: &str) -> PersonDraft {
        NewPerson::new(name).into_draft().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_object_ids() {
        let store = MemoryStore::new();
        let person = store.insert(draft("Ann")).await.unwrap();

        assert!(parse_id(&person.id).is_ok());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn save_of_missing_person_matches_nothing() {
        let store = MemoryStore::new();
        let ghost = draft("Ghost").into_person(PersonId::new(ObjectId::new().to_hex()));

        assert!(store.save(&ghost).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn malformed_id_fails_like_the_database() {
        let store = MemoryStore::new();
        let err = store.find_by_id(&PersonId::new("xyz")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));
    }

    #[tokio::test]
    async fn set_age_touches_first_match_only() {
        let store = MemoryStore::new();
        let first = store.insert(draft("Sam")).await.unwrap();
        let second = store.insert(draft("Sam")).await.unwrap();

        let updated = store.set_age_by_name("Sam", 7).await.unwrap().unwrap();
        assert_eq!(updated.id, first.id);

        let untouched = store.find_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(untouched.age, None);
    }
}
