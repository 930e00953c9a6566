//! Person document as stored in the `people` collection.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult};
use domain::{Person, PersonDraft, PersonId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    /// Missing when excluded by a projection
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl PersonDocument {
    /// Build a new document; ids are assigned client-side so bulk inserts
    /// know their ids in input order.
    pub fn from_draft(draft: PersonDraft) -> Self {
        Self {
            id: ObjectId::new(),
            name: draft.name,
            age: draft.age,
            favorite_foods: draft.favorite_foods,
        }
    }

    pub fn from_person(person: &Person) -> AppResult<Self> {
        Ok(Self {
            id: parse_id(&person.id)?,
            name: person.name.clone(),
            age: person.age,
            favorite_foods: person.favorite_foods.clone(),
        })
    }
}

/// Convert stored document to domain entity
impl From<PersonDocument> for Person {
    fn from(document: PersonDocument) -> Self {
        Person {
            id: PersonId::new(document.id.to_hex()),
            name: document.name,
            age: document.age,
            favorite_foods: document.favorite_foods,
        }
    }
}

/// Parse an opaque id into the store's native object id.
pub fn parse_id(id: &PersonId) -> AppResult<ObjectId> {
    ObjectId::parse_str(id.as_str()).map_err(|_| AppError::invalid_id(id.as_str()))
}
