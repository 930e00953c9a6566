//! Person domain entity and related types.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{SAMPLE_PERSON_AGE, SAMPLE_PERSON_FOODS, SAMPLE_PERSON_NAME};
use crate::error::{DomainError, DomainResult};

/// Opaque identifier assigned by the store when a person is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Person domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: PersonId,
    pub name: String,
    /// Absent when never set or when excluded by a query projection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    /// Absent when empty or when excluded by a query projection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub favorite_foods: Vec<String>,
}

impl Person {
    /// Append a food; duplicates are kept in append order
    pub fn add_favorite_food(&mut self, food: impl Into<String>) {
        self.favorite_foods.push(food.into());
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = Some(age);
    }

    pub fn likes(&self, food: &str) -> bool {
        self.favorite_foods.iter().any(|f| f == food)
    }
}

/// Person creation data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    /// Display name (required)
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// The person stored by the `seed` command.
    pub fn sample() -> Self {
        Self::new(SAMPLE_PERSON_NAME)
            .with_age(SAMPLE_PERSON_AGE)
            .with_foods(SAMPLE_PERSON_FOODS.iter().copied())
    }

    /// Validate and turn into a draft ready to be written.
    pub fn into_draft(self) -> DomainResult<PersonDraft> {
        self.validate()?;
        let name = self
            .name
            .ok_or_else(|| DomainError::validation("name is required"))?;

        Ok(PersonDraft {
            name,
            age: self.age,
            favorite_foods: self.favorite_foods,
        })
    }
}

/// A validated person that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub age: Option<i32>,
    pub favorite_foods: Vec<String>,
}

impl PersonDraft {
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name,
            age: self.age,
            favorite_foods: self.favorite_foods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_is_rejected() {
        let err = NewPerson::default().into_draft().unwrap_err();
        assert_eq!(err, DomainError::Validation("name is required".to_string()));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = NewPerson::new("").into_draft().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("empty")));
    }

    #[test]
    fn draft_keeps_fields() {
        let draft = NewPerson::sample().into_draft().unwrap();
        assert_eq!(draft.name, "Laura Parry");
        assert_eq!(draft.age, Some(25));
        assert_eq!(draft.favorite_foods, vec!["Pizza", "Tomatoes", "Chocolate"]);
    }

    #[test]
    fn favorite_foods_keep_duplicates() {
        let mut person = NewPerson::new("Ann")
            .with_foods(["Pizza"])
            .into_draft()
            .unwrap()
            .into_person(PersonId::new("abc"));

        person.add_favorite_food("hamburger");
        person.add_favorite_food("hamburger");

        assert_eq!(person.favorite_foods, vec!["Pizza", "hamburger", "hamburger"]);
        assert!(person.likes("hamburger"));
    }

    #[test]
    fn serializes_with_store_field_names() {
        let person = Person {
            id: PersonId::new("65f0c0ffee"),
            name: "Ann".to_string(),
            age: None,
            favorite_foods: vec!["burrito".to_string()],
        };

        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["_id"], "65f0c0ffee");
        assert_eq!(json["favoriteFoods"][0], "burrito");
        assert!(json.get("age").is_none());
    }

    #[test]
    fn empty_foods_are_left_out() {
        let person = Person {
            id: PersonId::new("65f0c0ffee"),
            name: "Ann".to_string(),
            age: Some(3),
            favorite_foods: Vec::new(),
        };

        let json = serde_json::to_value(&person).unwrap();
        assert!(json.get("favoriteFoods").is_none());

        let back: Person = serde_json::from_value(json).unwrap();
        assert_eq!(back, person);
    }

    #[test]
    fn new_person_deserializes_without_foods() {
        let person: NewPerson = serde_json::from_str(r#"{"name":"Bob","age":3}"#).unwrap();
        assert_eq!(person.name.as_deref(), Some("Bob"));
        assert!(person.favorite_foods.is_empty());
    }
}
