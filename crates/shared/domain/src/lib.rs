//! Domain layer - Core entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Types here are shared by the stores, the service layer and the CLI.

pub mod constants;
pub mod error;
pub mod person;
pub mod query;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use person::{NewPerson, Person, PersonDraft, PersonId};
pub use query::{OptionalField, PersonFilter, PersonQuery, SortField, SortOrder};
