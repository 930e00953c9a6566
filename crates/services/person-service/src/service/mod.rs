//! Service layer - person use cases.

mod person_service;

pub use person_service::{PersonManager, PersonService};
