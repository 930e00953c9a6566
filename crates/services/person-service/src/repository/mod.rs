//! Repository layer for data access.

pub mod entities;
mod memory_store;
mod person_repository;

pub use memory_store::MemoryStore;
pub use person_repository::{PersonRepository, PersonStore};

#[cfg(any(test, feature = "test-utils"))]
pub use person_repository::MockPersonRepository;
