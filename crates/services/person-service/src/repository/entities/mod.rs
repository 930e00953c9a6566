//! Stored document shapes.

pub mod person;
