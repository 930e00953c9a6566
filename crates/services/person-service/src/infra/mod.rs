//! Infrastructure layer - document store connection.

mod db;

pub use db::Database;
