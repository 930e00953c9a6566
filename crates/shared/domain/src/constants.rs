//! Domain-level constants.
//!
//! Defaults and field names shared by the stores and the CLI.

// =============================================================================
// Storage
// =============================================================================

/// Default collection holding person documents
pub const PEOPLE_COLLECTION: &str = "people";

/// Stored field names
pub const FIELD_ID: &str = "_id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_AGE: &str = "age";
pub const FIELD_FAVORITE_FOODS: &str = "favoriteFoods";

// =============================================================================
// Exercise defaults
// =============================================================================

/// Name of the sample person created by `seed`
pub const SAMPLE_PERSON_NAME: &str = "Laura Parry";

/// Age of the sample person
pub const SAMPLE_PERSON_AGE: i32 = 25;

/// Favorite foods of the sample person
pub const SAMPLE_PERSON_FOODS: &[&str] = &["Pizza", "Tomatoes", "Chocolate"];

/// Food appended by the find-edit-save operation
pub const DEFAULT_FOOD_TO_ADD: &str = "hamburger";

/// Age written by the find-and-update operation
pub const DEFAULT_AGE_TO_SET: i32 = 20;

/// Name targeted by the bulk removal
pub const DEFAULT_NAME_TO_REMOVE: &str = "Mary";

/// Food searched by the chained query
pub const DEFAULT_FOOD_TO_SEARCH: &str = "burrito";

/// Maximum results returned by the chained query
pub const QUERY_CHAIN_LIMIT: usize = 2;
