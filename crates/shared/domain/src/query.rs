//! Chained person queries: filter, sort, limit and field exclusion.
//!
//! A [`PersonQuery`] is a plain description; each store translates it into
//! its own execution (a driver `find` with options, or an in-memory scan via
//! [`PersonQuery::apply`]).

use std::cmp::Ordering;

use crate::constants::{FIELD_AGE, FIELD_FAVORITE_FOODS, FIELD_NAME};
use crate::person::Person;

/// A single equality/containment condition. Conditions are ANDed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonFilter {
    /// `name` equals the value
    Name(String),
    /// `favoriteFoods` contains the value
    FavoriteFood(String),
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            PersonFilter::Name(name) => person.name == *name,
            PersonFilter::FavoriteFood(food) => person.likes(food),
        }
    }
}

/// Fields a query can sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Age,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => FIELD_NAME,
            SortField::Age => FIELD_AGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Direction value understood by document stores (`1` / `-1`)
    pub fn as_i32(&self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Optional fields that may be left out of query results.
///
/// `name` and `_id` are always returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalField {
    Age,
    FavoriteFoods,
}

impl OptionalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionalField::Age => FIELD_AGE,
            OptionalField::FavoriteFoods => FIELD_FAVORITE_FOODS,
        }
    }
}

/// Builder for a find-with-modifiers query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonQuery {
    filters: Vec<PersonFilter>,
    sort: Option<(SortField, SortOrder)>,
    limit: Option<usize>,
    excluded: Vec<OptionalField>,
}

impl PersonQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.filters.push(PersonFilter::Name(name.into()));
        self
    }

    pub fn favorite_food(mut self, food: impl Into<String>) -> Self {
        self.filters.push(PersonFilter::FavoriteFood(food.into()));
        self
    }

    /// Replaces any previous sort.
    pub fn sort_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn exclude(mut self, field: OptionalField) -> Self {
        if !self.excluded.contains(&field) {
            self.excluded.push(field);
        }
        self
    }

    pub fn filters(&self) -> &[PersonFilter] {
        &self.filters
    }

    pub fn sort(&self) -> Option<(SortField, SortOrder)> {
        self.sort
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }

    pub fn excluded(&self) -> &[OptionalField] {
        &self.excluded
    }

    pub fn matches(&self, person: &Person) -> bool {
        self.filters.iter().all(|f| f.matches(person))
    }

    /// Strip excluded fields from a result.
    pub fn project(&self, mut person: Person) -> Person {
        for field in &self.excluded {
            match field {
                OptionalField::Age => person.age = None,
                OptionalField::FavoriteFoods => person.favorite_foods.clear(),
            }
        }
        person
    }

    /// Execute the query over candidates held in natural (insertion) order.
    ///
    /// The sort is stable, so ties keep their natural order.
    pub fn apply<'a, I>(&self, people: I) -> Vec<Person>
    where
        I: IntoIterator<Item = &'a Person>,
    {
        let mut matched: Vec<&Person> = people.into_iter().filter(|p| self.matches(p)).collect();

        if let Some((field, order)) = self.sort {
            matched.sort_by(|a, b| {
                let ordering = compare_by(field, a, b);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        matched
            .into_iter()
            .map(|p| self.project(p.clone()))
            .collect()
    }
}

// Missing ages sort first, as they do in the document store.
fn compare_by(field: SortField, a: &Person, b: &Person) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Age => a.age.cmp(&b.age),
    }
}
