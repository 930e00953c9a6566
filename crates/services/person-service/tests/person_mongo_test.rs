//! Person service behaviour against a live MongoDB server.
//!
//! Ignored by default. Run with:
//! `MONGO_URI=mongodb://localhost:27017 cargo test -p person-service -- --ignored`

use std::collections::HashSet;
use std::sync::Arc;

use mongodb::bson::{oid::ObjectId, Document};

use common::{AppError, DatabaseConfig};
use domain::{NewPerson, OptionalField, PersonId, PersonQuery, SortField, SortOrder};
use person_service_lib::infra::Database;
use person_service_lib::repository::PersonStore;
use person_service_lib::service::{PersonManager, PersonService};

const TEST_DATABASE: &str = "person_service_test";

/// Each test gets its own collection so tests can run in parallel.
async fn setup() -> (Database, PersonManager) {
    let config = DatabaseConfig {
        url: std::env::var("MONGO_URI").expect("MONGO_URI must be set for MongoDB tests"),
        database: Some(TEST_DATABASE.to_string()),
        collection: format!("people_{}", ObjectId::new().to_hex()),
    };
    let db = Database::connect(&config).await.unwrap();
    let service = PersonManager::new(Arc::new(PersonStore::new(db.clone())));
    (db, service)
}

async fn teardown(db: Database) {
    db.collection::<Document>().drop().await.unwrap();
}

fn missing_id() -> PersonId {
    PersonId::new(ObjectId::new().to_hex())
}

#[tokio::test]
#[ignore]
async fn test_create_many_ids_persist_in_order() {
    let (db, service) = setup().await;

    let created = service
        .create_many(vec![
            NewPerson::new("p1"),
            NewPerson::new("p2").with_age(30),
            NewPerson::new("p3").with_foods(["burrito"]),
        ])
        .await
        .unwrap();

    let names: Vec<_> = created.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["p1", "p2", "p3"]);
    let ids: HashSet<_> = created.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids.len(), 3);

    for person in &created {
        let stored = service.find_by_id(&person.id).await.unwrap().unwrap();
        assert_eq!(&stored, person);
    }

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_find_by_id_absent_and_malformed() {
    let (db, service) = setup().await;

    assert!(service.find_by_id(&missing_id()).await.unwrap().is_none());

    let err = service
        .find_by_id(&PersonId::new("not-an-id"))
        .await
        .unwrap_err();
    assert!(err.is_store_error());

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_find_one_by_food_matches_array_element() {
    let (db, service) = setup().await;
    service
        .create_many(vec![
            NewPerson::new("Mary").with_foods(["salad"]),
            NewPerson::new("Joe").with_foods(["salad", "Pizza"]),
        ])
        .await
        .unwrap();

    let found = service.find_one_by_food("Pizza").await.unwrap().unwrap();
    assert_eq!(found.name, "Joe");
    assert!(service.find_one_by_food("kale").await.unwrap().is_none());

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_add_food_and_save_replaces_document() {
    let (db, service) = setup().await;
    let person = service
        .create(NewPerson::new("Ann").with_foods(["Pizza"]))
        .await
        .unwrap();

    service.add_food_and_save(&person.id, "hamburger").await.unwrap();
    service.add_food_and_save(&person.id, "hamburger").await.unwrap();

    let stored = service.find_by_id(&person.id).await.unwrap().unwrap();
    assert_eq!(stored.favorite_foods, vec!["Pizza", "hamburger", "hamburger"]);
    assert!(matches!(
        service.add_food_and_save(&missing_id(), "hamburger").await,
        Err(AppError::NotFound)
    ));

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_add_food_atomic_pushes() {
    let (db, service) = setup().await;
    let person = service
        .create(NewPerson::new("Ann").with_foods(["Pizza"]))
        .await
        .unwrap();

    let updated = service.add_food_atomic(&person.id, "hamburger").await.unwrap();

    assert_eq!(updated.favorite_foods, vec!["Pizza", "hamburger"]);
    let stored = service.find_by_id(&person.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);
    assert!(matches!(
        service.add_food_atomic(&missing_id(), "hamburger").await,
        Err(AppError::NotFound)
    ));

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_set_age_returns_post_update_document() {
    let (db, service) = setup().await;
    service
        .create(NewPerson::new("Laura Parry").with_age(25))
        .await
        .unwrap();

    let updated = service.set_age_by_name("Laura Parry", 20).await.unwrap();

    assert_eq!(updated.age, Some(20));
    assert!(matches!(
        service.set_age_by_name("Nobody", 20).await,
        Err(AppError::NotFound)
    ));

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_remove_by_id_then_not_found() {
    let (db, service) = setup().await;
    let person = service.create(NewPerson::new("Ann")).await.unwrap();

    let removed = service.remove_by_id(&person.id).await.unwrap();

    assert_eq!(removed, person);
    assert!(service.find_by_id(&person.id).await.unwrap().is_none());
    assert!(matches!(
        service.remove_by_id(&person.id).await,
        Err(AppError::NotFound)
    ));

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_remove_many_by_name_counts() {
    let (db, service) = setup().await;

    assert_eq!(service.remove_many_by_name("Mary").await.unwrap(), 0);

    service
        .create_many(vec![
            NewPerson::new("Mary"),
            NewPerson::new("Joe"),
            NewPerson::new("Mary"),
        ])
        .await
        .unwrap();

    assert_eq!(service.remove_many_by_name("Mary").await.unwrap(), 2);
    assert!(service.find_by_name("Mary").await.unwrap().is_empty());
    assert_eq!(service.find_by_name("Joe").await.unwrap().len(), 1);

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_query_chain_limit_sort_projection() {
    let (db, service) = setup().await;
    service
        .create_many(vec![
            NewPerson::new("Zoe").with_age(30).with_foods(["burrito"]),
            NewPerson::new("Carl").with_age(22).with_foods(["tacos", "burrito"]),
            NewPerson::new("Abe").with_age(50).with_foods(["burrito"]),
            NewPerson::new("Ben").with_age(40).with_foods(["sushi"]),
        ])
        .await
        .unwrap();

    let result = service.query_chain("burrito").await.unwrap();

    let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Abe", "Carl"]);
    assert!(result.iter().all(|p| p.age.is_none()));
    assert_eq!(result[1].favorite_foods, vec!["tacos", "burrito"]);

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_run_query_excludes_foods() {
    let (db, service) = setup().await;
    service
        .create_many(vec![
            NewPerson::new("Young").with_age(10).with_foods(["x"]),
            NewPerson::new("Old").with_age(90).with_foods(["y"]),
        ])
        .await
        .unwrap();

    let query = PersonQuery::new()
        .sort_by(SortField::Age, SortOrder::Descending)
        .exclude(OptionalField::FavoriteFoods);
    let result = service.run_query(&query).await.unwrap();

    let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Old", "Young"]);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json[0].get("favoriteFoods").is_none());
    assert_eq!(json[0]["age"], 90);

    assert!(service
        .run_query(&PersonQuery::new().limit(0))
        .await
        .unwrap()
        .is_empty());

    teardown(db).await;
}

#[tokio::test]
#[ignore]
async fn test_ping() {
    let (db, service) = setup().await;

    service.ping().await.unwrap();

    teardown(db).await;
}
