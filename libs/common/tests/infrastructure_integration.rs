//! Integration tests for the PostgreSQL document store
//!
//! These tests need a reachable PostgreSQL instance (see `DATABASE_URL`)
//! and are ignored by default. Run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    error::StoreError,
    store::{Collection, DocumentStore, Filter, PostgresStore},
};
use serde_json::json;
use uuid::Uuid;

/// Round-trips documents through every store operation
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_postgres_document_store() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");

    let store = PostgresStore::new(pool);
    store.ensure_collections().await?;
    // Bootstrapping twice must be harmless
    store.ensure_collections().await?;

    let movie = Uuid::new_v4();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let tag = Uuid::new_v4().to_string();

    store
        .insert(
            Collection::Reviews,
            first,
            json!({"_id": first, "movie": movie, "tag": tag, "rating": 4}),
        )
        .await?;
    store
        .insert(
            Collection::Reviews,
            second,
            json!({"_id": second, "movie": Uuid::new_v4(), "tag": tag, "rating": 2}),
        )
        .await?;

    let fetched = store.get(Collection::Reviews, first).await?;
    assert_eq!(fetched.map(|doc| doc["rating"].clone()), Some(json!(4)));
    assert_eq!(store.get(Collection::Reviews, Uuid::new_v4()).await?, None);

    let found = store
        .find(
            Collection::Reviews,
            &Filter::new().eq("movie", movie.to_string()),
        )
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["_id"], json!(first));

    let tagged = store
        .find(Collection::Reviews, &Filter::new().eq("tag", tag.clone()))
        .await?;
    assert_eq!(tagged.len(), 2, "both reviews share the tag");

    let many = store
        .get_many(Collection::Reviews, &[first, second, Uuid::new_v4()])
        .await?;
    assert_eq!(many.len(), 2);

    let username = format!("user-{}", Uuid::new_v4());
    store
        .insert(Collection::Users, Uuid::new_v4(), json!({"username": username}))
        .await?;
    let duplicate = store
        .insert(Collection::Users, Uuid::new_v4(), json!({"username": username}))
        .await;
    assert!(matches!(
        duplicate,
        Err(StoreError::Conflict {
            field: "username",
            ..
        })
    ));

    Ok(())
}
