//! Runs against a real PostgreSQL only when `TEST_DATABASE_URL` is set.

use customer_service::{
    ensure_customer_table, AppError, Customer, CustomerPatch, CustomerService, CustomerStore, PgCustomerStore,
};
use std::sync::Arc;

/// A store on a fresh schema, plus the schema name for cleanup.
async fn test_store() -> Option<(PgCustomerStore, String)> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .unwrap_or_else(|err| panic!("failed to connect to TEST_DATABASE_URL: {err}"));
    let schema = format!("customer_test_{}", uuid::Uuid::new_v4().simple());
    ensure_customer_table(&pool, &schema)
        .await
        .unwrap_or_else(|err| panic!("failed to create customer table: {err}"));
    Some((PgCustomerStore::new(pool, &schema), schema))
}

async fn drop_schema(store: &PgCustomerStore, schema: &str) {
    let _ = sqlx::query(&format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", schema))
        .execute(store.pool())
        .await;
}

fn customer(id: &str, email: &str) -> Customer {
    Customer {
        id: id.into(),
        first_name: "A".into(),
        middle_name: None,
        last_name: "B".into(),
        email: email.into(),
        phone_number: "1".into(),
    }
}

#[tokio::test]
async fn unique_email_is_enforced_by_the_table() {
    let Some((store, schema)) = test_store().await else {
        return;
    };
    store.insert(&customer("1", "a@x.com")).await.expect("insert");
    let r = store.insert(&customer("2", "a@x.com")).await;
    assert!(matches!(r, Err(AppError::StorageConstraintViolation(_))));
    let r = store.insert(&customer("1", "b@x.com")).await;
    assert!(matches!(r, Err(AppError::StorageConstraintViolation(_))));

    store.insert(&customer("3", "c@x.com")).await.expect("insert");
    let patch = CustomerPatch {
        email: Some("a@x.com".into()),
        ..Default::default()
    };
    let r = store.update("3", &patch).await;
    assert!(matches!(r, Err(AppError::StorageConstraintViolation(_))));

    drop_schema(&store, &schema).await;
}

#[tokio::test]
async fn partial_update_list_and_delete() {
    let Some((store, schema)) = test_store().await else {
        return;
    };
    let mut first = customer("1", "a@x.com");
    first.middle_name = Some("M".into());
    store.insert(&first).await.expect("insert");
    store.insert(&customer("2", "b@x.com")).await.expect("insert");

    let patch = CustomerPatch {
        email: Some("z@x.com".into()),
        ..Default::default()
    };
    let updated = store.update("1", &patch).await.expect("update");
    assert_eq!(updated.email, "z@x.com");
    assert_eq!(updated.middle_name.as_deref(), Some("M"));
    assert_eq!(updated.first_name, "A");

    let same = store.update("1", &CustomerPatch::default()).await.expect("empty update");
    assert_eq!(same, updated);

    let page = store.list(0, 1).await.expect("list");
    assert_eq!(page.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["1"]);

    store.delete("1").await.expect("delete");
    assert!(store.get_by_id("1").await.expect("get").is_none());
    assert!(matches!(store.delete("1").await, Err(AppError::NotFound(_))));
    assert!(matches!(
        store.update("1", &patch).await,
        Err(AppError::NotFound(_))
    ));

    drop_schema(&store, &schema).await;
}

#[tokio::test]
async fn service_over_postgres_rejects_duplicates() {
    let Some((store, schema)) = test_store().await else {
        return;
    };
    let pool_store = store.clone();
    let svc = CustomerService::new(Arc::new(store));
    let input = serde_json::json!({
        "first_name": "A", "last_name": "B", "email": "svc@x.com", "phone_number": "1"
    });
    svc.create_customer(serde_json::from_value(input.clone()).expect("body"))
        .await
        .expect("create");
    let r = svc
        .create_customer(serde_json::from_value(input).expect("body"))
        .await;
    assert!(matches!(r, Err(AppError::DuplicateEmail(_))));

    drop_schema(&pool_store, &schema).await;
}

#[tokio::test]
async fn check_constraints_reject_invalid_rows() {
    let Some((store, schema)) = test_store().await else {
        return;
    };
    let mut blank = customer("1", "a@x.com");
    blank.first_name = "   ".into();
    let r = store.insert(&blank).await;
    assert!(matches!(r, Err(AppError::Validation(_))), "got {r:?}");

    let r = store.insert(&customer("2", "no-at-sign")).await;
    assert!(matches!(r, Err(AppError::Validation(_))), "got {r:?}");

    store.insert(&customer("3", "c@x.com")).await.expect("insert");
    let patch = CustomerPatch {
        last_name: Some(String::new()),
        ..Default::default()
    };
    let r = store.update("3", &patch).await;
    assert!(matches!(r, Err(AppError::Validation(_))), "got {r:?}");
    assert!(store.list(0, 10).await.expect("list").iter().all(|c| c.id == "3"));

    drop_schema(&store, &schema).await;
}
