//! Control-database tests, ignored by default.
//!
//! Run with a reachable PostgreSQL configured through the DB_* environment
//! variables (see `config.rs` for defaults).

use tenant_db_provisioner::config::Config;
use tenant_db_provisioner::model::DatabaseResponse;
use tenant_db_provisioner::policy::DatabaseType;
use tenant_db_provisioner::store::{RegisterRequest, Store, StoreError};

async fn test_store() -> Store {
    Store::connect(&Config::from_env().store)
        .await
        .expect("a reachable control database is required for store tests")
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, std::process::id())
}

#[tokio::test]
#[ignore = "requires a reachable control database"]
async fn test_duplicate_registration_is_a_conflict() {
    let store = test_store().await;
    let req = RegisterRequest {
        username: unique("dup-user"),
        email: "dup@example.com".to_string(),
        password: "pw".to_string(),
    };

    let first = store.register_user(&req).await.unwrap();

    // The second insert must surface as a taken username, not as a raw
    // constraint violation, even though both pass any pre-insert check.
    let err = store.register_user(&req).await.unwrap_err();
    assert!(matches!(err, StoreError::UsernameTaken(name) if name == req.username));

    store.delete_user(first.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a reachable control database"]
async fn test_database_record_lifecycle() {
    let store = test_store().await;
    let user_id = std::process::id() as i64;
    let name = unique("record-db");
    let response = DatabaseResponse {
        name: name.clone(),
        host: format!("{}.7alice.svc.cluster.local", name),
        port: "5432".to_string(),
        username: "app".to_string(),
        database_type: DatabaseType::Postgresql,
        status: "creating".to_string(),
        message: String::new(),
        namespace: "7alice".to_string(),
        admin_url: format!("http://10.9.21.201/7alice/{}-pgadmin", name),
        admin_type: "pgAdmin".to_string(),
    };

    let record = store.record_database(&response, user_id).await.unwrap();
    assert_eq!(record.status, "creating");
    assert_eq!(record.admin_url, response.admin_url);

    let records = store.user_databases(user_id).await.unwrap();
    assert!(records.iter().any(|r| r.name == name));

    store
        .update_database_status(&name, "7alice", "running")
        .await
        .unwrap();
    let records = store.user_databases(user_id).await.unwrap();
    let updated = records.iter().find(|r| r.name == name).unwrap();
    assert_eq!(updated.status, "running");

    store.delete_database_record(&name, "7alice").await.unwrap();

    // Once the record is gone both update and delete report it missing.
    let err = store
        .update_database_status(&name, "7alice", "error")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DatabaseRecordNotFound { .. }));
}
