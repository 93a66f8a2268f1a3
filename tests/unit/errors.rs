//! Error taxonomy behavior visible to API callers

use kube::core::ErrorResponse;
use tenant_db_provisioner::provisioner::{Error, ProvisionStep};

use crate::common::postgres_request;

fn api_error(code: u16) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: String::new(),
        reason: String::new(),
        code,
    })
}

#[test]
fn test_workload_conflict_is_caller_visible() {
    let err = Error::from_create("Deployment", "orders-db", "7alice", api_error(409))
        .at_step(ProvisionStep::CreateDatabaseWorkload, "orders-db", "7alice");
    assert!(err.is_conflict());

    // The step and namespace survive into the message for operators.
    let text = format!("{}", err);
    assert!(text.contains("create-database-workload"));
    assert!(text.contains("orders-db"));
    assert!(text.contains("7alice"));
}

#[test]
fn test_non_conflict_create_errors_are_not_conflicts() {
    let err = Error::from_create("Service", "orders-db", "7alice", api_error(403));
    assert!(!err.is_conflict());
    assert!(!err.is_not_found());
}

#[test]
fn test_unknown_database_type_names_the_workload() {
    let err = Error::UnknownDatabaseType {
        name: "mystery".to_string(),
        namespace: "7alice".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("mystery"));
    assert!(text.contains("7alice"));
}

#[test]
fn test_request_validation_rejects_uppercase_names() {
    let mut req = postgres_request();
    req.name = "Orders-DB".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn test_request_validation_requires_credentials() {
    let mut req = postgres_request();
    req.password.clear();
    assert!(req.validate().is_err());
}
