use customer_360::adapters::catalog::CatalogSource;
use customer_360::domain::model::CustomerId;
use customer_360::domain::ports::DatasetSource;
use customer_360::DashboardError;
use httpmock::prelude::*;
use std::collections::HashMap;

const CUSTOMERS_CSV: &str = "\
CustomerID,Age,Location,Tenure,NumProducts,CrossSell_Motor,CrossSell_Haushalt,Storno
1001,34,München,3,1,0.62,0.35,0.12
1002,58,Köln,15,4,0.21,0.77,0.05
1003,27,Berlin,1,1,0.83,0.14,0.48
";

fn metadata_json() -> serde_json::Value {
    serde_json::json!({
        "datasetId": "ds-123",
        "name": "customer_data",
        "rowCount": 3,
        "categories": ["TRAINING"]
    })
}

#[tokio::test]
async fn test_fetch_dataset_with_bearer_token() {
    let server = MockServer::start();

    let metadata_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v2/datasets/ds-123/")
            .header("Authorization", "Bearer test-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(metadata_json());
    });

    let file_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v2/datasets/ds-123/file/")
            .header("Authorization", "Bearer test-token");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(CUSTOMERS_CSV);
    });

    let source = CatalogSource::new(server.url("/api/v2"), "test-token", "ds-123");
    let table = source.fetch().await.unwrap();

    metadata_mock.assert();
    file_mock.assert();
    assert_eq!(table.len(), 3);

    let record = table.get(&CustomerId::from("1002")).unwrap();
    assert_eq!(record.location, "Köln");
    assert_eq!(record.num_products, 4);
    assert_eq!(record.cross_sell_haushalt, 0.77);
}

#[tokio::test]
async fn test_custom_headers_are_sent() {
    let server = MockServer::start();

    let metadata_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/datasets/ds-123/")
            .header("X-DataRobot-Tenant", "emea");
        then.status(200).json_body(metadata_json());
    });
    let file_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/datasets/ds-123/file/")
            .header("X-DataRobot-Tenant", "emea");
        then.status(200).body(CUSTOMERS_CSV);
    });

    let mut headers = HashMap::new();
    headers.insert("X-DataRobot-Tenant".to_string(), "emea".to_string());
    let source = CatalogSource::new(server.base_url(), "t", "ds-123")
        .with_timeout(Some(5))
        .with_headers(headers);

    assert!(source.fetch().await.is_ok());
    metadata_mock.assert();
    file_mock.assert();
}

#[tokio::test]
async fn test_unknown_dataset_is_not_found() {
    let server = MockServer::start();
    let metadata_mock = server.mock(|when, then| {
        when.method(GET).path("/datasets/missing/");
        then.status(404)
            .json_body(serde_json::json!({"message": "Dataset not found"}));
    });

    let source = CatalogSource::new(server.base_url(), "t", "missing");
    let err = source.fetch().await.unwrap_err();

    metadata_mock.assert();
    assert!(matches!(err, DashboardError::DatasetNotFound { dataset_id } if dataset_id == "missing"));
}

#[tokio::test]
async fn test_rejected_token_is_auth_failure() {
    let server = MockServer::start();
    let metadata_mock = server.mock(|when, then| {
        when.method(GET).path("/datasets/ds-123/");
        then.status(401)
            .json_body(serde_json::json!({"message": "Invalid API token"}));
    });
    let file_mock = server.mock(|when, then| {
        when.method(GET).path("/datasets/ds-123/file/");
        then.status(200).body(CUSTOMERS_CSV);
    });

    let source = CatalogSource::new(server.base_url(), "wrong", "ds-123");
    let err = source.fetch().await.unwrap_err();

    metadata_mock.assert();
    // 授權失敗後不再下載檔案
    file_mock.assert_hits(0);
    assert!(err.is_auth_failure());
    match err {
        DashboardError::CatalogError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API token");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_forbidden_dataset_is_auth_failure() {
    let server = MockServer::start();
    let metadata_mock = server.mock(|when, then| {
        when.method(GET).path("/datasets/ds-123/");
        then.status(403)
            .json_body(serde_json::json!({"message": "No permission to access dataset"}));
    });

    let source = CatalogSource::new(server.base_url(), "read-only", "ds-123");
    let err = source.fetch().await.unwrap_err();

    metadata_mock.assert();
    assert!(err.is_auth_failure());
    assert!(matches!(err, DashboardError::CatalogError { status: 403, .. }));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/datasets/ds-123/");
        then.status(200).json_body(metadata_json());
    });
    let file_mock = server.mock(|when, then| {
        when.method(GET).path("/datasets/ds-123/file/");
        then.status(503).body("Service Unavailable");
    });

    let source = CatalogSource::new(server.base_url(), "t", "ds-123");
    let err = source.fetch().await.unwrap_err();

    file_mock.assert_hits(1);
    assert!(matches!(err, DashboardError::CatalogError { status: 503, .. }));
}

#[tokio::test]
async fn test_dataset_without_expected_columns() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/datasets/ds-123/");
        then.status(200).json_body(metadata_json());
    });
    server.mock(|when, then| {
        when.method(GET).path("/datasets/ds-123/file/");
        then.status(200).body("id,value\n1,2\n");
    });

    let source = CatalogSource::new(server.base_url(), "t", "ds-123");
    let err = source.fetch().await.unwrap_err();

    assert!(matches!(err, DashboardError::CsvError(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_api_error() {
    // 保留的埠號，沒有服務在監聽
    let source = CatalogSource::new("http://127.0.0.1:9", "t", "ds-123").with_timeout(Some(2));
    let err = source.fetch().await.unwrap_err();

    assert!(matches!(err, DashboardError::ApiError(_)));
}
