//! Common test utilities for procurement-service integration tests.

use procurement_service::config::{DatabaseConfig, PricingConfig, ProcurementConfig};
use procurement_service::grpc::proto::procurement_service_client::ProcurementServiceClient;
use procurement_service::grpc::proto::{CreateBranchRequest, CreateSupplierRequest};
use procurement_service::startup::Application;
use rust_decimal::Decimal;
use service_core::config::Config as CommonConfig;
use std::sync::Once;
use tonic::transport::Channel;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,procurement_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Test configuration with the 5% business tax rate.
fn test_config(database_url: String) -> ProcurementConfig {
    ProcurementConfig {
        common: CommonConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        service_name: "procurement-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: database_url,
            max_connections: 2,
            min_connections: 1,
        },
        pricing: PricingConfig {
            tax_rate: Decimal::new(5, 2),
        },
    }
}

/// Test application wrapper.
#[allow(dead_code)]
pub struct TestApp {
    pub grpc_client: ProcurementServiceClient<Channel>,
    pub http_port: u16,
    pub grpc_port: u16,
}

/// Spawn a test application and return the gRPC client.
///
/// Returns `None` (and the test should bail out) when `TEST_DATABASE_URL`
/// is not set, so the suite passes on machines without a provisioned
/// database.
pub async fn try_spawn_app() -> Option<TestApp> {
    init_tracing();

    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping integration test");
        return None;
    };

    let config = test_config(database_url);

    // Migrations are idempotent, so every spawned app may run them.
    let app = Application::build(config)
        .await
        .expect("Failed to build application");

    let http_port = app.http_port();
    let grpc_port = app.grpc_port();
    let grpc_addr = format!("http://127.0.0.1:{}", grpc_port);

    // Start the application in the background
    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    // Wait for server to be ready with retry
    let grpc_client = {
        let mut attempts = 0;
        loop {
            match ProcurementServiceClient::connect(grpc_addr.clone()).await {
                Ok(client) => break client,
                Err(_) if attempts < 20 => {
                    attempts += 1;
                    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
                }
                Err(e) => panic!("Failed to connect gRPC client after 20 attempts: {}", e),
            }
        }
    };

    Some(TestApp {
        grpc_client,
        http_port,
        grpc_port,
    })
}

/// Parse a wire decimal string.
#[allow(dead_code)]
pub fn dec(value: &str) -> Decimal {
    value.parse().expect("invalid decimal string")
}

/// A short unique code so master-data rows never collide across runs.
#[allow(dead_code)]
pub fn unique_code(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &suffix[..8])
}

/// Helper to create a supplier and return its ID.
#[allow(dead_code)]
pub async fn create_supplier(
    client: &mut ProcurementServiceClient<Channel>,
) -> String {
    let response = client
        .create_supplier(CreateSupplierRequest {
            code: unique_code("SUP"),
            company_name: "Sri Weaves Trading Co".to_string(),
            contact_name: "Meena".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            country: "India".to_string(),
            email: "purchasing@sriweaves.example".to_string(),
            phone: "9840012345".to_string(),
            ..Default::default()
        })
        .await
        .expect("create_supplier failed")
        .into_inner();

    response.supplier.expect("missing supplier").supplier_id
}

/// Helper to create a branch and return its ID.
#[allow(dead_code)]
pub async fn create_branch(
    client: &mut ProcurementServiceClient<Channel>,
) -> String {
    let response = client
        .create_branch(CreateBranchRequest {
            name: "T Nagar".to_string(),
            code: unique_code("BR"),
            location: "Chennai".to_string(),
            mobile: "9840067890".to_string(),
            email: "tnagar@store.example".to_string(),
            is_main_branch: false,
        })
        .await
        .expect("create_branch failed")
        .into_inner();

    response.branch.expect("missing branch").branch_id
}
