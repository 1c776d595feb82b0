//! Integration tests for product operations.

mod common;

use common::{dec, try_spawn_app};
use procurement_service::grpc::proto::{
    CreateProductRequest, DeleteProductRequest, GetProductRequest, ListProductsRequest,
    UpdateProductRequest,
};
use uuid::Uuid;

#[tokio::test]
async fn create_product_assigns_sku() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let product = client
        .create_product(CreateProductRequest {
            name: "Mysore Silk Saree".to_string(),
            description: "Pure silk with zari border".to_string(),
            hsn_code: "5007".to_string(),
            unit_price: "2499.00".to_string(),
            discount_percent: "5".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();

    assert!(product.sku.starts_with("SS-"));
    assert!(product.active);
    assert_eq!(dec(&product.unit_price), dec("2499.00"));
}

#[tokio::test]
async fn create_product_requires_name() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let status = client
        .create_product(CreateProductRequest {
            name: String::new(),
            description: String::new(),
            hsn_code: String::new(),
            unit_price: "10".to_string(),
            discount_percent: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn create_product_rejects_out_of_range_discount() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let status = client
        .create_product(CreateProductRequest {
            name: "Chiffon Saree".to_string(),
            description: String::new(),
            hsn_code: String::new(),
            unit_price: "100".to_string(),
            discount_percent: "120".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn product_update_round_trip() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let product = client
        .create_product(CreateProductRequest {
            name: "Tussar Saree".to_string(),
            description: String::new(),
            hsn_code: "5007".to_string(),
            unit_price: "1800".to_string(),
            discount_percent: "0".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();

    let updated = client
        .update_product(UpdateProductRequest {
            product_id: product.product_id.clone(),
            name: String::new(),
            description: String::new(),
            hsn_code: String::new(),
            unit_price: "1650.50".to_string(),
            discount_percent: String::new(),
            active: Some(false),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();

    // Absent fields keep their values; provided fields change.
    assert_eq!(updated.name, "Tussar Saree");
    assert_eq!(dec(&updated.unit_price), dec("1650.50"));
    assert!(!updated.active);

    let fetched = client
        .get_product(GetProductRequest {
            product_id: product.product_id,
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();
    assert_eq!(dec(&fetched.unit_price), dec("1650.50"));
    assert_eq!(fetched.sku, product.sku);
}

#[tokio::test]
async fn list_products_active_only() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let product = client
        .create_product(CreateProductRequest {
            name: "Linen Saree".to_string(),
            description: String::new(),
            hsn_code: "5309".to_string(),
            unit_price: "950".to_string(),
            discount_percent: "0".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();

    client
        .update_product(UpdateProductRequest {
            product_id: product.product_id.clone(),
            name: String::new(),
            description: String::new(),
            hsn_code: String::new(),
            unit_price: String::new(),
            discount_percent: String::new(),
            active: Some(false),
        })
        .await
        .unwrap();

    let listed = client
        .list_products(ListProductsRequest {
            active_only: true,
            page_size: 100,
            page_token: String::new(),
        })
        .await
        .unwrap()
        .into_inner();

    assert!(listed
        .products
        .iter()
        .all(|p| p.product_id != product.product_id));
}

#[tokio::test]
async fn delete_product() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let product = client
        .create_product(CreateProductRequest {
            name: "Organza Saree".to_string(),
            description: String::new(),
            hsn_code: String::new(),
            unit_price: "1200".to_string(),
            discount_percent: "0".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();

    let deleted = client
        .delete_product(DeleteProductRequest {
            product_id: product.product_id.clone(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.deleted);

    let status = client
        .get_product(GetProductRequest {
            product_id: product.product_id,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::NotFound);
}

#[tokio::test]
async fn get_product_invalid_id() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let status = client
        .get_product(GetProductRequest {
            product_id: "not-a-uuid".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);

    let status = client
        .get_product(GetProductRequest {
            product_id: Uuid::new_v4().to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::NotFound);
}
