//! Integration tests for purchase document operations.

mod common;

use common::{create_branch, create_supplier, dec, try_spawn_app};
use procurement_service::grpc::proto::{
    CreatePurchaseOrderRequest, DeletePurchaseOrderRequest, GetPurchaseOrderRequest,
    LineItemInput, ListPurchaseOrdersRequest, OrderKind, OrderStatus, PaymentStatus,
};
use uuid::Uuid;

fn line(quantity: i32, unit_price: &str, discount_percent: &str) -> LineItemInput {
    LineItemInput {
        product_id: Uuid::new_v4().to_string(),
        product_name: "Banarasi Silk Saree".to_string(),
        hsn_code: "5007".to_string(),
        quantity,
        unit_price: unit_price.to_string(),
        discount_percent: discount_percent.to_string(),
    }
}

#[tokio::test]
async fn create_purchase_order_computes_totals_and_numbers() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let supplier_id = create_supplier(&mut client).await;
    let branch_id = create_branch(&mut client).await;

    let response = client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::Purchase.into(),
            supplier_id,
            branch_id,
            lines: vec![line(1, "500", "0"), line(3, "200", "5")],
            tax_enabled: true,
            amount_paid: "1000".to_string(),
            credited_days: 30,
            notes: "First consignment".to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    let order = response.order.unwrap();
    let summary = order.summary.clone().unwrap();

    assert_eq!(dec(&summary.sub_total), dec("1100.00"));
    assert_eq!(dec(&summary.discount_total), dec("30.00"));
    assert_eq!(dec(&summary.taxable_amount), dec("1070.00"));
    assert_eq!(dec(&summary.tax_total), dec("53.50"));
    assert_eq!(dec(&summary.grand_total), dec("1123.50"));
    assert_eq!(dec(&summary.pending_payment), dec("123.50"));

    assert!(order.order_ref.starts_with("PO-"));
    assert!(order.invoice_no.starts_with("POINV-"));
    assert_eq!(order.status, OrderStatus::New as i32);
    assert_eq!(order.payment_status, PaymentStatus::Pending as i32);
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.lines[0].line_no, 1);
    assert!(order.lines[0].sku.ends_with("-0001"));
    assert!(order.lines[1].sku.ends_with("-0002"));
}

#[tokio::test]
async fn create_purchase_order_requires_lines() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let supplier_id = create_supplier(&mut client).await;
    let branch_id = create_branch(&mut client).await;

    let status = client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::Purchase.into(),
            supplier_id,
            branch_id,
            lines: vec![],
            tax_enabled: true,
            amount_paid: String::new(),
            credited_days: 0,
            notes: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn create_purchase_order_rejects_invalid_line() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let supplier_id = create_supplier(&mut client).await;
    let branch_id = create_branch(&mut client).await;

    let status = client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::Purchase.into(),
            supplier_id,
            branch_id,
            lines: vec![line(0, "50", "0")],
            tax_enabled: false,
            amount_paid: String::new(),
            credited_days: 0,
            notes: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
    assert!(status.message().contains("quantity"));
}

#[tokio::test]
async fn create_purchase_order_rejects_unknown_supplier() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let branch_id = create_branch(&mut client).await;

    let status = client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::Purchase.into(),
            supplier_id: Uuid::new_v4().to_string(),
            branch_id,
            lines: vec![line(1, "100", "0")],
            tax_enabled: false,
            amount_paid: String::new(),
            credited_days: 0,
            notes: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn get_purchase_order_round_trip() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let supplier_id = create_supplier(&mut client).await;
    let branch_id = create_branch(&mut client).await;

    let created = client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::GoodsReceived.into(),
            supplier_id,
            branch_id,
            lines: vec![line(2, "100.00", "10")],
            tax_enabled: false,
            amount_paid: String::new(),
            credited_days: 0,
            notes: String::new(),
        })
        .await
        .unwrap()
        .into_inner()
        .order
        .unwrap();

    let fetched = client
        .get_purchase_order(GetPurchaseOrderRequest {
            order_id: created.order_id.clone(),
        })
        .await
        .unwrap()
        .into_inner()
        .order
        .unwrap();

    assert_eq!(fetched.order_id, created.order_id);
    assert_eq!(fetched.kind, OrderKind::GoodsReceived as i32);
    assert_eq!(fetched.lines.len(), 1);
    assert_eq!(dec(&fetched.lines[0].discount_amount), dec("10.00"));
    assert_eq!(dec(&fetched.lines[0].line_total), dec("180.00"));
    assert_eq!(
        dec(&fetched.summary.unwrap().grand_total),
        dec("180.00")
    );
}

#[tokio::test]
async fn get_purchase_order_not_found() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let status = client
        .get_purchase_order(GetPurchaseOrderRequest {
            order_id: Uuid::new_v4().to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::NotFound);
}

#[tokio::test]
async fn list_purchase_orders_filters_by_kind() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let supplier_id = create_supplier(&mut client).await;
    let branch_id = create_branch(&mut client).await;

    let returned = client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::GoodsReturned.into(),
            supplier_id: supplier_id.clone(),
            branch_id: branch_id.clone(),
            lines: vec![line(1, "75.25", "0")],
            tax_enabled: false,
            amount_paid: String::new(),
            credited_days: 0,
            notes: String::new(),
        })
        .await
        .unwrap()
        .into_inner()
        .order
        .unwrap();

    client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::Purchase.into(),
            supplier_id,
            branch_id,
            lines: vec![line(1, "10", "0")],
            tax_enabled: false,
            amount_paid: String::new(),
            credited_days: 0,
            notes: String::new(),
        })
        .await
        .unwrap();

    let listed = client
        .list_purchase_orders(ListPurchaseOrdersRequest {
            kind: OrderKind::GoodsReturned.into(),
            status: 0,
            payment_status: 0,
            page_size: 100,
            page_token: String::new(),
        })
        .await
        .unwrap()
        .into_inner();

    assert!(!listed.orders.is_empty());
    assert!(listed
        .orders
        .iter()
        .all(|o| o.kind == OrderKind::GoodsReturned as i32));
    assert!(listed.orders.iter().any(|o| o.order_id == returned.order_id));
}

#[tokio::test]
async fn delete_purchase_order_removes_document() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let supplier_id = create_supplier(&mut client).await;
    let branch_id = create_branch(&mut client).await;

    let order = client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::Purchase.into(),
            supplier_id,
            branch_id,
            lines: vec![line(1, "45", "0")],
            tax_enabled: false,
            amount_paid: String::new(),
            credited_days: 0,
            notes: String::new(),
        })
        .await
        .unwrap()
        .into_inner()
        .order
        .unwrap();

    let deleted = client
        .delete_purchase_order(DeletePurchaseOrderRequest {
            order_id: order.order_id.clone(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.deleted);

    let status = client
        .get_purchase_order(GetPurchaseOrderRequest {
            order_id: order.order_id,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::NotFound);

    // Deleting again is a no-op
    let deleted_again = client
        .delete_purchase_order(DeletePurchaseOrderRequest {
            order_id: Uuid::new_v4().to_string(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(!deleted_again.deleted);
}
