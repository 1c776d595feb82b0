//! Integration tests for payment recording.

mod common;

use common::{create_branch, create_supplier, dec, try_spawn_app};
use procurement_service::grpc::proto::{
    CreatePurchaseOrderRequest, LineItemInput, OrderKind, PaymentStatus, RecordPaymentRequest,
};
use uuid::Uuid;

async fn create_order(
    client: &mut procurement_service::grpc::proto::procurement_service_client::ProcurementServiceClient<tonic::transport::Channel>,
    amount_paid: &str,
) -> String {
    let supplier_id = create_supplier(client).await;
    let branch_id = create_branch(client).await;

    client
        .create_purchase_order(CreatePurchaseOrderRequest {
            kind: OrderKind::Purchase.into(),
            supplier_id,
            branch_id,
            lines: vec![LineItemInput {
                product_id: Uuid::new_v4().to_string(),
                product_name: "Silk Dupatta".to_string(),
                hsn_code: "5007".to_string(),
                quantity: 1,
                unit_price: "500".to_string(),
                discount_percent: "0".to_string(),
            }],
            tax_enabled: false,
            amount_paid: amount_paid.to_string(),
            credited_days: 15,
            notes: String::new(),
        })
        .await
        .unwrap()
        .into_inner()
        .order
        .unwrap()
        .order_id
}

#[tokio::test]
async fn record_payment_reduces_pending_balance() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let order_id = create_order(&mut client, "100").await;

    let order = client
        .record_payment(RecordPaymentRequest {
            order_id,
            amount: "150".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .order
        .unwrap();

    let summary = order.summary.unwrap();
    assert_eq!(dec(&summary.pending_payment), dec("250.00"));
    assert_eq!(order.payment_status, PaymentStatus::Pending as i32);
}

#[tokio::test]
async fn overpayment_marks_paid_with_negative_pending() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let order_id = create_order(&mut client, "0").await;

    let order = client
        .record_payment(RecordPaymentRequest {
            order_id,
            amount: "525.75".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .order
        .unwrap();

    let summary = order.summary.unwrap();
    // Overpayment is reported as a negative pending balance, not clamped.
    assert_eq!(dec(&summary.pending_payment), dec("-25.75"));
    assert_eq!(order.payment_status, PaymentStatus::Paid as i32);
}

#[tokio::test]
async fn record_payment_rejects_non_positive_amount() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let order_id = create_order(&mut client, "0").await;

    let status = client
        .record_payment(RecordPaymentRequest {
            order_id,
            amount: "0".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn record_payment_unknown_order() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let status = client
        .record_payment(RecordPaymentRequest {
            order_id: Uuid::new_v4().to_string(),
            amount: "10".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::NotFound);
}
