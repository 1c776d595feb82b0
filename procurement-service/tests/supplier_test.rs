//! Integration tests for supplier operations.

mod common;

use common::{try_spawn_app, unique_code};
use procurement_service::grpc::proto::{
    CreateSupplierRequest, DeleteSupplierRequest, GetSupplierRequest, ListSuppliersRequest,
    UpdateSupplierRequest,
};

#[tokio::test]
async fn supplier_crud_round_trip() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let code = unique_code("SUP");
    let supplier = client
        .create_supplier(CreateSupplierRequest {
            code: code.clone(),
            company_name: "Kanchi Looms Pvt Ltd".to_string(),
            contact_name: "Raghavan".to_string(),
            door_number: "14B".to_string(),
            street: "Gandhi Road".to_string(),
            city: "Kanchipuram".to_string(),
            state: "Tamil Nadu".to_string(),
            country: "India".to_string(),
            email: "sales@kanchilooms.example".to_string(),
            phone: "9444012345".to_string(),
            gst_number: "33AABCK1234F1Z5".to_string(),
            bank_name: "Indian Bank".to_string(),
            bank_account_number: "456700112233".to_string(),
            ifsc: "IDIB000K001".to_string(),
            upi: "kanchilooms@upi".to_string(),
            payment_terms: "Net 30".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .supplier
        .unwrap();

    assert_eq!(supplier.code, code);
    assert!(supplier.active);

    let fetched = client
        .get_supplier(GetSupplierRequest {
            supplier_id: supplier.supplier_id.clone(),
        })
        .await
        .unwrap()
        .into_inner()
        .supplier
        .unwrap();
    assert_eq!(fetched.company_name, "Kanchi Looms Pvt Ltd");
    assert_eq!(fetched.gst_number, "33AABCK1234F1Z5");

    let updated = client
        .update_supplier(UpdateSupplierRequest {
            supplier_id: supplier.supplier_id.clone(),
            phone: "9444099999".to_string(),
            payment_terms: "Net 45".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner()
        .supplier
        .unwrap();
    assert_eq!(updated.phone, "9444099999");
    assert_eq!(updated.payment_terms, "Net 45");
    // Untouched fields survive the update
    assert_eq!(updated.company_name, "Kanchi Looms Pvt Ltd");

    let listed = client
        .list_suppliers(ListSuppliersRequest {
            active_only: true,
            page_size: 100,
            page_token: String::new(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(listed
        .suppliers
        .iter()
        .any(|s| s.supplier_id == supplier.supplier_id));

    let deleted = client
        .delete_supplier(DeleteSupplierRequest {
            supplier_id: supplier.supplier_id,
        })
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.deleted);
}

#[tokio::test]
async fn duplicate_supplier_code_conflicts() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let code = unique_code("SUP");
    let request = CreateSupplierRequest {
        code: code.clone(),
        company_name: "Weavers Guild".to_string(),
        ..Default::default()
    };

    client.create_supplier(request.clone()).await.unwrap();
    let status = client.create_supplier(request).await.unwrap_err();

    assert_eq!(status.code(), tonic::Code::AlreadyExists);
}

#[tokio::test]
async fn create_supplier_requires_code_and_name() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let status = client
        .create_supplier(CreateSupplierRequest {
            code: String::new(),
            company_name: "No Code Traders".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);

    let status = client
        .create_supplier(CreateSupplierRequest {
            code: unique_code("SUP"),
            company_name: String::new(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}
