//! Integration tests for category and branch operations.

mod common;

use common::{try_spawn_app, unique_code};
use procurement_service::grpc::proto::{
    CreateBranchRequest, CreateCategoryRequest, DeleteBranchRequest, DeleteCategoryRequest,
    ListBranchesRequest, ListCategoriesRequest, UpdateBranchRequest, UpdateCategoryRequest,
};

#[tokio::test]
async fn category_hierarchy_round_trip() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let parent = client
        .create_category(CreateCategoryRequest {
            name: "Sarees".to_string(),
            code: unique_code("CAT"),
            parent_id: String::new(),
        })
        .await
        .unwrap()
        .into_inner()
        .category
        .unwrap();
    assert!(parent.parent_id.is_empty());

    let child = client
        .create_category(CreateCategoryRequest {
            name: "Silk Sarees".to_string(),
            code: unique_code("CAT"),
            parent_id: parent.category_id.clone(),
        })
        .await
        .unwrap()
        .into_inner()
        .category
        .unwrap();
    assert_eq!(child.parent_id, parent.category_id);

    // Listing by parent returns the sub-categories only
    let children = client
        .list_categories(ListCategoriesRequest {
            parent_id: parent.category_id.clone(),
            active_only: false,
        })
        .await
        .unwrap()
        .into_inner();
    assert!(children
        .categories
        .iter()
        .any(|c| c.category_id == child.category_id));
    assert!(children
        .categories
        .iter()
        .all(|c| c.parent_id == parent.category_id));

    let renamed = client
        .update_category(UpdateCategoryRequest {
            category_id: child.category_id.clone(),
            name: "Pure Silk Sarees".to_string(),
            code: String::new(),
            active: None,
        })
        .await
        .unwrap()
        .into_inner()
        .category
        .unwrap();
    assert_eq!(renamed.name, "Pure Silk Sarees");
    assert_eq!(renamed.code, child.code);

    let deleted = client
        .delete_category(DeleteCategoryRequest {
            category_id: child.category_id,
        })
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.deleted);
}

#[tokio::test]
async fn duplicate_category_code_conflicts() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let code = unique_code("CAT");
    client
        .create_category(CreateCategoryRequest {
            name: "Blouses".to_string(),
            code: code.clone(),
            parent_id: String::new(),
        })
        .await
        .unwrap();

    let status = client
        .create_category(CreateCategoryRequest {
            name: "Blouses Again".to_string(),
            code,
            parent_id: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::AlreadyExists);
}

#[tokio::test]
async fn branch_crud_round_trip() {
    let Some(app) = try_spawn_app().await else { return };
    let mut client = app.grpc_client.clone();

    let branch = client
        .create_branch(CreateBranchRequest {
            name: "Mylapore".to_string(),
            code: unique_code("BR"),
            location: "Chennai".to_string(),
            mobile: "9840055555".to_string(),
            email: "mylapore@store.example".to_string(),
            is_main_branch: true,
        })
        .await
        .unwrap()
        .into_inner()
        .branch
        .unwrap();
    assert!(branch.is_main_branch);
    assert!(branch.active);

    let updated = client
        .update_branch(UpdateBranchRequest {
            branch_id: branch.branch_id.clone(),
            name: String::new(),
            location: "Chennai South".to_string(),
            mobile: String::new(),
            email: String::new(),
            is_main_branch: Some(false),
            active: None,
        })
        .await
        .unwrap()
        .into_inner()
        .branch
        .unwrap();
    assert_eq!(updated.location, "Chennai South");
    assert!(!updated.is_main_branch);
    assert_eq!(updated.name, "Mylapore");

    let listed = client
        .list_branches(ListBranchesRequest { active_only: true })
        .await
        .unwrap()
        .into_inner();
    assert!(listed
        .branches
        .iter()
        .any(|b| b.branch_id == branch.branch_id));

    let deleted = client
        .delete_branch(DeleteBranchRequest {
            branch_id: branch.branch_id,
        })
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.deleted);
}
