//! Integration tests for the product create and list endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use merx_db::models::CreateProduct;
use merx_db::repositories::ProductRepo;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

fn product_body(code: &str) -> serde_json::Value {
    json!({
        "ProductType": "P",
        "ProductCode": code,
        "ProductGroup": "general",
        "ProductDescription": format!("product {code}"),
        "ProductNumberCode": "0001",
    })
}

/// Seed products straight through the repository (skips HTTP).
async fn seed(pool: &PgPool, codes: &[&str]) {
    for code in codes {
        let input = CreateProduct {
            product_type: "P".to_string(),
            product_code: code.to_string(),
            product_group: Some("general".to_string()),
            product_description: format!("product {code}"),
            product_number_code: "0001".to_string(),
            customs_details: None,
        };
        ProductRepo::create(pool, &input).await.unwrap();
    }
}

// ---------------------------------------------------------------------------
// POST /api/v1/product
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_assigned_identity(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/product", product_body("PC-1")).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let id = json["id"].as_str().expect("id must be a string");
    assert!(Uuid::parse_str(id).is_ok(), "id must be a UUID: {id:?}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_customs_details_round_trips(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let mut body = product_body("PC-CD");
    body["CustomsDetails"] = json!({ "CNCode": ["1234"], "UNNumber": ["99"] });

    let response = post_json(app.clone(), "/api/v1/product", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(get(app, "/api/v1/product?product_code=PC-CD").await).await;
    assert_eq!(listed["items"][0]["CustomsDetails"]["CNCode"][0], "1234");
    assert_eq!(listed["items"][0]["CustomsDetails"]["UNNumber"][0], "99");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_product_type_is_an_invalid_request(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut body = product_body("PC-1");
    body.as_object_mut().unwrap().remove("ProductType");

    let response = post_json(app, "/api/v1/product", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_bad_field_lengths_is_an_invalid_request(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut body = product_body("PC-1");
    body["ProductDescription"] = json!("x"); // below the 2-char minimum

    let response = post_json(app, "/api/v1/product", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_duplicate_code_is_a_service_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = post_json(app.clone(), "/api/v1/product", product_body("PC-1")).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/api/v1/product", product_body("PC-1")).await;
    assert_eq!(second.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(second).await;
    assert_eq!(json["code"], "SERVICE_ERROR");
}

// ---------------------------------------------------------------------------
// GET /api/v1/product
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_page_envelope(pool: PgPool) {
    seed(&pool, &["PC-1", "PC-2"]).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/product?page=1&per_page=10").await).await;

    assert_eq!(json["total"], 2);
    assert_eq!(json["per_page"], 10);
    assert_eq!(json["page"], 1);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_defaults_bad_pagination_params(pool: PgPool) {
    seed(&pool, &["PC-1"]).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/product?page=-1&per_page=abc").await).await;

    assert_eq!(json["page"], 1);
    assert_eq!(json["per_page"], 20);
    assert_eq!(json["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_with_extreme_pagination_returns_an_empty_page(pool: PgPool) {
    seed(&pool, &["PC-1"]).await;
    let app = common::build_test_app(pool);

    let response = get(
        app,
        "/api/v1/product?page=9223372036854775807&per_page=4",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_repeated_params_use_the_first_value(pool: PgPool) {
    seed(&pool, &["AAA", "BBB"]).await;
    let app = common::build_test_app(pool);

    let json = body_json(
        get(app, "/api/v1/product?product_code=AAA&product_code=BBB").await,
    )
    .await;

    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["ProductCode"], "AAA");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_are_case_insensitive_substrings(pool: PgPool) {
    seed(&pool, &["ABC-01", "xyz"]).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/product?product_code=abc").await).await;

    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["ProductCode"], "ABC-01");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_identity_filter_matches_exactly(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let created = body_json(post_json(app.clone(), "/api/v1/product", product_body("PC-1")).await).await;
    let id = created["id"].as_str().unwrap().to_string();
    seed(&pool, &["PC-2"]).await;

    let json = body_json(get(app, &format!("/api/v1/product?_id={id}")).await).await;

    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["id"], id.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_unknown_params_are_ignored(pool: PgPool) {
    seed(&pool, &["PC-1", "PC-2"]).await;
    let app = common::build_test_app(pool);

    // Neither the bogus filter nor the bogus sort key may affect the query.
    let json = body_json(get(app, "/api/v1/product?made_up_field=zzz&sort=made_up").await).await;

    assert_eq!(json["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_pages_are_ranked_under_the_requested_sort(pool: PgPool) {
    let codes: Vec<String> = (1..=15).map(|i| format!("PC-{i:02}")).collect();
    let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
    seed(&pool, &refs).await;
    let app = common::build_test_app(pool);

    let json = body_json(
        get(app, "/api/v1/product?page=2&per_page=5&sort=product_code").await,
    )
    .await;

    assert_eq!(json["total"], 15);
    let codes: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["ProductCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["PC-06", "PC-07", "PC-08", "PC-09", "PC-10"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_reverse_order_sorts_descending(pool: PgPool) {
    seed(&pool, &["PC-1", "PC-2", "PC-3"]).await;
    let app = common::build_test_app(pool);

    let json = body_json(
        get(app, "/api/v1/product?sort=product_code&order=reverse").await,
    )
    .await;

    let codes: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["ProductCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["PC-3", "PC-2", "PC-1"]);
}
