mod common;

use axum::http::{Method, Request, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

async fn seeded() -> (TestApp, i32, i32, i32) {
    let app = TestApp::new().await;
    let shop = app.seed_shop("bakery").await;
    let category = app.seed_category(shop.id, "Cakes", 1).await;
    let image = app.seed_image(shop.id, "front.jpg").await;
    let size = app.seed_size(shop.id, "6 inch", 0, (50, 50, 50)).await;
    (app, category.id, image.id, size.id)
}

#[tokio::test]
async fn product_lifecycle_over_http() {
    let (app, category, image, size) = seeded().await;

    let response = app
        .request(
            Method::POST,
            "/api/bakery/product",
            Some(json!({
                "name": "Cheesecake",
                "category": category,
                "price": 1000,
                "member_price": 900,
                "promote_price": 800,
                "web_allowed": true,
                "images": [{ "id": image, "index": 0 }],
                "sizes": [{ "id": size, "price": 1100, "member_price": 850, "promote_price": 800 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let code = created["code"].as_str().unwrap().to_string();
    assert_eq!(created["web_allowed"], true);
    assert_eq!(created["pos_allowed"], true);
    assert_eq!(created["promote_allowed"], false);
    assert_eq!(created["images"][0]["image"]["id"], image);
    assert_eq!(created["sizes"][0]["price_plus"], 100);
    assert_eq!(created["sizes"][0]["member_price_plus"], 50);
    assert_eq!(created["sizes"][0]["promote_price_plus"], 0);

    let response = app
        .request(Method::GET, &format!("/api/bakery/product?code={code}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["name"], "Cheesecake");
    assert_eq!(fetched["category"]["id"], category);

    let response = app
        .request(Method::GET, "/api/bakery/products?type=1", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .request(Method::GET, "/api/bakery/products?type=4", None)
        .await;
    let listed = body_json(response).await;
    assert!(listed.as_array().unwrap().is_empty());

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/bakery/product?code={code}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_deleted"], true);

    let response = app
        .request(Method::GET, &format!("/api/bakery/product?code={code}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_query_parameters_are_bad_requests() {
    let (app, _, _, _) = seeded().await;

    let response = app.request(Method::GET, "/api/bakery/product", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "product code should be required");

    let response = app
        .request(Method::GET, "/api/bakery/product?code=%20", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.request(Method::DELETE, "/api/bakery/product", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.request(Method::GET, "/api/bakery/products", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "terminal type should be required");
}

#[tokio::test]
async fn incomplete_upsert_payload_is_rejected() {
    let (app, category, _, _) = seeded().await;

    let response = app
        .request(
            Method::POST,
            "/api/bakery/product",
            Some(json!({ "name": "Tart", "category": category, "price": 500 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn unknown_references_are_not_found() {
    let (app, category, _, _) = seeded().await;

    let response = app
        .request(Method::GET, "/api/nowhere/products?type=2", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Not Found");

    let response = app
        .request(
            Method::POST,
            "/api/bakery/product",
            Some(json!({
                "name": "Tart",
                "category": category,
                "price": 500,
                "member_price": 450,
                "promote_price": 400,
                "images": [{ "id": 999, "index": 0 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(Method::GET, "/api/bakery/products?type=2&category=999", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sizes_are_listed_per_shop() {
    let (app, _, _, size) = seeded().await;

    let response = app.request(Method::GET, "/api/bakery/sizes", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["id"], size);
    assert_eq!(body[0]["price_plus"], 50);

    let response = app.request(Method::GET, "/api/nowhere/sizes", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoints_answer() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "up");

    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/{shopcode}/products"].is_object());
}

#[tokio::test]
async fn request_id_is_echoed() {
    use tower::ServiceExt;

    let app = TestApp::new().await;
    let router = shoppoint_api::build_router(app.state.clone());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-7")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-7");
}
