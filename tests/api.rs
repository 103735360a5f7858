use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
};
use online_store_api::{
    config::Config, create_app, db::DocumentStore, routes::AppState, services::image_urls, App,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;

fn test_config(public_dir: PathBuf) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        base_url: Some("https://api.example.com".to_string()),
        public_dir,
        max_connections: 1,
        migration_concurrency: 4,
    }
}

fn temp_public_dir() -> PathBuf {
    std::env::temp_dir().join(format!("online-store-api-{}", uuid::Uuid::now_v7()))
}

async fn connected_app() -> (App, DocumentStore) {
    let store = DocumentStore::in_memory()
        .await
        .expect("Failed to create in memory store");
    let app = create_app(AppState::new(store.clone(), test_config(temp_public_dir())));
    (app, store)
}

fn disconnected_app() -> App {
    create_app(AppState::new(
        DocumentStore::disconnected(),
        test_config(temp_public_dir()),
    ))
}

async fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn root_works_without_a_store() {
    let app = disconnected_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "API working successfully", "data": null })
    );
}

#[tokio::test]
async fn storage_failures_become_500_envelopes() {
    let app = disconnected_app();
    for uri in ["/categories", "/products/abc", "/orders/orderByUserId/u1"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["message"], "Document store is unavailable");
    }
}

#[tokio::test]
async fn category_crud_flow() {
    let (app, _) = connected_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/categories",
        Some(json!({ "name": "Shoes", "image": "http://localhost/image/category/shoes.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Category created successfully.");
    let id = created["data"]["_id"].as_str().unwrap().to_string();
    assert!(created["data"]["createdAt"].is_string());

    let (status, list) = send(&app, Method::GET, "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["message"], "Categories retrieved successfully.");
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/categories/{id}"),
        Some(json!({ "name": "Sneakers" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Sneakers");
    assert_eq!(updated["data"]["image"], "http://localhost/image/category/shoes.png");

    let (status, fetched) = send(&app, Method::GET, &format!("/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["name"], "Sneakers");

    let (status, deleted) = send(&app, Method::DELETE, &format!("/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Category deleted successfully.");
    assert_eq!(deleted["data"], Value::Null);

    let (status, missing) = send(&app, Method::GET, &format!("/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        missing,
        json!({ "success": false, "message": "Category not found.", "data": null })
    );
}

#[tokio::test]
async fn invalid_bodies_are_rejected_with_400() {
    let (app, _) = connected_app().await;

    let (status, body) = send(&app, Method::POST, "/subCategories", Some(json!({ "name": "Boots" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Required fields are missing: categoryId.");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);

    let (status, _) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({
            "name": "Sneaker",
            "quantity": 3,
            "price": 49.5,
            "proCategoryId": "c1",
            "proSubCategoryId": "s1",
            "images": "not-a-list"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/orders?items.0=1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn trailing_slash_reaches_the_same_handler() {
    let (app, _) = connected_app().await;
    let (status, created) = send(&app, Method::POST, "/categories/", Some(json!({ "name": "Hats" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let (status, list) = send(&app, Method::GET, "/categories/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["message"], "Categories retrieved successfully.");
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let (status, fetched) = send(&app, Method::GET, &format!("/categories/{id}/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["name"], "Hats");

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API working successfully");
}

#[tokio::test]
async fn unknown_routes_return_404_envelope() {
    let (app, _) = connected_app().await;
    let (status, body) = send(&app, Method::GET, "/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found.");
}

#[tokio::test]
async fn capabilities_limit_methods() {
    let (app, _) = connected_app().await;
    let (status, _) = send(&app, Method::DELETE, "/payment/abc", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = send(&app, Method::PUT, "/notification/abc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn orders_default_status_and_lookup_by_user() {
    let (app, _) = connected_app().await;
    let order = |user: &str| {
        json!({
            "userID": user,
            "items": [{ "productID": "p1", "quantity": 1 }],
            "totalPrice": 10,
            "shippingAddress": { "city": "Seoul" },
            "paymentMethod": "cod"
        })
    };

    let (status, created) = send(&app, Method::POST, "/orders", Some(order("u1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["orderStatus"], "pending");
    send(&app, Method::POST, "/orders", Some(order("u2"))).await;
    send(&app, Method::POST, "/orders", Some(order("u1"))).await;

    let (status, mine) = send(&app, Method::GET, "/orders/orderByUserId/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["data"].as_array().unwrap().len(), 2);

    let (_, filtered) = send(&app, Method::GET, "/orders?userID=u2", None).await;
    assert_eq!(filtered["data"].as_array().unwrap().len(), 1);

    let (_, none) = send(&app, Method::GET, "/orders/orderByUserId/nobody", None).await;
    assert_eq!(none["data"], json!([]));
}

#[tokio::test]
async fn users_never_expose_passwords() {
    let (app, _) = connected_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "mila", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["data"].get("password").is_none());
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "mila", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, list) = send(&app, Method::GET, "/users", None).await;
    assert!(list["data"][0].get("password").is_none());

    let (status, login) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "name": "mila", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["data"]["_id"], id.as_str());
    assert!(login["data"].get("password").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "name": "mila", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid name or password.");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/users/{id}"),
        Some(json!({ "password": "new-pass-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "name": "mila", "password": "new-pass-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn static_images_are_served_and_missing_files_are_404() {
    let public_dir = temp_public_dir();
    let products = public_dir.join("products");
    std::fs::create_dir_all(&products).unwrap();
    std::fs::write(products.join("1.jpg"), b"jpeg-bytes").unwrap();

    let app = create_app(AppState::new(
        DocumentStore::disconnected(),
        test_config(public_dir.clone()),
    ));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/image/products/1.jpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"jpeg-bytes");

    for uri in ["/image/products/2.jpg", "/image/category/a.png", "/image/poster/b.png"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(serde_json::from_slice::<Value>(&bytes).is_err());
    }

    std::fs::remove_dir_all(public_dir).ok();
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let app = disconnected_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "https://shop.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn migration_rewrites_products_created_through_the_api() {
    let (app, store) = connected_app().await;
    let (status, created) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({
            "name": "Sneaker",
            "quantity": 3,
            "price": 49.5,
            "proCategoryId": "c1",
            "proSubCategoryId": "s1",
            "images": [{ "image": 1, "url": "http://localhost/products/1.jpg" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let report = image_urls::rewrite_image_urls(store.pool().unwrap(), "https://api.example.com", 4)
        .await
        .unwrap();
    assert_eq!(report.rewritten, 1);

    let (_, product) = send(&app, Method::GET, &format!("/products/{id}"), None).await;
    assert_eq!(
        product["data"]["images"][0]["url"],
        "https://api.example.com/products/1.jpg"
    );
}
