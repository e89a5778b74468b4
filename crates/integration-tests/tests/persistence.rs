//! Integration tests for carts surviving a restart through the storage file.

use std::sync::Arc;

use little_oat_core::ProductId;
use little_oat_integration_tests::{product, product_json, storefront_for};
use little_oat_storefront::{FileStore, HeadlessUi, KeyValueStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("profile").join("local-storage.json");
    let server = MockServer::start().await;

    {
        let page = storefront_for(
            &server.uri(),
            Arc::new(FileStore::new(&file)),
            Arc::new(HeadlessUi::new()),
        );
        page.with_cart(|cart| {
            cart.add(&product("phonics", "Phonics Pack", "$5.00"));
            cart.add(&product("math", "Math Mats", "$7.50"));
        });
        page.remove_from_cart(&ProductId::new("phonics"));
    }

    let ui = Arc::new(HeadlessUi::new());
    let page = storefront_for(&server.uri(), Arc::new(FileStore::new(&file)), ui.clone());

    let ids: Vec<String> = page.with_cart(|cart| {
        cart.items().iter().map(|item| item.id.to_string()).collect()
    });
    assert_eq!(ids, vec!["math".to_string()]);

    let panel = ui.last_cart().expect("cart rendered on load");
    assert_eq!(panel.count, 1);
    assert_eq!(panel.total, "$7.50");
}

#[tokio::test]
async fn test_corrupt_saved_cart_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(FileStore::new(dir.path().join("local-storage.json")));
    store
        .set("littleOatCart", "{not json")
        .expect("write corrupt cart");

    let server = MockServer::start().await;
    let page = storefront_for(&server.uri(), store, Arc::new(HeadlessUi::new()));

    assert!(page.with_cart(|cart| cart.is_empty()));
}

#[tokio::test]
async fn test_add_from_catalog_persists_to_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("local-storage.json");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([product_json("phonics", "Phonics Pack", "$5.00")])),
        )
        .mount(&server)
        .await;

    let page = storefront_for(
        &server.uri(),
        Arc::new(FileStore::new(&file)),
        Arc::new(HeadlessUi::new()),
    );
    page.load_products().await;
    let (outcome, _feedback) = page
        .add_to_cart_clicked(&ProductId::new("phonics"))
        .expect("product on page");
    assert!(outcome.is_added());

    let saved = FileStore::new(&file)
        .get("littleOatCart")
        .expect("readable")
        .expect("cart saved");
    let saved: serde_json::Value = serde_json::from_str(&saved).expect("cart is JSON");
    assert_eq!(
        saved,
        json!([{
            "id": "phonics",
            "title": "Phonics Pack",
            "price": "$5.00",
            "priceValue": 5.0,
            "image": "https://cdn.example.com/phonics.png"
        }])
    );
}
