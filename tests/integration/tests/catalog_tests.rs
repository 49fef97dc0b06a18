//! Catalogue, favourites, and order integration tests
//!
//! Run with: cargo test -p integration-tests --test catalog_tests

use integration_tests::{checkout_for, seeded_login, TestServer, SEEDED_PRODUCTS};
use storefront_common::AppError;
use storefront_core::{DomainError, NewReview, PageItem, ProductQuery};

// ============================================================================
// Catalogue Tests
// ============================================================================

#[tokio::test]
async fn test_product_listing_and_page_range() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let page = client
        .products(&ProductQuery::new().page(2))
        .await
        .unwrap();
    assert_eq!(page.count, SEEDED_PRODUCTS);
    assert_eq!(page.results.len(), 12);
    assert_eq!(page.results[0].id, 13);
    assert!(page.has_next());
    assert!(page.has_previous());

    // 40 products at 12 per page: 4 pages, all shown
    let range = client.page_range(&page, 2);
    assert!(range.should_render());
    assert_eq!(
        range.items(),
        &[
            PageItem::Page(1),
            PageItem::Page(2),
            PageItem::Page(3),
            PageItem::Page(4)
        ]
    );
}

#[tokio::test]
async fn test_category_filter() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let page = client
        .products(&ProductQuery::new().category("sofas"))
        .await
        .unwrap();
    assert_eq!(page.count, SEEDED_PRODUCTS / 2);
    assert!(page.results.iter().all(|p| p.category == "sofas"));
}

#[tokio::test]
async fn test_page_past_the_end() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let err = client
        .products(&ProductQuery::new().page(99))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_product() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let product = client.product(3).await.unwrap();
    assert_eq!(product.name, "Product 3");

    let err = client.product(9_999).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::ProductNotFound(9_999))
    ));
}

#[tokio::test]
async fn test_reviews() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    // Posting needs a session
    let review = NewReview {
        rating: 4,
        comment: "Sturdy and comfortable".to_string(),
    };
    let err = client.add_review(5, &review).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));

    client.login(&seeded_login()).await.unwrap();
    let posted = client.add_review(5, &review).await.unwrap();
    assert_eq!(posted.rating, 4);

    let reviews = client.reviews(5).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].comment, "Sturdy and comfortable");
}

// ============================================================================
// Favorites Tests
// ============================================================================

#[tokio::test]
async fn test_favorites_round_trip() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    client.login(&seeded_login()).await.unwrap();

    let favorite = client.add_favorite(7).await.unwrap();
    assert_eq!(favorite.product.id, 7);
    assert_eq!(client.favorites().await.unwrap().len(), 1);

    client.remove_favorite(7).await.unwrap();
    assert!(client.favorites().await.unwrap().is_empty());

    let err = client.remove_favorite(7).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::ProductNotFound(7))
    ));
}

// ============================================================================
// Order Tests
// ============================================================================

#[tokio::test]
async fn test_checkout_and_history() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    client.login(&seeded_login()).await.unwrap();

    let order = client.place_order(&checkout_for(&[1, 2])).await.unwrap();
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_cents(), 10_500 + 11_000);

    let history = client.orders(1).await.unwrap();
    assert_eq!(history.count, 1);
    assert_eq!(history.results[0].id, order.id);

    let fetched = client.order(order.id).await.unwrap();
    assert_eq!(fetched, order);

    let err = client.order(123_456).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::OrderNotFound(123_456))
    ));
}

#[tokio::test]
async fn test_checkout_renews_expired_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    client.login(&seeded_login()).await.unwrap();

    server.api.expire_access_tokens();
    client.place_order(&checkout_for(&[3])).await.unwrap();
    assert_eq!(server.api.refresh_calls(), 1);
}
